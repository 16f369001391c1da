//! Shared schemas used from many threads at once.

use ntest::timeout;
use rayon::prelude::*;

use cereal_core::{Codec, CodecConfig};

use super::helpers::{person_schema, Address, Person};

fn person(i: i32) -> Person {
    Person {
        name: Some(format!("person-{i}")),
        age: i,
        address: (i % 2 == 0).then(|| {
            Box::new(Address {
                street: Some(format!("{i} Elm Street")),
                number: i * 3,
                geo: None,
            })
        }),
    }
}

#[test]
#[timeout(30000)]
fn test_parallel_round_trips_share_one_schema() {
    let schema = person_schema();
    let codec = Codec::new(CodecConfig::default());

    let mismatches: Vec<i32> = (0..2_000)
        .into_par_iter()
        .filter(|&i| {
            let original = person(i);
            let text = codec.serialize(&original, &schema).expect("serialize");
            let back: Person = codec.deserialize(&text, &schema).expect("deserialize");
            back != original
        })
        .collect();

    assert!(mismatches.is_empty(), "mismatched round trips: {mismatches:?}");
}

#[test]
fn test_schema_and_codec_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<cereal_core::StructSchema>();
    assert_send_sync::<cereal_core::SchemaRegistry>();
    assert_send_sync::<Codec>();
}
