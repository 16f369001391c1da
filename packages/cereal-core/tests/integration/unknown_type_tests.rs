//! Fields with type tags the walks do not handle.

use std::mem::offset_of;

use pretty_assertions::assert_eq;
use serde_json::json;

use cereal_core::{deserialize, to_document, FieldType, SchemaBuilder, StructSchema};

use super::helpers::init_tracing;

#[derive(Debug, Default, PartialEq)]
struct Packet {
    id: i32,
    payload: [u8; 16],
    checksum: i64,
}

fn packet_schema() -> StructSchema {
    SchemaBuilder::<Packet>::new("Packet")
        .int32("id", offset_of!(Packet, id), |p| p.id, |p, v| p.id = v)
        .opaque("payload", offset_of!(Packet, payload), 99)
        .int64(
            "checksum",
            offset_of!(Packet, checksum),
            |p| p.checksum,
            |p, v| p.checksum = v,
        )
        .build()
        .expect("packet schema")
}

#[test]
fn test_unknown_type_is_omitted_from_output() -> anyhow::Result<()> {
    init_tracing();

    let packet = Packet {
        id: 7,
        payload: [0xAB; 16],
        checksum: 123_456,
    };
    let document = to_document(&packet, &packet_schema())?;
    assert_eq!(document, json!({ "id": 7, "checksum": 123_456 }));
    Ok(())
}

#[test]
fn test_unknown_type_is_ignored_on_input() -> anyhow::Result<()> {
    init_tracing();

    let packet: Packet = deserialize(
        r#"{"id":7,"payload":"AAAA","checksum":9}"#,
        &packet_schema(),
    )?;
    assert_eq!(
        packet,
        Packet {
            id: 7,
            payload: [0; 16],
            checksum: 9,
        }
    );
    Ok(())
}

#[test]
fn test_unknown_type_stays_in_layout_metadata() {
    let info = packet_schema().describe();
    let payload = info.field("payload").expect("payload metadata");

    assert_eq!(payload.field_type, FieldType::Unrecognized(99));
    assert_eq!(payload.offset, offset_of!(Packet, payload));
    assert_eq!(info.check_layout(), Ok(()));
}
