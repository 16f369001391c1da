//! Round-trip properties over the exact kinds, and the documented precision
//! bound for 64-bit integers.

use proptest::prelude::*;

use cereal_core::{deserialize, serialize, to_document};

use super::helpers::{account_schema, ledger_schema, Account, Ledger, Tier};

fn tier() -> impl Strategy<Value = Tier> {
    prop_oneof![Just(Tier::Free), Just(Tier::Pro), Just(Tier::Team)]
}

fn account() -> impl Strategy<Value = Account> {
    (
        any::<i32>(),
        any::<bool>(),
        any::<f64>().prop_filter("finite", |v| v.is_finite()),
        proptest::option::of(".*"),
        tier(),
    )
        .prop_map(|(id, active, balance, owner, tier)| Account {
            id,
            active,
            balance,
            owner,
            tier,
        })
}

proptest! {
    #[test]
    fn prop_exact_kinds_round_trip(original in account()) {
        let schema = account_schema();
        let text = serialize(&original, &schema).unwrap();
        let back: Account = deserialize(&text, &schema).unwrap();
        prop_assert_eq!(back, original);
    }

    #[test]
    fn prop_long_exact_within_two_pow_53(entries in -(1i64 << 53)..=(1i64 << 53)) {
        let schema = ledger_schema();
        let original = Ledger { entries, rate: 0.0 };
        let text = serialize(&original, &schema).unwrap();
        let back: Ledger = deserialize(&text, &schema).unwrap();
        prop_assert_eq!(back.entries, entries);
    }

    #[test]
    fn prop_long_error_bounded_beyond_two_pow_53(entries in any::<i64>()) {
        let schema = ledger_schema();
        let original = Ledger { entries, rate: 0.0 };
        let text = serialize(&original, &schema).unwrap();
        let back: Ledger = deserialize(&text, &schema).unwrap();

        // rounding to the nearest double moves a value by at most half an ulp
        let error = (i128::from(back.entries) - i128::from(entries)).unsigned_abs();
        let bound = u128::from(entries.unsigned_abs() >> 53);
        prop_assert!(error <= bound, "error {} exceeds bound {}", error, bound);
    }

    #[test]
    fn prop_float32_round_trip(rate in any::<f32>().prop_filter("finite", |r| r.is_finite())) {
        let schema = ledger_schema();
        let original = Ledger { entries: 0, rate };
        let text = serialize(&original, &schema).unwrap();
        let back: Ledger = deserialize(&text, &schema).unwrap();
        prop_assert_eq!(back.rate, rate);
    }
}

#[test]
fn test_long_precision_loss_is_visible() {
    let schema = ledger_schema();
    let original = Ledger {
        entries: (1 << 53) + 1,
        rate: 0.0,
    };

    let document = to_document(&original, &schema).unwrap();
    assert_eq!(document["entries"], serde_json::json!(1_i64 << 53));

    let back: Ledger = deserialize(&serialize(&original, &schema).unwrap(), &schema).unwrap();
    assert_eq!(back.entries, 1 << 53);
    assert_ne!(back.entries, original.entries);
}

#[test]
fn test_long_extremes() {
    let schema = ledger_schema();

    for entries in [i64::MIN, i64::MAX] {
        let original = Ledger { entries, rate: 0.0 };
        let back: Ledger = deserialize(&serialize(&original, &schema).unwrap(), &schema).unwrap();
        assert_eq!(back.entries, entries);
    }
}

#[test]
fn test_enum_out_of_range_keeps_default() {
    let schema = account_schema();
    let back: Account = deserialize(r#"{"id":1,"tier":9}"#, &schema).unwrap();
    assert_eq!(back.id, 1);
    assert_eq!(back.tier, Tier::Free);

    let back: Account = deserialize(r#"{"tier":2}"#, &schema).unwrap();
    assert_eq!(back.tier, Tier::Team);
}
