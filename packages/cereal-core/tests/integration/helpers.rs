//! Shared structures and schemas for the integration tests.

use std::mem::offset_of;
use std::sync::{Arc, OnceLock};

use cereal_core::{SchemaBuilder, StructSchema};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Geo {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub street: Option<String>,
    pub number: i32,
    pub geo: Option<Box<Geo>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: Option<String>,
    pub age: i32,
    pub address: Option<Box<Address>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Tier {
    #[default]
    Free = 0,
    Pro = 1,
    Team = 2,
}

impl From<Tier> for i32 {
    fn from(tier: Tier) -> Self {
        tier as i32
    }
}

impl TryFrom<i32> for Tier {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Tier::Free),
            1 => Ok(Tier::Pro),
            2 => Ok(Tier::Team),
            other => Err(other),
        }
    }
}

/// Uses only the kinds that round-trip exactly.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Account {
    pub id: i32,
    pub active: bool,
    pub balance: f64,
    pub owner: Option<String>,
    pub tier: Tier,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ledger {
    pub entries: i64,
    pub rate: f32,
}

pub fn geo_schema() -> Arc<StructSchema> {
    static SCHEMA: OnceLock<Arc<StructSchema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(
            SchemaBuilder::<Geo>::new("Geo")
                .float64("lat", offset_of!(Geo, lat), |g| g.lat, |g, v| g.lat = v)
                .float64("lon", offset_of!(Geo, lon), |g| g.lon, |g, v| g.lon = v)
                .build()
                .expect("geo schema"),
        )
    }))
}

pub fn address_schema() -> Arc<StructSchema> {
    static SCHEMA: OnceLock<Arc<StructSchema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(
            SchemaBuilder::<Address>::new("Address")
                .string(
                    "street",
                    offset_of!(Address, street),
                    |a| a.street.as_deref(),
                    |a, v| a.street = v,
                )
                .int32(
                    "number",
                    offset_of!(Address, number),
                    |a| a.number,
                    |a, v| a.number = v,
                )
                .nested(
                    "geo",
                    offset_of!(Address, geo),
                    geo_schema(),
                    |a: &Address| a.geo.as_deref(),
                    |a, v| a.geo = v,
                )
                .build()
                .expect("address schema"),
        )
    }))
}

pub fn person_schema() -> Arc<StructSchema> {
    static SCHEMA: OnceLock<Arc<StructSchema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(
            SchemaBuilder::<Person>::new("Person")
                .string(
                    "name",
                    offset_of!(Person, name),
                    |p| p.name.as_deref(),
                    |p, v| p.name = v,
                )
                .int32("age", offset_of!(Person, age), |p| p.age, |p, v| p.age = v)
                .nested(
                    "address",
                    offset_of!(Person, address),
                    address_schema(),
                    |p: &Person| p.address.as_deref(),
                    |p, v| p.address = v,
                )
                .build()
                .expect("person schema"),
        )
    }))
}

pub fn account_schema() -> StructSchema {
    SchemaBuilder::<Account>::new("Account")
        .int32("id", offset_of!(Account, id), |a| a.id, |a, v| a.id = v)
        .boolean(
            "active",
            offset_of!(Account, active),
            |a| a.active,
            |a, v| a.active = v,
        )
        .float64(
            "balance",
            offset_of!(Account, balance),
            |a| a.balance,
            |a, v| a.balance = v,
        )
        .string(
            "owner",
            offset_of!(Account, owner),
            |a| a.owner.as_deref(),
            |a, v| a.owner = v,
        )
        .enumeration("tier", offset_of!(Account, tier), |a| a.tier, |a, v| a.tier = v)
        .build()
        .expect("account schema")
}

pub fn ledger_schema() -> StructSchema {
    SchemaBuilder::<Ledger>::new("Ledger")
        .int64(
            "entries",
            offset_of!(Ledger, entries),
            |l| l.entries,
            |l, v| l.entries = v,
        )
        .float32("rate", offset_of!(Ledger, rate), |l| l.rate, |l, v| l.rate = v)
        .build()
        .expect("ledger schema")
}

pub fn alice() -> Person {
    Person {
        name: Some("Alice".to_string()),
        age: 30,
        address: None,
    }
}

/// Routes library diagnostics to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}
