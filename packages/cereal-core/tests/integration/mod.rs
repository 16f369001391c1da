//! Integration test suite.
//!
//! 1. Person/Address scenarios
//! 2. Round-trip properties and integer precision
//! 3. Nested structures
//! 4. Unknown field types
//! 5. Schema registry
//! 6. Concurrent use of shared schemas

pub mod concurrency_tests;
pub mod helpers;
pub mod round_trip_tests;
pub mod unknown_type_tests;
