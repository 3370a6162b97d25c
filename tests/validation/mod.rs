//! Schema engine tests through the public API.
//!
//! These complement the unit tests under `src/schema` by driving the engine
//! with the fixture schema documents and the shared builders.

pub mod entries;
pub mod modifications;
pub mod properties;
