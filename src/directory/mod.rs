//! Directory core: the public entry point.
//!
//! # Module Organization
//!
//! * [`core`] - The `DirectoryCore` struct and its constructors
//! * [`builder`] - Configuration and the fluent builder assembling pipelines
//! * [`operations`] - add, delete, modify, rename, move, search, lookup, hasEntry
//! * [`schema_management`] - Runtime schema changes with atomic snapshot publish

pub mod builder;
pub mod core;
pub mod operations;
pub mod schema_management;


pub use builder::{DirectoryConfig, DirectoryCoreBuilder};
pub use core::DirectoryCore;
