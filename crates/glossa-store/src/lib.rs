//! # glossa-store
//!
//! SQLite-backed persistence for the Glossa translation catalog:
//! uniqueness and optimistic-concurrency enforcement, race-safe tag
//! resolution, multi-filter search, and export row loading.

mod store;

pub use store::Store;
