//! # glossa-core
//!
//! Core types, configuration, and error handling for the Glossa
//! translation catalog.

pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod query;

pub use config::shellexpand;
