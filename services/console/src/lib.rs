//! services/console/src/lib.rs
//!
//! The record console service: configuration, adapters for the core ports, and
//! the role-gated console built on the core data store.

pub mod adapters;
pub mod config;
pub mod console;
pub mod error;
