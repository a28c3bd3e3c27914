//! crates/recordkeep_core/src/ports.rs
//!
//! Defines the service contracts (traits) the console core depends on.
//! Concrete implementations (seed file, session slot backends) live in the service crate.

use async_trait::async_trait;
use crate::domain::SeedData;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Malformed data: {0}")]
    Malformed(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Provides the initial contents of the five collections. Read once at startup.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn load_seed(&self) -> PortResult<SeedData>;
}

/// A named key-value slot holding an opaque, serialized blob.
#[async_trait]
pub trait SessionSlot: Send + Sync {
    /// Returns the blob stored under `key`, or `None` when the slot is empty.
    async fn read(&self, key: &str) -> PortResult<Option<String>>;

    /// Stores `blob` under `key`, replacing any previous value.
    async fn write(&self, key: &str, blob: &str) -> PortResult<()>;

    /// Empties the slot. Removing an empty slot is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}
