//! services/console/src/error.rs
//!
//! Defines the primary error type for the console service.

use crate::config::ConfigError;
use recordkeep_core::domain::{Action, EntityKind, Role};
use recordkeep_core::ports::PortError;
use recordkeep_core::store::StoreError;

/// The primary error type for the `console` service.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An error that propagated up from a seed or session slot adapter.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A store operation was refused (missing id, referential conflict, ...).
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    AuthenticationFailure,

    /// An operation was attempted with no active session.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The session's role may not perform the requested action.
    #[error("Role '{role}' may not {action} {}", .entity.plural().to_lowercase())]
    Forbidden {
        role: Role,
        action: Action,
        entity: EntityKind,
    },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard Input/Output error (e.g. reading stdin).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Stable snake_case identifier reported in `error` replies.
    pub fn kind(&self) -> &'static str {
        match self {
            ConsoleError::Config(_) => "config",
            ConsoleError::Port(_) => "port",
            ConsoleError::Store(StoreError::NotFound { .. }) => "not_found",
            ConsoleError::Store(StoreError::ReferentialConflict { .. }) => "referential_conflict",
            ConsoleError::Store(StoreError::DuplicateUsername(_)) => "duplicate_username",
            ConsoleError::Store(StoreError::DuplicateId { .. } | StoreError::InvalidId { .. }) => {
                "invalid_seed"
            }
            ConsoleError::AuthenticationFailure => "authentication_failure",
            ConsoleError::NotAuthenticated => "not_authenticated",
            ConsoleError::Forbidden { .. } => "forbidden",
            ConsoleError::PasswordHash(_) => "password_hash",
            ConsoleError::Json(_) => "json",
            ConsoleError::Io(_) => "io",
        }
    }
}

/// A convenience type alias for `Result<T, ConsoleError>`.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
