//! services/console/src/adapters/seed.rs
//!
//! This module contains the seed adapter, the concrete implementation of the
//! `SeedSource` port. It reads the static JSON document once at startup.

use async_trait::async_trait;
use recordkeep_core::domain::SeedData;
use recordkeep_core::ports::{PortError, PortResult, SeedSource};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

/// Reads the seed document from a JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonSeedAdapter {
    path: PathBuf,
}

impl JsonSeedAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedSource for JsonSeedAdapter {
    async fn load_seed(&self) -> PortResult<SeedData> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    PortError::NotFound(format!("Seed file {}", self.path.display()))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;

        let seed: SeedData = serde_json::from_str(&raw).map_err(|e| {
            PortError::Malformed(format!("Seed file {}: {}", self.path.display(), e))
        })?;

        info!(
            path = %self.path.display(),
            users = seed.users.len(),
            persons = seed.persons.len(),
            companies = seed.companies.len(),
            categories = seed.categories.len(),
            records = seed.records.len(),
            "Seed data loaded"
        );
        Ok(seed)
    }
}

/// A seed held in memory, for callers that already have the document.
#[derive(Clone, Debug, Default)]
pub struct StaticSeed(pub SeedData);

#[async_trait]
impl SeedSource for StaticSeed {
    async fn load_seed(&self) -> PortResult<SeedData> {
        Ok(self.0.clone())
    }
}
