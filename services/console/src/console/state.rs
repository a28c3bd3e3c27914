//! services/console/src/console/state.rs
//!
//! Defines the console context: the data store, the active session and the slot
//! the session is persisted to. One context is created at startup and handed to
//! every operation.

use crate::config::Config;
use crate::error::ConsoleResult;
use recordkeep_core::domain::SessionUser;
use recordkeep_core::ports::{SeedSource, SessionSlot};
use recordkeep_core::store::DataStore;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ConsoleContext {
    pub(crate) store: DataStore,
    pub(crate) session: Option<SessionUser>,
    pub(crate) slot: Arc<dyn SessionSlot>,
    pub(crate) session_key: String,
    pub(crate) recent_records_limit: usize,
}

impl ConsoleContext {
    /// Loads the seed into a fresh store and restores any persisted session.
    pub async fn init(
        seed: &dyn SeedSource,
        slot: Arc<dyn SessionSlot>,
        config: &Config,
    ) -> ConsoleResult<Self> {
        let store = DataStore::from_seed(seed.load_seed().await?)?;
        let mut ctx = Self::with_store(store, slot, config);
        ctx.restore_session().await?;
        Ok(ctx)
    }

    /// Wraps an existing store. No session is restored.
    pub fn with_store(store: DataStore, slot: Arc<dyn SessionSlot>, config: &Config) -> Self {
        Self {
            store,
            session: None,
            slot,
            session_key: config.session_key.clone(),
            recent_records_limit: config.recent_records_limit,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.as_ref()
    }

    /// Reads the slot back into the active session. An undecodable blob is
    /// discarded and the console stays logged out.
    pub async fn restore_session(&mut self) -> ConsoleResult<()> {
        let Some(blob) = self.slot.read(&self.session_key).await? else {
            return Ok(());
        };

        match serde_json::from_str::<SessionUser>(&blob) {
            Ok(user) => {
                info!(username = %user.username, role = %user.role, "Session restored");
                self.session = Some(user);
            }
            Err(e) => {
                warn!(key = %self.session_key, error = %e, "Discarding unreadable session blob");
                self.slot.remove(&self.session_key).await?;
                self.session = None;
            }
        }
        Ok(())
    }
}
