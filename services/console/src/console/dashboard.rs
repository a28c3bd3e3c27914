//! services/console/src/console/dashboard.rs
//!
//! The landing overview: collection counts visible to the session's role, the
//! newest records, and the role-permission matrix.

use recordkeep_core::domain::{Action, EntityKind, Record, Role};
use recordkeep_core::policy;
use serde::Serialize;

use super::state::ConsoleContext;
use crate::error::{ConsoleError, ConsoleResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityCount {
    pub entity: EntityKind,
    pub count: usize,
}

/// A record with the display names of what it points at. A name is `None` when
/// the referenced entity no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRecord {
    #[serde(flatten)]
    pub record: Record,
    pub person: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub welcome: String,
    pub counts: Vec<EntityCount>,
    pub recent_records: Vec<RecentRecord>,
    pub permissions: Vec<String>,
}

impl ConsoleContext {
    pub fn dashboard(&self) -> ConsoleResult<Dashboard> {
        let user = self.session.as_ref().ok_or(ConsoleError::NotAuthenticated)?;

        let counts = EntityKind::ALL
            .into_iter()
            .filter(|kind| policy::can(user.role, Action::Read, *kind))
            .map(|entity| EntityCount {
                entity,
                count: self.store.count(entity),
            })
            .collect();

        let recent_records = if policy::can(user.role, Action::Read, EntityKind::Record) {
            self.store
                .recent_records(self.recent_records_limit)
                .into_iter()
                .map(|record| self.resolve(record))
                .collect()
        } else {
            Vec::new()
        };

        Ok(Dashboard {
            welcome: format!("Welcome back, {}!", user.name),
            counts,
            recent_records,
            permissions: Role::ALL.into_iter().map(policy::describe).collect(),
        })
    }

    fn resolve(&self, record: Record) -> RecentRecord {
        let store = &self.store;
        RecentRecord {
            person: store
                .person_by_id(record.person_id)
                .map(|p| format!("{} {}", p.firstname, p.lastname)),
            company: store.company_by_id(record.company_id).map(|c| c.name.clone()),
            category: store
                .category_by_id(record.category_id)
                .map(|c| c.name.clone()),
            record,
        }
    }
}
