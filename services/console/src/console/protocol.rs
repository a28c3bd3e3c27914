//! services/console/src/console/protocol.rs
//!
//! Defines the line protocol between an operator (or a front end driving the
//! console) and the shell. Each line is one JSON object tagged by `type`.

use recordkeep_core::domain::{
    CategoryPatch, CompanyPatch, EntityId, EntityKind, NewCategory, NewCompany, NewPerson,
    NewRecord, NewUser, PersonPatch, RecordPatch, SessionUser, UserPatch,
};
use serde::{Deserialize, Serialize};

use super::dashboard::Dashboard;
use crate::error::ConsoleError;

//=========================================================================================
// Commands read FROM the operator
//=========================================================================================

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Login { username: String, password: String },
    Logout,
    Whoami,
    Dashboard,

    List { entity: EntityKind },
    Get { entity: EntityKind, id: EntityId },
    Delete { entity: EntityKind, id: EntityId },

    AddUser(NewUser),
    UpdateUser { id: EntityId, patch: UserPatch },

    AddPerson(NewPerson),
    UpdatePerson { id: EntityId, patch: PersonPatch },

    AddCompany(NewCompany),
    UpdateCompany { id: EntityId, patch: CompanyPatch },

    AddCategory(NewCategory),
    UpdateCategory { id: EntityId, patch: CategoryPatch },

    AddRecord(NewRecord),
    UpdateRecord { id: EntityId, patch: RecordPatch },
}

impl Command {
    /// The wire tag, safe to log (never includes credentials).
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Whoami => "whoami",
            Command::Dashboard => "dashboard",
            Command::List { .. } => "list",
            Command::Get { .. } => "get",
            Command::Delete { .. } => "delete",
            Command::AddUser(_) => "add_user",
            Command::UpdateUser { .. } => "update_user",
            Command::AddPerson(_) => "add_person",
            Command::UpdatePerson { .. } => "update_person",
            Command::AddCompany(_) => "add_company",
            Command::UpdateCompany { .. } => "update_company",
            Command::AddCategory(_) => "add_category",
            Command::UpdateCategory { .. } => "update_category",
            Command::AddRecord(_) => "add_record",
            Command::UpdateRecord { .. } => "update_record",
        }
    }
}

//=========================================================================================
// Replies written TO the operator
//=========================================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    /// The active session after `login` / `whoami`. `None` means logged out.
    Session { user: Option<SessionUser> },

    /// A success notice, with the affected item when there is one.
    Notice {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        item: Option<serde_json::Value>,
    },

    Entity {
        entity: EntityKind,
        item: serde_json::Value,
    },

    Listing {
        entity: EntityKind,
        items: serde_json::Value,
    },

    Dashboard(Dashboard),

    /// A user-visible failure. `kind` is stable and machine-readable.
    Error { kind: String, message: String },
}

impl Reply {
    pub fn notice(message: impl Into<String>) -> Self {
        Reply::Notice {
            message: message.into(),
            item: None,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Reply::Error {
            kind: "malformed_command".to_string(),
            message: message.into(),
        }
    }
}

impl From<&ConsoleError> for Reply {
    fn from(e: &ConsoleError) -> Self {
        Reply::Error {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}
