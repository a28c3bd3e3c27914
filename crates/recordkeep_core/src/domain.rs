//! crates/recordkeep_core/src/domain.rs
//!
//! Defines the core data structures for the record console.
//! Field names follow the seed document (camelCase on the wire).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier shared by every entity collection.
pub type EntityId = u64;

//=========================================================================================
// Roles, Severities and Entity Kinds
//=========================================================================================

/// The three fixed roles, ordered by capability: admin ⊇ moderator ⊇ user.
/// Written lowercase, read case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Admin,
    Moderator,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Moderator, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "user" => Ok(Role::User),
            other => Err(format!("'{}' is not a valid role", other)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

/// Names one of the five entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Person,
    Company,
    Category,
    Record,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::User,
        EntityKind::Person,
        EntityKind::Company,
        EntityKind::Category,
        EntityKind::Record,
    ];

    /// Singular, capitalized name used in user-facing notices.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Person => "Person",
            EntityKind::Company => "Company",
            EntityKind::Category => "Category",
            EntityKind::Record => "Record",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::User => "Users",
            EntityKind::Person => "Persons",
            EntityKind::Company => "Companies",
            EntityKind::Category => "Categories",
            EntityKind::Record => "Records",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What an actor is trying to do with an entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Create, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Entities
//=========================================================================================

/// A console account. `password` is either plain text (seed) or an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// The authenticated actor. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: EntityId,
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// A user as shown in listings: everything except the password.
pub type UserView = SessionUser;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: EntityId,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
}

/// An incident record pointing at a person, a company and a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: EntityId,
    #[serde(default)]
    pub proof: String,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    pub person_id: EntityId,
    pub company_id: EntityId,
    pub category_id: EntityId,
    pub date: NaiveDate,
}

impl Record {
    /// The id this record holds for `kind`, if `kind` is something a record points at.
    pub fn reference_to(&self, kind: EntityKind) -> Option<EntityId> {
        match kind {
            EntityKind::Person => Some(self.person_id),
            EntityKind::Company => Some(self.company_id),
            EntityKind::Category => Some(self.category_id),
            EntityKind::User | EntityKind::Record => None,
        }
    }
}

//=========================================================================================
// Drafts (create payloads) and Patches (partial updates)
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub username: Option<String>,
    /// Absent or empty keeps the stored password.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Absent keeps the date, `""` clears it.
    #[serde(
        default,
        with = "patch_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    #[serde(default)]
    pub proof: String,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    pub person_id: EntityId,
    pub company_id: EntityId,
    pub category_id: EntityId,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub person_id: Option<EntityId>,
    #[serde(default)]
    pub company_id: Option<EntityId>,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

//=========================================================================================
// Seed Document
//=========================================================================================

/// The static document the store is initialized from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// `YYYY-MM-DD` or an empty string for "unknown".
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// A present `dateOfBirth` in a patch, read with the same rules as `optional_date`.
mod patch_date {
    use chrono::NaiveDate;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Option<NaiveDate>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => super::optional_date::serialize(inner, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Option<NaiveDate>>, D::Error> {
        super::optional_date::deserialize(d).map(Some)
    }
}
