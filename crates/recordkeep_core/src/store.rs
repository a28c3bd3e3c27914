//! crates/recordkeep_core/src/store.rs
//!
//! The in-memory data store: five entity collections seeded once at startup.
//!
//! Each collection owns a monotonic id counter. It starts at `max(seed ids) + 1`
//! (or 1 for an empty seed) and only ever moves forward, so ids freed by a delete
//! are never handed out again. Foreign keys held by records are not validated on
//! insert or update; they are only consulted when a referenced entity is deleted.

use chrono::Local;
use std::collections::HashSet;

use crate::domain::{
    Category, CategoryPatch, Company, CompanyPatch, EntityId, EntityKind, NewCategory,
    NewCompany, NewPerson, NewRecord, NewUser, Person, PersonPatch, Record, RecordPatch,
    SeedData, User, UserPatch,
};

//=========================================================================================
// Store Errors
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    /// The delete was refused because records still point at the entity.
    #[error("Cannot delete {kind} {id} because it is referenced in {references} record(s)")]
    ReferentialConflict {
        kind: EntityKind,
        id: EntityId,
        references: usize,
    },

    #[error("Duplicate {kind} ID {id} in seed data")]
    DuplicateId { kind: EntityKind, id: EntityId },

    #[error("{kind} IDs must be positive integers")]
    InvalidId { kind: EntityKind },

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Collections
//=========================================================================================

/// Implemented by everything the store keeps in a `Collection`.
pub trait Entity: Clone {
    const KIND: EntityKind;
    fn id(&self) -> EntityId;
}

macro_rules! impl_entity {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(impl Entity for $ty {
            const KIND: EntityKind = $kind;
            fn id(&self) -> EntityId {
                self.id
            }
        })*
    };
}

impl_entity! {
    User => EntityKind::User,
    Person => EntityKind::Person,
    Company => EntityKind::Company,
    Category => EntityKind::Category,
    Record => EntityKind::Record,
}

/// An ordered collection of one entity type plus its id counter.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    next_id: EntityId,
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Entity> Collection<T> {
    fn seeded(items: Vec<T>) -> StoreResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.id() == 0 {
                return Err(StoreError::InvalidId { kind: T::KIND });
            }
            if !seen.insert(item.id()) {
                return Err(StoreError::DuplicateId {
                    kind: T::KIND,
                    id: item.id(),
                });
            }
        }
        let next_id = items.iter().map(Entity::id).max().map_or(1, |max| max + 1);
        Ok(Self { items, next_id })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn require(&self, id: EntityId) -> StoreResult<&T> {
        self.get(id).ok_or(StoreError::NotFound { kind: T::KIND, id })
    }

    fn insert_with(&mut self, build: impl FnOnce(EntityId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let item = build(id);
        self.items.push(item.clone());
        item
    }

    fn update_with(&mut self, id: EntityId, apply: impl FnOnce(&mut T)) -> StoreResult<T> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(StoreError::NotFound { kind: T::KIND, id })?;
        apply(item);
        Ok(item.clone())
    }

    fn remove(&mut self, id: EntityId) -> StoreResult<T> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(StoreError::NotFound { kind: T::KIND, id })?;
        Ok(self.items.remove(index))
    }
}

/// Removes `id` from `collection` unless some record still points at it.
fn delete_referenced<T: Entity>(
    records: &Collection<Record>,
    collection: &mut Collection<T>,
    id: EntityId,
) -> StoreResult<T> {
    collection.require(id)?;
    let references = count_references(records, T::KIND, id);
    if references > 0 {
        return Err(StoreError::ReferentialConflict {
            kind: T::KIND,
            id,
            references,
        });
    }
    collection.remove(id)
}

fn count_references(records: &Collection<Record>, kind: EntityKind, id: EntityId) -> usize {
    records
        .items()
        .iter()
        .filter(|record| record.reference_to(kind) == Some(id))
        .count()
}

fn assign<V>(slot: &mut V, value: Option<V>) {
    if let Some(value) = value {
        *slot = value;
    }
}

//=========================================================================================
// The Data Store
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct DataStore {
    users: Collection<User>,
    persons: Collection<Person>,
    companies: Collection<Company>,
    categories: Collection<Category>,
    records: Collection<Record>,
}

impl DataStore {
    /// Builds the store from a seed document, rejecting duplicate or zero ids and
    /// duplicate usernames.
    pub fn from_seed(seed: SeedData) -> StoreResult<Self> {
        let mut usernames = HashSet::with_capacity(seed.users.len());
        for user in &seed.users {
            if !usernames.insert(user.username.as_str()) {
                return Err(StoreError::DuplicateUsername(user.username.clone()));
            }
        }

        Ok(Self {
            users: Collection::seeded(seed.users)?,
            persons: Collection::seeded(seed.persons)?,
            companies: Collection::seeded(seed.companies)?,
            categories: Collection::seeded(seed.categories)?,
            records: Collection::seeded(seed.records)?,
        })
    }

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub fn persons(&self) -> &Collection<Person> {
        &self.persons
    }

    pub fn companies(&self) -> &Collection<Company> {
        &self.companies
    }

    pub fn categories(&self) -> &Collection<Category> {
        &self.categories
    }

    pub fn records(&self) -> &Collection<Record> {
        &self.records
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::User => self.users.len(),
            EntityKind::Person => self.persons.len(),
            EntityKind::Company => self.companies.len(),
            EntityKind::Category => self.categories.len(),
            EntityKind::Record => self.records.len(),
        }
    }

    /// Number of records whose foreign key for `kind` equals `id`.
    pub fn references_to(&self, kind: EntityKind, id: EntityId) -> usize {
        count_references(&self.records, kind, id)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.items().iter().find(|user| user.username == username)
    }

    pub fn person_by_id(&self, id: EntityId) -> Option<&Person> {
        self.persons.get(id)
    }

    pub fn company_by_id(&self, id: EntityId) -> Option<&Company> {
        self.companies.get(id)
    }

    pub fn category_by_id(&self, id: EntityId) -> Option<&Category> {
        self.categories.get(id)
    }

    /// Records sorted newest first by date. Records sharing a date keep insertion order.
    pub fn recent_records(&self, limit: usize) -> Vec<Record> {
        let mut records = self.records.items().to_vec();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(limit);
        records
    }

    // --- Users ---

    /// Fails with `DuplicateUsername` if a user other than `owner` holds `username`.
    pub fn ensure_username_free(&self, username: &str, owner: Option<EntityId>) -> StoreResult<()> {
        match self.find_user_by_username(username) {
            Some(existing) if Some(existing.id) != owner => {
                Err(StoreError::DuplicateUsername(username.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Appends a user. `draft.password` is stored exactly as given.
    pub fn add_user(&mut self, draft: NewUser) -> StoreResult<User> {
        self.ensure_username_free(&draft.username, None)?;
        Ok(self.users.insert_with(|id| User {
            id,
            username: draft.username,
            password: draft.password,
            name: draft.name,
            role: draft.role,
        }))
    }

    /// Merges `patch` into user `id`. An empty password keeps the stored one.
    pub fn update_user(&mut self, id: EntityId, patch: UserPatch) -> StoreResult<User> {
        self.users.require(id)?;
        if let Some(username) = &patch.username {
            self.ensure_username_free(username, Some(id))?;
        }
        self.users.update_with(id, |user| {
            assign(&mut user.username, patch.username);
            assign(&mut user.password, patch.password.filter(|p| !p.is_empty()));
            assign(&mut user.name, patch.name);
            assign(&mut user.role, patch.role);
        })
    }

    pub fn delete_user(&mut self, id: EntityId) -> StoreResult<User> {
        self.users.remove(id)
    }

    // --- Persons ---

    pub fn add_person(&mut self, draft: NewPerson) -> Person {
        self.persons.insert_with(|id| Person {
            id,
            firstname: draft.firstname,
            lastname: draft.lastname,
            address: draft.address,
            date_of_birth: draft.date_of_birth,
            contact: draft.contact,
            notes: draft.notes,
        })
    }

    pub fn update_person(&mut self, id: EntityId, patch: PersonPatch) -> StoreResult<Person> {
        self.persons.update_with(id, |person| {
            assign(&mut person.firstname, patch.firstname);
            assign(&mut person.lastname, patch.lastname);
            assign(&mut person.address, patch.address);
            assign(&mut person.date_of_birth, patch.date_of_birth);
            assign(&mut person.contact, patch.contact);
            assign(&mut person.notes, patch.notes);
        })
    }

    pub fn delete_person(&mut self, id: EntityId) -> StoreResult<Person> {
        delete_referenced(&self.records, &mut self.persons, id)
    }

    // --- Companies ---

    pub fn add_company(&mut self, draft: NewCompany) -> Company {
        self.companies.insert_with(|id| Company {
            id,
            name: draft.name,
            address: draft.address,
            contact: draft.contact,
        })
    }

    pub fn update_company(&mut self, id: EntityId, patch: CompanyPatch) -> StoreResult<Company> {
        self.companies.update_with(id, |company| {
            assign(&mut company.name, patch.name);
            assign(&mut company.address, patch.address);
            assign(&mut company.contact, patch.contact);
        })
    }

    pub fn delete_company(&mut self, id: EntityId) -> StoreResult<Company> {
        delete_referenced(&self.records, &mut self.companies, id)
    }

    // --- Categories ---

    pub fn add_category(&mut self, draft: NewCategory) -> Category {
        self.categories.insert_with(|id| Category {
            id,
            name: draft.name,
        })
    }

    pub fn update_category(
        &mut self,
        id: EntityId,
        patch: CategoryPatch,
    ) -> StoreResult<Category> {
        self.categories.update_with(id, |category| {
            assign(&mut category.name, patch.name);
        })
    }

    pub fn delete_category(&mut self, id: EntityId) -> StoreResult<Category> {
        delete_referenced(&self.records, &mut self.categories, id)
    }

    // --- Records ---

    /// Appends a record; a missing date becomes today's local date.
    pub fn add_record(&mut self, draft: NewRecord) -> Record {
        let date = draft.date.unwrap_or_else(|| Local::now().date_naive());
        self.records.insert_with(|id| Record {
            id,
            proof: draft.proof,
            description: draft.description,
            severity: draft.severity,
            person_id: draft.person_id,
            company_id: draft.company_id,
            category_id: draft.category_id,
            date,
        })
    }

    pub fn update_record(&mut self, id: EntityId, patch: RecordPatch) -> StoreResult<Record> {
        self.records.update_with(id, |record| {
            assign(&mut record.proof, patch.proof);
            assign(&mut record.description, patch.description);
            assign(&mut record.severity, patch.severity);
            assign(&mut record.person_id, patch.person_id);
            assign(&mut record.company_id, patch.company_id);
            assign(&mut record.category_id, patch.category_id);
            assign(&mut record.date, patch.date);
        })
    }

    /// Records are always the referencing side, so deleting one never conflicts.
    pub fn delete_record(&mut self, id: EntityId) -> StoreResult<Record> {
        self.records.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, Severity};
    use chrono::NaiveDate;

    fn person(first: &str) -> NewPerson {
        NewPerson {
            firstname: first.to_string(),
            lastname: "Doe".to_string(),
            ..Default::default()
        }
    }

    fn record_for(person_id: EntityId, date: &str) -> NewRecord {
        NewRecord {
            proof: String::new(),
            description: format!("record for {person_id}"),
            severity: Severity::Medium,
            person_id,
            company_id: 1,
            category_id: 1,
            date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        }
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut store = DataStore::default();
        assert_eq!(store.add_person(person("A")).id, 1);
        assert_eq!(store.add_person(person("B")).id, 2);
        assert_eq!(store.persons().len(), 2);
        assert_eq!(store.persons().items()[1].firstname, "B");
    }

    #[test]
    fn referenced_person_cannot_be_deleted() {
        let mut store = DataStore::default();
        store.add_person(person("A"));
        store.add_person(person("B"));
        store.add_record(record_for(1, "2024-03-01"));

        let err = store.delete_person(1).unwrap_err();
        assert_eq!(
            err,
            StoreError::ReferentialConflict {
                kind: EntityKind::Person,
                id: 1,
                references: 1
            }
        );
        assert_eq!(store.persons().len(), 2);

        let removed = store.delete_person(2).unwrap();
        assert_eq!(removed.firstname, "B");
        assert_eq!(store.persons().len(), 1);
    }

    #[test]
    fn company_and_category_deletes_check_records() {
        let mut store = DataStore::default();
        let company = store.add_company(NewCompany {
            name: "Acme".into(),
            ..Default::default()
        });
        let category = store.add_category(NewCategory { name: "Fraud".into() });
        store.add_record(record_for(9, "2024-03-01"));

        assert!(matches!(
            store.delete_company(company.id),
            Err(StoreError::ReferentialConflict { .. })
        ));
        assert!(matches!(
            store.delete_category(category.id),
            Err(StoreError::ReferentialConflict { .. })
        ));

        store.delete_record(1).unwrap();
        assert!(store.delete_company(company.id).is_ok());
        assert!(store.delete_category(category.id).is_ok());
        assert!(store.companies().is_empty());
        assert!(store.categories().is_empty());
    }

    #[test]
    fn person_update_keeps_sets_or_clears_birth_date() {
        let mut store = DataStore::default();
        let born = NaiveDate::from_ymd_opt(1980, 5, 17);
        store.add_person(NewPerson {
            date_of_birth: born,
            ..person("A")
        });

        let kept = store
            .update_person(
                1,
                PersonPatch {
                    notes: Some("moved".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(kept.date_of_birth, born);

        let cleared = store
            .update_person(
                1,
                PersonPatch {
                    date_of_birth: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.date_of_birth, None);
        assert_eq!(cleared.notes, "moved");
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let mut store = DataStore::default();
        store.add_person(person("A"));
        store.add_person(person("B"));
        store.delete_person(2).unwrap();
        assert_eq!(store.add_person(person("C")).id, 3);
    }

    #[test]
    fn counter_resumes_after_seed_max() {
        let seed = SeedData {
            categories: vec![
                Category { id: 4, name: "x".into() },
                Category { id: 2, name: "y".into() },
            ],
            ..Default::default()
        };
        let mut store = DataStore::from_seed(seed).unwrap();
        assert_eq!(store.add_category(NewCategory { name: "z".into() }).id, 5);
    }

    #[test]
    fn seed_rejects_duplicate_and_zero_ids() {
        let dup = SeedData {
            categories: vec![
                Category { id: 1, name: "x".into() },
                Category { id: 1, name: "y".into() },
            ],
            ..Default::default()
        };
        assert_eq!(
            DataStore::from_seed(dup).unwrap_err(),
            StoreError::DuplicateId {
                kind: EntityKind::Category,
                id: 1
            }
        );

        let zero = SeedData {
            categories: vec![Category { id: 0, name: "x".into() }],
            ..Default::default()
        };
        assert_eq!(
            DataStore::from_seed(zero).unwrap_err(),
            StoreError::InvalidId {
                kind: EntityKind::Category
            }
        );
    }

    #[test]
    fn updates_merge_present_fields_only() {
        let mut store = DataStore::default();
        store.add_company(NewCompany {
            name: "Acme".into(),
            address: "1 Road".into(),
            contact: "a@acme.test".into(),
        });
        let updated = store
            .update_company(
                1,
                CompanyPatch {
                    contact: Some("b@acme.test".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Acme");
        assert_eq!(updated.address, "1 Road");
        assert_eq!(updated.contact, "b@acme.test");
    }

    #[test]
    fn missing_ids_report_not_found() {
        let mut store = DataStore::default();
        assert_eq!(
            store.update_category(3, CategoryPatch::default()).unwrap_err(),
            StoreError::NotFound {
                kind: EntityKind::Category,
                id: 3
            }
        );
        assert!(matches!(
            store.delete_person(3),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_record(3),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn user_updates_keep_password_when_blank_and_guard_usernames() {
        let mut store = DataStore::default();
        store
            .add_user(NewUser {
                username: "admin".into(),
                password: "pw".into(),
                name: "Admin".into(),
                role: Role::Admin,
            })
            .unwrap();
        store
            .add_user(NewUser {
                username: "viewer".into(),
                password: "pw2".into(),
                name: "Viewer".into(),
                role: Role::User,
            })
            .unwrap();

        let updated = store
            .update_user(
                2,
                UserPatch {
                    password: Some(String::new()),
                    role: Some(Role::Moderator),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.password, "pw2");
        assert_eq!(updated.role, Role::Moderator);

        let clash = store.update_user(
            2,
            UserPatch {
                username: Some("admin".into()),
                ..Default::default()
            },
        );
        assert_eq!(clash.unwrap_err(), StoreError::DuplicateUsername("admin".into()));

        let same = store.update_user(
            1,
            UserPatch {
                username: Some("admin".into()),
                ..Default::default()
            },
        );
        assert!(same.is_ok());
    }

    #[test]
    fn record_date_defaults_to_today() {
        let mut store = DataStore::default();
        let before = Local::now().date_naive();
        let record = store.add_record(NewRecord {
            date: None,
            ..record_for(1, "2020-01-01")
        });
        let after = Local::now().date_naive();
        assert!(record.date == before || record.date == after);
    }

    #[test]
    fn recent_records_are_newest_first_and_limited() {
        let mut store = DataStore::default();
        store.add_record(record_for(1, "2024-01-01"));
        store.add_record(record_for(2, "2024-05-01"));
        store.add_record(record_for(3, "2024-03-01"));

        let recent = store.recent_records(2);
        let ids: Vec<EntityId> = recent.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(store.references_to(EntityKind::Person, 3), 1);
    }
}
