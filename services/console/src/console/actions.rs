//! services/console/src/console/actions.rs
//!
//! Role-gated CRUD over the five collections. Every operation consults
//! `policy::can` for the session's role before touching the store.

use recordkeep_core::domain::{
    Action, Category, CategoryPatch, Company, CompanyPatch, EntityId, EntityKind, NewCategory,
    NewCompany, NewPerson, NewRecord, NewUser, Person, PersonPatch, Record, RecordPatch,
    SessionUser, User, UserPatch, UserView,
};
use recordkeep_core::policy;
use recordkeep_core::store::{StoreError, StoreResult};
use tracing::{info, warn};

use super::auth::hash_password;
use super::state::ConsoleContext;
use crate::error::{ConsoleError, ConsoleResult};

impl ConsoleContext {
    /// Returns the acting user if their role may perform `action` on `entity`.
    pub fn authorize(&self, action: Action, entity: EntityKind) -> ConsoleResult<SessionUser> {
        let user = self.session.as_ref().ok_or(ConsoleError::NotAuthenticated)?;
        if !policy::can(user.role, action, entity) {
            warn!(
                username = %user.username,
                role = %user.role,
                action = %action,
                entity = %entity,
                "Action denied"
            );
            return Err(ConsoleError::Forbidden {
                role: user.role,
                action,
                entity,
            });
        }
        Ok(user.clone())
    }

    // --- Users ---

    pub fn list_users(&self) -> ConsoleResult<Vec<UserView>> {
        self.authorize(Action::Read, EntityKind::User)?;
        Ok(self.store.users().items().iter().map(UserView::from).collect())
    }

    pub fn get_user(&self, id: EntityId) -> ConsoleResult<UserView> {
        self.authorize(Action::Read, EntityKind::User)?;
        self.store
            .users()
            .get(id)
            .map(UserView::from)
            .ok_or_else(|| not_found(EntityKind::User, id))
    }

    pub fn add_user(&mut self, mut draft: NewUser) -> ConsoleResult<UserView> {
        let actor = self.authorize(Action::Create, EntityKind::User)?;
        if let Err(e) = self.store.ensure_username_free(&draft.username, None) {
            audit::<User>(&actor, Action::Create, Err(e))?;
        }
        draft.password = hash_password(&draft.password)?;
        let user = audit(&actor, Action::Create, self.store.add_user(draft))?;
        Ok(UserView::from(&user))
    }

    pub fn update_user(&mut self, id: EntityId, mut patch: UserPatch) -> ConsoleResult<UserView> {
        let actor = self.authorize(Action::Update, EntityKind::User)?;
        if let Some(username) = &patch.username {
            if let Err(e) = self.store.ensure_username_free(username, Some(id)) {
                audit::<User>(&actor, Action::Update, Err(e))?;
            }
        }
        patch.password = match patch.password.filter(|p| !p.is_empty()) {
            Some(plain) => Some(hash_password(&plain)?),
            None => None,
        };
        let user = audit(&actor, Action::Update, self.store.update_user(id, patch))?;
        Ok(UserView::from(&user))
    }

    pub fn delete_user(&mut self, id: EntityId) -> ConsoleResult<UserView> {
        let actor = self.authorize(Action::Delete, EntityKind::User)?;
        let user = audit(&actor, Action::Delete, self.store.delete_user(id))?;
        Ok(UserView::from(&user))
    }

    // --- Persons ---

    pub fn list_persons(&self) -> ConsoleResult<Vec<Person>> {
        self.authorize(Action::Read, EntityKind::Person)?;
        Ok(self.store.persons().items().to_vec())
    }

    pub fn get_person(&self, id: EntityId) -> ConsoleResult<Person> {
        self.authorize(Action::Read, EntityKind::Person)?;
        self.store
            .person_by_id(id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Person, id))
    }

    pub fn add_person(&mut self, draft: NewPerson) -> ConsoleResult<Person> {
        let actor = self.authorize(Action::Create, EntityKind::Person)?;
        audit(&actor, Action::Create, Ok(self.store.add_person(draft)))
    }

    pub fn update_person(&mut self, id: EntityId, patch: PersonPatch) -> ConsoleResult<Person> {
        let actor = self.authorize(Action::Update, EntityKind::Person)?;
        audit(&actor, Action::Update, self.store.update_person(id, patch))
    }

    pub fn delete_person(&mut self, id: EntityId) -> ConsoleResult<Person> {
        let actor = self.authorize(Action::Delete, EntityKind::Person)?;
        audit(&actor, Action::Delete, self.store.delete_person(id))
    }

    // --- Companies ---

    pub fn list_companies(&self) -> ConsoleResult<Vec<Company>> {
        self.authorize(Action::Read, EntityKind::Company)?;
        Ok(self.store.companies().items().to_vec())
    }

    pub fn get_company(&self, id: EntityId) -> ConsoleResult<Company> {
        self.authorize(Action::Read, EntityKind::Company)?;
        self.store
            .company_by_id(id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Company, id))
    }

    pub fn add_company(&mut self, draft: NewCompany) -> ConsoleResult<Company> {
        let actor = self.authorize(Action::Create, EntityKind::Company)?;
        audit(&actor, Action::Create, Ok(self.store.add_company(draft)))
    }

    pub fn update_company(&mut self, id: EntityId, patch: CompanyPatch) -> ConsoleResult<Company> {
        let actor = self.authorize(Action::Update, EntityKind::Company)?;
        audit(&actor, Action::Update, self.store.update_company(id, patch))
    }

    pub fn delete_company(&mut self, id: EntityId) -> ConsoleResult<Company> {
        let actor = self.authorize(Action::Delete, EntityKind::Company)?;
        audit(&actor, Action::Delete, self.store.delete_company(id))
    }

    // --- Categories ---

    pub fn list_categories(&self) -> ConsoleResult<Vec<Category>> {
        self.authorize(Action::Read, EntityKind::Category)?;
        Ok(self.store.categories().items().to_vec())
    }

    pub fn get_category(&self, id: EntityId) -> ConsoleResult<Category> {
        self.authorize(Action::Read, EntityKind::Category)?;
        self.store
            .category_by_id(id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Category, id))
    }

    pub fn add_category(&mut self, draft: NewCategory) -> ConsoleResult<Category> {
        let actor = self.authorize(Action::Create, EntityKind::Category)?;
        audit(&actor, Action::Create, Ok(self.store.add_category(draft)))
    }

    pub fn update_category(
        &mut self,
        id: EntityId,
        patch: CategoryPatch,
    ) -> ConsoleResult<Category> {
        let actor = self.authorize(Action::Update, EntityKind::Category)?;
        audit(&actor, Action::Update, self.store.update_category(id, patch))
    }

    pub fn delete_category(&mut self, id: EntityId) -> ConsoleResult<Category> {
        let actor = self.authorize(Action::Delete, EntityKind::Category)?;
        audit(&actor, Action::Delete, self.store.delete_category(id))
    }

    // --- Records ---

    pub fn list_records(&self) -> ConsoleResult<Vec<Record>> {
        self.authorize(Action::Read, EntityKind::Record)?;
        Ok(self.store.records().items().to_vec())
    }

    pub fn get_record(&self, id: EntityId) -> ConsoleResult<Record> {
        self.authorize(Action::Read, EntityKind::Record)?;
        self.store
            .records()
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Record, id))
    }

    pub fn add_record(&mut self, draft: NewRecord) -> ConsoleResult<Record> {
        let actor = self.authorize(Action::Create, EntityKind::Record)?;
        audit(&actor, Action::Create, Ok(self.store.add_record(draft)))
    }

    pub fn update_record(&mut self, id: EntityId, patch: RecordPatch) -> ConsoleResult<Record> {
        let actor = self.authorize(Action::Update, EntityKind::Record)?;
        audit(&actor, Action::Update, self.store.update_record(id, patch))
    }

    pub fn delete_record(&mut self, id: EntityId) -> ConsoleResult<Record> {
        let actor = self.authorize(Action::Delete, EntityKind::Record)?;
        audit(&actor, Action::Delete, self.store.delete_record(id))
    }
}

fn not_found(kind: EntityKind, id: EntityId) -> ConsoleError {
    ConsoleError::Store(StoreError::NotFound { kind, id })
}

/// Logs the outcome of a store mutation and lifts it into a `ConsoleResult`.
fn audit<T: recordkeep_core::store::Entity>(
    actor: &SessionUser,
    action: Action,
    result: StoreResult<T>,
) -> ConsoleResult<T> {
    match &result {
        Ok(item) => info!(
            username = %actor.username,
            action = %action,
            entity = %T::KIND,
            id = item.id(),
            "Mutation applied"
        ),
        Err(e) => warn!(
            username = %actor.username,
            action = %action,
            entity = %T::KIND,
            "Mutation refused: {}",
            e
        ),
    }
    result.map_err(ConsoleError::from)
}
