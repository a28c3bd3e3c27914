pub mod domain;
pub mod policy;
pub mod ports;
pub mod store;

pub use domain::{
    Action, Category, CategoryPatch, Company, CompanyPatch, EntityId, EntityKind, NewCategory,
    NewCompany, NewPerson, NewRecord, NewUser, Person, PersonPatch, Record, RecordPatch, Role,
    SeedData, SessionUser, Severity, User, UserPatch, UserView,
};
pub use policy::can;
pub use ports::{PortError, PortResult, SeedSource, SessionSlot};
pub use store::{Collection, DataStore, Entity, StoreError, StoreResult};
