pub mod actions;
pub mod auth;
pub mod dashboard;
pub mod protocol;
pub mod shell;
pub mod state;

pub use dashboard::{Dashboard, EntityCount, RecentRecord};
pub use protocol::{Command, Reply};
pub use state::ConsoleContext;
