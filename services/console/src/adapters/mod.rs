pub mod seed;
pub mod session_slot;

pub use seed::{JsonSeedAdapter, StaticSeed};
pub use session_slot::{FileSessionSlot, MemorySessionSlot};
