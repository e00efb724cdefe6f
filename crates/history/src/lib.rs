//! Agent identity and persisted conversation history.

pub mod identity;
pub mod store;

pub use identity::derive_agent_id;
pub use store::HistoryStore;
