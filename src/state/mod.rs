//! Download state module.
//!
//! Provides:
//! - The persisted record of completed downloads (the skip-set)
//! - A single-writer aggregator that records results as they arrive

pub mod store;
pub mod writer;

pub use store::{PersistedEntry, StateStore};
pub use writer::PersistenceWriter;
