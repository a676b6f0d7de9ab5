//! Journal persistence contract + in-memory implementation.
//!
//! The engine only ever talks to the [`JournalStore`] trait; a production
//! deployment backs it with a transactional document store offering the same
//! atomic-append and snapshot-read guarantees.

pub mod in_memory;
pub mod journal;

pub use in_memory::InMemoryJournalStore;
pub use journal::{JournalStore, VoucherFilter};
