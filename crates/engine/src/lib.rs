//! Double-entry bookkeeping engine.
//!
//! Five services over an injected [`tallybook_store::JournalStore`], each
//! taking the tenant scope per call (no ambient global state):
//!
//! - [`ChartOfAccounts`] — account registration and code allocation.
//! - [`VoucherStore`] — validated, immutable voucher posting; the engine's
//!   only write path.
//! - [`LedgerEngine`] — per-account ledgers and balances.
//! - [`ReversalService`] — reversal-as-correction; no edit, no delete.
//! - [`ReportingService`] — trial balance, derived status, day book.

pub mod chart;
pub mod ledger;
pub mod posting;
pub mod reporting;
pub mod reversal;

pub use chart::ChartOfAccounts;
pub use ledger::LedgerEngine;
pub use posting::VoucherStore;
pub use reporting::{DayBook, ReportingService, TrialBalanceLine};
pub use reversal::ReversalService;
