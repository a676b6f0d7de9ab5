//! `tallybook-core` — engine foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{AccountingError, AccountingResult};
pub use id::{PartyRef, TenantId};
