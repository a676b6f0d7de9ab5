//! Engine error model.

use thiserror::Error;

/// Result type used across the bookkeeping engine.
pub type AccountingResult<T> = Result<T, AccountingError>;

/// Bookkeeping engine error.
///
/// Every variant is a recoverable, caller-actionable failure carrying the
/// detail needed to act (which invariant failed, which code/id was involved).
/// Infrastructure retry concerns (network, backoff) belong at the store
/// boundary, not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountingError {
    /// Malformed input: empty voucher, negative amount, bad code format.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Debit and credit totals differ (amounts in minor units).
    #[error("unbalanced voucher: debits {debits} != credits {credits}")]
    UnbalancedVoucher { debits: i128, credits: i128 },

    /// A voucher line references an account code not registered in scope.
    #[error("unknown account code: {code}")]
    UnknownAccount { code: String },

    /// Voucher or account lookup miss.
    #[error("not found: {0}")]
    NotFound(String),

    /// A second reversal was attempted against an already-reversed voucher.
    #[error("voucher {voucher} is already reversed by {reversal}")]
    AlreadyReversed { voucher: String, reversal: String },

    /// No free code remains in the account type's numeric range.
    #[error("account code range exhausted for {account_type}")]
    ExhaustedRange { account_type: String },

    /// An explicitly requested account code is already taken in scope.
    #[error("duplicate account code: {code}")]
    DuplicateCode { code: String },

    /// An allocation or posting lost a race; the caller should retry.
    #[error("concurrency conflict: {0}")]
    ConcurrencyConflict(String),
}

impl AccountingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn unknown_account(code: impl Into<String>) -> Self {
        Self::UnknownAccount { code: code.into() }
    }

    pub fn duplicate_code(code: impl Into<String>) -> Self {
        Self::DuplicateCode { code: code.into() }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::ConcurrencyConflict(msg.into())
    }
}
