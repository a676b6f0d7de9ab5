//! Accounting domain types (double-entry bookkeeping).
//!
//! Pure domain logic only: no IO, no locking, no persistence concerns.

pub mod account;
pub mod entry;
pub mod voucher;

pub use account::{Account, AccountKind, AccountType, format_code, parse_code};
pub use entry::{LedgerEntry, LedgerRow, project_voucher};
pub use voucher::{
    JournalVoucher, VoucherDraft, VoucherId, VoucherKind, VoucherLine, VoucherStatus,
    line_totals, reversal_lines,
};
