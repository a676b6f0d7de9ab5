use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::voucher::{JournalVoucher, VoucherId};

/// One posting against one account, derived from a voucher line.
///
/// Entries are append-only: the projection never mutates a previously
/// appended entry. `seq` is assigned by the store at commit time and breaks
/// ordering ties between entries sharing a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub account: String,
    pub date: NaiveDate,
    pub debit: i64,
    pub credit: i64,
    pub voucher_id: VoucherId,
    pub narration: String,
    pub seq: u64,
}

/// A ledger entry paired with the running balance after applying it.
///
/// The running balance is signed per the account's normal side, accumulated
/// wide, and opens from the postings that precede the requested range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub entry: LedgerEntry,
    pub running_balance: i128,
}

/// Project a voucher into one ledger entry per line.
///
/// `seq` is left at zero; the store stamps the real insertion sequence as
/// part of the atomic commit.
pub fn project_voucher(voucher: &JournalVoucher) -> Vec<LedgerEntry> {
    voucher
        .lines
        .iter()
        .map(|line| LedgerEntry {
            account: line.account.clone(),
            date: voucher.date,
            debit: line.debit,
            credit: line.credit,
            voucher_id: voucher.id.clone(),
            narration: voucher.narration.clone(),
            seq: 0,
        })
        .collect()
}
