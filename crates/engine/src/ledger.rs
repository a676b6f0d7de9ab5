use chrono::NaiveDate;

use tallybook_accounting::{LedgerEntry, LedgerRow};
use tallybook_core::{AccountingError, AccountingResult, TenantId};
use tallybook_store::JournalStore;

/// Projects vouchers into per-account ledgers and computes balances.
///
/// The write half of the projection (one entry per voucher line) runs inside
/// the posting path's atomic commit; this service is the read half.
#[derive(Debug, Clone)]
pub struct LedgerEngine<S> {
    store: S,
}

impl<S> LedgerEngine<S>
where
    S: JournalStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Signed balance of an account as of `as_of` (inclusive).
    ///
    /// Debit-normal kinds (Asset, Expense) report `Σdebit − Σcredit`;
    /// credit-normal kinds report `Σcredit − Σdebit`. Sums are accumulated
    /// wide: an account's lifetime volume can exceed any single `i64` line
    /// amount.
    pub fn account_balance(
        &self,
        tenant_id: TenantId,
        code: &str,
        as_of: NaiveDate,
    ) -> AccountingResult<i128> {
        let account = self
            .store
            .account(tenant_id, code)?
            .ok_or_else(|| AccountingError::unknown_account(code))?;

        let mut debits: i128 = 0;
        let mut credits: i128 = 0;
        for entry in self.store.entries(tenant_id, code)? {
            if entry.date <= as_of {
                debits += entry.debit as i128;
                credits += entry.credit as i128;
            }
        }

        Ok(if account.kind().is_debit_normal() {
            debits - credits
        } else {
            credits - debits
        })
    }

    /// Ledger page for one account: entries within the (inclusive) date
    /// range with a running balance.
    ///
    /// The running balance opens from the postings dated before `from`, so a
    /// page always carries the account's balance brought forward. Ordered by
    /// date ascending, ties broken by insertion sequence; each call
    /// re-executes the query.
    pub fn ledger(
        &self,
        tenant_id: TenantId,
        code: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AccountingResult<Vec<LedgerRow>> {
        let account = self
            .store
            .account(tenant_id, code)?
            .ok_or_else(|| AccountingError::unknown_account(code))?;
        let debit_normal = account.kind().is_debit_normal();

        let mut entries: Vec<LedgerEntry> = self.store.entries(tenant_id, code)?;
        entries.sort_by_key(|e| (e.date, e.seq));

        let mut running: i128 = 0;
        let mut rows = Vec::new();
        for entry in entries {
            if let Some(to) = to {
                if entry.date > to {
                    break;
                }
            }
            let delta = if debit_normal {
                entry.debit as i128 - entry.credit as i128
            } else {
                entry.credit as i128 - entry.debit as i128
            };
            running += delta;
            if from.is_none_or(|from| entry.date >= from) {
                rows.push(LedgerRow {
                    entry,
                    running_balance: running,
                });
            }
        }
        Ok(rows)
    }
}
