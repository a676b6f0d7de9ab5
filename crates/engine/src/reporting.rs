use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tallybook_accounting::{JournalVoucher, VoucherId, VoucherKind, VoucherStatus};
use tallybook_core::{AccountingError, AccountingResult, TenantId};
use tallybook_store::{JournalStore, VoucherFilter};

/// Per-account debit/credit totals in a trial balance.
///
/// Wide accumulators: a long-lived account can hold far more posting volume
/// than any single `i64` line amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    pub debit_total: i128,
    pub credit_total: i128,
}

/// Day book: vouchers in a period partitioned by kind.
///
/// A derived, best-effort convenience for the outer report layers; the
/// partition comes from the voucher kind (id prefix), nothing is inferred
/// from narration text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBook {
    pub receipts: Vec<JournalVoucher>,
    pub payments: Vec<JournalVoucher>,
    pub journals: Vec<JournalVoucher>,
    pub reversals: Vec<JournalVoucher>,
}

/// Derives trial balances and voucher status purely from the voucher set.
#[derive(Debug, Clone)]
pub struct ReportingService<S> {
    store: S,
}

impl<S> ReportingService<S>
where
    S: JournalStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Per-account debit/credit totals over postings dated ≤ `as_of`, keyed
    /// by account code. Accounts with no activity report zero totals.
    ///
    /// The totals come from a single voucher listing, summed line by line:
    /// each voucher is counted whole, so a commit racing this report is
    /// either fully included or not at all, and `Σ debit_total ==
    /// Σ credit_total` holds in every snapshot.
    pub fn trial_balance(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> AccountingResult<BTreeMap<String, TrialBalanceLine>> {
        let mut report: BTreeMap<String, TrialBalanceLine> = BTreeMap::new();
        for account in self.store.accounts(tenant_id)? {
            report.insert(account.code, TrialBalanceLine::default());
        }

        let filter = VoucherFilter {
            id_prefix: None,
            from: None,
            to: Some(as_of),
        };
        for voucher in self.store.vouchers(tenant_id, &filter)? {
            for line in &voucher.lines {
                let totals = report.entry(line.account.clone()).or_default();
                totals.debit_total += line.debit as i128;
                totals.credit_total += line.credit as i128;
            }
        }
        Ok(report)
    }

    /// Active/Reversed status, recomputed on every call from the `reverses`
    /// back-index — never a stored flag.
    pub fn voucher_status(
        &self,
        tenant_id: TenantId,
        id: &VoucherId,
    ) -> AccountingResult<VoucherStatus> {
        if self.store.voucher(tenant_id, id)?.is_none() {
            return Err(AccountingError::not_found(format!("voucher {id}")));
        }
        Ok(match self.store.reversal_of(tenant_id, id)? {
            Some(_) => VoucherStatus::Reversed,
            None => VoucherStatus::Active,
        })
    }

    /// Vouchers in the (inclusive) period, partitioned by kind; each group
    /// keeps the date-then-insertion ordering of the listing query.
    pub fn day_book(
        &self,
        tenant_id: TenantId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AccountingResult<DayBook> {
        let filter = VoucherFilter {
            id_prefix: None,
            from,
            to,
        };
        let mut book = DayBook::default();
        for voucher in self.store.vouchers(tenant_id, &filter)? {
            match voucher.kind {
                VoucherKind::Receipt => book.receipts.push(voucher),
                VoucherKind::Payment => book.payments.push(voucher),
                VoucherKind::Journal => book.journals.push(voucher),
                VoucherKind::Reversal => book.reversals.push(voucher),
            }
        }
        Ok(book)
    }
}
