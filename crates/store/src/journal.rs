use std::sync::Arc;

use chrono::NaiveDate;

use tallybook_accounting::{Account, JournalVoucher, LedgerEntry, VoucherId};
use tallybook_core::{AccountingResult, TenantId};

/// Voucher listing filter. All fields optional; an empty filter matches
/// everything in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoucherFilter {
    /// Match ids starting with this prefix (e.g. "RV-").
    pub id_prefix: Option<String>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
}

impl VoucherFilter {
    pub fn matches(&self, voucher: &JournalVoucher) -> bool {
        if let Some(prefix) = &self.id_prefix {
            if !voucher.id.as_str().starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if voucher.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if voucher.date > to {
                return false;
            }
        }
        true
    }
}

/// Tenant-partitioned persistence contract for the bookkeeping engine.
///
/// Guarantees required of implementations:
/// - `commit_voucher` is all-or-nothing: the voucher, its ledger entries and
///   the reversal back-index become visible together or not at all.
/// - Reads are snapshot-consistent with respect to any single voucher (no
///   torn reads of a half-posted voucher).
/// - `next_voucher_seq` is an atomic increment, unique even under races.
/// - Query methods re-execute on every call (restartable, no cursor state).
pub trait JournalStore: Send + Sync {
    /// Persist a new account; fails with `DuplicateCode` if the code is
    /// already taken in scope.
    fn insert_account(&self, tenant_id: TenantId, account: Account) -> AccountingResult<()>;

    fn account(&self, tenant_id: TenantId, code: &str) -> AccountingResult<Option<Account>>;

    fn accounts(&self, tenant_id: TenantId) -> AccountingResult<Vec<Account>>;

    /// Allocate the next per-tenant voucher sequence number.
    fn next_voucher_seq(&self, tenant_id: TenantId) -> AccountingResult<u64>;

    /// Atomically append a voucher together with its ledger projection.
    ///
    /// Enforces under the same critical section: id uniqueness
    /// (`ConcurrencyConflict`), existence of a reversed voucher (`NotFound`)
    /// and the at-most-one-reversal rule (`AlreadyReversed`). Entry `seq`
    /// values are assigned here.
    fn commit_voucher(
        &self,
        tenant_id: TenantId,
        voucher: JournalVoucher,
        entries: Vec<LedgerEntry>,
    ) -> AccountingResult<()>;

    fn voucher(&self, tenant_id: TenantId, id: &VoucherId)
    -> AccountingResult<Option<JournalVoucher>>;

    /// Vouchers matching `filter`, ordered by date ascending then insertion
    /// order for ties.
    fn vouchers(
        &self,
        tenant_id: TenantId,
        filter: &VoucherFilter,
    ) -> AccountingResult<Vec<JournalVoucher>>;

    /// All entries posted against one account, in insertion order.
    fn entries(&self, tenant_id: TenantId, account: &str) -> AccountingResult<Vec<LedgerEntry>>;

    /// Back-index lookup: the id of the voucher reversing `id`, if any.
    fn reversal_of(
        &self,
        tenant_id: TenantId,
        id: &VoucherId,
    ) -> AccountingResult<Option<VoucherId>>;
}

impl<S> JournalStore for Arc<S>
where
    S: JournalStore + ?Sized,
{
    fn insert_account(&self, tenant_id: TenantId, account: Account) -> AccountingResult<()> {
        (**self).insert_account(tenant_id, account)
    }

    fn account(&self, tenant_id: TenantId, code: &str) -> AccountingResult<Option<Account>> {
        (**self).account(tenant_id, code)
    }

    fn accounts(&self, tenant_id: TenantId) -> AccountingResult<Vec<Account>> {
        (**self).accounts(tenant_id)
    }

    fn next_voucher_seq(&self, tenant_id: TenantId) -> AccountingResult<u64> {
        (**self).next_voucher_seq(tenant_id)
    }

    fn commit_voucher(
        &self,
        tenant_id: TenantId,
        voucher: JournalVoucher,
        entries: Vec<LedgerEntry>,
    ) -> AccountingResult<()> {
        (**self).commit_voucher(tenant_id, voucher, entries)
    }

    fn voucher(
        &self,
        tenant_id: TenantId,
        id: &VoucherId,
    ) -> AccountingResult<Option<JournalVoucher>> {
        (**self).voucher(tenant_id, id)
    }

    fn vouchers(
        &self,
        tenant_id: TenantId,
        filter: &VoucherFilter,
    ) -> AccountingResult<Vec<JournalVoucher>> {
        (**self).vouchers(tenant_id, filter)
    }

    fn entries(&self, tenant_id: TenantId, account: &str) -> AccountingResult<Vec<LedgerEntry>> {
        (**self).entries(tenant_id, account)
    }

    fn reversal_of(
        &self,
        tenant_id: TenantId,
        id: &VoucherId,
    ) -> AccountingResult<Option<VoucherId>> {
        (**self).reversal_of(tenant_id, id)
    }
}
