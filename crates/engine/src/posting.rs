use chrono::Utc;

use tallybook_accounting::{
    JournalVoucher, VoucherDraft, VoucherId, VoucherKind, project_voucher,
};
use tallybook_core::{AccountingError, AccountingResult, TenantId};
use tallybook_store::{JournalStore, VoucherFilter};

/// Validates and immutably appends journal vouchers.
///
/// The single write path of the engine: every voucher — including reversals —
/// enters the books through [`VoucherStore::post_voucher`]. There is no
/// update or delete operation on a posted voucher.
#[derive(Debug, Clone)]
pub struct VoucherStore<S> {
    store: S,
}

impl<S> VoucherStore<S>
where
    S: JournalStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and post a voucher; returns the assigned id.
    ///
    /// Rejection order: shape (`Validation`), unknown account codes
    /// (`UnknownAccount`), then balance (`UnbalancedVoucher`). The voucher
    /// and its ledger projection are committed as one atomic store
    /// operation.
    pub fn post_voucher(
        &self,
        tenant_id: TenantId,
        draft: VoucherDraft,
    ) -> AccountingResult<VoucherId> {
        if let Err(err) = draft.validate_shape() {
            tracing::warn!(tenant = %tenant_id, %err, "rejected voucher");
            return Err(err);
        }

        for line in &draft.lines {
            if self.store.account(tenant_id, &line.account)?.is_none() {
                tracing::warn!(tenant = %tenant_id, code = %line.account, "rejected voucher: unknown account");
                return Err(AccountingError::unknown_account(line.account.clone()));
            }
        }

        if let Err(err) = draft.validate_balance() {
            tracing::warn!(tenant = %tenant_id, %err, "rejected voucher");
            return Err(err);
        }

        let seq = self.store.next_voucher_seq(tenant_id)?;
        let id = match (draft.kind, &draft.reverses) {
            (VoucherKind::Reversal, Some(original)) => VoucherId::reversal_of(original, seq),
            _ => VoucherId::sequenced(draft.kind, seq),
        };

        let voucher = draft.into_voucher(tenant_id, id.clone(), Utc::now());
        let entries = project_voucher(&voucher);
        self.store.commit_voucher(tenant_id, voucher, entries)?;

        tracing::info!(tenant = %tenant_id, voucher = %id, "posted voucher");
        Ok(id)
    }

    /// Fetch a single voucher by id.
    pub fn get_voucher(
        &self,
        tenant_id: TenantId,
        id: &VoucherId,
    ) -> AccountingResult<JournalVoucher> {
        self.store
            .voucher(tenant_id, id)?
            .ok_or_else(|| AccountingError::not_found(format!("voucher {id}")))
    }

    /// List vouchers matching `filter`, date ascending, insertion order for
    /// ties. Each call re-executes the underlying query.
    pub fn list_vouchers(
        &self,
        tenant_id: TenantId,
        filter: &VoucherFilter,
    ) -> AccountingResult<Vec<JournalVoucher>> {
        self.store.vouchers(tenant_id, filter)
    }
}
