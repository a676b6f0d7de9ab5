use chrono::Utc;

use tallybook_accounting::{JournalVoucher, VoucherDraft, VoucherId};
use tallybook_core::{AccountingError, AccountingResult, TenantId};
use tallybook_store::JournalStore;

use crate::posting::VoucherStore;

/// Generates the balance-negating compensating voucher for a prior voucher.
///
/// The only sanctioned correction path: the original is never edited or
/// deleted, and the reversal is posted through the normal validation path
/// rather than injected.
#[derive(Debug, Clone)]
pub struct ReversalService<S> {
    store: S,
    posting: VoucherStore<S>,
}

impl<S> ReversalService<S>
where
    S: JournalStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            posting: VoucherStore::new(store.clone()),
            store,
        }
    }

    /// Reverse `original_id` by posting a voucher with every line's debit
    /// and credit swapped.
    ///
    /// At most one reversal per voucher: a prior reversal fails the call
    /// with `AlreadyReversed`. The check here is advisory; the store
    /// re-enforces it inside the atomic commit, so racing reversals cannot
    /// both land.
    pub fn reverse_voucher(
        &self,
        tenant_id: TenantId,
        original_id: &VoucherId,
    ) -> AccountingResult<JournalVoucher> {
        let original = self
            .store
            .voucher(tenant_id, original_id)?
            .ok_or_else(|| AccountingError::not_found(format!("voucher {original_id}")))?;

        if let Some(existing) = self.store.reversal_of(tenant_id, original_id)? {
            return Err(AccountingError::AlreadyReversed {
                voucher: original_id.to_string(),
                reversal: existing.to_string(),
            });
        }

        let draft = VoucherDraft::reversal(&original, Utc::now().date_naive());
        let reversal_id = self.posting.post_voucher(tenant_id, draft)?;

        tracing::info!(tenant = %tenant_id, original = %original_id, reversal = %reversal_id, "reversed voucher");
        self.posting.get_voucher(tenant_id, &reversal_id)
    }
}
