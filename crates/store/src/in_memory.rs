use std::collections::HashMap;
use std::sync::RwLock;

use tallybook_accounting::{Account, JournalVoucher, LedgerEntry, VoucherId};
use tallybook_core::{AccountingError, AccountingResult, TenantId};

use crate::journal::{JournalStore, VoucherFilter};

/// Per-tenant books: accounts, vouchers in insertion order, per-account
/// entry lists and the reversal back-index.
#[derive(Debug, Default)]
struct TenantBooks {
    accounts: HashMap<String, Account>,
    vouchers: Vec<JournalVoucher>,
    voucher_index: HashMap<VoucherId, usize>,
    entries: HashMap<String, Vec<LedgerEntry>>,
    /// reversed voucher id -> reversal voucher id.
    reversals: HashMap<VoucherId, VoucherId>,
    voucher_seq: u64,
    entry_seq: u64,
}

/// In-memory append-only journal store.
///
/// Intended for tests/dev. A single `RwLock` over the tenant map gives the
/// required guarantees cheaply: commits hold the write lock across the whole
/// voucher + projection append (all-or-nothing, no torn reads) and readers
/// snapshot under the read lock.
#[derive(Debug, Default)]
pub struct InMemoryJournalStore {
    tenants: RwLock<HashMap<TenantId, TenantBooks>>,
}

impl InMemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Lock poisoning means a writer panicked mid-critical-section; surface it as
// a conflict the caller can retry against rather than propagating the panic.
fn poisoned<G>(_: G) -> AccountingError {
    AccountingError::conflict("journal store lock poisoned")
}

impl JournalStore for InMemoryJournalStore {
    fn insert_account(&self, tenant_id: TenantId, account: Account) -> AccountingResult<()> {
        let mut tenants = self.tenants.write().map_err(poisoned)?;
        let books = tenants.entry(tenant_id).or_default();

        if books.accounts.contains_key(&account.code) {
            return Err(AccountingError::duplicate_code(account.code));
        }
        books.accounts.insert(account.code.clone(), account);
        Ok(())
    }

    fn account(&self, tenant_id: TenantId, code: &str) -> AccountingResult<Option<Account>> {
        let tenants = self.tenants.read().map_err(poisoned)?;
        Ok(tenants
            .get(&tenant_id)
            .and_then(|books| books.accounts.get(code))
            .cloned())
    }

    fn accounts(&self, tenant_id: TenantId) -> AccountingResult<Vec<Account>> {
        let tenants = self.tenants.read().map_err(poisoned)?;
        let mut accounts: Vec<Account> = tenants
            .get(&tenant_id)
            .map(|books| books.accounts.values().cloned().collect())
            .unwrap_or_default();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    fn next_voucher_seq(&self, tenant_id: TenantId) -> AccountingResult<u64> {
        let mut tenants = self.tenants.write().map_err(poisoned)?;
        let books = tenants.entry(tenant_id).or_default();
        books.voucher_seq += 1;
        Ok(books.voucher_seq)
    }

    fn commit_voucher(
        &self,
        tenant_id: TenantId,
        voucher: JournalVoucher,
        mut entries: Vec<LedgerEntry>,
    ) -> AccountingResult<()> {
        let mut tenants = self.tenants.write().map_err(poisoned)?;
        let books = tenants.entry(tenant_id).or_default();

        if books.voucher_index.contains_key(&voucher.id) {
            return Err(AccountingError::conflict(format!(
                "voucher id {} already committed",
                voucher.id
            )));
        }

        // The at-most-one-reversal rule is enforced here, under the same
        // critical section as the append, so racing reversals cannot both
        // land.
        if let Some(original) = &voucher.reverses {
            if !books.voucher_index.contains_key(original) {
                return Err(AccountingError::not_found(format!("voucher {original}")));
            }
            if let Some(existing) = books.reversals.get(original) {
                return Err(AccountingError::AlreadyReversed {
                    voucher: original.to_string(),
                    reversal: existing.to_string(),
                });
            }
            books
                .reversals
                .insert(original.clone(), voucher.id.clone());
        }

        for entry in &mut entries {
            books.entry_seq += 1;
            entry.seq = books.entry_seq;
            books
                .entries
                .entry(entry.account.clone())
                .or_default()
                .push(entry.clone());
        }

        books
            .voucher_index
            .insert(voucher.id.clone(), books.vouchers.len());
        books.vouchers.push(voucher);
        Ok(())
    }

    fn voucher(
        &self,
        tenant_id: TenantId,
        id: &VoucherId,
    ) -> AccountingResult<Option<JournalVoucher>> {
        let tenants = self.tenants.read().map_err(poisoned)?;
        Ok(tenants.get(&tenant_id).and_then(|books| {
            books
                .voucher_index
                .get(id)
                .map(|idx| books.vouchers[*idx].clone())
        }))
    }

    fn vouchers(
        &self,
        tenant_id: TenantId,
        filter: &VoucherFilter,
    ) -> AccountingResult<Vec<JournalVoucher>> {
        let tenants = self.tenants.read().map_err(poisoned)?;
        let mut matched: Vec<JournalVoucher> = tenants
            .get(&tenant_id)
            .map(|books| {
                books
                    .vouchers
                    .iter()
                    .filter(|v| filter.matches(v))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        // Stable sort keeps insertion order for equal dates.
        matched.sort_by_key(|v| v.date);
        Ok(matched)
    }

    fn entries(&self, tenant_id: TenantId, account: &str) -> AccountingResult<Vec<LedgerEntry>> {
        let tenants = self.tenants.read().map_err(poisoned)?;
        Ok(tenants
            .get(&tenant_id)
            .and_then(|books| books.entries.get(account))
            .cloned()
            .unwrap_or_default())
    }

    fn reversal_of(
        &self,
        tenant_id: TenantId,
        id: &VoucherId,
    ) -> AccountingResult<Option<VoucherId>> {
        let tenants = self.tenants.read().map_err(poisoned)?;
        Ok(tenants
            .get(&tenant_id)
            .and_then(|books| books.reversals.get(id))
            .cloned())
    }
}
