use std::collections::HashSet;

use tallybook_accounting::{Account, AccountType, format_code, parse_code};
use tallybook_core::{AccountingError, AccountingResult, TenantId};
use tallybook_store::JournalStore;

/// Chart of accounts: registry of account codes/names/types per tenant.
///
/// Allocates new codes within each type's reserved numeric range; explicit
/// codes are validated against the range and rejected on duplicates.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts<S> {
    store: S,
}

impl<S> ChartOfAccounts<S>
where
    S: JournalStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a new account.
    ///
    /// With `code: None`, scans the type's range across the tenant's known
    /// accounts and takes the first unused integer (zero-padded to 4
    /// digits); `ExhaustedRange` when the range is full. An auto-allocated
    /// code that loses the insert race surfaces as `ConcurrencyConflict` so
    /// the caller can retry the allocation; an explicit duplicate stays
    /// `DuplicateCode`.
    pub fn register_account(
        &self,
        tenant_id: TenantId,
        account_type: AccountType,
        name: &str,
        code: Option<&str>,
    ) -> AccountingResult<Account> {
        if name.trim().is_empty() {
            return Err(AccountingError::validation("account name cannot be empty"));
        }

        let (code, auto_allocated) = match code {
            Some(explicit) => {
                let numeric = parse_code(account_type, explicit)?;
                (format_code(numeric), false)
            }
            None => (self.allocate_code(tenant_id, account_type)?, true),
        };

        let account = Account {
            tenant_id,
            code: code.clone(),
            name: name.trim().to_string(),
            account_type,
        };

        match self.store.insert_account(tenant_id, account.clone()) {
            Ok(()) => {
                tracing::debug!(tenant = %tenant_id, %code, %account_type, "registered account");
                Ok(account)
            }
            Err(AccountingError::DuplicateCode { code }) if auto_allocated => {
                // Lost the scan-then-insert race against a concurrent
                // registration; the caller retries allocation.
                Err(AccountingError::conflict(format!(
                    "allocated code {code} was taken concurrently"
                )))
            }
            Err(err) => Err(err),
        }
    }

    /// Look up an account by code.
    pub fn lookup_account(&self, tenant_id: TenantId, code: &str) -> AccountingResult<Account> {
        self.store
            .account(tenant_id, code)?
            .ok_or_else(|| AccountingError::not_found(format!("account {code}")))
    }

    /// All accounts in scope, ordered by code.
    pub fn list_accounts(&self, tenant_id: TenantId) -> AccountingResult<Vec<Account>> {
        self.store.accounts(tenant_id)
    }

    fn allocate_code(
        &self,
        tenant_id: TenantId,
        account_type: AccountType,
    ) -> AccountingResult<String> {
        let taken: HashSet<String> = self
            .store
            .accounts(tenant_id)?
            .into_iter()
            .map(|a| a.code)
            .collect();

        for candidate in account_type.code_range() {
            let code = format_code(candidate);
            if !taken.contains(&code) {
                return Ok(code);
            }
        }
        Err(AccountingError::ExhaustedRange {
            account_type: account_type.label().to_string(),
        })
    }
}
