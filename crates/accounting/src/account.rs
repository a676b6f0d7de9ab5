use core::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use tallybook_core::{AccountingError, AccountingResult, TenantId};

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountKind {
    /// Whether a debit increases the balance of this kind of account.
    ///
    /// Assets and expenses are debit-normal; liabilities, equity and income
    /// are credit-normal.
    pub fn is_debit_normal(self) -> bool {
        matches!(self, AccountKind::Asset | AccountKind::Expense)
    }
}

/// Concrete account type, each owning a reserved 4-digit code range.
///
/// New accounts without an explicit code are allocated the first unused
/// integer in their type's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    CashAndBank,
    CurrentAsset,
    FixedAsset,
    CurrentLiability,
    LongTermLiability,
    Equity,
    Income,
    Expense,
}

impl AccountType {
    pub fn kind(self) -> AccountKind {
        match self {
            AccountType::CashAndBank | AccountType::CurrentAsset | AccountType::FixedAsset => {
                AccountKind::Asset
            }
            AccountType::CurrentLiability | AccountType::LongTermLiability => {
                AccountKind::Liability
            }
            AccountType::Equity => AccountKind::Equity,
            AccountType::Income => AccountKind::Income,
            AccountType::Expense => AccountKind::Expense,
        }
    }

    /// Inclusive numeric code range reserved for this type.
    pub fn code_range(self) -> RangeInclusive<u16> {
        match self {
            AccountType::CashAndBank => 1000..=1299,
            AccountType::CurrentAsset => 1300..=1499,
            AccountType::FixedAsset => 1500..=1999,
            AccountType::CurrentLiability => 2000..=2499,
            AccountType::LongTermLiability => 2500..=2999,
            AccountType::Equity => 3000..=3999,
            AccountType::Income => 4000..=4999,
            AccountType::Expense => 5000..=5999,
        }
    }

    /// Human-readable label, used in error messages and reports.
    pub fn label(self) -> &'static str {
        match self {
            AccountType::CashAndBank => "Cash & Bank",
            AccountType::CurrentAsset => "Current Asset",
            AccountType::FixedAsset => "Fixed Asset",
            AccountType::CurrentLiability => "Current Liability",
            AccountType::LongTermLiability => "Long-term Liability",
            AccountType::Equity => "Equity",
            AccountType::Income => "Income",
            AccountType::Expense => "Expense",
        }
    }
}

impl core::fmt::Display for AccountType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Format a numeric code as the canonical zero-padded 4-digit string.
pub fn format_code(code: u16) -> String {
    format!("{code:04}")
}

/// Parse and validate an explicit account code against a type's range.
pub fn parse_code(account_type: AccountType, code: &str) -> AccountingResult<u16> {
    if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AccountingError::validation(format!(
            "account code must be a 4-digit number, got '{code}'"
        )));
    }
    let numeric: u16 = code
        .parse()
        .map_err(|_| AccountingError::validation(format!("account code '{code}' is not numeric")))?;
    if !account_type.code_range().contains(&numeric) {
        return Err(AccountingError::validation(format!(
            "code {code} is outside the {} range {}..={}",
            account_type.label(),
            account_type.code_range().start(),
            account_type.code_range().end(),
        )));
    }
    Ok(numeric)
}

/// A registered chart-of-accounts entry.
///
/// Append-only once referenced by a posted voucher line; tenant + code are
/// globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub tenant_id: TenantId,
    /// Canonical zero-padded code, e.g. "1302".
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
}

impl Account {
    pub fn kind(&self) -> AccountKind {
        self.account_type.kind()
    }
}
