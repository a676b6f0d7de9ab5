use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use tallybook_core::{AccountingError, AccountingResult, PartyRef, TenantId};

/// Voucher kind, encoded as the human-readable id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherKind {
    /// Money received (`RV-`).
    Receipt,
    /// Money paid out (`PV-`).
    Payment,
    /// General journal entry (`JV-`).
    Journal,
    /// Compensating entry negating a prior voucher (`REV-`).
    Reversal,
}

impl VoucherKind {
    pub fn prefix(self) -> &'static str {
        match self {
            VoucherKind::Receipt => "RV",
            VoucherKind::Payment => "PV",
            VoucherKind::Journal => "JV",
            VoucherKind::Reversal => "REV",
        }
    }
}

/// Voucher identifier: `{prefix}-{seq}`, or `REV-{original}-{seq}` for
/// reversals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherId(String);

impl VoucherId {
    /// Id for a freshly posted receipt/payment/journal voucher.
    pub fn sequenced(kind: VoucherKind, seq: u64) -> Self {
        Self(format!("{}-{seq}", kind.prefix()))
    }

    /// Id for the reversal of `original`.
    pub fn reversal_of(original: &VoucherId, seq: u64) -> Self {
        Self(format!("REV-{original}-{seq}"))
    }

    /// Kind derived from the id prefix. `REV-` must be tested before `RV-`.
    pub fn kind(&self) -> Option<VoucherKind> {
        if self.0.starts_with("REV-") {
            Some(VoucherKind::Reversal)
        } else if self.0.starts_with("RV-") {
            Some(VoucherKind::Receipt)
        } else if self.0.starts_with("PV-") {
            Some(VoucherKind::Payment)
        } else if self.0.starts_with("JV-") {
            Some(VoucherKind::Journal)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for VoucherId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoucherId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for VoucherId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One side of a voucher (immutable once posted).
///
/// Amounts are in integer minor units (e.g. paise/cents). A line
/// conventionally carries a nonzero value on exactly one side; only the
/// voucher-level balance invariant is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherLine {
    /// Account code, e.g. "1010".
    pub account: String,
    pub debit: i64,
    pub credit: i64,
}

impl VoucherLine {
    pub fn debit(account: impl Into<String>, amount: i64) -> Self {
        Self {
            account: account.into(),
            debit: amount,
            credit: 0,
        }
    }

    pub fn credit(account: impl Into<String>, amount: i64) -> Self {
        Self {
            account: account.into(),
            debit: 0,
            credit: amount,
        }
    }
}

/// Sum the debit and credit sides of a line set (wide accumulator).
pub fn line_totals(lines: &[VoucherLine]) -> (i128, i128) {
    let mut debits: i128 = 0;
    let mut credits: i128 = 0;
    for line in lines {
        debits += line.debit as i128;
        credits += line.credit as i128;
    }
    (debits, credits)
}

/// Build the compensating line set: swap debit and credit on every line.
///
/// Swapping both sides of a balanced set is still balanced, so a reversal
/// preserves the balance invariant by construction.
pub fn reversal_lines(lines: &[VoucherLine]) -> Vec<VoucherLine> {
    lines
        .iter()
        .map(|line| VoucherLine {
            account: line.account.clone(),
            debit: line.credit,
            credit: line.debit,
        })
        .collect()
}

/// A posted, immutable journal voucher.
///
/// Never edited or deleted; corrections go through a reversal voucher whose
/// `reverses` field points back here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalVoucher {
    pub tenant_id: TenantId,
    pub id: VoucherId,
    pub kind: VoucherKind,
    pub date: NaiveDate,
    pub narration: String,
    /// Ordered lines; order is significant for display only.
    pub lines: Vec<VoucherLine>,
    /// Total voucher value in minor units.
    pub amount: i64,
    /// Set only on reversal vouchers: the voucher this one negates.
    pub reverses: Option<VoucherId>,
    pub counterparty: Option<PartyRef>,
    pub recorded_at: DateTime<Utc>,
}

/// Derived voucher status — recomputed on every query, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherStatus {
    Active,
    Reversed,
}

/// A voucher as submitted for posting, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherDraft {
    pub kind: VoucherKind,
    pub date: NaiveDate,
    pub narration: String,
    pub lines: Vec<VoucherLine>,
    pub amount: i64,
    pub reverses: Option<VoucherId>,
    pub counterparty: Option<PartyRef>,
}

impl VoucherDraft {
    pub fn new(
        kind: VoucherKind,
        date: NaiveDate,
        narration: impl Into<String>,
        amount: i64,
        lines: Vec<VoucherLine>,
    ) -> Self {
        Self {
            kind,
            date,
            narration: narration.into(),
            lines,
            amount,
            reverses: None,
            counterparty: None,
        }
    }

    pub fn with_counterparty(mut self, party: PartyRef) -> Self {
        self.counterparty = Some(party);
        self
    }

    /// Draft negating `original`; used by the reversal path only.
    pub fn reversal(original: &JournalVoucher, date: NaiveDate) -> Self {
        Self {
            kind: VoucherKind::Reversal,
            date,
            narration: format!("Reversal of Voucher #{}", original.id),
            lines: reversal_lines(&original.lines),
            amount: original.amount,
            reverses: Some(original.id.clone()),
            counterparty: original.counterparty.clone(),
        }
    }

    /// Full pure validation: shape first, then balance. Account existence
    /// is checked against the chart by the posting service, between the two.
    pub fn validate(&self) -> AccountingResult<()> {
        self.validate_shape()?;
        self.validate_balance()
    }

    /// Shape checks: lines present, no negative amounts, `reverses` only on
    /// reversal vouchers.
    pub fn validate_shape(&self) -> AccountingResult<()> {
        if self.lines.is_empty() {
            return Err(AccountingError::validation("voucher has no lines"));
        }
        if self.amount < 0 {
            return Err(AccountingError::validation(format!(
                "voucher amount must be non-negative, got {}",
                self.amount
            )));
        }
        for (idx, line) in self.lines.iter().enumerate() {
            if line.debit < 0 || line.credit < 0 {
                return Err(AccountingError::validation(format!(
                    "line {idx} ({}) carries a negative amount",
                    line.account
                )));
            }
        }
        match (self.kind, &self.reverses) {
            (VoucherKind::Reversal, None) => {
                return Err(AccountingError::validation(
                    "reversal voucher must reference the voucher it reverses",
                ));
            }
            (kind, Some(_)) if kind != VoucherKind::Reversal => {
                return Err(AccountingError::validation(
                    "only reversal vouchers may set `reverses`",
                ));
            }
            _ => {}
        }
        Ok(())
    }

    /// The core invariant: debit and credit totals must be exactly equal.
    pub fn validate_balance(&self) -> AccountingResult<()> {
        let (debits, credits) = line_totals(&self.lines);
        if debits != credits {
            return Err(AccountingError::UnbalancedVoucher { debits, credits });
        }
        Ok(())
    }

    /// Finalize into an immutable voucher once the store has assigned an id.
    pub fn into_voucher(
        self,
        tenant_id: TenantId,
        id: VoucherId,
        recorded_at: DateTime<Utc>,
    ) -> JournalVoucher {
        JournalVoucher {
            tenant_id,
            id,
            kind: self.kind,
            date: self.date,
            narration: self.narration,
            lines: self.lines,
            amount: self.amount,
            reverses: self.reverses,
            counterparty: self.counterparty,
            recorded_at,
        }
    }
}
