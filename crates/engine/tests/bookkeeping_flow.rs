//! Black-box tests exercising the engine through its public contract only:
//! chart registration, posting, ledgers, reversal and reporting wired over a
//! shared in-memory journal store.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;

use tallybook_accounting::{
    AccountType, VoucherDraft, VoucherKind, VoucherLine, VoucherStatus,
};
use tallybook_core::{AccountingError, PartyRef, TenantId};
use tallybook_engine::{
    ChartOfAccounts, LedgerEngine, ReportingService, ReversalService, VoucherStore,
};
use tallybook_store::{InMemoryJournalStore, VoucherFilter};

type Store = Arc<InMemoryJournalStore>;

struct Engine {
    store: Store,
    chart: ChartOfAccounts<Store>,
    vouchers: VoucherStore<Store>,
    ledger: LedgerEngine<Store>,
    reversals: ReversalService<Store>,
    reporting: ReportingService<Store>,
    tenant_id: TenantId,
}

fn engine() -> Engine {
    let store: Store = Arc::new(InMemoryJournalStore::new());
    Engine {
        chart: ChartOfAccounts::new(store.clone()),
        vouchers: VoucherStore::new(store.clone()),
        ledger: LedgerEngine::new(store.clone()),
        reversals: ReversalService::new(store.clone()),
        reporting: ReportingService::new(store.clone()),
        store,
        tenant_id: TenantId::new(),
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn seed_chart(engine: &Engine) {
    for (code, name, account_type) in [
        ("1010", "Cash", AccountType::CashAndBank),
        ("1300", "Sundry Debtors", AccountType::CurrentAsset),
        ("3000", "Capital", AccountType::Equity),
        ("4000", "Sales", AccountType::Income),
        ("5000", "Rent", AccountType::Expense),
    ] {
        engine
            .chart
            .register_account(engine.tenant_id, account_type, name, Some(code))
            .unwrap();
    }
}

fn two_line_draft(kind: VoucherKind, debit: &str, credit: &str, amount: i64) -> VoucherDraft {
    VoucherDraft::new(
        kind,
        date("2026-04-01"),
        "integration entry",
        amount,
        vec![
            VoucherLine::debit(debit, amount),
            VoucherLine::credit(credit, amount),
        ],
    )
}

#[test]
fn full_posting_and_reversal_cycle() {
    let engine = engine();
    seed_chart(&engine);
    let tenant_id = engine.tenant_id;
    let as_of = date("2026-12-31");

    // Receipt: cash in against sales, tagged with a counterparty reference.
    let id = engine
        .vouchers
        .post_voucher(
            tenant_id,
            two_line_draft(VoucherKind::Receipt, "1010", "4000", 5000)
                .with_counterparty(PartyRef::new("party-acme")),
        )
        .unwrap();

    assert_eq!(
        engine
            .ledger
            .account_balance(tenant_id, "1010", as_of)
            .unwrap(),
        5000
    );
    assert_eq!(
        engine.reporting.voucher_status(tenant_id, &id).unwrap(),
        VoucherStatus::Active
    );

    // Reversal returns every affected balance to its prior value.
    let reversal = engine.reversals.reverse_voucher(tenant_id, &id).unwrap();
    assert_eq!(reversal.counterparty, Some(PartyRef::new("party-acme")));
    assert_eq!(
        engine
            .ledger
            .account_balance(tenant_id, "1010", as_of)
            .unwrap(),
        0
    );
    assert_eq!(
        engine.reporting.voucher_status(tenant_id, &id).unwrap(),
        VoucherStatus::Reversed
    );
    assert_eq!(
        engine
            .reporting
            .voucher_status(tenant_id, &reversal.id)
            .unwrap(),
        VoucherStatus::Active
    );

    // A second reversal is refused.
    let err = engine.reversals.reverse_voucher(tenant_id, &id).unwrap_err();
    assert!(matches!(err, AccountingError::AlreadyReversed { .. }));
}

#[test]
fn rejected_voucher_creates_no_ledger_entries() {
    let engine = engine();
    seed_chart(&engine);
    let tenant_id = engine.tenant_id;

    let mut draft = two_line_draft(VoucherKind::Journal, "1010", "4000", 5000);
    draft.lines[1].credit = 4000;
    let err = engine.vouchers.post_voucher(tenant_id, draft).unwrap_err();
    assert!(matches!(err, AccountingError::UnbalancedVoucher { .. }));

    assert_eq!(
        engine
            .ledger
            .account_balance(tenant_id, "1010", date("2026-12-31"))
            .unwrap(),
        0
    );
    assert!(
        engine
            .vouchers
            .list_vouchers(tenant_id, &VoucherFilter::default())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn trial_balance_identity_over_mixed_activity() {
    let engine = engine();
    seed_chart(&engine);
    let tenant_id = engine.tenant_id;

    engine
        .vouchers
        .post_voucher(tenant_id, two_line_draft(VoucherKind::Receipt, "1010", "3000", 100_000))
        .unwrap();
    engine
        .vouchers
        .post_voucher(tenant_id, two_line_draft(VoucherKind::Receipt, "1300", "4000", 42_500))
        .unwrap();
    engine
        .vouchers
        .post_voucher(tenant_id, two_line_draft(VoucherKind::Payment, "5000", "1010", 18_000))
        .unwrap();
    let id = engine
        .vouchers
        .post_voucher(tenant_id, two_line_draft(VoucherKind::Journal, "1010", "1300", 10_000))
        .unwrap();
    engine.reversals.reverse_voucher(tenant_id, &id).unwrap();

    let report = engine
        .reporting
        .trial_balance(tenant_id, date("2026-12-31"))
        .unwrap();
    let debits: i128 = report.values().map(|l| l.debit_total).sum();
    let credits: i128 = report.values().map(|l| l.credit_total).sum();
    assert_eq!(debits, credits);
}

#[test]
fn tenants_are_fully_isolated() {
    let store: Store = Arc::new(InMemoryJournalStore::new());
    let chart = ChartOfAccounts::new(store.clone());
    let vouchers = VoucherStore::new(store.clone());
    let ledger = LedgerEngine::new(store.clone());
    let (a, b) = (TenantId::new(), TenantId::new());

    for tenant_id in [a, b] {
        chart
            .register_account(tenant_id, AccountType::CashAndBank, "Cash", Some("1010"))
            .unwrap();
        chart
            .register_account(tenant_id, AccountType::Income, "Sales", Some("4000"))
            .unwrap();
    }
    vouchers
        .post_voucher(a, two_line_draft(VoucherKind::Receipt, "1010", "4000", 700))
        .unwrap();

    assert_eq!(ledger.account_balance(a, "1010", date("2026-12-31")).unwrap(), 700);
    assert_eq!(ledger.account_balance(b, "1010", date("2026-12-31")).unwrap(), 0);
    assert!(vouchers.list_vouchers(b, &VoucherFilter::default()).unwrap().is_empty());
}

#[test]
fn concurrent_registration_never_hands_out_the_same_code() {
    let store: Store = Arc::new(InMemoryJournalStore::new());
    let tenant_id = TenantId::new();

    let mut handles = Vec::new();
    for worker in 0..8 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            let chart = ChartOfAccounts::new(store);
            let mut codes = Vec::new();
            for i in 0..10 {
                // Retry on lost allocation races, as the contract prescribes.
                loop {
                    match chart.register_account(
                        tenant_id,
                        AccountType::CurrentAsset,
                        &format!("acct-{worker}-{i}"),
                        None,
                    ) {
                        Ok(account) => {
                            codes.push(account.code);
                            break;
                        }
                        Err(AccountingError::ConcurrencyConflict(_)) => continue,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
            }
            codes
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }
    let unique: HashSet<&String> = all.iter().collect();
    assert_eq!(unique.len(), all.len(), "duplicate codes allocated: {all:?}");
}

#[test]
fn concurrent_posting_keeps_books_balanced() {
    let engine = engine();
    seed_chart(&engine);
    let tenant_id = engine.tenant_id;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = engine.store.clone();
        handles.push(thread::spawn(move || {
            let vouchers = VoucherStore::new(store);
            for _ in 0..25 {
                vouchers
                    .post_voucher(
                        tenant_id,
                        two_line_draft(VoucherKind::Receipt, "1010", "4000", 100),
                    )
                    .unwrap();
            }
        }));
    }
    // Readers run concurrently with the writers; every snapshot they take
    // must already balance (no torn reads of a half-posted voucher).
    let reporting = ReportingService::new(engine.store.clone());
    for _ in 0..50 {
        let report = reporting.trial_balance(tenant_id, date("2026-12-31")).unwrap();
        let debits: i128 = report.values().map(|l| l.debit_total).sum();
        let credits: i128 = report.values().map(|l| l.credit_total).sum();
        assert_eq!(debits, credits);
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        engine
            .ledger
            .account_balance(tenant_id, "1010", date("2026-12-31"))
            .unwrap(),
        4 * 25 * 100
    );
    let ids: HashSet<String> = engine
        .vouchers
        .list_vouchers(tenant_id, &VoucherFilter::default())
        .unwrap()
        .into_iter()
        .map(|v| v.id.to_string())
        .collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn trial_balance_never_observes_half_a_voucher() {
    let engine = engine();
    seed_chart(&engine);
    let tenant_id = engine.tenant_id;

    let writer = {
        let store = engine.store.clone();
        thread::spawn(move || {
            let vouchers = VoucherStore::new(store);
            for _ in 0..20_000 {
                vouchers
                    .post_voucher(
                        tenant_id,
                        two_line_draft(VoucherKind::Receipt, "1010", "4000", 7),
                    )
                    .unwrap();
            }
        })
    };

    // Report continuously while the writer is mid-stream: a voucher must
    // never show up with only one of its sides counted.
    let reporting = ReportingService::new(engine.store.clone());
    while !writer.is_finished() {
        let report = reporting
            .trial_balance(tenant_id, date("2026-12-31"))
            .unwrap();
        let debits: i128 = report.values().map(|l| l.debit_total).sum();
        let credits: i128 = report.values().map(|l| l.credit_total).sum();
        assert_eq!(debits, credits, "trial balance saw a half-applied voucher");
    }
    writer.join().unwrap();

    let report = reporting
        .trial_balance(tenant_id, date("2026-12-31"))
        .unwrap();
    assert_eq!(report["1010"].debit_total, 20_000 * 7);
    assert_eq!(report["4000"].credit_total, 20_000 * 7);
}

#[test]
fn listing_is_restartable_and_prefix_filterable() {
    let engine = engine();
    seed_chart(&engine);
    let tenant_id = engine.tenant_id;

    engine
        .vouchers
        .post_voucher(tenant_id, two_line_draft(VoucherKind::Receipt, "1010", "4000", 100))
        .unwrap();
    engine
        .vouchers
        .post_voucher(tenant_id, two_line_draft(VoucherKind::Payment, "5000", "1010", 60))
        .unwrap();

    let receipts_filter = VoucherFilter {
        id_prefix: Some("RV-".to_string()),
        ..VoucherFilter::default()
    };
    let first = engine.vouchers.list_vouchers(tenant_id, &receipts_filter).unwrap();
    let second = engine.vouchers.list_vouchers(tenant_id, &receipts_filter).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].kind, VoucherKind::Receipt);
}
