//! End-to-end ledger scenarios through the Bank facade
//!
//! Run with: cargo test --test integration_bank

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use bank_ledger::domain::{AccountKind, AccountStatus, ClientIdentity, TransactionKind};
use bank_ledger::handlers::{
    AccountLifecycleCommand, DepositCommand, OpenAccountCommand, RecordTransactionCommand,
    RegisterClientCommand, TransferCommand, TransferHandler, WithdrawCommand,
};
use bank_ledger::store::{AccountStore, InMemoryStore, LedgerStore, Store, TransactionDirection};
use bank_ledger::{Bank, DomainError, ErrorKind, LedgerConfig};

const BIRTH_DATE: &str = "1979-06-21";

struct Ledger {
    store: InMemoryStore,
    bank: Arc<Bank>,
}

impl Ledger {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let bank = Bank::new(Arc::new(store.clone()), LedgerConfig::default());
        Self {
            store,
            bank: Arc::new(bank),
        }
    }

    async fn client(&self, name: &str, national_id: &str) -> Uuid {
        self.bank
            .create_client(RegisterClientCommand::new(
                name,
                national_id,
                NaiveDate::parse_from_str(BIRTH_DATE, "%Y-%m-%d").unwrap(),
            ))
            .await
            .unwrap()
    }

    /// Open and activate an account, then fund it with deposits below the
    /// surcharge threshold so the balance is exact
    async fn account(
        &self,
        client_id: Uuid,
        kind: AccountKind,
        owner: (&str, &str),
        balance: Decimal,
    ) -> Uuid {
        let account_id = self
            .bank
            .create_account(OpenAccountCommand::new(client_id, kind))
            .await
            .unwrap();

        self.bank
            .activate_account(AccountLifecycleCommand::new(
                account_id,
                ClientIdentity::new(owner.0, owner.1, BIRTH_DATE),
            ))
            .await
            .unwrap();

        let mut remaining = balance;
        while remaining > Decimal::ZERO {
            let chunk = remaining.min(dec!(99));
            self.bank
                .deposit(DepositCommand::new(account_id, chunk))
                .await
                .unwrap();
            remaining -= chunk;
        }

        account_id
    }

    async fn balance(&self, account_id: Uuid) -> Decimal {
        self.bank.get_account(account_id).await.unwrap().balance
    }
}

const ANA: (&str, &str) = ("Ana Prado", "101.202.303-40");
const JOAO: (&str, &str) = ("Joao Melo", "505.606.707-80");

// =========================================================================
// Scenarios
// =========================================================================

#[tokio::test]
async fn scenario_a_transfer_between_checking_accounts() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let joao = ledger.client(JOAO.0, JOAO.1).await;
    let source = ledger.account(ana, AccountKind::Checking, ANA, dec!(500)).await;
    let destination = ledger.account(joao, AccountKind::Checking, JOAO, dec!(20)).await;

    let id = ledger
        .bank
        .create_transaction(RecordTransactionCommand::new(
            TransactionKind::Ted,
            dec!(100),
            source,
            destination,
        ))
        .await
        .unwrap();

    assert_eq!(ledger.balance(source).await, dec!(400));
    assert_eq!(ledger.balance(destination).await, dec!(120));

    let transactions = ledger.bank.list_transactions().await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].id, id);
    assert_eq!(transactions[0].amount, dec!(100));
    assert_eq!(transactions[0].source_account_id, source);
    assert_eq!(transactions[0].destination_account_id, destination);
}

#[tokio::test]
async fn scenario_b_insufficient_balance() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let joao = ledger.client(JOAO.0, JOAO.1).await;
    let source = ledger.account(ana, AccountKind::Checking, ANA, dec!(50)).await;
    let destination = ledger.account(joao, AccountKind::Checking, JOAO, dec!(30)).await;

    let err = ledger
        .bank
        .transfer(TransferCommand::new(source, destination, dec!(1000)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    assert_eq!(ledger.balance(source).await, dec!(50));
    assert_eq!(ledger.balance(destination).await, dec!(30));
}

#[tokio::test]
async fn scenario_c_payroll_to_other_client() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let joao = ledger.client(JOAO.0, JOAO.1).await;
    let source = ledger.account(ana, AccountKind::Payroll, ANA, dec!(200)).await;
    let destination = ledger.account(joao, AccountKind::Checking, JOAO, dec!(0)).await;

    let err = ledger
        .bank
        .transfer(TransferCommand::new(source, destination, dec!(10)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    assert_eq!(
        err.as_domain(),
        Some(&DomainError::SameOwnerRequired {
            kind: AccountKind::Payroll
        })
    );
    assert_eq!(ledger.balance(source).await, dec!(200));
    assert_eq!(ledger.balance(destination).await, Decimal::ZERO);
}

#[tokio::test]
async fn scenario_d_deposit_surcharge() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let account = ledger.account(ana, AccountKind::Checking, ANA, dec!(0)).await;

    let result = ledger
        .bank
        .deposit(DepositCommand::new(account, dec!(150)))
        .await
        .unwrap();
    assert_eq!(result.credited, dec!(165));

    let result = ledger
        .bank
        .deposit(DepositCommand::new(account, dec!(50)))
        .await
        .unwrap();
    assert_eq!(result.credited, dec!(50));

    assert_eq!(ledger.balance(account).await, dec!(215));
}

#[tokio::test]
async fn scenario_e_payroll_withdrawal() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let account = ledger.account(ana, AccountKind::Payroll, ANA, dec!(500)).await;

    for amount in [dec!(1), dec!(500), dec!(10000)] {
        let err = ledger
            .bank
            .withdraw(WithdrawCommand::new(account, amount))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    assert_eq!(ledger.balance(account).await, dec!(500));
}

#[tokio::test]
async fn scenario_f_activation_with_wrong_identity() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let account = ledger
        .bank
        .create_account(OpenAccountCommand::new(ana, AccountKind::Digital))
        .await
        .unwrap();

    let wrong = [
        ClientIdentity::new(JOAO.0, ANA.1, BIRTH_DATE),
        ClientIdentity::new(ANA.0, JOAO.1, BIRTH_DATE),
        ClientIdentity::new(ANA.0, ANA.1, "1979-06-22"),
    ];

    for identity in wrong {
        let err = ledger
            .bank
            .activate_account(AccountLifecycleCommand::new(account, identity))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    let view = ledger.bank.get_account(account).await.unwrap();
    assert_eq!(view.status, AccountStatus::Inactive);
}

// =========================================================================
// Properties
// =========================================================================

#[tokio::test]
async fn failed_credit_leaves_source_unchanged() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let source = ledger.account(ana, AccountKind::Checking, ANA, dec!(80)).await;
    let destination = ledger.account(ana, AccountKind::Checking, ANA, dec!(0)).await;

    // Push the destination to the top of the decimal range
    let mut full = ledger.store.get_account(destination).await.unwrap().unwrap();
    full.credit(Decimal::MAX).unwrap();
    assert!(ledger.store.update_account(&full).await.unwrap());

    let err = ledger
        .bank
        .transfer(TransferCommand::new(source, destination, dec!(10)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(ledger.balance(source).await, dec!(80));
    assert_eq!(ledger.balance(destination).await, Decimal::MAX);
}

#[tokio::test]
async fn stale_commit_leaves_both_accounts_unchanged() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let joao = ledger.client(JOAO.0, JOAO.1).await;
    let source = ledger.account(ana, AccountKind::Checking, ANA, dec!(90)).await;
    let destination = ledger.account(joao, AccountKind::Checking, JOAO, dec!(0)).await;

    let shared: Arc<dyn Store> = Arc::new(ledger.store.clone());
    let engine = TransferHandler::new(shared);
    let commit = engine
        .prepare(&TransferCommand::new(source, destination, dec!(40)))
        .await
        .unwrap();

    // Someone else deposits into the destination in between
    ledger
        .bank
        .deposit(DepositCommand::new(destination, dec!(5)))
        .await
        .unwrap();

    let err = ledger.store.commit_transfer(&commit).await.unwrap_err();
    assert!(err.is_concurrency_conflict());

    assert_eq!(ledger.balance(source).await, dec!(90));
    assert_eq!(ledger.balance(destination).await, dec!(5));
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let account = ledger.account(ana, AccountKind::Savings, ANA, dec!(42)).await;

    let first = ledger.bank.get_client(ana).await.unwrap();
    let second = ledger.bank.get_client(ana).await.unwrap();
    assert_eq!(first, second);

    let first = ledger.bank.get_account(account).await.unwrap();
    let second = ledger.bank.get_account(account).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn resubmitted_transaction_is_recorded_twice() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let source = ledger.account(ana, AccountKind::Checking, ANA, dec!(60)).await;
    let destination = ledger.account(ana, AccountKind::Savings, ANA, dec!(0)).await;

    let command = RecordTransactionCommand::new(TransactionKind::Pix, dec!(20), source, destination);
    let first = ledger.bank.create_transaction(command).await.unwrap();
    let second = ledger.bank.create_transaction(command).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(ledger.balance(source).await, dec!(20));

    let history = ledger
        .bank
        .list_account_transactions(destination, TransactionDirection::AsDestination)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transfers_never_lose_updates() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let joao = ledger.client(JOAO.0, JOAO.1).await;
    let source = ledger.account(ana, AccountKind::Checking, ANA, dec!(95)).await;
    let destination = ledger.account(joao, AccountKind::Checking, JOAO, dec!(0)).await;

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let bank = ledger.bank.clone();
        tasks.push(tokio::spawn(async move {
            bank.transfer(TransferCommand::new(source, destination, dec!(10)))
                .await
        }));
    }

    let mut succeeded = 0i64;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => assert!(
                matches!(
                    e.kind(),
                    ErrorKind::PersistenceConflict | ErrorKind::InsufficientBalance
                ),
                "unexpected error: {e}"
            ),
        }
    }

    let moved = Decimal::from(succeeded * 10);
    assert!(succeeded <= 9);
    assert_eq!(ledger.balance(source).await, dec!(95) - moved);
    assert_eq!(ledger.balance(destination).await, moved);
}

#[tokio::test]
async fn client_listing_and_cascade() {
    let ledger = Ledger::new();
    let ana = ledger.client(ANA.0, ANA.1).await;
    let joao = ledger.client(JOAO.0, JOAO.1).await;
    ledger.account(ana, AccountKind::Billing, ANA, dec!(0)).await;
    ledger.account(ana, AccountKind::Digital, ANA, dec!(0)).await;
    ledger.account(joao, AccountKind::Checking, JOAO, dec!(0)).await;

    let clients = ledger.bank.list_clients().await.unwrap();
    let names: Vec<_> = clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec![ANA.0, JOAO.0]);

    let numbers: Vec<_> = ledger
        .bank
        .list_accounts()
        .await
        .unwrap()
        .iter()
        .map(|a| a.number)
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    assert!(ledger.bank.delete_client(ana).await.unwrap());
    assert!(ledger.bank.list_client_accounts(ana).await.unwrap().is_empty());
    assert_eq!(ledger.bank.list_accounts().await.unwrap().len(), 1);
}
