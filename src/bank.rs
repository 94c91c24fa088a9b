//! Bank facade
//!
//! Single entry point for a request-handling layer. Owns one handler per
//! operation group over a shared store.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::domain::{IdentityVerifier, RegistrationDataVerifier};
use crate::error::AppResult;
use crate::handlers::{
    AccountHandler, AccountLifecycleCommand, AccountView, ClientDetails, ClientHandler,
    ClientView, DepositCommand, DepositHandler, DepositResult, LifecycleHandler,
    OpenAccountCommand, RecordTransactionCommand, RegisterClientCommand, RenameClientCommand,
    RenameResult, TransactionDetails, TransactionHandler, TransactionView, TransferCommand,
    TransferHandler, TransferResult, WithdrawCommand, WithdrawHandler, WithdrawResult,
};
use crate::store::{Store, TransactionDirection};

pub struct Bank {
    clients: ClientHandler,
    accounts: AccountHandler,
    lifecycle: LifecycleHandler,
    deposits: DepositHandler,
    withdrawals: WithdrawHandler,
    transfers: TransferHandler,
    transactions: TransactionHandler,
}

impl Bank {
    /// Bank with the registration-data identity check
    pub fn new(store: Arc<dyn Store>, ledger: LedgerConfig) -> Self {
        Self::with_verifier(store, ledger, Arc::new(RegistrationDataVerifier))
    }

    pub fn with_verifier(
        store: Arc<dyn Store>,
        ledger: LedgerConfig,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        Self {
            clients: ClientHandler::new(store.clone()),
            accounts: AccountHandler::new(store.clone()),
            lifecycle: LifecycleHandler::new(store.clone(), verifier),
            deposits: DepositHandler::new(store.clone(), ledger),
            withdrawals: WithdrawHandler::new(store.clone()),
            transfers: TransferHandler::new(store.clone()),
            transactions: TransactionHandler::new(store),
        }
    }

    // =========================================================================
    // Clients
    // =========================================================================

    pub async fn list_clients(&self) -> AppResult<Vec<ClientView>> {
        self.clients.list().await
    }

    pub async fn get_client(&self, client_id: Uuid) -> AppResult<ClientDetails> {
        self.clients.get(client_id).await
    }

    pub async fn create_client(&self, command: RegisterClientCommand) -> AppResult<Uuid> {
        self.clients.register(command).await
    }

    pub async fn rename_client(&self, command: RenameClientCommand) -> AppResult<RenameResult> {
        self.clients.rename(command).await
    }

    pub async fn delete_client(&self, client_id: Uuid) -> AppResult<bool> {
        self.clients.delete(client_id).await
    }

    pub async fn list_client_accounts(&self, client_id: Uuid) -> AppResult<Vec<AccountView>> {
        self.accounts.list_for_client(client_id).await
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub async fn list_accounts(&self) -> AppResult<Vec<AccountView>> {
        self.accounts.list().await
    }

    pub async fn get_account(&self, account_id: Uuid) -> AppResult<AccountView> {
        self.accounts.get(account_id).await
    }

    pub async fn create_account(&self, command: OpenAccountCommand) -> AppResult<Uuid> {
        self.accounts.open(command).await
    }

    pub async fn delete_account(&self, account_id: Uuid) -> AppResult<bool> {
        self.accounts.delete(account_id).await
    }

    pub async fn activate_account(&self, command: AccountLifecycleCommand) -> AppResult<AccountView> {
        self.lifecycle.activate(command).await
    }

    pub async fn deactivate_account(
        &self,
        command: AccountLifecycleCommand,
    ) -> AppResult<AccountView> {
        self.lifecycle.deactivate(command).await
    }

    pub async fn deposit(&self, command: DepositCommand) -> AppResult<DepositResult> {
        self.deposits.execute(command).await
    }

    pub async fn withdraw(&self, command: WithdrawCommand) -> AppResult<WithdrawResult> {
        self.withdrawals.execute(command).await
    }

    /// Move funds without recording a transaction
    pub async fn transfer(&self, command: TransferCommand) -> AppResult<TransferResult> {
        self.transfers.execute(command).await
    }

    pub async fn list_account_transactions(
        &self,
        account_id: Uuid,
        direction: TransactionDirection,
    ) -> AppResult<Vec<TransactionView>> {
        self.accounts.transactions(account_id, direction).await
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    pub async fn list_transactions(&self) -> AppResult<Vec<TransactionView>> {
        self.transactions.list().await
    }

    pub async fn get_transaction(&self, transaction_id: Uuid) -> AppResult<TransactionDetails> {
        self.transactions.get(transaction_id).await
    }

    /// Move funds through the transfer engine and record the movement
    pub async fn create_transaction(&self, command: RecordTransactionCommand) -> AppResult<Uuid> {
        self.transactions.record(command).await
    }

    pub async fn delete_transaction(&self, transaction_id: Uuid) -> AppResult<bool> {
        self.transactions.delete(transaction_id).await
    }
}
