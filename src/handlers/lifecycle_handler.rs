//! Lifecycle Handler
//!
//! Account activation and deactivation, gated by the owning client's
//! identity.

use std::sync::Arc;

use crate::aggregate::{Account, Aggregate};
use crate::domain::{DomainError, IdentityVerifier};
use crate::error::AppResult;
use crate::store::Store;

use super::{load_account, save_account, AccountLifecycleCommand, AccountView};

/// Target state of a lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Activate,
    Deactivate,
}

/// Handler for account activation state changes
pub struct LifecycleHandler {
    store: Arc<dyn Store>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl LifecycleHandler {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Inactive -> Active
    pub async fn activate(&self, command: AccountLifecycleCommand) -> AppResult<AccountView> {
        self.execute(command, Transition::Activate).await
    }

    /// Active -> Inactive
    pub async fn deactivate(&self, command: AccountLifecycleCommand) -> AppResult<AccountView> {
        self.execute(command, Transition::Deactivate).await
    }

    async fn execute(
        &self,
        command: AccountLifecycleCommand,
        transition: Transition,
    ) -> AppResult<AccountView> {
        let mut account = load_account(self.store.as_ref(), command.account_id).await?;

        // Identity gate runs before the state check
        self.verify_owner(&account, &command).await?;

        match transition {
            Transition::Activate => account.activate()?,
            Transition::Deactivate => account.deactivate()?,
        }

        save_account(self.store.as_ref(), &account).await?;

        tracing::info!("Account {} is now {}", account.id(), account.status());
        Ok(AccountView::from(&account))
    }

    async fn verify_owner(&self, account: &Account, command: &AccountLifecycleCommand) -> AppResult<()> {
        let owner = self
            .store
            .get_client(account.client_id())
            .await?
            .ok_or(DomainError::ClientNotFound(account.client_id()))?;

        if let Err(e) = self.verifier.verify(&owner, &command.identity) {
            tracing::warn!("Identity check failed for account {}", account.id());
            return Err(e.into());
        }

        Ok(())
    }
}
