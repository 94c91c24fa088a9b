//! Client Handler
//!
//! Client registration, rename, lookup and removal.

use std::sync::Arc;

use uuid::Uuid;

use crate::aggregate::{Aggregate, Client};
use crate::domain::DomainError;
use crate::error::AppResult;
use crate::store::Store;

use super::{
    AccountView, ClientDetails, ClientView, RegisterClientCommand, RenameClientCommand,
    RenameResult,
};

/// Handler for client operations
pub struct ClientHandler {
    store: Arc<dyn Store>,
}

impl ClientHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Register a client. Fails with `PersistenceConflict` if the national
    /// id is already registered.
    pub async fn register(&self, command: RegisterClientCommand) -> AppResult<Uuid> {
        let client = Client::register(command.name, &command.national_id, command.birth_date)?;

        let client_id = self.store.add_client(&client).await?;

        tracing::info!("Client registered: {}", client_id);
        Ok(client_id)
    }

    pub async fn rename(&self, command: RenameClientCommand) -> AppResult<RenameResult> {
        let mut client = self
            .store
            .get_client(command.client_id)
            .await?
            .ok_or(DomainError::ClientNotFound(command.client_id))?;

        let changed = client.rename(command.name)?;

        if changed && !self.store.update_client(&client).await? {
            return Err(DomainError::ClientNotFound(command.client_id).into());
        }

        if changed {
            tracing::info!("Client renamed: {}", client.id());
        }

        Ok(RenameResult {
            client_id: client.id(),
            changed,
        })
    }

    /// Client with its accounts
    pub async fn get(&self, client_id: Uuid) -> AppResult<ClientDetails> {
        tracing::debug!("Loading client {}", client_id);

        let (client, accounts) = self
            .store
            .get_client_with_accounts(client_id)
            .await?
            .ok_or(DomainError::ClientNotFound(client_id))?;

        Ok(ClientDetails {
            client: ClientView::from(&client),
            accounts: accounts.iter().map(AccountView::from).collect(),
        })
    }

    pub async fn list(&self) -> AppResult<Vec<ClientView>> {
        let clients = self.store.list_clients().await?;
        Ok(clients.iter().map(ClientView::from).collect())
    }

    /// Delete a client and its accounts. Returns `false` if absent.
    pub async fn delete(&self, client_id: Uuid) -> AppResult<bool> {
        let deleted = self.store.delete_client(client_id).await?;

        if deleted {
            tracing::info!("Client deleted with its accounts: {}", client_id);
        }
        Ok(deleted)
    }
}
