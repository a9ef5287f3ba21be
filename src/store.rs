//! Vault collaborator trait.
//!
//! This module defines the [`VaultStore`] trait the coordinator talks to.
//! The vault is an externally-owned record store: the coordination core
//! never sees its storage or crypto, only fetch/store/delete round-trips
//! that may fail.

use crate::item::{ItemKind, VaultItem};
use crate::record::{CardRecord, IdentityRecord, LoginRecord, NoteRecord};
use crate::Result;
use async_trait::async_trait;

/// A secure vault exposing typed record CRUD.
///
/// All implementations must be `Send + Sync` to support concurrent access
/// across async tasks. I/O may run on a background executor; the models the
/// coordinator mutates with the results are single-writer and must only be
/// touched from the coordinating task.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vaultpane::stores::memory::MemoryVault;
/// use vaultpane::{LoginRecord, VaultItem, VaultStore};
///
/// #[tokio::main]
/// async fn main() -> vaultpane::Result<()> {
///     let vault = Arc::new(MemoryVault::new());
///
///     let login = LoginRecord::new("example.com", "alice", "hunter2");
///     let id = vault.store_item(VaultItem::Login(login)).await?;
///
///     let fetched = vault.fetch_item(vaultpane::ItemKind::Login, id).await?;
///     assert!(fetched.is_some());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait VaultStore: Send + Sync {
    // ========================================================================
    // Fetching
    // ========================================================================

    /// Fetches every login in the vault.
    async fn fetch_logins(&self) -> Result<Vec<LoginRecord>>;

    /// Fetches every payment card in the vault.
    async fn fetch_cards(&self) -> Result<Vec<CardRecord>>;

    /// Fetches every identity in the vault.
    async fn fetch_identities(&self) -> Result<Vec<IdentityRecord>>;

    /// Fetches every note in the vault.
    async fn fetch_notes(&self) -> Result<Vec<NoteRecord>>;

    /// Fetches the authoritative record for `(kind, id)`.
    ///
    /// Returns `Ok(None)` when the record no longer exists (e.g. it was
    /// deleted concurrently from another surface). Callers must treat that
    /// as stale selection, not as an error.
    async fn fetch_item(&self, kind: ItemKind, id: i64) -> Result<Option<VaultItem>>;

    /// Fetches the whole vault as one item collection.
    async fn fetch_all(&self) -> Result<Vec<VaultItem>> {
        let mut items: Vec<VaultItem> = Vec::new();
        items.extend(self.fetch_logins().await?.into_iter().map(VaultItem::Login));
        items.extend(self.fetch_cards().await?.into_iter().map(VaultItem::Card));
        items.extend(self.fetch_identities().await?.into_iter().map(VaultItem::Identity));
        items.extend(self.fetch_notes().await?.into_iter().map(VaultItem::Note));
        Ok(items)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Stores a record, returning its vault id.
    ///
    /// A record with `id: None` is created and assigned a fresh id; a record
    /// with an id replaces the existing one.
    ///
    /// # Errors
    ///
    /// - [`VaultpaneError::DuplicateRecord`](crate::VaultpaneError::DuplicateRecord):
    ///   a create collides with an existing record's uniqueness constraint
    /// - [`VaultpaneError::NotFound`](crate::VaultpaneError::NotFound):
    ///   an update names an id that does not exist
    async fn store_item(&self, item: VaultItem) -> Result<i64>;

    /// Deletes the record at `(kind, id)`.
    ///
    /// # Errors
    ///
    /// - [`VaultpaneError::NotFound`](crate::VaultpaneError::NotFound):
    ///   the record does not exist
    async fn delete_item(&self, kind: ItemKind, id: i64) -> Result<()>;

    // ========================================================================
    // Constraints
    // ========================================================================

    /// Whether a login already exists for `username` at `domain`. Used to
    /// detect duplicates before creating a new login.
    async fn has_login_for(&self, username: &str, domain: &str) -> Result<bool>;
}

#[async_trait]
impl<T: VaultStore + ?Sized> VaultStore for std::sync::Arc<T> {
    async fn fetch_logins(&self) -> Result<Vec<LoginRecord>> {
        (**self).fetch_logins().await
    }

    async fn fetch_cards(&self) -> Result<Vec<CardRecord>> {
        (**self).fetch_cards().await
    }

    async fn fetch_identities(&self) -> Result<Vec<IdentityRecord>> {
        (**self).fetch_identities().await
    }

    async fn fetch_notes(&self) -> Result<Vec<NoteRecord>> {
        (**self).fetch_notes().await
    }

    async fn fetch_item(&self, kind: ItemKind, id: i64) -> Result<Option<VaultItem>> {
        (**self).fetch_item(kind, id).await
    }

    async fn fetch_all(&self) -> Result<Vec<VaultItem>> {
        (**self).fetch_all().await
    }

    async fn store_item(&self, item: VaultItem) -> Result<i64> {
        (**self).store_item(item).await
    }

    async fn delete_item(&self, kind: ItemKind, id: i64) -> Result<()> {
        (**self).delete_item(kind, id).await
    }

    async fn has_login_for(&self, username: &str, domain: &str) -> Result<bool> {
        (**self).has_login_for(username, domain).await
    }
}
