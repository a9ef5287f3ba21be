//! In-memory vault for testing.
//!
//! A complete [`VaultStore`] implementation with error injection for
//! exercising failure paths, plus JSON snapshot persistence for fixtures.

use crate::item::{ItemKind, VaultItem};
use crate::record::{CardRecord, IdentityRecord, LoginRecord, NoteRecord};
use crate::store::VaultStore;
use crate::{Result, VaultpaneError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// In-memory vault.
///
/// Stores records keyed by `(kind, id)` with a monotonic id counter, and
/// supports one-shot error injection to simulate failure conditions. All
/// methods take `&self`; share the vault with `Arc` to keep a handle after
/// handing it to a coordinator.
///
/// # Example
///
/// ```
/// use vaultpane::stores::memory::MemoryVault;
/// use vaultpane::{ItemKind, LoginRecord, VaultItem, VaultStore, VaultpaneError};
///
/// #[tokio::main]
/// async fn main() -> vaultpane::Result<()> {
///     let vault = MemoryVault::new();
///     let id = vault
///         .store_item(VaultItem::Login(LoginRecord::new("example.com", "alice", "pw")))
///         .await?;
///
///     // Simulate a failing delete.
///     vault.inject_delete_error(VaultpaneError::Other(anyhow::anyhow!("disk full")));
///     assert!(vault.delete_item(ItemKind::Login, id).await.is_err());
///
///     // Injection is one-shot; the next call succeeds.
///     vault.delete_item(ItemKind::Login, id).await?;
///     Ok(())
/// }
/// ```
pub struct MemoryVault {
    state: RwLock<VaultState>,
    fetch_error: Mutex<Option<VaultpaneError>>,
    store_error: Mutex<Option<VaultpaneError>>,
    delete_error: Mutex<Option<VaultpaneError>>,
}

#[derive(Default)]
struct VaultState {
    items: BTreeMap<(ItemKind, i64), VaultItem>,
    next_id: i64,
}

impl MemoryVault {
    /// Creates an empty vault.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(VaultState {
                items: BTreeMap::new(),
                next_id: 1,
            }),
            fetch_error: Mutex::new(None),
            store_error: Mutex::new(None),
            delete_error: Mutex::new(None),
        }
    }

    /// Pre-populates the vault with an item, assigning an id when the item
    /// has none. Returns the id. Useful for test fixtures.
    pub async fn seed(&self, item: VaultItem) -> i64 {
        let mut state = self.state.write().await;
        let id = match item.vault_id() {
            Some(id) => {
                state.next_id = state.next_id.max(id + 1);
                id
            }
            None => {
                let id = state.next_id;
                state.next_id += 1;
                id
            }
        };
        let kind = item.kind();
        state.items.insert((kind, id), with_id(item, id));
        id
    }

    /// Arms a one-shot error returned by the next fetch operation.
    pub fn inject_fetch_error(&self, err: VaultpaneError) {
        *self.fetch_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(err);
    }

    /// Arms a one-shot error returned by the next store operation.
    pub fn inject_store_error(&self, err: VaultpaneError) {
        *self.store_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(err);
    }

    /// Arms a one-shot error returned by the next delete operation.
    pub fn inject_delete_error(&self, err: VaultpaneError) {
        *self.delete_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(err);
    }

    fn take_injected(&self, slot: &Mutex<Option<VaultpaneError>>) -> Option<VaultpaneError> {
        slot.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    /// Writes the vault contents to a JSON snapshot file.
    ///
    /// The file is created with mode 0600 on Unix; vault contents are
    /// sensitive even in fixture form.
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let state = self.state.read().await;
        let items: Vec<&VaultItem> = state.items.values().collect();
        let json = serde_json::to_vec_pretty(&items)?;
        drop(state);

        let path = path.as_ref();
        let mut file = fs::File::create(path).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata().await?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).await?;
        }

        file.write_all(&json).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads a vault from a JSON snapshot written by
    /// [`save_to_file`](Self::save_to_file).
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path).await?;
        let items: Vec<VaultItem> = serde_json::from_slice(&data)?;

        let vault = Self::new();
        for item in items {
            vault.seed(item).await;
        }
        Ok(vault)
    }
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamps the vault-assigned id into the record.
fn with_id(item: VaultItem, id: i64) -> VaultItem {
    match item {
        VaultItem::Login(mut r) => {
            r.id = Some(id);
            VaultItem::Login(r)
        }
        VaultItem::Card(mut r) => {
            r.id = Some(id);
            VaultItem::Card(r)
        }
        VaultItem::Identity(mut r) => {
            r.id = Some(id);
            VaultItem::Identity(r)
        }
        VaultItem::Note(mut r) => {
            r.id = Some(id);
            VaultItem::Note(r)
        }
    }
}

fn with_last_updated(item: VaultItem, now: chrono::DateTime<Utc>) -> VaultItem {
    match item {
        VaultItem::Login(mut r) => {
            r.last_updated = now;
            VaultItem::Login(r)
        }
        VaultItem::Card(mut r) => {
            r.last_updated = now;
            VaultItem::Card(r)
        }
        VaultItem::Identity(mut r) => {
            r.last_updated = now;
            VaultItem::Identity(r)
        }
        VaultItem::Note(mut r) => {
            r.last_updated = now;
            VaultItem::Note(r)
        }
    }
}

#[async_trait]
impl VaultStore for MemoryVault {
    async fn fetch_logins(&self) -> Result<Vec<LoginRecord>> {
        if let Some(err) = self.take_injected(&self.fetch_error) {
            return Err(err);
        }
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .filter_map(|item| match item {
                VaultItem::Login(r) => Some(r.clone()),
                _ => None,
            })
            .collect())
    }

    async fn fetch_cards(&self) -> Result<Vec<CardRecord>> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .filter_map(|item| match item {
                VaultItem::Card(r) => Some(r.clone()),
                _ => None,
            })
            .collect())
    }

    async fn fetch_identities(&self) -> Result<Vec<IdentityRecord>> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .filter_map(|item| match item {
                VaultItem::Identity(r) => Some(r.clone()),
                _ => None,
            })
            .collect())
    }

    async fn fetch_notes(&self) -> Result<Vec<NoteRecord>> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .filter_map(|item| match item {
                VaultItem::Note(r) => Some(r.clone()),
                _ => None,
            })
            .collect())
    }

    async fn fetch_item(&self, kind: ItemKind, id: i64) -> Result<Option<VaultItem>> {
        if let Some(err) = self.take_injected(&self.fetch_error) {
            return Err(err);
        }
        let state = self.state.read().await;
        Ok(state.items.get(&(kind, id)).cloned())
    }

    async fn store_item(&self, item: VaultItem) -> Result<i64> {
        if let Some(err) = self.take_injected(&self.store_error) {
            return Err(err);
        }

        let kind = item.kind();
        let mut state = self.state.write().await;

        let id = match item.vault_id() {
            Some(id) => {
                if !state.items.contains_key(&(kind, id)) {
                    return Err(VaultpaneError::NotFound { kind, id });
                }
                id
            }
            None => {
                if let VaultItem::Login(login) = &item {
                    let duplicate = state.items.values().any(|existing| {
                        existing
                            .login()
                            .map(|l| l.username == login.username && l.domain == login.domain)
                            .unwrap_or(false)
                    });
                    if duplicate {
                        return Err(VaultpaneError::DuplicateRecord(format!(
                            "{}@{}",
                            login.username, login.domain
                        )));
                    }
                }
                let id = state.next_id;
                state.next_id += 1;
                id
            }
        };

        let stored = with_last_updated(with_id(item, id), Utc::now());
        state.items.insert((kind, id), stored);
        Ok(id)
    }

    async fn delete_item(&self, kind: ItemKind, id: i64) -> Result<()> {
        if let Some(err) = self.take_injected(&self.delete_error) {
            return Err(err);
        }
        let mut state = self.state.write().await;
        state
            .items
            .remove(&(kind, id))
            .map(|_| ())
            .ok_or(VaultpaneError::NotFound { kind, id })
    }

    async fn has_login_for(&self, username: &str, domain: &str) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.items.values().any(|item| {
            item.login()
                .map(|l| l.username == username && l.domain == domain)
                .unwrap_or(false)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(domain: &str, username: &str) -> VaultItem {
        VaultItem::Login(LoginRecord::new(domain, username, "pw"))
    }

    #[tokio::test]
    async fn test_store_assigns_ids() {
        let vault = MemoryVault::new();

        let first = vault.store_item(login("a.com", "alice")).await.unwrap();
        let second = vault.store_item(login("b.com", "bob")).await.unwrap();
        assert_ne!(first, second);

        let fetched = vault.fetch_item(ItemKind::Login, first).await.unwrap().unwrap();
        assert_eq!(fetched.vault_id(), Some(first));
    }

    #[tokio::test]
    async fn test_store_update_requires_existing_id() {
        let vault = MemoryVault::new();
        let mut record = LoginRecord::new("a.com", "alice", "pw");
        record.id = Some(99);

        let result = vault.store_item(VaultItem::Login(record)).await;
        assert!(matches!(result, Err(VaultpaneError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_login_rejected_on_create() {
        let vault = MemoryVault::new();
        vault.store_item(login("a.com", "alice")).await.unwrap();

        let result = vault.store_item(login("a.com", "alice")).await;
        assert!(matches!(result, Err(VaultpaneError::DuplicateRecord(_))));

        // Same username at a different domain is fine.
        vault.store_item(login("b.com", "alice")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_bumps_last_updated() {
        let vault = MemoryVault::new();
        let id = vault.store_item(login("a.com", "alice")).await.unwrap();

        let mut updated = match vault.fetch_item(ItemKind::Login, id).await.unwrap().unwrap() {
            VaultItem::Login(r) => r,
            _ => unreachable!(),
        };
        let before = updated.last_updated;
        updated.password = "changed".to_string();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let stored_id = vault.store_item(VaultItem::Login(updated)).await.unwrap();
        assert_eq!(stored_id, id);

        let fresh = vault.fetch_item(ItemKind::Login, id).await.unwrap().unwrap();
        assert!(fresh.last_updated() > before);
    }

    #[tokio::test]
    async fn test_delete() {
        let vault = MemoryVault::new();
        let id = vault.store_item(login("a.com", "alice")).await.unwrap();

        vault.delete_item(ItemKind::Login, id).await.unwrap();
        assert!(vault.fetch_item(ItemKind::Login, id).await.unwrap().is_none());

        let result = vault.delete_item(ItemKind::Login, id).await;
        assert!(matches!(result, Err(VaultpaneError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_all_covers_every_kind() {
        let vault = MemoryVault::new();
        vault.seed(login("a.com", "alice")).await;
        vault.seed(VaultItem::Card(CardRecord::new("Visa", "4111111111114242"))).await;
        vault.seed(VaultItem::Identity(IdentityRecord::new("Me", "Ada", "Lovelace"))).await;
        vault.seed(VaultItem::Note(NoteRecord::new("hello"))).await;

        let all = vault.fetch_all().await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let vault = MemoryVault::new();
        let id = vault.seed(login("a.com", "alice")).await;

        vault.inject_fetch_error(VaultpaneError::Other(anyhow::anyhow!("boom")));
        assert!(vault.fetch_item(ItemKind::Login, id).await.is_err());
        assert!(vault.fetch_item(ItemKind::Login, id).await.is_ok());
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");

        let vault = MemoryVault::new();
        vault.seed(login("a.com", "alice")).await;
        vault.seed(VaultItem::Note(NoteRecord::new("remember"))).await;
        vault.save_to_file(&path).await.unwrap();

        let restored = MemoryVault::load_from_file(&path).await.unwrap();
        let all = restored.fetch_all().await.unwrap();
        assert_eq!(all.len(), 2);

        // New ids continue past the snapshot's highest.
        let next = restored.store_item(login("c.com", "carol")).await.unwrap();
        assert!(next > 2);
    }
}
