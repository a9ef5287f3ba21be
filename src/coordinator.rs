//! Mediation between list selection and edit-model lifecycle.
//!
//! The [`Coordinator`] is the only component that talks to the vault
//! collaborator and the only one that enforces the unsaved-changes guard
//! when the selection moves. Every entry point takes `&mut self`, so a
//! confirmation flow always resolves fully before the next one starts;
//! the models underneath are single-writer by construction.

use crate::config::Config;
use crate::confirm::{ConfirmationPresenter, SaveChangesOutcome};
use crate::edit::ItemEditor;
use crate::item::{ItemKind, VaultItem};
use crate::list::{ItemListModel, SelectionCallback};
use crate::sorting::{Category, SortDescriptor};
use crate::store::VaultStore;
use crate::validation::validate_item;
use crate::{Result, VaultpaneError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Change-broadcast hook fired after every successful mutation. The payload
/// is whether unsaved changes remain.
pub type ChangeCallback = Box<dyn FnMut(bool) + Send>;

/// Coordinates the item list, the open edit model, and the vault.
pub struct Coordinator {
    store: Arc<dyn VaultStore>,
    presenter: Box<dyn ConfirmationPresenter>,
    config: Config,
    list: ItemListModel,
    editor: Option<ItemEditor>,
    on_change: Option<ChangeCallback>,
}

impl Coordinator {
    /// Creates a coordinator over the given vault and presenter.
    pub fn new(
        store: Arc<dyn VaultStore>,
        presenter: Box<dyn ConfirmationPresenter>,
        config: Config,
    ) -> Self {
        let mut list = ItemListModel::new();
        list.set_sort_descriptor(config.default_sort);

        Self {
            store,
            presenter,
            config,
            list,
            editor: None,
            on_change: None,
        }
    }

    /// Read access to the list model.
    pub fn list(&self) -> &ItemListModel {
        &self.list
    }

    /// The open edit model, if an item is loaded or being created.
    pub fn editor(&self) -> Option<&ItemEditor> {
        self.editor.as_ref()
    }

    /// Mutable access to the open edit model, for field edits.
    pub fn editor_mut(&mut self) -> Option<&mut ItemEditor> {
        self.editor.as_mut()
    }

    /// Whether the open edit buffer has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.editor.as_ref().map(ItemEditor::is_dirty).unwrap_or(false)
    }

    /// Registers the change-broadcast hook.
    pub fn set_on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    /// Registers the list selection observer.
    pub fn set_on_selection_changed(&mut self, callback: SelectionCallback) {
        self.list.set_on_selection_changed(callback);
    }

    /// Refetches the whole vault into the list model.
    ///
    /// Callable from any lifecycle trigger the hosting environment defines
    /// (appearance, external data change, sync completion). When no edit is
    /// dirty, the current selection is re-loaded from the vault, or the
    /// first row is selected.
    pub async fn refresh(&mut self) -> Result<()> {
        let items = self.store.fetch_all().await?;
        debug!(count = items.len(), "refreshed vault items");
        self.list.update_items(items);

        if self.is_dirty() {
            // Unsaved edits stay open; the list catches up underneath them.
            self.post_change();
            return Ok(());
        }

        match self.list.selected().cloned() {
            Some(selected) => self.load_item(Some(selected)).await?,
            None => {
                self.editor = None;
                if self.config.auto_select_first {
                    let first = self.list.first_displayed();
                    self.load_item(first).await?;
                }
            }
        }

        self.post_change();
        Ok(())
    }

    /// Requests a selection change, routing through the unsaved-changes
    /// guard when the open edit is dirty.
    ///
    /// Selecting the already-selected item is a no-op and never prompts.
    pub async fn select(&mut self, item: Option<VaultItem>) -> Result<()> {
        if item.as_ref() == self.list.selected() {
            return Ok(());
        }

        if self.is_dirty() && !self.resolve_dirty_edit().await? {
            return Ok(());
        }

        self.load_item(item).await
    }

    /// Selects the first login matching `domain`, or the first displayed
    /// item. Used when the panel opens from a page context.
    pub async fn select_login_with_domain_or_first(&mut self, domain: &str) -> Result<()> {
        let target = self
            .list
            .displayed_sections()
            .into_iter()
            .flat_map(|section| section.items)
            .find(|item| item.login().map(|login| login.domain == domain).unwrap_or(false))
            .or_else(|| self.list.first_displayed());

        self.select(target).await
    }

    /// Sets the filter, selecting the first match when configured to and no
    /// edit is dirty.
    pub async fn set_filter(&mut self, text: &str) -> Result<()> {
        let filter: String = text.trim().chars().take(self.config.max_filter_length).collect();
        if filter == self.list.filter() {
            return Ok(());
        }
        self.list.set_filter(filter);

        if self.config.auto_select_first && !self.is_dirty() {
            let first = self.list.first_displayed();
            self.load_item(first).await?;
        }
        Ok(())
    }

    /// Replaces the sort descriptor. Ignored while an edit is dirty, since
    /// re-sorting would move or hide the row being edited.
    pub async fn set_sort_descriptor(&mut self, descriptor: SortDescriptor) -> Result<()> {
        if self.is_dirty() {
            debug!("sort change ignored while edits are unsaved");
            return Ok(());
        }
        if descriptor == self.list.sort_descriptor() {
            return Ok(());
        }
        self.list.set_sort_descriptor(descriptor);

        if self.config.auto_select_first {
            let first = self.list.first_displayed();
            self.load_item(first).await?;
        }
        Ok(())
    }

    /// Switches the active category, keeping the sort parameter and order.
    pub async fn select_category(&mut self, category: Category) -> Result<()> {
        let descriptor = self.list.sort_descriptor().with_category(category);
        self.set_sort_descriptor(descriptor).await
    }

    /// Starts a create session for `kind`, routing through the
    /// unsaved-changes guard first.
    pub async fn create_new(&mut self, kind: ItemKind) -> Result<()> {
        if self.is_dirty() && !self.resolve_dirty_edit().await? {
            return Ok(());
        }

        debug!(%kind, "starting create session");
        let mut editor = ItemEditor::new_for(kind);
        editor.create_new();
        self.editor = Some(editor);
        self.list.clear_selection();
        Ok(())
    }

    /// Persists the pending edit.
    ///
    /// On a duplicate-record collision the presenter is notified, the edit
    /// buffer is left untouched (still dirty), and the error is returned.
    /// Any other vault failure likewise preserves the buffer for retry.
    pub async fn save(&mut self) -> Result<()> {
        match self.persist_pending().await {
            Ok(_) => Ok(()),
            Err(err) if err.is_duplicate() => {
                self.presenter.notify_duplicate().await;
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "save failed; edit buffer preserved");
                Err(err)
            }
        }
    }

    /// Asks for delete confirmation and, on confirm, deletes the open item
    /// and refetches the list.
    pub async fn request_delete(&mut self) -> Result<()> {
        let (kind, id) = match &self.editor {
            Some(editor) if !editor.is_new() => match editor.record_id() {
                Some(id) => (editor.kind(), id),
                None => return Err(VaultpaneError::NoPendingEdit),
            },
            _ => return Err(VaultpaneError::NoPendingEdit),
        };

        if !self.presenter.confirm_delete(kind).await {
            return Ok(());
        }

        self.store.delete_item(kind, id).await.map_err(|err| {
            warn!(%kind, id, error = %err, "delete failed; state unchanged");
            VaultpaneError::store_op("delete", kind, err)
        })?;

        debug!(%kind, id, "deleted item");
        self.editor = None;
        self.list.clear_selection();
        self.refresh().await
    }

    /// Resets both models. Used when the containing surface closes or the
    /// vault context changes (lock, account switch).
    pub fn clear(&mut self) {
        self.list.clear();
        self.editor = None;
    }

    /// Resolves a dirty edit through the three-way confirmation.
    ///
    /// Returns true when the interrupted action should proceed. On Cancel,
    /// or on a duplicate-record save failure, the current selection is
    /// re-asserted silently so the guard does not re-trigger, and false is
    /// returned.
    async fn resolve_dirty_edit(&mut self) -> Result<bool> {
        match self.presenter.unsaved_changes().await {
            SaveChangesOutcome::Save => match self.persist_pending().await {
                Ok(_) => Ok(true),
                Err(err) if err.is_duplicate() => {
                    self.presenter.notify_duplicate().await;
                    self.reassert_selection();
                    Ok(false)
                }
                Err(err) => {
                    warn!(error = %err, "save failed; edit buffer preserved");
                    Err(err)
                }
            },
            SaveChangesOutcome::Discard => {
                if let Some(editor) = &mut self.editor {
                    editor.cancel();
                }
                self.post_change();
                Ok(true)
            }
            SaveChangesOutcome::Cancel => {
                self.reassert_selection();
                Ok(false)
            }
        }
    }

    /// Re-selects the current item without notifying, so an aborted
    /// selection change cannot loop back into the confirmation flow.
    fn reassert_selection(&mut self) {
        let current = self.list.selected().cloned();
        self.list.select(current, false);
    }

    /// Loads `item` as the open edit model, fetching the authoritative
    /// record from the vault rather than trusting the list's copy.
    async fn load_item(&mut self, item: Option<VaultItem>) -> Result<()> {
        let (kind, id) = match item.as_ref().and_then(VaultItem::item_id) {
            Some(item_id) => (item_id.kind, item_id.id),
            None => {
                self.editor = None;
                self.list.select(None, true);
                return Ok(());
            }
        };

        match self.store.fetch_item(kind, id).await {
            Ok(Some(fresh)) => {
                debug!(%kind, id, "loaded item");
                let mut editor = ItemEditor::new_for(kind);
                editor.set_item(fresh.clone());
                self.editor = Some(editor);
                self.list.select(Some(fresh), true);
                Ok(())
            }
            Ok(None) => {
                // Deleted out from under us (another window, sync). Fail
                // safe: drop the selection and catch the list up.
                warn!(%kind, id, "selected item no longer in vault; refreshing");
                self.editor = None;
                self.list.clear_selection();
                let items = self.store.fetch_all().await?;
                self.list.update_items(items);
                Ok(())
            }
            Err(err) => {
                warn!(%kind, id, error = %err, "failed to load item");
                Err(VaultpaneError::store_op("fetch", kind, err))
            }
        }
    }

    /// Validates and stores the pending payload, then mirrors the vault's
    /// canonical record into both models. Returns the canonical record.
    async fn persist_pending(&mut self) -> Result<VaultItem> {
        let payload = self
            .editor
            .as_ref()
            .and_then(ItemEditor::pending_item)
            .ok_or(VaultpaneError::NoPendingEdit)?;

        validate_item(&payload)?;

        let kind = payload.kind();
        let is_new = payload.vault_id().is_none();

        if is_new {
            if let Some(login) = payload.login() {
                if self.store.has_login_for(&login.username, &login.domain).await? {
                    return Err(VaultpaneError::DuplicateRecord(format!(
                        "{}@{}",
                        login.username, login.domain
                    )));
                }
            }
        }

        let id = self
            .store
            .store_item(payload)
            .await
            .map_err(|err| VaultpaneError::store_op("store", kind, err))?;

        let fresh = self
            .store
            .fetch_item(kind, id)
            .await
            .map_err(|err| VaultpaneError::store_op("fetch", kind, err))?
            .ok_or(VaultpaneError::NotFound { kind, id })?;

        if let Some(editor) = &mut self.editor {
            editor.commit_item(fresh.clone());
        }
        self.list.update_item(fresh.clone());
        if is_new {
            // Make the new row visibly selected; silent so the guard (now
            // clean anyway) is not re-entered.
            self.list.select(Some(fresh.clone()), false);
        }

        debug!(%kind, id, is_new, "persisted item");
        self.post_change();
        Ok(fresh)
    }

    fn post_change(&mut self) {
        let dirty = self.is_dirty();
        if let Some(callback) = &mut self.on_change {
            callback(dirty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::ScriptedPresenter;
    use crate::record::LoginRecord;
    use crate::stores::memory::MemoryVault;

    async fn seeded() -> (Coordinator, Arc<MemoryVault>, ScriptedPresenter) {
        let vault = Arc::new(MemoryVault::new());
        vault
            .seed(VaultItem::Login(LoginRecord::new("a.com", "alice", "pw")))
            .await;
        vault
            .seed(VaultItem::Login(LoginRecord::new("b.com", "bob", "pw")))
            .await;

        let presenter = ScriptedPresenter::new();
        let coordinator = Coordinator::new(
            vault.clone(),
            Box::new(presenter.clone()),
            Config::new().with_auto_select_first(false),
        );
        (coordinator, vault, presenter)
    }

    fn item_with_id(coordinator: &Coordinator, id: i64) -> VaultItem {
        coordinator
            .list()
            .items()
            .iter()
            .find(|item| item.vault_id() == Some(id))
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_select_loads_editor() {
        let (mut coordinator, _vault, _presenter) = seeded().await;
        coordinator.refresh().await.unwrap();

        let item = item_with_id(&coordinator, 1);
        coordinator.select(Some(item)).await.unwrap();

        assert_eq!(coordinator.list().selected().unwrap().vault_id(), Some(1));
        let editor = coordinator.editor().unwrap();
        assert_eq!(editor.kind(), ItemKind::Login);
        assert_eq!(editor.record_id(), Some(1));
        assert!(!editor.is_dirty());
    }

    #[tokio::test]
    async fn test_reselecting_same_item_never_prompts() {
        let (mut coordinator, _vault, presenter) = seeded().await;
        coordinator.refresh().await.unwrap();

        let item = item_with_id(&coordinator, 1);
        coordinator.select(Some(item.clone())).await.unwrap();

        // Dirty the buffer, then re-select the same item.
        coordinator
            .editor_mut()
            .unwrap()
            .as_login_mut()
            .unwrap()
            .update(|r| r.password = "changed".to_string());
        assert!(coordinator.is_dirty());

        coordinator.select(Some(item)).await.unwrap();
        assert_eq!(presenter.unsaved_prompts(), 0);
        assert!(coordinator.is_dirty()); // edits untouched
    }

    #[tokio::test]
    async fn test_clean_selection_change_skips_prompt() {
        let (mut coordinator, _vault, presenter) = seeded().await;
        coordinator.refresh().await.unwrap();

        coordinator.select(Some(item_with_id(&coordinator, 1))).await.unwrap();
        coordinator.select(Some(item_with_id(&coordinator, 2))).await.unwrap();

        assert_eq!(presenter.unsaved_prompts(), 0);
        assert_eq!(coordinator.list().selected().unwrap().vault_id(), Some(2));
    }

    #[tokio::test]
    async fn test_discard_then_proceed() {
        let (mut coordinator, _vault, presenter) = seeded().await;
        coordinator.refresh().await.unwrap();

        coordinator.select(Some(item_with_id(&coordinator, 1))).await.unwrap();
        coordinator
            .editor_mut()
            .unwrap()
            .as_login_mut()
            .unwrap()
            .update(|r| r.password = "changed".to_string());

        presenter.push_unsaved_answer(SaveChangesOutcome::Discard);
        coordinator.select(Some(item_with_id(&coordinator, 2))).await.unwrap();

        assert_eq!(presenter.unsaved_prompts(), 1);
        assert_eq!(coordinator.list().selected().unwrap().vault_id(), Some(2));
        assert!(!coordinator.is_dirty());
    }

    #[tokio::test]
    async fn test_save_then_proceed_persists() {
        let (mut coordinator, vault, presenter) = seeded().await;
        coordinator.refresh().await.unwrap();

        coordinator.select(Some(item_with_id(&coordinator, 1))).await.unwrap();
        coordinator
            .editor_mut()
            .unwrap()
            .as_login_mut()
            .unwrap()
            .update(|r| r.password = "rotated".to_string());

        presenter.push_unsaved_answer(SaveChangesOutcome::Save);
        coordinator.select(Some(item_with_id(&coordinator, 2))).await.unwrap();

        assert_eq!(coordinator.list().selected().unwrap().vault_id(), Some(2));
        let stored = vault.fetch_item(ItemKind::Login, 1).await.unwrap().unwrap();
        assert_eq!(stored.login().unwrap().password, "rotated");
    }

    #[tokio::test]
    async fn test_create_new_clears_selection() {
        let (mut coordinator, _vault, _presenter) = seeded().await;
        coordinator.refresh().await.unwrap();
        coordinator.select(Some(item_with_id(&coordinator, 1))).await.unwrap();

        coordinator.create_new(ItemKind::Card).await.unwrap();

        assert!(coordinator.list().selected().is_none());
        let editor = coordinator.editor().unwrap();
        assert_eq!(editor.kind(), ItemKind::Card);
        assert!(editor.is_new());
        assert!(!editor.is_dirty());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (mut coordinator, vault, presenter) = seeded().await;
        coordinator.refresh().await.unwrap();
        coordinator.select(Some(item_with_id(&coordinator, 1))).await.unwrap();

        // Declined: nothing happens.
        coordinator.request_delete().await.unwrap();
        assert!(vault.fetch_item(ItemKind::Login, 1).await.unwrap().is_some());

        presenter.push_delete_answer(true);
        coordinator.request_delete().await.unwrap();

        assert!(vault.fetch_item(ItemKind::Login, 1).await.unwrap().is_none());
        assert!(coordinator.editor().is_none());
        assert_eq!(coordinator.list().items().len(), 1);
        assert_eq!(presenter.delete_prompts(), vec![ItemKind::Login, ItemKind::Login]);
    }

    #[tokio::test]
    async fn test_sort_change_ignored_while_dirty() {
        let (mut coordinator, _vault, _presenter) = seeded().await;
        coordinator.refresh().await.unwrap();
        coordinator.select(Some(item_with_id(&coordinator, 1))).await.unwrap();
        coordinator
            .editor_mut()
            .unwrap()
            .as_login_mut()
            .unwrap()
            .update(|r| r.password = "changed".to_string());

        coordinator.select_category(Category::Cards).await.unwrap();
        assert_eq!(coordinator.list().sort_descriptor().category, Category::AllItems);
    }

    #[tokio::test]
    async fn test_change_hook_reports_dirty_payload() {
        use std::sync::Mutex;

        let (mut coordinator, _vault, _presenter) = seeded().await;
        let events: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        coordinator.set_on_change(Box::new(move |dirty| sink.lock().unwrap().push(dirty)));

        coordinator.refresh().await.unwrap();
        coordinator.select(Some(item_with_id(&coordinator, 1))).await.unwrap();
        coordinator
            .editor_mut()
            .unwrap()
            .as_login_mut()
            .unwrap()
            .update(|r| r.password = "changed".to_string());
        coordinator.save().await.unwrap();

        let events = events.lock().unwrap();
        // refresh fires once, save fires once; both report a clean buffer.
        assert_eq!(*events, vec![false, false]);
    }
}
