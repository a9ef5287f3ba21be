//! The filtered, sorted, grouped list of vault items and its selection cursor.
//!
//! [`ItemListModel`] owns the backing collection mirrored from the vault and
//! the single-selection pointer. The displayed sections are a pure projection
//! of `(items, filter, sort descriptor)`; none of the operations here touch
//! the vault or fail.

use crate::item::VaultItem;
use crate::sorting::{Category, SortDescriptor, SortOrder, SortParameter};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Callback fired when the selection changes, with the old and new values.
pub type SelectionCallback = Box<dyn FnMut(Option<&VaultItem>, Option<&VaultItem>) + Send>;

/// A contiguous group of displayed items under one section header.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSection {
    /// Section header text
    pub title: String,
    /// Items in display order
    pub items: Vec<VaultItem>,
}

/// What the list should show when the projection is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing special; the list has content (or is mid-load)
    None,
    /// The vault holds no items of any kind
    NoData,
    /// The logins category is empty
    Logins,
    /// The identities category is empty
    Identities,
    /// The cards category is empty
    Cards,
}

/// Holds the item collection, filter, sort descriptor, and selection.
#[derive(Default)]
pub struct ItemListModel {
    items: Vec<VaultItem>,
    filter: String,
    sort_descriptor: SortDescriptor,
    selected: Option<VaultItem>,
    on_selection_changed: Option<SelectionCallback>,
}

impl ItemListModel {
    /// Creates an empty list model with the default sort descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the selection-changed callback.
    ///
    /// The callback observes selection changes made with `notify: true`; it
    /// must not re-enter the model.
    pub fn set_on_selection_changed(&mut self, callback: SelectionCallback) {
        self.on_selection_changed = Some(callback);
    }

    /// The unfiltered backing collection, in insertion order.
    pub fn items(&self) -> &[VaultItem] {
        &self.items
    }

    /// The current filter string.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Sets the filter string. The displayed projection reflects it on the
    /// next [`displayed_sections`](Self::displayed_sections) call.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// The active sort descriptor.
    pub fn sort_descriptor(&self) -> SortDescriptor {
        self.sort_descriptor
    }

    /// Replaces the sort descriptor.
    pub fn set_sort_descriptor(&mut self, descriptor: SortDescriptor) {
        self.sort_descriptor = descriptor;
    }

    /// The currently selected item, if any.
    pub fn selected(&self) -> Option<&VaultItem> {
        self.selected.as_ref()
    }

    /// Sets the selection.
    ///
    /// Selecting an item outside the active category swaps the descriptor to
    /// that item's category first, so the selection is actually visible.
    /// When `notify` is true the registered callback fires with the old and
    /// new values; silent selection is used to restore a previous selection
    /// without re-triggering the unsaved-changes flow.
    pub fn select(&mut self, item: Option<VaultItem>, notify: bool) {
        if let Some(item) = &item {
            if self.sort_descriptor.category != Category::AllItems
                && !item.matches_category(self.sort_descriptor.category)
            {
                self.sort_descriptor = self.sort_descriptor.with_category(item.category());
            }
        }

        let previous = self.selected.take();
        self.selected = item;

        if notify {
            if let Some(callback) = &mut self.on_selection_changed {
                callback(previous.as_ref(), self.selected.as_ref());
            }
        }
    }

    /// Clears the selection without notifying. The caller is responsible for
    /// having already resolved any dirty edit state.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Selects the first displayed item, or clears the selection when the
    /// projection is empty.
    pub fn select_first(&mut self, notify: bool) {
        let first = self.first_displayed();
        self.select(first, notify);
    }

    /// Selects the first login whose domain matches, falling back to the
    /// first displayed item. Used when the panel opens from a page context.
    pub fn select_login_with_domain_or_first(&mut self, domain: &str, notify: bool) {
        let matching = self.displayed_sections().into_iter().flat_map(|s| s.items).find(|item| {
            item.login().map(|login| login.domain == domain).unwrap_or(false)
        });

        match matching {
            Some(item) => self.select(Some(item), notify),
            None => self.select_first(notify),
        }
    }

    /// First item of the first displayed section.
    pub fn first_displayed(&self) -> Option<VaultItem> {
        self.displayed_sections()
            .into_iter()
            .next()
            .and_then(|section| section.items.into_iter().next())
    }

    /// Replaces the backing collection wholesale (used after any full fetch).
    ///
    /// The selection is kept if the selected item's `(kind, id)` is still
    /// present (refreshed to the new payload), and silently dropped
    /// otherwise.
    pub fn update_items(&mut self, items: Vec<VaultItem>) {
        self.items = items;

        if let Some(selected) = &self.selected {
            match self.items.iter().find(|item| *item == selected) {
                Some(fresh) => self.selected = Some(fresh.clone()),
                None => self.selected = None,
            }
        }
    }

    /// Upserts a single item by `(kind, id)`: replaces in place when a match
    /// exists, appends otherwise. Used after a single save to avoid a full
    /// refetch.
    pub fn update_item(&mut self, item: VaultItem) {
        match self.items.iter_mut().find(|existing| **existing == item) {
            Some(existing) => *existing = item.clone(),
            None => self.items.push(item.clone()),
        }

        if self.selected.as_ref() == Some(&item) {
            self.selected = Some(item);
        }
    }

    /// Resets the model entirely: items, filter, and selection. Used when
    /// the containing surface closes or the vault context changes.
    pub fn clear(&mut self) {
        self.items.clear();
        self.filter.clear();
        self.selected = None;
    }

    /// The displayed projection: items filtered by the active category and
    /// filter string, grouped into sections, each section ordered by the
    /// active sort parameter with an id-ascending tie-break.
    ///
    /// Pure and side-effect free; recomputed from the current inputs on
    /// every call.
    pub fn displayed_sections(&self) -> Vec<ListSection> {
        let mut visible: Vec<&VaultItem> = self
            .items
            .iter()
            .filter(|item| item.matches_category(self.sort_descriptor.category))
            .filter(|item| item.matches_filter(&self.filter))
            .collect();

        let order = self.sort_descriptor.order;
        match self.sort_descriptor.parameter {
            SortParameter::Title => {
                visible.sort_by(|a, b| compare_by_title(a, b, order));
                group_by_key(visible, |item| item.first_character())
            }
            SortParameter::DateCreated => {
                visible.sort_by(|a, b| compare_by_date(a, b, order, |i| i.created()));
                group_by_key(visible, |item| day_title(item.created().date_naive()))
            }
            SortParameter::DateModified => {
                visible.sort_by(|a, b| compare_by_date(a, b, order, |i| i.last_updated()));
                group_by_key(visible, |item| day_title(item.last_updated().date_naive()))
            }
        }
    }

    /// What to show when the projection is empty.
    pub fn empty_state(&self) -> EmptyState {
        if self.items.is_empty() {
            return EmptyState::NoData;
        }
        if !self.displayed_sections().is_empty() {
            return EmptyState::None;
        }
        match self.sort_descriptor.category {
            Category::AllItems => EmptyState::None,
            Category::Logins => EmptyState::Logins,
            Category::Identities => EmptyState::Identities,
            Category::Cards => EmptyState::Cards,
        }
    }
}

fn compare_by_title(a: &VaultItem, b: &VaultItem, order: SortOrder) -> Ordering {
    let bucket = order.apply(a.first_character().cmp(&b.first_character()));
    if bucket != Ordering::Equal {
        return bucket;
    }

    let title = order.apply(
        a.display_title()
            .to_lowercase()
            .cmp(&b.display_title().to_lowercase()),
    );
    if title != Ordering::Equal {
        return title;
    }

    // Tie-break is id ascending regardless of the descriptor order.
    a.vault_id().cmp(&b.vault_id())
}

fn compare_by_date(
    a: &VaultItem,
    b: &VaultItem,
    order: SortOrder,
    key: impl Fn(&VaultItem) -> chrono::DateTime<chrono::Utc>,
) -> Ordering {
    let primary = order.apply(key(a).cmp(&key(b)));
    if primary != Ordering::Equal {
        return primary;
    }
    a.vault_id().cmp(&b.vault_id())
}

/// Groups pre-sorted items into sections of consecutive equal keys.
fn group_by_key(items: Vec<&VaultItem>, key: impl Fn(&VaultItem) -> String) -> Vec<ListSection> {
    let mut sections: Vec<ListSection> = Vec::new();

    for item in items {
        let item_key = key(item);
        match sections.last_mut() {
            Some(section) if section.title == item_key => section.items.push(item.clone()),
            _ => sections.push(ListSection {
                title: item_key,
                items: vec![item.clone()],
            }),
        }
    }

    sections
}

fn day_title(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CardRecord, LoginRecord, NoteRecord};
    use chrono::{TimeZone, Utc};

    fn login(id: i64, domain: &str, username: &str) -> VaultItem {
        let mut record = LoginRecord::new(domain, username, "pw");
        record.id = Some(id);
        VaultItem::Login(record)
    }

    fn login_titled(id: i64, title: &str) -> VaultItem {
        let mut record = LoginRecord::new("example.com", "user", "pw");
        record.id = Some(id);
        record.title = Some(title.to_string());
        VaultItem::Login(record)
    }

    fn card(id: i64, title: &str) -> VaultItem {
        let mut record = CardRecord::new(title, "4111111111114242");
        record.id = Some(id);
        VaultItem::Card(record)
    }

    #[test]
    fn test_update_items_keeps_selection_when_id_present() {
        let mut model = ItemListModel::new();
        model.update_items(vec![login(1, "a.com", "alice"), login(2, "b.com", "bob")]);
        model.select(Some(login(2, "b.com", "bob")), false);

        model.update_items(vec![login(2, "b.org", "bob")]);
        assert_eq!(
            model.selected().and_then(|i| i.login()).map(|l| l.domain.clone()),
            Some("b.org".to_string())
        );

        model.update_items(vec![login(1, "a.com", "alice")]);
        assert!(model.selected().is_none());
    }

    #[test]
    fn test_update_item_replaces_in_place() {
        let mut model = ItemListModel::new();
        model.update_items(vec![
            login(1, "a.com", "alice"),
            login(2, "b.com", "bob"),
            login(3, "c.com", "carol"),
        ]);

        model.update_item(login(2, "b.org", "bobby"));

        assert_eq!(model.items().len(), 3);
        // Replaced in place: position in the unsorted backing store is kept.
        assert_eq!(model.items()[1].login().unwrap().username, "bobby");
    }

    #[test]
    fn test_update_item_appends_novel_id() {
        let mut model = ItemListModel::new();
        model.update_items(vec![login(1, "a.com", "alice")]);

        model.update_item(login(9, "z.com", "zoe"));

        assert_eq!(model.items().len(), 2);
        assert_eq!(model.items()[1].vault_id(), Some(9));
    }

    #[test]
    fn test_update_item_refreshes_selected_copy() {
        let mut model = ItemListModel::new();
        model.update_items(vec![login(1, "a.com", "alice")]);
        model.select(Some(login(1, "a.com", "alice")), false);

        model.update_item(login(1, "a.com", "renamed"));
        assert_eq!(model.selected().unwrap().login().unwrap().username, "renamed");
    }

    #[test]
    fn test_sort_tie_breaks_by_id_ascending() {
        let mut model = ItemListModel::new();
        model.update_items(vec![
            login_titled(3, "Email"),
            login_titled(1, "Email"),
            login_titled(2, "Email"),
        ]);

        for _ in 0..3 {
            let sections = model.displayed_sections();
            assert_eq!(sections.len(), 1);
            let ids: Vec<_> = sections[0].items.iter().map(|i| i.vault_id()).collect();
            assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
        }

        // The tie-break stays ascending even when the order is descending.
        model.set_sort_descriptor(SortDescriptor::new(
            Category::AllItems,
            SortParameter::Title,
            SortOrder::Descending,
        ));
        let sections = model.displayed_sections();
        let ids: Vec<_> = sections[0].items.iter().map(|i| i.vault_id()).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_title_sections_group_by_first_letter() {
        let mut model = ItemListModel::new();
        model.update_items(vec![
            login_titled(1, "apple"),
            login_titled(2, "Avocado"),
            login_titled(3, "banana"),
            login_titled(4, "123 digits"),
        ]);

        let sections = model.displayed_sections();
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["#", "A", "B"]);
        assert_eq!(sections[1].items.len(), 2);
    }

    #[test]
    fn test_date_sections_group_by_day() {
        let day_one = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let day_two = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();

        let mut first = LoginRecord::new("a.com", "alice", "pw");
        first.id = Some(1);
        first.created = day_one;
        let mut second = LoginRecord::new("b.com", "bob", "pw");
        second.id = Some(2);
        second.created = day_two;

        let mut model = ItemListModel::new();
        model.set_sort_descriptor(SortDescriptor::new(
            Category::AllItems,
            SortParameter::DateCreated,
            SortOrder::Descending,
        ));
        model.update_items(vec![VaultItem::Login(first), VaultItem::Login(second)]);

        let sections = model.displayed_sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "2 March 2024");
        assert_eq!(sections[1].title, "1 March 2024");
    }

    #[test]
    fn test_category_filter_excludes_notes() {
        let mut model = ItemListModel::new();
        model.update_items(vec![
            login(1, "a.com", "alice"),
            card(2, "Visa"),
            VaultItem::Note({
                let mut note = NoteRecord::new("hello");
                note.id = Some(3);
                note
            }),
        ]);

        model.set_sort_descriptor(SortDescriptor::default().with_category(Category::Logins));
        let visible: Vec<_> = model
            .displayed_sections()
            .into_iter()
            .flat_map(|s| s.items)
            .collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind(), crate::item::ItemKind::Login);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let mut model = ItemListModel::new();
        model.update_items(vec![login(1, "GitHub.com", "alice"), login(2, "b.com", "bob")]);

        model.set_filter("github");
        let visible: Vec<_> = model
            .displayed_sections()
            .into_iter()
            .flat_map(|s| s.items)
            .collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].vault_id(), Some(1));

        model.set_filter("");
        assert_eq!(model.displayed_sections().iter().map(|s| s.items.len()).sum::<usize>(), 2);
    }

    #[test]
    fn test_select_swaps_category_for_foreign_item() {
        let mut model = ItemListModel::new();
        model.update_items(vec![login(1, "a.com", "alice"), card(2, "Visa")]);
        model.set_sort_descriptor(SortDescriptor::default().with_category(Category::Logins));

        model.select(Some(card(2, "Visa")), false);
        assert_eq!(model.sort_descriptor().category, Category::Cards);
    }

    #[test]
    fn test_selection_callback_old_and_new() {
        use std::sync::{Arc, Mutex};

        let observed: Arc<Mutex<Vec<(Option<i64>, Option<i64>)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = observed.clone();

        let mut model = ItemListModel::new();
        model.update_items(vec![login(1, "a.com", "alice"), login(2, "b.com", "bob")]);
        model.set_on_selection_changed(Box::new(move |old, new| {
            sink.lock()
                .unwrap()
                .push((old.and_then(|i| i.vault_id()), new.and_then(|i| i.vault_id())));
        }));

        model.select(Some(login(1, "a.com", "alice")), true);
        model.select(Some(login(2, "b.com", "bob")), true);
        model.select(Some(login(1, "a.com", "alice")), false); // silent

        let observed = observed.lock().unwrap();
        assert_eq!(*observed, vec![(None, Some(1)), (Some(1), Some(2))]);
    }

    #[test]
    fn test_select_login_with_domain_or_first() {
        let mut model = ItemListModel::new();
        model.update_items(vec![login(1, "a.com", "alice"), login(2, "b.com", "bob")]);

        model.select_login_with_domain_or_first("b.com", false);
        assert_eq!(model.selected().unwrap().vault_id(), Some(2));

        model.select_login_with_domain_or_first("missing.com", false);
        assert_eq!(model.selected().unwrap().vault_id(), Some(1));
    }

    #[test]
    fn test_empty_state() {
        let mut model = ItemListModel::new();
        assert_eq!(model.empty_state(), EmptyState::NoData);

        model.update_items(vec![login(1, "a.com", "alice")]);
        assert_eq!(model.empty_state(), EmptyState::None);

        model.set_sort_descriptor(SortDescriptor::default().with_category(Category::Cards));
        assert_eq!(model.empty_state(), EmptyState::Cards);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut model = ItemListModel::new();
        model.update_items(vec![login(1, "a.com", "alice")]);
        model.set_filter("a");
        model.select(Some(login(1, "a.com", "alice")), false);

        model.clear();
        assert!(model.items().is_empty());
        assert!(model.filter().is_empty());
        assert!(model.selected().is_none());
    }
}
