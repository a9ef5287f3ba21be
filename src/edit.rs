//! Edit buffers for the currently open item.
//!
//! An [`EditModel`] maintains an editable copy of one record's fields next to
//! the last committed snapshot. Dirty state is computed, never stored: the
//! buffer is dirty exactly when it differs from the snapshot, so reverting a
//! field by hand also clears the flag.
//!
//! Edit models never touch the vault. Persistence flows through the
//! [`Coordinator`](crate::coordinator::Coordinator), which takes the pending
//! payload, stores it, and commits the canonical record back.

use crate::item::{ItemKind, VaultItem};
use crate::record::{CardRecord, IdentityRecord, LoginRecord, NoteRecord};

/// Callback fired when the computed dirty state transitions.
pub type DirtyCallback = Box<dyn FnMut(bool) + Send>;

/// A record type that can be buffered by an [`EditModel`].
pub trait EditableRecord: Clone + PartialEq {
    /// The union tag for this record type.
    const KIND: ItemKind;

    /// An empty record used to seed the create-new flow.
    fn new_empty() -> Self;

    /// The vault-assigned identifier, `None` before first save.
    fn record_id(&self) -> Option<i64>;

    /// Wraps the record in the item union.
    fn into_item(self) -> VaultItem;

    /// Unwraps the record from the item union; `None` on a kind mismatch.
    fn from_item(item: VaultItem) -> Option<Self>;
}

impl EditableRecord for LoginRecord {
    const KIND: ItemKind = ItemKind::Login;

    fn new_empty() -> Self {
        Self::new_empty()
    }

    fn record_id(&self) -> Option<i64> {
        self.id
    }

    fn into_item(self) -> VaultItem {
        VaultItem::Login(self)
    }

    fn from_item(item: VaultItem) -> Option<Self> {
        match item {
            VaultItem::Login(record) => Some(record),
            _ => None,
        }
    }
}

impl EditableRecord for CardRecord {
    const KIND: ItemKind = ItemKind::Card;

    fn new_empty() -> Self {
        Self::new_empty()
    }

    fn record_id(&self) -> Option<i64> {
        self.id
    }

    fn into_item(self) -> VaultItem {
        VaultItem::Card(self)
    }

    fn from_item(item: VaultItem) -> Option<Self> {
        match item {
            VaultItem::Card(record) => Some(record),
            _ => None,
        }
    }
}

impl EditableRecord for IdentityRecord {
    const KIND: ItemKind = ItemKind::Identity;

    fn new_empty() -> Self {
        Self::new_empty()
    }

    fn record_id(&self) -> Option<i64> {
        self.id
    }

    fn into_item(self) -> VaultItem {
        VaultItem::Identity(self)
    }

    fn from_item(item: VaultItem) -> Option<Self> {
        match item {
            VaultItem::Identity(record) => Some(record),
            _ => None,
        }
    }
}

impl EditableRecord for NoteRecord {
    const KIND: ItemKind = ItemKind::Note;

    fn new_empty() -> Self {
        Self::new_empty()
    }

    fn record_id(&self) -> Option<i64> {
        self.id
    }

    fn into_item(self) -> VaultItem {
        VaultItem::Note(self)
    }

    fn from_item(item: VaultItem) -> Option<Self> {
        match item {
            VaultItem::Note(record) => Some(record),
            _ => None,
        }
    }
}

/// Edit buffer over one record with dirty tracking.
///
/// States per session: viewing (`is_editing == false`), editing, and
/// creating (`is_new == true`, editing implied).
pub struct EditModel<R: EditableRecord> {
    snapshot: Option<R>,
    buffer: Option<R>,
    is_editing: bool,
    is_new: bool,
    on_dirty_changed: Option<DirtyCallback>,
    reported_dirty: bool,
}

impl<R: EditableRecord> Default for EditModel<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: EditableRecord> EditModel<R> {
    /// Creates an empty edit model with no record loaded.
    pub fn new() -> Self {
        Self {
            snapshot: None,
            buffer: None,
            is_editing: false,
            is_new: false,
            on_dirty_changed: None,
            reported_dirty: false,
        }
    }

    /// Registers the dirty-transition callback. Fires synchronously whenever
    /// the computed dirty state flips.
    pub fn set_on_dirty_changed(&mut self, callback: DirtyCallback) {
        self.on_dirty_changed = Some(callback);
    }

    /// The current edit buffer, if a record is loaded.
    pub fn record(&self) -> Option<&R> {
        self.buffer.as_ref()
    }

    /// True when the buffer differs from the last committed snapshot in at
    /// least one field.
    pub fn is_dirty(&self) -> bool {
        self.buffer != self.snapshot
    }

    /// True while the buffer accepts field mutations.
    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// True while editing a record that has never been saved.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The buffered record's vault id.
    pub fn record_id(&self) -> Option<i64> {
        self.buffer.as_ref().and_then(R::record_id)
    }

    /// Seeds the buffer from a committed record, entering the viewing state.
    /// Never marks dirty; also used after a save round-trip to pick up the
    /// vault-assigned id and normalized fields.
    pub fn set_record(&mut self, record: R) {
        self.snapshot = Some(record.clone());
        self.buffer = Some(record);
        self.is_editing = false;
        self.is_new = false;
        self.report_dirty();
    }

    /// Drops the buffer entirely (deselection, or the view disappearing
    /// without a save).
    pub fn clear_record(&mut self) {
        self.snapshot = None;
        self.buffer = None;
        self.is_editing = false;
        self.is_new = false;
        self.report_dirty();
    }

    /// Starts a create session over an empty record.
    pub fn create_new(&mut self) {
        let empty = R::new_empty();
        self.snapshot = Some(empty.clone());
        self.buffer = Some(empty);
        self.is_editing = true;
        self.is_new = true;
        self.report_dirty();
    }

    /// Viewing -> editing. No-op without a loaded record.
    pub fn edit(&mut self) {
        if self.buffer.is_some() {
            self.is_editing = true;
        }
    }

    /// Discards the buffer.
    ///
    /// Editing -> viewing, re-seeded from the last committed snapshot.
    /// Creating -> terminal: the unsaved record is dropped entirely and the
    /// caller is expected to clear the selection.
    pub fn cancel(&mut self) {
        if self.is_new {
            self.clear_record();
            return;
        }
        self.buffer = self.snapshot.clone();
        self.is_editing = false;
        self.report_dirty();
    }

    /// Mutates the buffer through `f` and re-evaluates dirty state. Field
    /// mutations take effect synchronously; there is no debouncing.
    pub fn update(&mut self, f: impl FnOnce(&mut R)) {
        if let Some(buffer) = &mut self.buffer {
            f(buffer);
        }
        self.report_dirty();
    }

    /// The payload a save should persist: a copy of the buffer, available
    /// only when dirty. Save must stay disabled otherwise.
    pub fn pending(&self) -> Option<R> {
        if self.is_dirty() {
            self.buffer.clone()
        } else {
            None
        }
    }

    /// Re-seeds both snapshot and buffer from the persisted record after a
    /// successful save, returning to the viewing state with a clean buffer.
    pub fn commit(&mut self, record: R) {
        self.set_record(record);
    }

    fn report_dirty(&mut self) {
        let dirty = self.is_dirty();
        if dirty != self.reported_dirty {
            self.reported_dirty = dirty;
            if let Some(callback) = &mut self.on_dirty_changed {
                callback(dirty);
            }
        }
    }
}

/// Kind-erased handle over the four edit-model instantiations.
///
/// The coordinator holds one of these for whatever item is open; matching on
/// the enum replaces the runtime downcasting the original UI code relied on.
pub enum ItemEditor {
    /// Login edit session
    Login(EditModel<LoginRecord>),
    /// Card edit session
    Card(EditModel<CardRecord>),
    /// Identity edit session
    Identity(EditModel<IdentityRecord>),
    /// Note edit session
    Note(EditModel<NoteRecord>),
}

impl ItemEditor {
    /// Creates an empty editor for the given kind.
    pub fn new_for(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Login => Self::Login(EditModel::new()),
            ItemKind::Card => Self::Card(EditModel::new()),
            ItemKind::Identity => Self::Identity(EditModel::new()),
            ItemKind::Note => Self::Note(EditModel::new()),
        }
    }

    /// The kind of record this editor holds.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Login(_) => ItemKind::Login,
            Self::Card(_) => ItemKind::Card,
            Self::Identity(_) => ItemKind::Identity,
            Self::Note(_) => ItemKind::Note,
        }
    }

    /// See [`EditModel::is_dirty`].
    pub fn is_dirty(&self) -> bool {
        match self {
            Self::Login(m) => m.is_dirty(),
            Self::Card(m) => m.is_dirty(),
            Self::Identity(m) => m.is_dirty(),
            Self::Note(m) => m.is_dirty(),
        }
    }

    /// See [`EditModel::is_editing`].
    pub fn is_editing(&self) -> bool {
        match self {
            Self::Login(m) => m.is_editing(),
            Self::Card(m) => m.is_editing(),
            Self::Identity(m) => m.is_editing(),
            Self::Note(m) => m.is_editing(),
        }
    }

    /// See [`EditModel::is_new`].
    pub fn is_new(&self) -> bool {
        match self {
            Self::Login(m) => m.is_new(),
            Self::Card(m) => m.is_new(),
            Self::Identity(m) => m.is_new(),
            Self::Note(m) => m.is_new(),
        }
    }

    /// See [`EditModel::record_id`].
    pub fn record_id(&self) -> Option<i64> {
        match self {
            Self::Login(m) => m.record_id(),
            Self::Card(m) => m.record_id(),
            Self::Identity(m) => m.record_id(),
            Self::Note(m) => m.record_id(),
        }
    }

    /// See [`EditModel::edit`].
    pub fn edit(&mut self) {
        match self {
            Self::Login(m) => m.edit(),
            Self::Card(m) => m.edit(),
            Self::Identity(m) => m.edit(),
            Self::Note(m) => m.edit(),
        }
    }

    /// See [`EditModel::cancel`].
    pub fn cancel(&mut self) {
        match self {
            Self::Login(m) => m.cancel(),
            Self::Card(m) => m.cancel(),
            Self::Identity(m) => m.cancel(),
            Self::Note(m) => m.cancel(),
        }
    }

    /// See [`EditModel::clear_record`].
    pub fn clear_record(&mut self) {
        match self {
            Self::Login(m) => m.clear_record(),
            Self::Card(m) => m.clear_record(),
            Self::Identity(m) => m.clear_record(),
            Self::Note(m) => m.clear_record(),
        }
    }

    /// See [`EditModel::create_new`].
    pub fn create_new(&mut self) {
        match self {
            Self::Login(m) => m.create_new(),
            Self::Card(m) => m.create_new(),
            Self::Identity(m) => m.create_new(),
            Self::Note(m) => m.create_new(),
        }
    }

    /// See [`EditModel::set_on_dirty_changed`].
    pub fn set_on_dirty_changed(&mut self, callback: DirtyCallback) {
        match self {
            Self::Login(m) => m.set_on_dirty_changed(callback),
            Self::Card(m) => m.set_on_dirty_changed(callback),
            Self::Identity(m) => m.set_on_dirty_changed(callback),
            Self::Note(m) => m.set_on_dirty_changed(callback),
        }
    }

    /// Seeds the matching edit model from an item. Returns false (and leaves
    /// state untouched) on a kind mismatch.
    pub fn set_item(&mut self, item: VaultItem) -> bool {
        match (self, item) {
            (Self::Login(m), VaultItem::Login(r)) => m.set_record(r),
            (Self::Card(m), VaultItem::Card(r)) => m.set_record(r),
            (Self::Identity(m), VaultItem::Identity(r)) => m.set_record(r),
            (Self::Note(m), VaultItem::Note(r)) => m.set_record(r),
            _ => return false,
        }
        true
    }

    /// The pending payload as an item, available only when dirty.
    pub fn pending_item(&self) -> Option<VaultItem> {
        match self {
            Self::Login(m) => m.pending().map(VaultItem::Login),
            Self::Card(m) => m.pending().map(VaultItem::Card),
            Self::Identity(m) => m.pending().map(VaultItem::Identity),
            Self::Note(m) => m.pending().map(VaultItem::Note),
        }
    }

    /// Commits the persisted item into the matching edit model. Returns
    /// false on a kind mismatch.
    pub fn commit_item(&mut self, item: VaultItem) -> bool {
        match (self, item) {
            (Self::Login(m), VaultItem::Login(r)) => m.commit(r),
            (Self::Card(m), VaultItem::Card(r)) => m.commit(r),
            (Self::Identity(m), VaultItem::Identity(r)) => m.commit(r),
            (Self::Note(m), VaultItem::Note(r)) => m.commit(r),
            _ => return false,
        }
        true
    }

    /// Typed access for login field edits.
    pub fn as_login_mut(&mut self) -> Option<&mut EditModel<LoginRecord>> {
        match self {
            Self::Login(m) => Some(m),
            _ => None,
        }
    }

    /// Typed access for card field edits.
    pub fn as_card_mut(&mut self) -> Option<&mut EditModel<CardRecord>> {
        match self {
            Self::Card(m) => Some(m),
            _ => None,
        }
    }

    /// Typed access for identity field edits.
    pub fn as_identity_mut(&mut self) -> Option<&mut EditModel<IdentityRecord>> {
        match self {
            Self::Identity(m) => Some(m),
            _ => None,
        }
    }

    /// Typed access for note field edits.
    pub fn as_note_mut(&mut self) -> Option<&mut EditModel<NoteRecord>> {
        match self {
            Self::Note(m) => Some(m),
            _ => None,
        }
    }
}
