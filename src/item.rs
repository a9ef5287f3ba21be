//! The vault item tagged union and its derived display strings.

use crate::record::{CardRecord, IdentityRecord, LoginRecord, NoteRecord};
use crate::sorting::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The tag distinguishing which [`VaultItem`] variant a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Website login
    Login,
    /// Payment card
    Card,
    /// Personal identity
    Identity,
    /// Secure note (legacy)
    Note,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Card => write!(f, "card"),
            Self::Identity => write!(f, "identity"),
            Self::Note => write!(f, "note"),
        }
    }
}

/// Union-wide identity of a saved item.
///
/// Identifiers are unique within a kind; equality across the union requires
/// both the kind and the id to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId {
    /// Item kind
    pub kind: ItemKind,
    /// Vault-assigned identifier
    pub id: i64,
}

/// An item held in the vault: a login, card, identity, or note.
///
/// Equality is `(kind, id)`: two items with different payloads but the same
/// kind and id are the same item. This is how an incoming save is recognized
/// as an update rather than a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VaultItem {
    /// Website login
    Login(LoginRecord),
    /// Payment card
    Card(CardRecord),
    /// Personal identity
    Identity(IdentityRecord),
    /// Secure note
    Note(NoteRecord),
}

impl PartialEq for VaultItem {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.vault_id() == other.vault_id()
    }
}

impl Eq for VaultItem {}

impl VaultItem {
    /// Returns the item's kind tag.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Login(_) => ItemKind::Login,
            Self::Card(_) => ItemKind::Card,
            Self::Identity(_) => ItemKind::Identity,
            Self::Note(_) => ItemKind::Note,
        }
    }

    /// Returns the vault-assigned identifier, `None` before first save.
    pub fn vault_id(&self) -> Option<i64> {
        match self {
            Self::Login(r) => r.id,
            Self::Card(r) => r.id,
            Self::Identity(r) => r.id,
            Self::Note(r) => r.id,
        }
    }

    /// Returns the union-wide identity for a saved item.
    pub fn item_id(&self) -> Option<ItemId> {
        self.vault_id().map(|id| ItemId {
            kind: self.kind(),
            id,
        })
    }

    /// Returns the login record for login items.
    pub fn login(&self) -> Option<&LoginRecord> {
        match self {
            Self::Login(r) => Some(r),
            _ => None,
        }
    }

    /// When the item was created.
    pub fn created(&self) -> DateTime<Utc> {
        match self {
            Self::Login(r) => r.created,
            Self::Card(r) => r.created,
            Self::Identity(r) => r.created,
            Self::Note(r) => r.created,
        }
    }

    /// When the item was last modified.
    pub fn last_updated(&self) -> DateTime<Utc> {
        match self {
            Self::Login(r) => r.last_updated,
            Self::Card(r) => r.last_updated,
            Self::Identity(r) => r.last_updated,
            Self::Note(r) => r.last_updated,
        }
    }

    /// Primary display line.
    pub fn display_title(&self) -> String {
        match self {
            Self::Login(r) => r.display_title(),
            Self::Card(r) => r.title.clone(),
            Self::Identity(r) => r.title.clone(),
            Self::Note(r) => r.display_title(),
        }
    }

    /// Secondary display line.
    pub fn display_subtitle(&self) -> String {
        match self {
            Self::Login(r) => r.username.clone(),
            Self::Card(r) => r.display_name(),
            Self::Identity(r) => r.formatted_name(),
            Self::Note(r) => r.display_subtitle(),
        }
    }

    /// Section key for title-ordered lists: the uppercased first letter of
    /// the display title, or `#` when the title is empty or starts with a
    /// non-letter.
    pub fn first_character(&self) -> String {
        match self.display_title().chars().next() {
            Some(c) if c.is_alphabetic() => c.to_uppercase().to_string(),
            _ => "#".to_string(),
        }
    }

    /// The category this item is grouped under. Notes have no dedicated
    /// category and only appear in the all-items display.
    pub fn category(&self) -> Category {
        match self {
            Self::Login(_) => Category::Logins,
            Self::Card(_) => Category::Cards,
            Self::Identity(_) => Category::Identities,
            Self::Note(_) => Category::AllItems,
        }
    }

    /// Whether the item belongs to the given category. All items match
    /// [`Category::AllItems`].
    pub fn matches_category(&self, category: Category) -> bool {
        category == Category::AllItems || self.category() == category
    }

    /// Case-insensitive substring match against the item's searchable text.
    /// An empty filter matches everything.
    pub fn matches_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let filter = filter.to_lowercase();

        let contains = |text: &str| text.to_lowercase().contains(&filter);

        if contains(&self.display_title()) || contains(&self.display_subtitle()) {
            return true;
        }

        match self {
            Self::Login(r) => contains(&r.domain) || contains(&r.username),
            Self::Note(r) => {
                contains(&r.text)
                    || r.associated_domain.as_deref().map(contains).unwrap_or(false)
            }
            _ => false,
        }
    }
}
