//! Per-kind record payloads stored in the vault.
//!
//! Records are plain value types: the vault collaborator persists them, the
//! edit models buffer them, and the list model projects them. A record's `id`
//! is `None` only before its first save; the vault assigns it on store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A website login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRecord {
    /// Vault-assigned identifier (`None` before first save)
    pub id: Option<i64>,

    /// Optional user-facing title; the domain is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Account username
    pub username: String,

    /// Account password
    pub password: String,

    /// Site domain (uniqueness key together with `username`)
    pub domain: String,

    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the record was created
    pub created: DateTime<Utc>,

    /// When the record was last modified
    pub last_updated: DateTime<Utc>,
}

impl LoginRecord {
    /// Creates an unsaved login for the given domain.
    pub fn new(domain: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: None,
            username: username.into(),
            password: password.into(),
            domain: domain.into(),
            notes: None,
            created: now,
            last_updated: now,
        }
    }

    /// Creates an empty, unsaved login (seed for the create-new flow).
    pub fn new_empty() -> Self {
        Self::new("", "", "")
    }

    /// Display title: the explicit title when set and non-empty, otherwise
    /// the domain with any leading `www.` dropped.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => drop_www_prefix(&self.domain).to_string(),
        }
    }
}

/// Strips a single leading `www.` from a domain.
fn drop_www_prefix(domain: &str) -> &str {
    domain.strip_prefix("www.").unwrap_or(domain)
}

/// A payment card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Vault-assigned identifier (`None` before first save)
    pub id: Option<i64>,

    /// User-facing title
    pub title: String,

    /// Card number (digits, unformatted)
    pub card_number: String,

    /// Name on the card
    pub cardholder_name: String,

    /// Security code
    pub security_code: String,

    /// Expiration month (1-12)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<u32>,

    /// Expiration year (four digits)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<u32>,

    /// When the record was created
    pub created: DateTime<Utc>,

    /// When the record was last modified
    pub last_updated: DateTime<Utc>,
}

impl CardRecord {
    /// Creates an unsaved card.
    pub fn new(title: impl Into<String>, card_number: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: title.into(),
            card_number: card_number.into(),
            cardholder_name: String::new(),
            security_code: String::new(),
            expiration_month: None,
            expiration_year: None,
            created: now,
            last_updated: now,
        }
    }

    /// Creates an empty, unsaved card.
    pub fn new_empty() -> Self {
        Self::new("", "")
    }

    /// Display name derived from the last four digits, e.g.
    /// "Card ending in 4242". Falls back to the title for short numbers.
    pub fn display_name(&self) -> String {
        let digits: String = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() >= 4 {
            format!("Card ending in {}", &digits[digits.len() - 4..])
        } else {
            self.title.clone()
        }
    }
}

/// Personal identity information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Vault-assigned identifier (`None` before first save)
    pub id: Option<i64>,

    /// User-facing title
    pub title: String,

    /// Given name
    pub first_name: String,

    /// Middle name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,

    /// Family name
    pub last_name: String,

    /// City of the associated address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,

    /// When the record was created
    pub created: DateTime<Utc>,

    /// When the record was last modified
    pub last_updated: DateTime<Utc>,
}

impl IdentityRecord {
    /// Creates an unsaved identity.
    pub fn new(title: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: title.into(),
            first_name: first_name.into(),
            middle_name: None,
            last_name: last_name.into(),
            address_city: None,
            created: now,
            last_updated: now,
        }
    }

    /// Creates an empty, unsaved identity.
    pub fn new_empty() -> Self {
        Self::new("", "", "")
    }

    /// Full name with the middle name included when present.
    pub fn formatted_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        for part in [
            self.first_name.as_str(),
            self.middle_name.as_deref().unwrap_or(""),
            self.last_name.as_str(),
        ] {
            if !part.is_empty() {
                parts.push(part);
            }
        }
        parts.join(" ")
    }
}

/// A free-text secure note (legacy kind; notes have no dedicated category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Vault-assigned identifier (`None` before first save)
    pub id: Option<i64>,

    /// Optional explicit title; derived from the text when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Note body
    pub text: String,

    /// Domain the note was captured from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_domain: Option<String>,

    /// When the record was created
    pub created: DateTime<Utc>,

    /// When the record was last modified
    pub last_updated: DateTime<Utc>,
}

/// Longest derived note title before truncation.
const NOTE_TITLE_MAX: usize = 60;

impl NoteRecord {
    /// Creates an unsaved note.
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: None,
            text: text.into(),
            associated_domain: None,
            created: now,
            last_updated: now,
        }
    }

    /// Creates an empty, unsaved note.
    pub fn new_empty() -> Self {
        Self::new("")
    }

    /// Display title: the explicit title, else the first non-empty line of
    /// the text truncated to a display length, else "Empty note".
    pub fn display_title(&self) -> String {
        if let Some(title) = &self.title {
            if !title.is_empty() {
                return title.clone();
            }
        }

        match self.first_non_empty_line() {
            Some(line) => truncate_chars(line, NOTE_TITLE_MAX),
            None => "Empty note".to_string(),
        }
    }

    /// Display subtitle: the line following the one used as the title.
    pub fn display_subtitle(&self) -> String {
        let mut lines = self.text.lines().filter(|l| !l.trim().is_empty());

        if self.title.as_deref().map(|t| !t.is_empty()) != Some(true) {
            // First line is already consumed by the derived title.
            lines.next();
        }

        lines
            .next()
            .map(|line| truncate_chars(line, NOTE_TITLE_MAX))
            .unwrap_or_default()
    }

    fn first_non_empty_line(&self) -> Option<&str> {
        self.text.lines().find(|l| !l.trim().is_empty())
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_display_title_falls_back_to_domain() {
        let login = LoginRecord::new("www.example.com", "alice", "hunter2");
        assert_eq!(login.display_title(), "example.com");

        let mut titled = login.clone();
        titled.title = Some("Work email".to_string());
        assert_eq!(titled.display_title(), "Work email");
    }

    #[test]
    fn test_login_empty_title_ignored() {
        let mut login = LoginRecord::new("example.com", "alice", "hunter2");
        login.title = Some(String::new());
        assert_eq!(login.display_title(), "example.com");
    }

    #[test]
    fn test_card_display_name() {
        let card = CardRecord::new("Personal", "4111 1111 1111 4242");
        assert_eq!(card.display_name(), "Card ending in 4242");

        let short = CardRecord::new("Odd", "12");
        assert_eq!(short.display_name(), "Odd");
    }

    #[test]
    fn test_identity_formatted_name() {
        let mut identity = IdentityRecord::new("Me", "Ada", "Lovelace");
        assert_eq!(identity.formatted_name(), "Ada Lovelace");

        identity.middle_name = Some("King".to_string());
        assert_eq!(identity.formatted_name(), "Ada King Lovelace");
    }

    #[test]
    fn test_note_derived_title_and_subtitle() {
        let note = NoteRecord::new("Shopping list\nmilk, eggs\nbread");
        assert_eq!(note.display_title(), "Shopping list");
        assert_eq!(note.display_subtitle(), "milk, eggs");
    }

    #[test]
    fn test_note_explicit_title_keeps_first_line_as_subtitle() {
        let mut note = NoteRecord::new("milk, eggs");
        note.title = Some("Shopping".to_string());
        assert_eq!(note.display_title(), "Shopping");
        assert_eq!(note.display_subtitle(), "milk, eggs");
    }

    #[test]
    fn test_empty_note_title() {
        let note = NoteRecord::new("  \n\n");
        assert_eq!(note.display_title(), "Empty note");
        assert_eq!(note.display_subtitle(), "");
    }

    #[test]
    fn test_record_serialization() {
        let login = LoginRecord::new("example.com", "alice", "hunter2");
        let json = serde_json::to_string(&login).unwrap();
        let back: LoginRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(login, back);
    }
}
