//! Record validation run before anything is sent to the vault.

use crate::item::VaultItem;
use crate::{Result, VaultpaneError};

/// Maximum allowed length for user-facing titles.
const MAX_TITLE_LENGTH: usize = 255;

/// Validates a record before it is stored.
///
/// Checks the invariants the vault itself does not enforce:
/// - logins need a non-empty domain
/// - cards and identities need a non-empty title
/// - card numbers may contain only digits, spaces, and dashes
/// - titles must fit the length cap and carry no control characters
///
/// # Errors
///
/// Returns [`VaultpaneError::InvalidRecord`] describing the first failed
/// check.
///
/// # Example
///
/// ```
/// use vaultpane::validation::validate_item;
/// use vaultpane::{LoginRecord, VaultItem};
///
/// let ok = VaultItem::Login(LoginRecord::new("example.com", "alice", "pw"));
/// assert!(validate_item(&ok).is_ok());
///
/// let missing_domain = VaultItem::Login(LoginRecord::new("", "alice", "pw"));
/// assert!(validate_item(&missing_domain).is_err());
/// ```
pub fn validate_item(item: &VaultItem) -> Result<()> {
    match item {
        VaultItem::Login(record) => {
            if record.domain.trim().is_empty() {
                return Err(VaultpaneError::InvalidRecord(
                    "login requires a domain".to_string(),
                ));
            }
            if let Some(title) = &record.title {
                validate_title(title)?;
            }
        }
        VaultItem::Card(record) => {
            if record.title.trim().is_empty() {
                return Err(VaultpaneError::InvalidRecord(
                    "card requires a title".to_string(),
                ));
            }
            validate_title(&record.title)?;
            if record
                .card_number
                .chars()
                .any(|c| !c.is_ascii_digit() && c != ' ' && c != '-')
            {
                return Err(VaultpaneError::InvalidRecord(
                    "card number may contain only digits, spaces, and dashes".to_string(),
                ));
            }
        }
        VaultItem::Identity(record) => {
            if record.title.trim().is_empty() {
                return Err(VaultpaneError::InvalidRecord(
                    "identity requires a title".to_string(),
                ));
            }
            validate_title(&record.title)?;
        }
        VaultItem::Note(record) => {
            if let Some(title) = &record.title {
                validate_title(title)?;
            }
        }
    }

    Ok(())
}

fn validate_title(title: &str) -> Result<()> {
    if title.len() > MAX_TITLE_LENGTH {
        return Err(VaultpaneError::InvalidRecord(format!(
            "title exceeds maximum length of {} characters",
            MAX_TITLE_LENGTH
        )));
    }

    if title.chars().any(|c| c.is_control()) {
        return Err(VaultpaneError::InvalidRecord(
            "title contains control characters".to_string(),
        ));
    }

    Ok(())
}
