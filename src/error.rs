//! Error types for vaultpane operations.

use crate::item::ItemKind;
use thiserror::Error;

/// Result type alias using [`VaultpaneError`].
pub type Result<T> = std::result::Result<T, VaultpaneError>;

/// Errors that can occur while coordinating vault items.
///
/// All errors implement `std::error::Error` and can be chained with `source()`.
#[derive(Debug, Error)]
pub enum VaultpaneError {
    /// A stored record's uniqueness constraint (e.g. username + domain for
    /// logins) collides with an existing record that is not the one being
    /// updated.
    #[error("duplicate record: {0}")]
    DuplicateRecord(String),

    /// The requested record does not exist in the vault.
    #[error("record not found: {kind} {id}")]
    NotFound {
        /// Item kind
        kind: ItemKind,
        /// Vault-assigned identifier
        id: i64,
    },

    /// The record failed validation before being sent to the vault.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// There is no pending edit to save or delete.
    #[error("no pending edit")]
    NoPendingEdit,

    /// Vault operation failed with context.
    #[error("{operation} {kind}: {source}")]
    StoreOperation {
        /// Operation name (fetch, store, delete, etc.)
        operation: String,
        /// Item kind involved
        kind: ItemKind,
        /// Underlying error
        #[source]
        source: Box<VaultpaneError>,
    },

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VaultpaneError {
    /// Wraps an underlying error with the vault operation and item kind that
    /// caused the failure.
    ///
    /// # Example
    ///
    /// ```
    /// use vaultpane::{ItemKind, VaultpaneError};
    ///
    /// let err = VaultpaneError::NotFound { kind: ItemKind::Login, id: 7 };
    /// let wrapped = VaultpaneError::store_op("fetch", ItemKind::Login, err);
    ///
    /// assert_eq!(
    ///     wrapped.to_string(),
    ///     "fetch login: record not found: login 7"
    /// );
    /// ```
    pub fn store_op(operation: impl Into<String>, kind: ItemKind, err: VaultpaneError) -> Self {
        Self::StoreOperation {
            operation: operation.into(),
            kind,
            source: Box::new(err),
        }
    }

    /// Returns true if this error (or its context-wrapped source) is the
    /// duplicate-record kind.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Self::DuplicateRecord(_) => true,
            Self::StoreOperation { source, .. } => source.is_duplicate(),
            _ => false,
        }
    }
}
