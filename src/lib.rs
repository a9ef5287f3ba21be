//! Vaultpane - Coordination core for a vault item browser.
//!
//! Vaultpane implements the model layer behind a password-manager panel: a
//! filtered, sorted, sectioned list of vault items on one side and an edit
//! buffer with dirty tracking on the other, mediated by a coordinator that
//! guards every selection change behind an unsaved-changes confirmation.
//! The vault itself and the rendering surface are injected collaborators.
//!
//! # Features
//!
//! - **Tagged item union**: Logins, payment cards, identities, and notes
//!   behind one `VaultItem` type with `(kind, id)` equality
//! - **Pure list projection**: Sections are recomputed from items, filter,
//!   and sort descriptor; repeated calls always agree
//! - **Computed dirty state**: The edit buffer is dirty exactly when it
//!   differs from the last committed snapshot
//! - **Three-way confirmation**: Save, discard, or cancel before any action
//!   that would lose unsaved edits
//! - **Async vault seam**: Storage runs behind an async trait; an in-memory
//!   vault with error injection ships for tests
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use vaultpane::stores::memory::MemoryVault;
//! use vaultpane::{Config, Coordinator, LoginRecord, ScriptedPresenter, VaultItem};
//!
//! #[tokio::main]
//! async fn main() -> vaultpane::Result<()> {
//!     let vault = Arc::new(MemoryVault::new());
//!     vault
//!         .seed(VaultItem::Login(LoginRecord::new("example.com", "alice", "hunter2")))
//!         .await;
//!
//!     let mut coordinator = Coordinator::new(
//!         vault,
//!         Box::new(ScriptedPresenter::new()),
//!         Config::default(),
//!     );
//!
//!     // Pull the vault into the list; the first row is selected and loaded
//!     // into an edit model.
//!     coordinator.refresh().await?;
//!     let editor = coordinator.editor().unwrap();
//!     assert!(!editor.is_dirty());
//!
//!     // Edit a field, then persist.
//!     coordinator
//!         .editor_mut()
//!         .unwrap()
//!         .as_login_mut()
//!         .unwrap()
//!         .update(|login| login.password = "rotated".to_string());
//!     coordinator.save().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod confirm;
pub mod coordinator;
pub mod edit;
pub mod error;
pub mod item;
pub mod list;
pub mod record;
pub mod sorting;
pub mod store;
pub mod stores;
pub mod validation;

pub use config::Config;
pub use confirm::{ConfirmationPresenter, SaveChangesOutcome, ScriptedPresenter};
pub use coordinator::Coordinator;
pub use edit::{EditModel, EditableRecord, ItemEditor};
pub use error::{Result, VaultpaneError};
pub use item::{ItemId, ItemKind, VaultItem};
pub use list::{EmptyState, ItemListModel, ListSection};
pub use record::{CardRecord, IdentityRecord, LoginRecord, NoteRecord};
pub use sorting::{Category, SortDescriptor, SortOrder, SortParameter};
pub use store::VaultStore;
