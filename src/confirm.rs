//! Confirmation prompts the coordinator routes through before destructive
//! or lossy actions.
//!
//! The presenter is an injected collaborator so the state machine stays
//! independent of any particular UI framework; tests script it with
//! [`ScriptedPresenter`].

use crate::item::ItemKind;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Outcome of the three-way unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChangesOutcome {
    /// Persist the pending edit, then continue the interrupted action
    Save,
    /// Discard the pending edit, then continue
    Discard,
    /// Abort the interrupted action; the edit stays open
    Cancel,
}

/// Modal prompts presented to the user.
///
/// Prompts are modal with respect to the coordination state machine: the
/// coordinator awaits each answer before processing the next entry point.
#[async_trait]
pub trait ConfirmationPresenter: Send {
    /// Asks whether to save, discard, or keep the dirty edit that blocks a
    /// selection change, a create-new, or a close.
    async fn unsaved_changes(&mut self) -> SaveChangesOutcome;

    /// Asks whether to really delete the given kind of record. Returns true
    /// to proceed.
    async fn confirm_delete(&mut self, kind: ItemKind) -> bool;

    /// Tells the user a save collided with an existing record. The edit
    /// buffer is preserved; no answer is needed.
    async fn notify_duplicate(&mut self);
}

/// Scripted presenter for tests.
///
/// Answers are queued in advance; clones share the same queue, so a test can
/// keep a handle after moving the presenter into a coordinator.
///
/// Unqueued prompts answer conservatively: `Cancel` for unsaved changes,
/// `false` for delete.
#[derive(Clone, Default)]
pub struct ScriptedPresenter {
    inner: Arc<Mutex<ScriptState>>,
}

#[derive(Default)]
struct ScriptState {
    unsaved_answers: VecDeque<SaveChangesOutcome>,
    delete_answers: VecDeque<bool>,
    unsaved_prompts: usize,
    delete_prompts: Vec<ItemKind>,
    duplicate_notices: usize,
}

impl ScriptedPresenter {
    /// Creates a presenter with no scripted answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an answer for the next unsaved-changes prompt.
    pub fn push_unsaved_answer(&self, outcome: SaveChangesOutcome) {
        self.lock().unsaved_answers.push_back(outcome);
    }

    /// Queues an answer for the next delete confirmation.
    pub fn push_delete_answer(&self, confirm: bool) {
        self.lock().delete_answers.push_back(confirm);
    }

    /// How many unsaved-changes prompts were shown.
    pub fn unsaved_prompts(&self) -> usize {
        self.lock().unsaved_prompts
    }

    /// The kinds passed to delete confirmations, in order.
    pub fn delete_prompts(&self) -> Vec<ItemKind> {
        self.lock().delete_prompts.clone()
    }

    /// How many duplicate-record notices were shown.
    pub fn duplicate_notices(&self) -> usize {
        self.lock().duplicate_notices
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ConfirmationPresenter for ScriptedPresenter {
    async fn unsaved_changes(&mut self) -> SaveChangesOutcome {
        let mut state = self.lock();
        state.unsaved_prompts += 1;
        state
            .unsaved_answers
            .pop_front()
            .unwrap_or(SaveChangesOutcome::Cancel)
    }

    async fn confirm_delete(&mut self, kind: ItemKind) -> bool {
        let mut state = self.lock();
        state.delete_prompts.push(kind);
        state.delete_answers.pop_front().unwrap_or(false)
    }

    async fn notify_duplicate(&mut self) {
        self.lock().duplicate_notices += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answers_in_order() {
        let presenter = ScriptedPresenter::new();
        presenter.push_unsaved_answer(SaveChangesOutcome::Save);
        presenter.push_unsaved_answer(SaveChangesOutcome::Discard);

        let mut handle = presenter.clone();
        assert_eq!(handle.unsaved_changes().await, SaveChangesOutcome::Save);
        assert_eq!(handle.unsaved_changes().await, SaveChangesOutcome::Discard);
        // Unqueued prompts answer Cancel.
        assert_eq!(handle.unsaved_changes().await, SaveChangesOutcome::Cancel);
        assert_eq!(presenter.unsaved_prompts(), 3);
    }

    #[tokio::test]
    async fn test_delete_prompts_record_kind() {
        let presenter = ScriptedPresenter::new();
        presenter.push_delete_answer(true);

        let mut handle = presenter.clone();
        assert!(handle.confirm_delete(ItemKind::Card).await);
        assert!(!handle.confirm_delete(ItemKind::Note).await);
        assert_eq!(presenter.delete_prompts(), vec![ItemKind::Card, ItemKind::Note]);
    }
}
