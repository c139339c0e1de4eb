use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::NaiveDate;
use uuid::Uuid;

use super::{
    ClientError, Notifier, ReminderApi, ReminderStore, UndoToken,
    view::{ViewState, derive_view},
};
use crate::models::{NewReminder, Reminder, ReminderChanges};

const LOADED: &str = "Reminders loaded successfully";
const LOAD_FAILED: &str = "Failed to load reminders";
const CREATED: &str = "Reminder created";
const UPDATED: &str = "Reminder updated";
const SAVE_FAILED: &str = "Failed to save reminder";
const STATUS_FAILED: &str = "Failed to update reminder status";
const DELETED: &str = "Reminder deleted";
const DELETE_FAILED: &str = "Failed to delete reminder";
const RESTORED: &str = "Reminder restored";
const RESTORE_FAILED: &str = "Failed to restore reminder";

struct PendingUndo {
    token: UndoToken,
    input: NewReminder,
}

#[derive(Default)]
struct CoordinatorState {
    store: ReminderStore,
    in_flight: HashSet<Uuid>,
    pending_undo: Option<PendingUndo>,
    next_token: u64,
}

/// Owns the client's reminder list and runs every mutation against the API.
///
/// Toggle and delete apply locally first and roll back the touched record if
/// the server refuses. At most one mutation per reminder is in flight; a
/// second one on the same id fails with [`ClientError::MutationInFlight`]
/// without sending anything. Deletes leave a single undo slot behind that the
/// next delete replaces.
///
/// The state lock is never held across a request, so mutations on different
/// reminders can overlap.
pub struct ReminderCoordinator {
    api: Arc<dyn ReminderApi>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<CoordinatorState>,
}

/// Releases the per-record in-flight mark even if the mutation future is dropped.
struct InFlight<'a> {
    state: &'a Mutex<CoordinatorState>,
    id: Uuid,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight.remove(&self.id);
    }
}

fn lock(state: &Mutex<CoordinatorState>) -> MutexGuard<'_, CoordinatorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReminderCoordinator {
    pub fn new(api: Arc<dyn ReminderApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(CoordinatorState::default()),
        }
    }

    /// Copy of the local list.
    pub fn reminders(&self) -> Vec<Reminder> {
        lock(&self.state).store.all().to_vec()
    }

    pub fn view(&self, view: &ViewState, today: NaiveDate) -> Vec<Reminder> {
        let state = lock(&self.state);
        derive_view(state.store.all(), view, today)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn pending_undo(&self) -> Option<UndoToken> {
        lock(&self.state)
            .pending_undo
            .as_ref()
            .map(|pending| pending.token)
    }

    /// Replaces the local list with the server's. On failure the stale list stays.
    pub async fn load(&self) -> Result<(), ClientError> {
        match self.api.list().await {
            Ok(reminders) => {
                tracing::debug!(count = reminders.len(), "reminders loaded");
                lock(&self.state).store.replace_all(reminders);
                self.notifier.success(LOADED);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading reminders failed");
                self.notifier.error(LOAD_FAILED);
                Err(err)
            }
        }
    }

    /// Quiet reload after a confirmed mutation; the mutation already stands.
    async fn refresh(&self) {
        match self.api.list().await {
            Ok(reminders) => lock(&self.state).store.replace_all(reminders),
            Err(err) => {
                tracing::warn!(error = %err, "refreshing reminders failed");
                self.notifier.error(LOAD_FAILED);
            }
        }
    }

    fn begin(&self, id: Uuid) -> Result<InFlight<'_>, ClientError> {
        if !lock(&self.state).in_flight.insert(id) {
            return Err(ClientError::MutationInFlight(id));
        }
        Ok(InFlight {
            state: &self.state,
            id,
        })
    }

    pub async fn create(&self, input: NewReminder) -> Result<Reminder, ClientError> {
        let input = match input.validated() {
            Ok(input) => input,
            Err(err) => {
                self.notifier.error(SAVE_FAILED);
                return Err(err.into());
            }
        };

        match self.api.create(&input).await {
            Ok(created) => {
                self.notifier.success(CREATED);
                self.refresh().await;
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(error = %err, "creating reminder failed");
                self.notifier.error(SAVE_FAILED);
                Err(err)
            }
        }
    }

    /// Form edit. Not optimistic: local state only changes via the refresh.
    pub async fn update(&self, id: Uuid, changes: ReminderChanges) -> Result<Reminder, ClientError> {
        let changes = match changes.validated() {
            Ok(changes) => changes,
            Err(err) => {
                self.notifier.error(SAVE_FAILED);
                return Err(err.into());
            }
        };
        let _in_flight = self.begin(id)?;

        match self.api.update(id, &changes).await {
            Ok(updated) => {
                self.notifier.success(UPDATED);
                self.refresh().await;
                Ok(updated)
            }
            Err(err) => {
                tracing::warn!(reminder_id = %id, error = %err, "updating reminder failed");
                self.notifier.error(SAVE_FAILED);
                Err(err)
            }
        }
    }

    /// Sets `completed` locally, then sends the full record with that value.
    /// Unknown ids are a no-op reported as [`ClientError::NotFound`].
    pub async fn toggle_complete(&self, id: Uuid, completed: bool) -> Result<(), ClientError> {
        if lock(&self.state).store.get(id).is_none() {
            return Err(ClientError::NotFound(id));
        }
        let _in_flight = self.begin(id)?;

        let patched = lock(&self.state)
            .store
            .apply_patch(id, |reminder| reminder.completed = completed);
        let snapshot = patched.ok_or(ClientError::NotFound(id))?;
        let changes = snapshot.reminder().with_completed(completed);

        match self.api.update(id, &changes).await {
            Ok(_) => {
                let status = if completed { "completed" } else { "pending" };
                self.notifier.success(&format!("Reminder marked as {status}"));
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(reminder_id = %id, error = %err, "toggling reminder failed");
                lock(&self.state).store.rollback(snapshot);
                self.notifier.error(STATUS_FAILED);
                Err(err)
            }
        }
    }

    /// Removes locally, then deletes on the server. On success the removed
    /// fields become the pending undo, replacing any older one.
    pub async fn delete(&self, id: Uuid) -> Result<UndoToken, ClientError> {
        let _in_flight = self.begin(id)?;
        let removed = lock(&self.state).store.remove(id);
        let snapshot = removed.ok_or(ClientError::NotFound(id))?;

        if let Err(err) = self.api.delete(id).await {
            tracing::warn!(reminder_id = %id, error = %err, "deleting reminder failed");
            lock(&self.state).store.rollback(snapshot);
            self.notifier.error(DELETE_FAILED);
            return Err(err);
        }

        let token = {
            let mut state = lock(&self.state);
            state.next_token += 1;
            let token = UndoToken(state.next_token);
            state.pending_undo = Some(PendingUndo {
                token,
                input: snapshot.reminder().to_new(),
            });
            token
        };
        self.notifier.undo_offered(DELETED, token);
        Ok(token)
    }

    /// Recreates the deleted reminder under a new id. Fails with
    /// [`ClientError::UndoUnavailable`] once the token was used or replaced.
    pub async fn undo(&self, token: UndoToken) -> Result<Reminder, ClientError> {
        let pending = {
            let mut state = lock(&self.state);
            match state.pending_undo.take() {
                Some(pending) if pending.token == token => pending,
                other => {
                    state.pending_undo = other;
                    return Err(ClientError::UndoUnavailable);
                }
            }
        };

        match self.api.create(&pending.input).await {
            Ok(restored) => {
                self.notifier.success(RESTORED);
                self.refresh().await;
                Ok(restored)
            }
            Err(err) => {
                tracing::warn!(%token, error = %err, "restoring reminder failed");
                let mut state = lock(&self.state);
                if state.pending_undo.is_none() {
                    state.pending_undo = Some(pending);
                }
                drop(state);
                self.notifier.error(RESTORE_FAILED);
                Err(err)
            }
        }
    }
}
