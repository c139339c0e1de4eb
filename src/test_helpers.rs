use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use axum::{Router, http::StatusCode, middleware};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::{
    client::{ClientError, Notifier, ReminderApi, UndoToken},
    config::AppConfig,
    middleware::{catch_panic_layer, json_error_middleware},
    models::{NewReminder, Priority, Reminder, ReminderChanges},
    routes::router,
    state::AppState,
};

/// The API router over `db`, wrapped in the same layers `main` installs.
pub fn test_router(db: DatabaseConnection) -> Router {
    let state = AppState::new(AppConfig::default(), db);
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
}

pub fn sample_reminder(name: &str, date: NaiveDate, time: &str) -> Reminder {
    let stamp = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset();
    Reminder {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("{name} details"),
        date,
        time: time.to_string(),
        priority: Priority::Medium,
        category: "general".to_string(),
        completed: false,
        created_at: stamp,
        updated_at: stamp,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create(NewReminder),
    Update(Uuid, ReminderChanges),
    Delete(Uuid),
}

#[derive(Default)]
struct FakeServer {
    reminders: Vec<Reminder>,
    calls: Vec<ApiCall>,
    failing: Vec<FailOn>,
}

/// In-memory stand-in for the HTTP API. Requests can be made to fail, and
/// with [`FakeReminderApi::hold_requests`] every mutating request parks until
/// [`FakeReminderApi::release`] is called.
#[derive(Default)]
pub struct FakeReminderApi {
    server: Mutex<FakeServer>,
    hold: Mutex<bool>,
    entered: Notify,
    released: Notify,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeReminderApi {
    pub fn with_reminders(reminders: Vec<Reminder>) -> Arc<Self> {
        let api = Self::default();
        lock(&api.server).reminders = reminders;
        Arc::new(api)
    }

    pub fn fail(&self, on: FailOn) {
        lock(&self.server).failing.push(on);
    }

    pub fn recover(&self) {
        lock(&self.server).failing.clear();
    }

    pub fn hold_requests(&self) {
        *lock(&self.hold) = true;
    }

    /// Waits until a held request has started.
    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        *lock(&self.hold) = false;
        self.released.notify_waiters();
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.server).calls.clone()
    }

    pub fn server_reminders(&self) -> Vec<Reminder> {
        lock(&self.server).reminders.clone()
    }

    async fn gate(&self) {
        let released = self.released.notified();
        if !*lock(&self.hold) {
            return;
        }
        self.entered.notify_one();
        released.await;
    }

    fn record(&self, call: ApiCall, on: FailOn) -> Result<(), ClientError> {
        let mut server = lock(&self.server);
        server.calls.push(call);
        if server.failing.contains(&on) {
            return Err(ClientError::Status {
                status: StatusCode::BAD_REQUEST,
                message: "rejected by fake server".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ReminderApi for FakeReminderApi {
    async fn list(&self) -> Result<Vec<Reminder>, ClientError> {
        self.record(ApiCall::List, FailOn::List)?;
        Ok(self.server_reminders())
    }

    async fn create(&self, input: &NewReminder) -> Result<Reminder, ClientError> {
        self.gate().await;
        self.record(ApiCall::Create(input.clone()), FailOn::Create)?;
        let mut reminder = sample_reminder(&input.name, input.date, &input.time);
        reminder.description = input.description.clone();
        reminder.priority = input.priority;
        reminder.category = input
            .category
            .clone()
            .unwrap_or_else(|| "general".to_string());
        lock(&self.server).reminders.push(reminder.clone());
        Ok(reminder)
    }

    async fn update(&self, id: Uuid, changes: &ReminderChanges) -> Result<Reminder, ClientError> {
        self.gate().await;
        self.record(ApiCall::Update(id, changes.clone()), FailOn::Update)?;
        let mut server = lock(&self.server);
        let reminder = server
            .reminders
            .iter_mut()
            .find(|reminder| reminder.id == id)
            .ok_or(ClientError::Status {
                status: StatusCode::BAD_REQUEST,
                message: "Failed to update reminder".to_string(),
            })?;
        changes.apply_to(reminder);
        Ok(reminder.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.gate().await;
        self.record(ApiCall::Delete(id), FailOn::Delete)?;
        let mut server = lock(&self.server);
        let before = server.reminders.len();
        server.reminders.retain(|reminder| reminder.id != id);
        if server.reminders.len() == before {
            return Err(ClientError::Status {
                status: StatusCode::BAD_REQUEST,
                message: "Failed to delete reminder".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Undo(String, UndoToken),
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    pub fn last(&self) -> Option<Notice> {
        lock(&self.notices).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        lock(&self.notices).push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        lock(&self.notices).push(Notice::Error(message.to_string()));
    }

    fn undo_offered(&self, message: &str, token: UndoToken) {
        lock(&self.notices).push(Notice::Undo(message.to_string(), token));
    }
}
