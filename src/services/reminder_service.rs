use uuid::Uuid;

use crate::{
    db::{dao::ReminderDao, entities::reminder},
    error::AppError,
    models::{NewReminder, Reminder, ReminderChanges},
};

const FETCH_FAILED: &str = "Failed to fetch reminders";
const CREATE_FAILED: &str = "Failed to create reminder";
const UPDATE_FAILED: &str = "Failed to update reminder";
const DELETE_FAILED: &str = "Failed to delete reminder";

/// Validation and error mapping in front of [`ReminderDao`]. Write failures
/// of any kind surface as 400, read failures as 500.
#[derive(Clone)]
pub struct ReminderService {
    reminder_dao: ReminderDao,
}

impl ReminderService {
    pub fn new(reminder_dao: ReminderDao) -> Self {
        Self { reminder_dao }
    }

    pub async fn list(&self) -> Result<Vec<Reminder>, AppError> {
        let models = self.reminder_dao.list_by_due().await.map_err(|err| {
            tracing::error!(error = %err, "listing reminders failed");
            AppError::internal(FETCH_FAILED)
        })?;

        models
            .into_iter()
            .map(|model| to_reminder(model, || AppError::internal(FETCH_FAILED)))
            .collect()
    }

    pub async fn create(&self, input: NewReminder) -> Result<Reminder, AppError> {
        let input = input
            .validated()
            .map_err(|err| AppError::bad_request(err.to_string()))?;

        let model = self
            .reminder_dao
            .create_reminder(input)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "creating reminder failed");
                AppError::bad_request(CREATE_FAILED)
            })?;
        tracing::info!(reminder_id = %model.id, "reminder created");
        to_reminder(model, || AppError::bad_request(CREATE_FAILED))
    }

    pub async fn update(&self, id: &Uuid, changes: ReminderChanges) -> Result<Reminder, AppError> {
        let changes = changes
            .validated()
            .map_err(|err| AppError::bad_request(err.to_string()))?;

        let model = self
            .reminder_dao
            .update_reminder(id, changes)
            .await
            .map_err(|err| {
                tracing::warn!(reminder_id = %id, error = %err, "updating reminder failed");
                AppError::bad_request(UPDATE_FAILED)
            })?;
        to_reminder(model, || AppError::bad_request(UPDATE_FAILED))
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        self.reminder_dao.delete_reminder(id).await.map_err(|err| {
            tracing::warn!(reminder_id = %id, error = %err, "deleting reminder failed");
            AppError::bad_request(DELETE_FAILED)
        })?;
        tracing::info!(reminder_id = %id, "reminder deleted");
        Ok(())
    }
}

fn to_reminder(
    model: reminder::Model,
    on_error: impl FnOnce() -> AppError,
) -> Result<Reminder, AppError> {
    let id = model.id;
    Reminder::try_from(model).map_err(|err| {
        tracing::error!(reminder_id = %id, error = %err, "stored reminder is malformed");
        on_error()
    })
}
