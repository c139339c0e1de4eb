use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    error::{ApiResult, AppError},
    models::{NewReminder, Reminder, ReminderChanges},
    services::{ReminderService, ServiceContext},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/reminders", get(list_reminders).post(create_reminder))
        .route(
            "/reminders/{id}",
            put(update_reminder).delete(delete_reminder),
        )
        .with_state(state)
}

async fn list_reminders(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Reminder>>> {
    let reminders = reminder_service(&state).list().await?;
    Ok(Json(reminders))
}

async fn create_reminder(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewReminder>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Reminder>)> {
    let Json(body) = payload.map_err(reject_payload)?;
    let reminder = reminder_service(&state).create(body).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

async fn update_reminder(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ReminderChanges>, JsonRejection>,
) -> ApiResult<Json<Reminder>> {
    let id = reminder_id(id)?;
    let Json(body) = payload.map_err(reject_payload)?;
    let reminder = reminder_service(&state).update(&id, body).await?;
    Ok(Json(reminder))
}

async fn delete_reminder(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = reminder_id(id)?;
    reminder_service(&state).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn reminder_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::bad_request("Invalid reminder id"))
}

fn reject_payload(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

fn reminder_service(state: &AppState) -> ReminderService {
    ServiceContext::from_state(state).reminder()
}
