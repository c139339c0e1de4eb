use reqwest::StatusCode;
use uuid::Uuid;

use crate::models::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("reminder {0} is not loaded")]
    NotFound(Uuid),
    #[error("reminder {0} already has a change in flight")]
    MutationInFlight(Uuid),
    #[error("undo is no longer available")]
    UndoUnavailable,
}
