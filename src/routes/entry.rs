use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{health, reminders};

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(reminders::router(state));

    Router::new().nest(API_PREFIX, api)
}
