use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::message;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// DELETE /{id}                              -> delete
/// POST   /{id}/read                         -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(message::delete))
        .route("/{id}/read", post(message::mark_read))
}
