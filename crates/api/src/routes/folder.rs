//! Route definitions for the `/folders` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::folder;
use crate::state::AppState;

/// Routes mounted at `/folders`.
///
/// ```text
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}?cascade=true                 -> delete
/// POST   /{id}/reconcile                    -> reconcile
/// GET    /{id}/sessions                     -> list_sessions
/// GET    /{id}/sessions/renumbered          -> renumbered_sessions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(folder::create))
        .route(
            "/{id}",
            get(folder::get_by_id)
                .put(folder::update)
                .delete(folder::delete),
        )
        .route("/{id}/reconcile", post(folder::reconcile))
        .route("/{id}/sessions", get(folder::list_sessions))
        .route(
            "/{id}/sessions/renumbered",
            get(folder::renumbered_sessions),
        )
}
