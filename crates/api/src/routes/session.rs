//! Route definitions for the `/sessions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{material, session};
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// POST   /{id}/status                       -> change_status
/// POST   /{id}/paid                         -> set_paid
/// GET    /{id}/materials                    -> material::list_by_session
/// POST   /{id}/materials                    -> material::upload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(session::get_by_id)
                .put(session::update)
                .delete(session::delete),
        )
        .route("/{id}/status", post(session::change_status))
        .route("/{id}/paid", post(session::set_paid))
        .route(
            "/{id}/materials",
            get(material::list_by_session).post(material::upload),
        )
}
