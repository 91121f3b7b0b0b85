//! Route definitions for the `/students` resource.
//!
//! Also nests the student-scoped folder, message and achievement routes.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{achievement, folder, message, student};
use crate::state::AppState;

/// Routes mounted at `/students`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// PUT    /{id}/active-folder                -> set_active_folder
/// GET    /{id}/folders                      -> folder::list_by_student
/// GET    /{id}/messages                     -> message::list_by_student
/// POST   /{id}/messages                     -> message::create
/// GET    /{id}/achievements                 -> achievement::list_by_student
/// POST   /{id}/achievements/evaluate        -> achievement::evaluate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(student::list).post(student::create))
        .route(
            "/{id}",
            get(student::get_by_id)
                .put(student::update)
                .delete(student::delete),
        )
        .route("/{id}/active-folder", put(student::set_active_folder))
        .route("/{id}/folders", get(folder::list_by_student))
        .route(
            "/{id}/messages",
            get(message::list_by_student).post(message::create),
        )
        .route("/{id}/achievements", get(achievement::list_by_student))
        .route("/{id}/achievements/evaluate", post(achievement::evaluate))
}
