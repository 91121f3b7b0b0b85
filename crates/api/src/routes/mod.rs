pub mod folder;
pub mod health;
pub mod material;
pub mod message;
pub mod session;
pub mod student;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /students                                   list, create
/// /students/{id}                              get, update, delete
/// /students/{id}/active-folder                set active folder (PUT)
/// /students/{id}/folders                      list folders
/// /students/{id}/messages                     list, post
/// /students/{id}/achievements                 trophies + unread badge
/// /students/{id}/achievements/evaluate        re-evaluate milestones (POST)
///
/// /folders                                    create with sessions (POST)
/// /folders/{id}                               get, update, delete (?cascade=true)
/// /folders/{id}/reconcile                     recompute counts (POST)
/// /folders/{id}/sessions                      list sessions
/// /folders/{id}/sessions/renumbered           contiguous display view
///
/// /sessions/{id}                              get, update, delete
/// /sessions/{id}/status                       status transition (POST)
/// /sessions/{id}/paid                         set paid flag (POST)
/// /sessions/{id}/materials                    list, upload
///
/// /materials/{id}                             delete
/// /materials/{id}/download                    download bytes
///
/// /messages/{id}                              delete
/// /messages/{id}/read                         mark read (POST)
///
/// /achievements/catalog                       milestone definitions
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/students", student::router())
        .nest("/folders", folder::router())
        .nest("/sessions", session::router())
        .nest("/materials", material::router())
        .nest("/messages", message::router())
        .route("/achievements/catalog", get(handlers::achievement::catalog))
}
