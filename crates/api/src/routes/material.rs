use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::material;
use crate::state::AppState;

/// Routes mounted at `/materials`.
///
/// ```text
/// DELETE /{id}                              -> delete
/// GET    /{id}/download                     -> download
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(material::delete))
        .route("/{id}/download", get(material::download))
}
