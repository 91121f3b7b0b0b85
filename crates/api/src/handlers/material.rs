//! Handlers for session materials (uploaded files).
//!
//! Bytes go to the object store; the `session_materials` row records the
//! key, size and checksum.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use bytes::Bytes;
use speakwell_core::error::CoreError;
use speakwell_core::hashing::sha256_hex;
use speakwell_core::materials::{sanitize_file_name, storage_key, validate_upload_size};
use speakwell_core::types::DbId;
use speakwell_db::models::material::{CreateSessionMaterial, SessionMaterial};
use speakwell_db::repositories::SessionMaterialRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::session::ensure_session_exists;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

async fn ensure_material_exists(pool: &PgPool, id: DbId) -> AppResult<SessionMaterial> {
    SessionMaterialRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SessionMaterial",
            id,
        }))
}

/// POST /api/v1/sessions/{session_id}/materials
///
/// Accepts a multipart form with a required `file` field.
pub async fn upload(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<SessionMaterial>>)> {
    let mut file: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some((file_name, content_type, data));
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    validate_upload_size(data.len(), state.config.max_upload_bytes)?;

    ensure_session_exists(&state.pool, session_id).await?;

    let key = storage_key(session_id, &uuid::Uuid::new_v4().to_string(), &file_name);
    let input = CreateSessionMaterial {
        session_id,
        file_name: sanitize_file_name(&file_name),
        content_type: content_type.clone(),
        size_bytes: data.len() as i64,
        sha256: sha256_hex(&data),
        storage_key: key.clone(),
    };

    state
        .store
        .put(&key, data, content_type.as_deref())
        .await?;

    let material = match SessionMaterialRepo::create(&state.pool, &input).await {
        Ok(material) => material,
        Err(e) => {
            // Do not leave an orphaned object behind.
            if let Err(cleanup) = state.store.delete(&key).await {
                tracing::warn!(key = %key, error = %cleanup, "Failed to remove orphaned object");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        material_id = material.id,
        session_id,
        size_bytes = material.size_bytes,
        "Material uploaded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: material })))
}

/// GET /api/v1/sessions/{session_id}/materials
pub async fn list_by_session(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SessionMaterial>>>> {
    ensure_session_exists(&state.pool, session_id).await?;
    let materials = SessionMaterialRepo::list_by_session(&state.pool, session_id).await?;
    Ok(Json(DataResponse { data: materials }))
}

/// GET /api/v1/materials/{id}/download
pub async fn download(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let material = ensure_material_exists(&state.pool, id).await?;
    let data = state.store.get(&material.storage_key).await?;

    let content_type = material
        .content_type
        .as_deref()
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        material.file_name.replace('"', "'")
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(data))
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// DELETE /api/v1/materials/{id}
///
/// Removes the stored object first, then the metadata row.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let material = ensure_material_exists(&state.pool, id).await?;
    state.store.delete(&material.storage_key).await?;

    if SessionMaterialRepo::delete(&state.pool, id).await?.is_some() {
        tracing::info!(material_id = id, key = %material.storage_key, "Material deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "SessionMaterial",
            id,
        }))
    }
}
