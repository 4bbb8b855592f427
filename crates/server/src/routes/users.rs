use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use models::user::{StorageMeta, User};

use super::AppState;
use crate::errors::ApiError;

/// Create a record. 201 with the new entity, or 200 with the existing
/// one when the name is already taken (creation is idempotent-by-name).
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<User>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let outcome = state.store.create(&input).await?;
    let status = if outcome.was_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.record().clone())))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.store.read_all().await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<User>, ApiError> {
    let (user, _) = state.store.read_one(&name).await?;
    Ok(Json(user))
}

/// Full-document replace keyed by the entity's name. Returns the
/// storage metadata of the write; 404 when the name was never created.
pub async fn update_user(
    State(state): State<AppState>,
    Json(input): Json<User>,
) -> Result<Json<StorageMeta>, ApiError> {
    let meta = state.store.update(&input).await?;
    Ok(Json(meta))
}

/// Delete by the caller-supplied name, never a constant.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StorageMeta>, ApiError> {
    let meta = state.store.delete(&name).await?;
    Ok(Json(meta))
}

/// Storage handle of the most recently touched record, whichever
/// request touched it.
pub async fn last_touched(State(state): State<AppState>) -> Json<Option<StorageMeta>> {
    Json(state.store.last_touched())
}
