use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AppError,
    state::AppState,
    store::{FieldValue, ScoreFields, UserRecord},
    utils::{get_payload, require, require_text},
};

pub const BANNER: &str = "✅ Server running - visit /version.json to see the version";

#[derive(Serialize)]
pub struct VersionInfo {
    version: String,
    url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    user_id: Option<String>,
    username: Option<String>,
}

#[derive(Serialize)]
pub struct Created {
    message: String,
    user: UserRecord,
}

#[derive(Deserialize)]
pub struct FieldUpdate {
    field: Option<String>,
    value: Option<FieldValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRename {
    old_field: Option<String>,
    new_field: Option<String>,
}

pub async fn version_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(VersionInfo {
        version: state.config.version.clone(),
        url: state.config.project_url.clone(),
    })
}

pub async fn root_handler() -> &'static str {
    BANNER
}

pub async fn leaderboard_handler(State(state): State<Arc<AppState>>) -> Json<Vec<UserRecord>> {
    Json(state.store.read().await.list_all())
}

pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserRecord>, AppError> {
    let user = state.store.read().await.find(&user_id)?.clone();

    Ok(Json(user))
}

pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let NewUser { user_id, username } = get_payload(payload)?;
    let user_id = require_text(user_id, "userId")?;
    let username = require_text(username, "username")?;

    let user = state.store.write().await.create(&user_id, &username)?;
    info!("Registered user {user_id}");

    let body = Created {
        message: format!("User '{user_id}' created"),
        user,
    };

    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn list_scores_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ScoreFields>, AppError> {
    let fields = state
        .store
        .read()
        .await
        .get_all_score_fields(&user_id)?
        .clone();

    Ok(Json(fields))
}

pub async fn get_score_handler(
    State(state): State<Arc<AppState>>,
    Path((user_id, field_name)): Path<(String, String)>,
) -> Result<Json<FieldValue>, AppError> {
    let value = state
        .store
        .read()
        .await
        .get_score_field(&user_id, &field_name)?
        .clone();

    Ok(Json(value))
}

pub async fn set_score_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    payload: Result<Json<FieldUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let FieldUpdate { field, value } = get_payload(payload)?;
    let field = require_text(field, "field")?;
    let value = require(value, "value")?;

    let message = format!("Score field '{field}' set to {value} for user '{user_id}'");
    state
        .store
        .write()
        .await
        .set_score_field(&user_id, &field, value)?;

    #[cfg(feature = "verbose")]
    info!("{message}");

    Ok((StatusCode::OK, message))
}

pub async fn rename_score_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    payload: Result<Json<FieldRename>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let FieldRename {
        old_field,
        new_field,
    } = get_payload(payload)?;
    let old_field = require_text(old_field, "oldField")?;
    let new_field = require_text(new_field, "newField")?;

    state
        .store
        .write()
        .await
        .rename_score_field(&user_id, &old_field, &new_field)?;

    let message =
        format!("Score field '{old_field}' renamed to '{new_field}' for user '{user_id}'");

    #[cfg(feature = "verbose")]
    info!("{message}");

    Ok((StatusCode::OK, message))
}

pub async fn set_profile_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    payload: Result<Json<FieldUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let FieldUpdate { field, value } = get_payload(payload)?;
    let field = require_text(field, "field")?;
    let value = require(value, "value")?.to_string();

    let message = format!("Profile field '{field}' set to '{value}' for user '{user_id}'");
    state
        .store
        .write()
        .await
        .set_profile_field(&user_id, &field, value)?;

    #[cfg(feature = "verbose")]
    info!("{message}");

    Ok((StatusCode::OK, message))
}
