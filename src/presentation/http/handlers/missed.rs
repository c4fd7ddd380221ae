//! Missed Count Handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Extension, State},
    Json,
};
use validator::Validate;

use crate::application::dto::request::MissedQueryRequest;
use crate::application::dto::response::MissedResponse;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Missed counts for the requested sources
pub async fn query_missed(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<MissedQueryRequest>,
) -> Result<Json<MissedResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let missed = state.hub.query_missed(auth.user_id, &body.sources).await;

    Ok(Json(MissedResponse::from(missed)))
}

/// Missed message counts for every room of the caller, keyed by room ID
pub async fn missed_rooms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<BTreeMap<i64, i64>>, AppError> {
    Ok(Json(state.hub.missed_for_rooms(auth.user_id).await?))
}

/// Missed post counts for every author the caller follows, keyed by login
pub async fn missed_posts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<BTreeMap<String, i64>>, AppError> {
    Ok(Json(state.hub.missed_for_followed(auth.user_id).await?))
}
