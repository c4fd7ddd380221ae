//! Room Handlers

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::CreateRoomRequest;
use crate::domain::Room;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create a chat room. The caller is always a member.
pub async fn create_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut logins = body.users;
    if !logins.contains(&auth.login) {
        logins.push(auth.login.clone());
    }

    let room = state.hub.create_room(&body.name, &logins).await?;

    Ok((StatusCode::CREATED, Json(Room::clone(&room))))
}
