//! Content Event Handlers
//!
//! The content service reports creations and fetches here once the content is
//! durably stored. The authenticated caller is the author or the viewer.

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::application::dto::request::ContentEvent;
use crate::application::dto::response::EventResponse;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Handle a content event
pub async fn publish_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(event): Json<ContentEvent>,
) -> Result<Json<EventResponse>, AppError> {
    let user = auth.identity();

    let response = match event {
        ContentEvent::PostCreated { post_id, content } => {
            EventResponse::Delivered(state.hub.on_post_created(&user, post_id, content).await?)
        }
        ContentEvent::CommentCreated { post_id, content } => {
            EventResponse::Delivered(state.hub.on_comment_created(&user, post_id, content).await?)
        }
        ContentEvent::MessageCreated { room_id, content } => EventResponse::Delivered(
            state.hub.on_message_created(room_id, &user, content).await?,
        ),
        ContentEvent::Fetched { source } => {
            EventResponse::Read(state.hub.on_fetch(user.id, source).await?)
        }
        ContentEvent::RoomMembershipChanged { room_id } => {
            state.hub.on_room_membership_changed(room_id);
            EventResponse::Invalidated { room_id }
        }
    };

    Ok(Json(response))
}
