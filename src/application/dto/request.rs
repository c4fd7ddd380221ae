//! Request DTOs
//!
//! Data structures for API request bodies. Variants are resolved here, at the
//! transport boundary, so services only see typed input.

use serde::Deserialize;
use validator::Validate;

use crate::domain::{ContentBody, Source};

/// Notification from the content service that something happened.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentEvent {
    /// The caller created a post.
    PostCreated {
        #[serde(default)]
        post_id: Option<String>,
        content: ContentBody,
    },

    /// The caller commented on a post.
    CommentCreated { post_id: String, content: ContentBody },

    /// The caller sent a message to a room.
    MessageCreated { room_id: i64, content: ContentBody },

    /// The caller fetched the content list of a source.
    Fetched { source: Source },

    /// Membership of a room changed.
    RoomMembershipChanged { room_id: i64 },
}

/// Create room request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Logins of the other members; the caller is always added.
    #[serde(default)]
    #[validate(length(max = 500, message = "At most 500 members"))]
    pub users: Vec<String>,
}

/// Missed count query
#[derive(Debug, Deserialize, Validate)]
pub struct MissedQueryRequest {
    #[validate(length(min = 1, max = 200, message = "Between 1 and 200 sources"))]
    pub sources: Vec<Source>,
}
