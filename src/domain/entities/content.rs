//! Content Push Payloads
//!
//! Posts, comments and chat messages as pushed to online users, plus the
//! content store capability used for unread reconciliation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::read_marker::Source;
use super::session::Frame;
use crate::shared::error::StoreError;

/// User-authored content fields shared by every kind of push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBody {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl ContentBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPush {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    pub user_id: i64,
    pub login: String,
    #[serde(flatten)]
    pub body: ContentBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPush {
    pub post_id: String,
    pub user_id: i64,
    pub login: String,
    #[serde(flatten)]
    pub body: ContentBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePush {
    pub room_id: i64,
    pub user_id: i64,
    pub login: String,
    #[serde(flatten)]
    pub body: ContentBody,
}

/// A real-time event, discriminated on the wire by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum PushEvent {
    #[serde(rename = "post")]
    Post(PostPush),
    #[serde(rename = "comment")]
    Comment(CommentPush),
    #[serde(rename = "msg")]
    Message(MessagePush),
}

impl PushEvent {
    /// Wire discriminator, also used as the metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            PushEvent::Post(_) => "post",
            PushEvent::Comment(_) => "comment",
            PushEvent::Message(_) => "msg",
        }
    }

    /// Where the underlying content lives, for unread reconciliation.
    pub fn source(&self) -> Source {
        match self {
            PushEvent::Post(p) => Source::Author(p.user_id),
            PushEvent::Comment(c) => Source::Author(c.user_id),
            PushEvent::Message(m) => Source::Room(m.room_id),
        }
    }

    pub fn to_frame(&self) -> Result<Frame, serde_json::Error> {
        serde_json::to_string(self).map(Frame::from)
    }
}

/// Content store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Number of items the source has produced.
    async fn count(&self, source: Source) -> Result<i64, StoreError>;
}
