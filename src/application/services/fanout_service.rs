//! Fan-out Service
//!
//! Pushes newly created posts, comments and chat messages to every audience
//! member that is currently present.
//!
//! Delivery is best-effort and at-most-once: an absent recipient or a failed
//! write loses the event for real-time purposes. The content is already stored
//! before fan-out starts, so clients catch up through unread counts.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::domain::{
    CommentPush, ContentBody, Frame, MessagePush, PostPush, PushError, PushEvent,
    SocialGraphRepository, TransportWriteError, UserIdentity,
};
use crate::infrastructure::cache::{PresenceRegistry, RoomRegistry};
use crate::infrastructure::metrics;
use crate::shared::error::{AppError, StoreError};

/// Per-event delivery tally. Logged and exported, never shown to the sender.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub absent: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn audience(&self) -> usize {
        self.delivered + self.absent + self.failed
    }
}

/// Fan-out errors. Any of these aborts the whole event before a single push.
#[derive(Debug, thiserror::Error)]
pub enum FanoutError {
    #[error("Failed to resolve audience: {0}")]
    Store(#[from] StoreError),

    #[error("Room {0} not found")]
    RoomNotFound(i64),

    #[error("Failed to serialize push: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<FanoutError> for AppError {
    fn from(e: FanoutError) -> Self {
        match e {
            FanoutError::Store(e) => AppError::Store(e),
            FanoutError::RoomNotFound(id) => AppError::NotFound(format!("Room {} not found", id)),
            FanoutError::Serialize(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// Dispatches push events to present users.
pub struct FanoutDispatcher {
    presence: Arc<PresenceRegistry>,
    rooms: Arc<RoomRegistry>,
    graph: Arc<dyn SocialGraphRepository>,
    evict_on_closed: bool,
}

impl FanoutDispatcher {
    pub fn new(
        presence: Arc<PresenceRegistry>,
        rooms: Arc<RoomRegistry>,
        graph: Arc<dyn SocialGraphRepository>,
        evict_on_closed: bool,
    ) -> Self {
        Self {
            presence,
            rooms,
            graph,
            evict_on_closed,
        }
    }

    /// Push a new post to the author's followers.
    #[instrument(skip(self, author, body), fields(author_id = author.id))]
    pub async fn publish_post(
        &self,
        author: &UserIdentity,
        post_id: Option<String>,
        body: ContentBody,
    ) -> Result<DeliveryReport, FanoutError> {
        let followers = self.graph.followers_of(author.id).await?;

        let event = PushEvent::Post(PostPush {
            post_id,
            user_id: author.id,
            login: author.login.clone(),
            body,
        });

        self.deliver(followers.into_iter().filter(|id| *id != author.id), &event)
    }

    /// Push a new comment to the commenter's followers.
    #[instrument(skip(self, author, body), fields(author_id = author.id))]
    pub async fn publish_comment(
        &self,
        author: &UserIdentity,
        post_id: String,
        body: ContentBody,
    ) -> Result<DeliveryReport, FanoutError> {
        let followers = self.graph.followers_of(author.id).await?;

        let event = PushEvent::Comment(CommentPush {
            post_id,
            user_id: author.id,
            login: author.login.clone(),
            body,
        });

        self.deliver(followers.into_iter().filter(|id| *id != author.id), &event)
    }

    /// Push a chat message to the other members of the room.
    #[instrument(skip(self, sender, body), fields(sender_id = sender.id))]
    pub async fn publish_message(
        &self,
        room_id: i64,
        sender: &UserIdentity,
        body: ContentBody,
    ) -> Result<DeliveryReport, FanoutError> {
        let room = self
            .rooms
            .get_or_load(room_id)
            .await?
            .ok_or(FanoutError::RoomNotFound(room_id))?;

        let event = PushEvent::Message(MessagePush {
            room_id,
            user_id: sender.id,
            login: sender.login.clone(),
            body,
        });

        self.deliver(room.audience_excluding(sender.id), &event)
    }

    /// Serialize once and push to each present audience member.
    ///
    /// A failure for one recipient never stops delivery to the others.
    fn deliver(
        &self,
        audience: impl IntoIterator<Item = i64>,
        event: &PushEvent,
    ) -> Result<DeliveryReport, FanoutError> {
        let frame = event.to_frame()?;
        let kind = event.kind();
        let audience: BTreeSet<i64> = audience.into_iter().collect();

        let mut report = DeliveryReport::default();
        for user_id in audience {
            match self.push_to(user_id, &frame) {
                Ok(()) => {
                    report.delivered += 1;
                    metrics::record_push(kind, "delivered");
                }
                Err(PushError::NotPresent) => {
                    report.absent += 1;
                    metrics::record_push(kind, "absent");
                }
                Err(PushError::Transport(_)) => {
                    report.failed += 1;
                    metrics::record_push(kind, "failed");
                }
            }
        }

        tracing::debug!(
            kind = kind,
            source = %event.source(),
            delivered = report.delivered,
            absent = report.absent,
            failed = report.failed,
            "Fan-out complete"
        );

        Ok(report)
    }

    /// Push one frame to one user, if present.
    pub fn push_to(&self, user_id: i64, frame: &Frame) -> Result<(), PushError> {
        let session = self.presence.lookup(user_id).ok_or(PushError::NotPresent)?;

        session.push(Arc::clone(frame)).map_err(|e| {
            tracing::warn!(
                user_id = user_id,
                connection_id = %session.connection_id(),
                error = %e,
                "Push failed"
            );
            if e == TransportWriteError::Closed
                && self.evict_on_closed
                && self.presence.unregister(user_id, session.connection_id())
            {
                metrics::record_eviction();
                tracing::info!(user_id = user_id, "Evicted session with closed connection");
            }
            PushError::from(e)
        })
    }
}
