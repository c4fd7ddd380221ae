//! Presence Service
//!
//! Entry points the rest of the backend calls: connection lifecycle, content
//! creation hooks and unread queries. Wires the registries, the fan-out
//! dispatcher and the unread reconciler together.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use super::fanout_service::{DeliveryReport, FanoutDispatcher, FanoutError};
use super::unread_service::UnreadReconciler;
use crate::config::PresenceSettings;
use crate::domain::{
    Connection, ContentBody, ContentRepository, ReadMarker, ReadMarkerRepository, Room,
    SocialGraphRepository, Source, UserIdentity,
};
use crate::infrastructure::cache::{PresenceRegistry, RoomRegistry};
use crate::shared::error::StoreError;

/// Presence and fan-out facade.
pub struct PresenceHub {
    presence: Arc<PresenceRegistry>,
    rooms: Arc<RoomRegistry>,
    graph: Arc<dyn SocialGraphRepository>,
    dispatcher: FanoutDispatcher,
    reconciler: UnreadReconciler,
}

impl PresenceHub {
    pub fn new(
        graph: Arc<dyn SocialGraphRepository>,
        content: Arc<dyn ContentRepository>,
        markers: Arc<dyn ReadMarkerRepository>,
        settings: &PresenceSettings,
    ) -> Self {
        let presence = Arc::new(PresenceRegistry::new());
        let rooms = Arc::new(RoomRegistry::new(
            Arc::clone(&graph),
            settings.room_cache_ttl(),
        ));
        let dispatcher = FanoutDispatcher::new(
            Arc::clone(&presence),
            Arc::clone(&rooms),
            Arc::clone(&graph),
            settings.evict_on_closed,
        );
        let reconciler = UnreadReconciler::new(
            content,
            markers,
            Arc::clone(&graph),
            settings.clamp_negative_unread,
        );

        Self {
            presence,
            rooms,
            graph,
            dispatcher,
            reconciler,
        }
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Register the user's connection and warm the room cache with their rooms.
    ///
    /// The registry keeps its own handle; the caller keeps `connection` for as
    /// long as the socket lives, so a later reconnect that replaces this
    /// session never closes its queue.
    ///
    /// Store failures while attaching rooms are logged and never fail the
    /// connect. Returns the number of rooms attached.
    pub async fn on_connect(&self, user: &UserIdentity, connection: &Connection) -> usize {
        self.presence
            .register(user.id, user.login.clone(), connection.clone());

        let room_ids = match self.graph.rooms_of(user.id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Failed to list rooms on connect");
                return 0;
            }
        };

        let mut attached = 0;
        for room_id in room_ids {
            match self.rooms.get_or_load(room_id).await {
                Ok(Some(_)) => attached += 1,
                Ok(None) => tracing::debug!(room_id = room_id, "Listed room no longer exists"),
                Err(e) => tracing::warn!(
                    user_id = user.id,
                    room_id = room_id,
                    error = %e,
                    "Failed to load room on connect"
                ),
            }
        }

        tracing::info!(user_id = user.id, rooms = attached, "User connected");
        attached
    }

    /// Called when a connection's read loop ends.
    pub fn on_disconnect(&self, user_id: i64, connection_id: Uuid) -> bool {
        let removed = self.presence.unregister(user_id, connection_id);
        if removed {
            tracing::info!(user_id = user_id, "User disconnected");
        }
        removed
    }

    pub async fn on_post_created(
        &self,
        author: &UserIdentity,
        post_id: Option<String>,
        body: ContentBody,
    ) -> Result<DeliveryReport, FanoutError> {
        self.dispatcher.publish_post(author, post_id, body).await
    }

    pub async fn on_comment_created(
        &self,
        author: &UserIdentity,
        post_id: String,
        body: ContentBody,
    ) -> Result<DeliveryReport, FanoutError> {
        self.dispatcher.publish_comment(author, post_id, body).await
    }

    pub async fn on_message_created(
        &self,
        room_id: i64,
        sender: &UserIdentity,
        body: ContentBody,
    ) -> Result<DeliveryReport, FanoutError> {
        self.dispatcher.publish_message(room_id, sender, body).await
    }

    /// The viewer fetched the source's content list.
    pub async fn on_fetch(&self, viewer_id: i64, source: Source) -> Result<ReadMarker, StoreError> {
        self.reconciler.mark_read(viewer_id, source).await
    }

    /// Membership of a room changed in the store.
    pub fn on_room_membership_changed(&self, room_id: i64) {
        self.rooms.invalidate(room_id);
    }

    pub async fn create_room(
        &self,
        name: &str,
        member_logins: &[String],
    ) -> Result<Arc<Room>, StoreError> {
        self.rooms.create(name, member_logins).await
    }

    pub async fn query_missed(&self, viewer_id: i64, sources: &[Source]) -> BTreeMap<Source, i64> {
        self.reconciler.query_missed(viewer_id, sources).await
    }

    pub async fn missed_for_rooms(&self, viewer_id: i64) -> Result<BTreeMap<i64, i64>, StoreError> {
        self.reconciler.missed_for_rooms(viewer_id).await
    }

    pub async fn missed_for_followed(
        &self,
        viewer_id: i64,
    ) -> Result<BTreeMap<String, i64>, StoreError> {
        self.reconciler.missed_for_followed(viewer_id).await
    }
}
