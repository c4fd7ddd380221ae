//! Social Graph
//!
//! Durable relations the presence subsystem reads: followers, room membership
//! and login resolution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::room::RoomRecord;
use crate::shared::error::StoreError;

/// Authenticated identity of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub login: String,
}

impl UserIdentity {
    pub fn new(id: i64, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
        }
    }
}

/// Social graph store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialGraphRepository: Send + Sync {
    /// IDs of the users following `user_id`.
    async fn followers_of(&self, user_id: i64) -> Result<Vec<i64>, StoreError>;

    /// Authors that `viewer_id` follows.
    async fn following(&self, viewer_id: i64) -> Result<Vec<UserIdentity>, StoreError>;

    async fn user_id_by_login(&self, login: &str) -> Result<Option<i64>, StoreError>;

    /// IDs of the rooms `user_id` belongs to.
    async fn rooms_of(&self, user_id: i64) -> Result<Vec<i64>, StoreError>;

    /// Name and members of a room, `None` if it does not exist.
    async fn room_members(&self, room_id: i64) -> Result<Option<RoomRecord>, StoreError>;

    /// Persist a room with its members and a zero read marker per member.
    /// Returns the new room ID.
    async fn create_room(&self, name: &str, member_ids: &[i64]) -> Result<i64, StoreError>;
}
