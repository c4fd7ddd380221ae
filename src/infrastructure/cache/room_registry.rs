//! Room Registry
//!
//! Caches room membership so a chat message does not re-query the social
//! graph for its audience.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::instrument;

use crate::domain::{Room, SocialGraphRepository};
use crate::infrastructure::metrics;
use crate::shared::error::StoreError;

struct CachedRoom {
    room: Arc<Room>,
    loaded_at: Instant,
}

/// Room cache backed by the social graph store.
///
/// Entries are membership snapshots. With no TTL they live until
/// [`RoomRegistry::invalidate`] is called; concurrent first loads of the same
/// room may both query the store, and the last insert wins.
pub struct RoomRegistry {
    graph: Arc<dyn SocialGraphRepository>,
    rooms: RwLock<HashMap<i64, CachedRoom>>,
    ttl: Option<Duration>,
}

impl RoomRegistry {
    pub fn new(graph: Arc<dyn SocialGraphRepository>, ttl: Option<Duration>) -> Self {
        Self {
            graph,
            rooms: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Cached room, if present and not expired.
    pub fn cached(&self, room_id: i64) -> Option<Arc<Room>> {
        let rooms = self.rooms.read();
        let entry = rooms.get(&room_id)?;
        if self.is_expired(entry) {
            return None;
        }
        Some(Arc::clone(&entry.room))
    }

    /// Return the cached room or load it from the store.
    ///
    /// `Ok(None)` means the room does not exist.
    #[instrument(skip(self))]
    pub async fn get_or_load(&self, room_id: i64) -> Result<Option<Arc<Room>>, StoreError> {
        if let Some(room) = self.cached(room_id) {
            metrics::record_room_lookup("hit");
            return Ok(Some(room));
        }

        let Some(record) = self.graph.room_members(room_id).await? else {
            metrics::record_room_lookup("miss");
            tracing::debug!(room_id = room_id, "Room not found in store");
            return Ok(None);
        };

        metrics::record_room_lookup("load");
        let room = self.insert(Room::new(room_id, record.name, record.members));
        tracing::debug!(
            room_id = room_id,
            members = room.members.len(),
            "Room loaded into cache"
        );
        Ok(Some(room))
    }

    /// Create a room from member logins and cache it immediately.
    ///
    /// Unknown logins are skipped. Each member gets a zero read marker.
    #[instrument(skip(self, member_logins), fields(members = member_logins.len()))]
    pub async fn create(&self, name: &str, member_logins: &[String]) -> Result<Arc<Room>, StoreError> {
        let mut member_ids = BTreeSet::new();
        for login in member_logins {
            match self.graph.user_id_by_login(login).await? {
                Some(id) => {
                    member_ids.insert(id);
                }
                None => tracing::warn!(login = %login, "Skipping unknown room member"),
            }
        }

        let member_ids: Vec<i64> = member_ids.into_iter().collect();
        let room_id = self.graph.create_room(name, &member_ids).await?;

        let room = self.insert(Room::new(room_id, name, member_ids));
        tracing::info!(room_id = room_id, members = room.members.len(), "Room created");
        Ok(room)
    }

    /// Put a room into the cache, replacing any previous snapshot.
    pub fn insert(&self, room: Room) -> Arc<Room> {
        let room = Arc::new(room);
        self.rooms.write().insert(
            room.id,
            CachedRoom {
                room: Arc::clone(&room),
                loaded_at: Instant::now(),
            },
        );
        room
    }

    /// Drop the cached snapshot so the next lookup reloads membership.
    pub fn invalidate(&self, room_id: i64) -> bool {
        let removed = self.rooms.write().remove(&room_id).is_some();
        if removed {
            tracing::debug!(room_id = room_id, "Room cache invalidated");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.rooms.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &CachedRoom) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.loaded_at.elapsed() >= ttl)
    }
}
