//! Room Entity

use std::collections::BTreeSet;

use serde::Serialize;

/// A chat room and the membership snapshot taken when it was cached.
///
/// `members` is not refreshed when membership changes in the store; the room
/// registry has to be invalidated for a later change to become visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[serde(rename = "users")]
    pub members: BTreeSet<i64>,
}

impl Room {
    pub fn new(id: i64, name: impl Into<String>, members: impl IntoIterator<Item = i64>) -> Self {
        Self {
            id,
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.members.contains(&user_id)
    }

    /// Members who should receive something `sender_id` posted.
    pub fn audience_excluding(&self, sender_id: i64) -> impl Iterator<Item = i64> + '_ {
        self.members.iter().copied().filter(move |id| *id != sender_id)
    }
}

/// Room row plus membership as read from the social graph store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRecord {
    pub name: String,
    pub members: Vec<i64>,
}
