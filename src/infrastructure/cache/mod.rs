//! Cache Module
//!
//! In-memory registries that mirror connection and membership state.
//!
//! - `PresenceRegistry`: user ID -> live session (exclusive owner of connections)
//! - `RoomRegistry`: room ID -> membership snapshot loaded from the social graph
//!
//! Neither is authoritative: both are rebuilt from connects and store reads
//! after a restart.

mod presence_registry;
mod room_registry;

pub use presence_registry::PresenceRegistry;
pub use room_registry::RoomRegistry;
