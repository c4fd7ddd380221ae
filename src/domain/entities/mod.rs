//! # Domain Entities
//!
//! - **Session**: a user's live connection, owned by the presence registry
//! - **Room**: a chat room with its membership snapshot
//! - **ReadMarker / Source**: how much of a source a viewer has consumed
//! - **PushEvent**: the payload fanned out to online users
//!
//! ## Repository Traits
//!
//! Each durable capability has a trait implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod content;
mod read_marker;
mod room;
mod session;
mod social_graph;

pub use content::{
    CommentPush, ContentBody, ContentRepository, MessagePush, PostPush, PushEvent,
};
pub use read_marker::{ReadMarker, ReadMarkerRepository, Source};
pub use room::{Room, RoomRecord};
pub use session::{Connection, Frame, PushError, Session, TransportWriteError};
pub use social_graph::{SocialGraphRepository, UserIdentity};

#[cfg(test)]
pub use content::MockContentRepository;
#[cfg(test)]
pub use read_marker::MockReadMarkerRepository;
#[cfg(test)]
pub use social_graph::MockSocialGraphRepository;
