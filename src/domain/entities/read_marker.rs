//! Read Marker Entity
//!
//! Per-(viewer, source) counter of consumed content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::StoreError;

/// Something whose content a viewer reads: a followed author's posts or a
/// room's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Source {
    Author(i64),
    Room(i64),
}

impl Source {
    pub fn id(&self) -> i64 {
        match self {
            Source::Author(id) | Source::Room(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::Author(_) => "author",
            Source::Room(_) => "room",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// How many of a source's items a viewer has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadMarker {
    pub viewer_id: i64,
    pub source: Source,
    pub count: i64,
}

/// Read marker storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadMarkerRepository: Send + Sync {
    /// Stored count, or `None` when no marker exists for the pair.
    async fn get(&self, viewer_id: i64, source: Source) -> Result<Option<i64>, StoreError>;

    /// Overwrite the stored count for the pair.
    async fn set(&self, viewer_id: i64, source: Source, count: i64) -> Result<(), StoreError>;
}
