//! Response DTOs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::application::services::DeliveryReport;
use crate::domain::{ReadMarker, Source};

/// Result of handling a content event.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EventResponse {
    Delivered(DeliveryReport),
    Read(ReadMarker),
    Invalidated { room_id: i64 },
}

/// Missed counts split by source kind, keyed by source ID.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct MissedResponse {
    pub authors: BTreeMap<i64, i64>,
    pub rooms: BTreeMap<i64, i64>,
}

impl From<BTreeMap<Source, i64>> for MissedResponse {
    fn from(missed: BTreeMap<Source, i64>) -> Self {
        let mut response = Self::default();
        for (source, count) in missed {
            match source {
                Source::Author(id) => response.authors.insert(id, count),
                Source::Room(id) => response.rooms.insert(id, count),
            };
        }
        response
    }
}
