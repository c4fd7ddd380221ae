//! Unread Service
//!
//! Pull-based reconciliation between content counts and read markers. This is
//! how a client learns about anything it missed while it was not connected.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use crate::domain::{
    ContentRepository, ReadMarker, ReadMarkerRepository, SocialGraphRepository, Source,
};
use crate::shared::error::StoreError;

/// Computes and updates per-(viewer, source) unread counts.
pub struct UnreadReconciler {
    content: Arc<dyn ContentRepository>,
    markers: Arc<dyn ReadMarkerRepository>,
    graph: Arc<dyn SocialGraphRepository>,
    clamp_negative: bool,
}

impl UnreadReconciler {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        markers: Arc<dyn ReadMarkerRepository>,
        graph: Arc<dyn SocialGraphRepository>,
        clamp_negative: bool,
    ) -> Self {
        Self {
            content,
            markers,
            graph,
            clamp_negative,
        }
    }

    /// Items of `source` the viewer has not seen: total minus the read marker.
    ///
    /// A marker above the total (content was deleted) yields zero when
    /// clamping is on and the negative difference otherwise.
    #[instrument(skip(self))]
    pub async fn missed_count(&self, viewer_id: i64, source: Source) -> Result<i64, StoreError> {
        let total = self.content.count(source).await?;
        let read = self.markers.get(viewer_id, source).await?.unwrap_or(0);
        let missed = total - read;

        if missed < 0 {
            tracing::debug!(
                viewer_id = viewer_id,
                source = %source,
                total = total,
                read = read,
                "Read marker ahead of content count"
            );
            if self.clamp_negative {
                return Ok(0);
            }
        }
        Ok(missed)
    }

    /// Record that the viewer has seen everything `source` currently holds.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, viewer_id: i64, source: Source) -> Result<ReadMarker, StoreError> {
        let total = self.content.count(source).await?;
        self.markers.set(viewer_id, source, total).await?;
        Ok(ReadMarker {
            viewer_id,
            source,
            count: total,
        })
    }

    /// Missed counts for each requested source.
    ///
    /// A source whose counts cannot be read is logged and left out.
    pub async fn query_missed(&self, viewer_id: i64, sources: &[Source]) -> BTreeMap<Source, i64> {
        let mut missed = BTreeMap::new();
        for &source in sources {
            match self.missed_count(viewer_id, source).await {
                Ok(count) => {
                    missed.insert(source, count);
                }
                Err(e) => tracing::warn!(
                    viewer_id = viewer_id,
                    source = %source,
                    error = %e,
                    "Skipping source in missed query"
                ),
            }
        }
        missed
    }

    /// Missed message counts for every room the viewer belongs to, by room ID.
    pub async fn missed_for_rooms(&self, viewer_id: i64) -> Result<BTreeMap<i64, i64>, StoreError> {
        let rooms: Vec<Source> = self
            .graph
            .rooms_of(viewer_id)
            .await?
            .into_iter()
            .map(Source::Room)
            .collect();

        Ok(self
            .query_missed(viewer_id, &rooms)
            .await
            .into_iter()
            .map(|(source, count)| (source.id(), count))
            .collect())
    }

    /// Missed post counts for every author the viewer follows, by author login.
    pub async fn missed_for_followed(
        &self,
        viewer_id: i64,
    ) -> Result<BTreeMap<String, i64>, StoreError> {
        let authors = self.graph.following(viewer_id).await?;

        let mut missed = BTreeMap::new();
        for author in authors {
            match self.missed_count(viewer_id, Source::Author(author.id)).await {
                Ok(count) => {
                    missed.insert(author.login, count);
                }
                Err(e) => tracing::warn!(
                    viewer_id = viewer_id,
                    author_id = author.id,
                    error = %e,
                    "Skipping author in missed query"
                ),
            }
        }
        Ok(missed)
    }
}
