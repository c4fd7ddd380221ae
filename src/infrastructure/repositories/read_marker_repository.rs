//! Read Marker Repository Implementation
//!
//! Author markers live in `followers.read`, room markers in `read_msg.count`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{ReadMarkerRepository, Source};
use crate::shared::error::StoreError;

/// PostgreSQL read marker repository.
#[derive(Clone)]
pub struct PgReadMarkerRepository {
    pool: PgPool,
}

impl PgReadMarkerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadMarkerRepository for PgReadMarkerRepository {
    async fn get(&self, viewer_id: i64, source: Source) -> Result<Option<i64>, StoreError> {
        let query = match source {
            Source::Author(_) => "SELECT read FROM followers WHERE user_id = $1 AND follower_id = $2",
            Source::Room(_) => "SELECT count FROM read_msg WHERE room_id = $1 AND user_id = $2",
        };

        let count = sqlx::query_scalar::<_, i64>(query)
            .bind(source.id())
            .bind(viewer_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(count)
    }

    async fn set(&self, viewer_id: i64, source: Source, count: i64) -> Result<(), StoreError> {
        let query = match source {
            // Only followers carry a marker for an author.
            Source::Author(_) => {
                "UPDATE followers SET read = $3 WHERE user_id = $1 AND follower_id = $2"
            }
            Source::Room(_) => {
                r#"
                INSERT INTO read_msg (room_id, user_id, count) VALUES ($1, $2, $3)
                ON CONFLICT (room_id, user_id) DO UPDATE SET count = EXCLUDED.count
                "#
            }
        };

        sqlx::query(query)
            .bind(source.id())
            .bind(viewer_id)
            .bind(count)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
