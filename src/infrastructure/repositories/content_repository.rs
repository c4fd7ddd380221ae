//! Content Repository Implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{ContentRepository, Source};
use crate::shared::error::StoreError;

/// PostgreSQL content repository counting `posts` by author and `messages` by room.
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn count(&self, source: Source) -> Result<i64, StoreError> {
        let query = match source {
            Source::Author(_) => "SELECT COUNT(*) FROM posts WHERE user_id = $1",
            Source::Room(_) => "SELECT COUNT(*) FROM messages WHERE room_id = $1",
        };

        let count = sqlx::query_scalar::<_, i64>(query)
            .bind(source.id())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
