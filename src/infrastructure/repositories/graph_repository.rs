//! Social Graph Repository Implementation
//!
//! PostgreSQL implementation of the SocialGraphRepository trait over the
//! `users`, `followers`, `rooms`, `urooms` and `read_msg` tables.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{RoomRecord, SocialGraphRepository, UserIdentity};
use crate::shared::error::StoreError;

#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    name: String,
    members: Vec<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    login: String,
}

/// PostgreSQL social graph repository.
#[derive(Clone)]
pub struct PgGraphRepository {
    pool: PgPool,
}

impl PgGraphRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialGraphRepository for PgGraphRepository {
    async fn followers_of(&self, user_id: i64) -> Result<Vec<i64>, StoreError> {
        let followers = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT follower_id FROM followers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(followers)
    }

    async fn following(&self, viewer_id: i64) -> Result<Vec<UserIdentity>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT users.id, users.login
            FROM users
            JOIN followers ON users.id = followers.user_id
            WHERE followers.follower_id = $1
            ORDER BY users.login
            "#,
        )
        .bind(viewer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserIdentity::new(r.id, r.login))
            .collect())
    }

    async fn user_id_by_login(&self, login: &str) -> Result<Option<i64>, StoreError> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }

    async fn rooms_of(&self, user_id: i64) -> Result<Vec<i64>, StoreError> {
        let rooms = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT room_id FROM urooms
            WHERE user_id = $1
            ORDER BY room_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    async fn room_members(&self, room_id: i64) -> Result<Option<RoomRecord>, StoreError> {
        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT rooms.name,
                   COALESCE(
                       array_agg(urooms.user_id) FILTER (WHERE urooms.user_id IS NOT NULL),
                       '{}'
                   ) AS members
            FROM rooms
            LEFT JOIN urooms ON rooms.id = urooms.room_id
            WHERE rooms.id = $1
            GROUP BY rooms.id, rooms.name
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| RoomRecord {
            name: r.name,
            members: r.members,
        }))
    }

    async fn create_room(&self, name: &str, member_ids: &[i64]) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let room_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO rooms (name) VALUES ($1) RETURNING id",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        for &user_id in member_ids {
            sqlx::query("INSERT INTO urooms (room_id, user_id) VALUES ($1, $2)")
                .bind(room_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

            sqlx::query("INSERT INTO read_msg (room_id, user_id, count) VALUES ($1, $2, 0)")
                .bind(room_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(room_id)
    }
}
