//! PostgreSQL profile-store adapter.
//!
//! Plain last-write-wins reads and writes over the `users` and `followers`
//! tables; no transactions are needed for the dispatcher's operations.

use async_trait::async_trait;
use sqlx::PgPool;

use savora_common::types::UserProfile;
use savora_dispatch::store::{ProfileStore, StoreError};

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let profile: Option<UserProfile> = sqlx::query_as(
            r#"
            SELECT id, name, notification_token, notifications_enabled
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError(e.to_string()))?;

        Ok(profile)
    }

    async fn follower_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT follower_id
            FROM followers
            WHERE followed_id = $1
            ORDER BY created_at, follower_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError(e.to_string()))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn clear_token(&self, user_id: &str) -> Result<(), StoreError> {
        // Unconditional SET NULL: clearing an already-cleared token is a
        // no-op, so duplicate invalidations need no coordination.
        sqlx::query("UPDATE users SET notification_token = NULL WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! DB-backed tests. Require a running PostgreSQL with `DATABASE_URL`
    //! set; run with `cargo test -p savora-relay -- --ignored`.

    use super::*;

    async fn setup(pool: &PgPool) {
        sqlx::migrate!("../../migrations").run(pool).await.unwrap();
        sqlx::query("DELETE FROM followers")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("DELETE FROM users").execute(pool).await.unwrap();
    }

    async fn insert_user(pool: &PgPool, id: &str, token: Option<&str>) {
        sqlx::query(
            "INSERT INTO users (id, name, notification_token, notifications_enabled) VALUES ($1, $2, $3, true)",
        )
        .bind(id)
        .bind(format!("name-{}", id))
        .bind(token)
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test]
    #[ignore]
    async fn test_get_profile_and_missing(pool: PgPool) {
        setup(&pool).await;
        insert_user(&pool, "u1", Some("T1")).await;
        let store = PgProfileStore::new(pool);

        let profile = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.notification_token.as_deref(), Some("T1"));
        assert_eq!(profile.notifications_enabled, Some(true));

        assert!(store.get_profile("ghost").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore]
    async fn test_follower_listing_order(pool: PgPool) {
        setup(&pool).await;
        insert_user(&pool, "author", None).await;
        for id in ["f1", "f2", "f3"] {
            insert_user(&pool, id, None).await;
            sqlx::query("INSERT INTO followers (follower_id, followed_id) VALUES ($1, $2)")
                .bind(id)
                .bind("author")
                .execute(&pool)
                .await
                .unwrap();
        }
        let store = PgProfileStore::new(pool);

        let ids = store.follower_ids("author").await.unwrap();
        assert_eq!(ids, vec!["f1", "f2", "f3"]);
    }

    #[sqlx::test]
    #[ignore]
    async fn test_clear_token_is_idempotent(pool: PgPool) {
        setup(&pool).await;
        insert_user(&pool, "u1", Some("T1")).await;
        let store = PgProfileStore::new(pool);

        store.clear_token("u1").await.unwrap();
        assert!(
            store
                .get_profile("u1")
                .await
                .unwrap()
                .unwrap()
                .notification_token
                .is_none()
        );

        // Second clear is a no-op, not an error.
        store.clear_token("u1").await.unwrap();
    }
}
