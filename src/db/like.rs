use super::DBClient;
use uuid::Uuid;

/// Post like database operations trait
pub trait LikeExt {
    /// Flip the like state for (post, user). Returns true when the call
    /// created a like, false when it removed one.
    ///
    /// Check-then-act: two concurrent toggles can both read the same
    /// state. The unique index on (post_id, user_id) rejects the losing
    /// insert and the violation surfaces to the caller instead of being
    /// retried here.
    async fn toggle_like(&self, post_id: i64, user_id: Uuid) -> Result<bool, sqlx::Error>;

    async fn get_like_count(&self, post_id: i64) -> Result<i64, sqlx::Error>;

    async fn is_liked(&self, post_id: i64, user_id: Uuid) -> Result<bool, sqlx::Error>;
}

impl LikeExt for DBClient {
    async fn toggle_like(&self, post_id: i64, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists = self.is_liked(post_id, user_id).await?;

        if exists {
            sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
                .bind(post_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

            Ok(false)
        } else {
            sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

            Ok(true)
        }
    }

    async fn get_like_count(&self, post_id: i64) -> Result<i64, sqlx::Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn is_liked(&self, post_id: i64, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM post_likes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
