use std::collections::HashMap;

use super::DBClient;
use crate::dtos::SavedPostDto;
use crate::models::{Post, SavedPost};
use uuid::Uuid;

/// Saved post database operations trait
pub trait SavedExt {
    /// Flip the saved state for (user, post). Returns true when the call
    /// saved the post, false when it unsaved it.
    ///
    /// Same check-then-act window as the like toggle: the unique index on
    /// (user_id, post_id) rejects the losing concurrent insert and the
    /// violation surfaces to the caller.
    async fn toggle_save(&self, user_id: Uuid, post_id: i64) -> Result<bool, sqlx::Error>;

    async fn is_saved(&self, user_id: Uuid, post_id: i64) -> Result<bool, sqlx::Error>;

    /// The caller's saved posts, most recently saved first, each with the
    /// full post embedded
    async fn get_saved_posts(&self, user_id: Uuid) -> Result<Vec<SavedPostDto>, sqlx::Error>;
}

impl SavedExt for DBClient {
    async fn toggle_save(&self, user_id: Uuid, post_id: i64) -> Result<bool, sqlx::Error> {
        let exists = self.is_saved(user_id, post_id).await?;

        if exists {
            sqlx::query("DELETE FROM saved_posts WHERE user_id = $1 AND post_id = $2")
                .bind(user_id)
                .bind(post_id)
                .execute(&self.pool)
                .await?;

            Ok(false)
        } else {
            sqlx::query("INSERT INTO saved_posts (user_id, post_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(post_id)
                .execute(&self.pool)
                .await?;

            Ok(true)
        }
    }

    async fn is_saved(&self, user_id: Uuid, post_id: i64) -> Result<bool, sqlx::Error> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM saved_posts WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn get_saved_posts(&self, user_id: Uuid) -> Result<Vec<SavedPostDto>, sqlx::Error> {
        let saved = sqlx::query_as::<_, SavedPost>(
            "SELECT * FROM saved_posts WHERE user_id = $1 ORDER BY saved_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if saved.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = saved.iter().map(|s| s.post_id).collect();
        let posts = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ANY($1)")
            .bind(&post_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut post_dtos: HashMap<i64, _> = self
            .assemble_post_dtos(posts)
            .await?
            .into_iter()
            .map(|dto| (dto.id, dto))
            .collect();

        saved
            .iter()
            .map(|entry| {
                let post = post_dtos
                    .remove(&entry.post_id)
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(SavedPostDto::from_parts(entry, post))
            })
            .collect()
    }
}
