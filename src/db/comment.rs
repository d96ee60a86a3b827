use std::collections::HashMap;

use super::DBClient;
use crate::dtos::CommentDto;
use crate::models::{Comment, User};
use uuid::Uuid;

/// Comment database operations trait
pub trait CommentExt {
    /// Comments under a post, oldest first, with author embedded
    async fn get_comments_by_post(&self, post_id: i64) -> Result<Vec<CommentDto>, sqlx::Error>;

    /// Raw comment row (ownership checks need user_id)
    async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>, sqlx::Error>;

    /// Create a new comment on a post
    async fn save_comment(
        &self,
        user_id: Uuid,
        post_id: i64,
        content: &str,
    ) -> Result<CommentDto, sqlx::Error>;

    /// Update comment content; the caller has already checked ownership
    async fn edit_comment(&self, comment_id: i64, content: &str)
    -> Result<CommentDto, sqlx::Error>;

    /// Delete a comment with its replies and reports in one transaction
    async fn delete_comment(&self, comment_id: i64) -> Result<(), sqlx::Error>;

    /// Total number of comments (admin stats)
    async fn get_comment_count(&self) -> Result<i64, sqlx::Error>;
}

impl DBClient {
    /// Attach author rows to a batch of comments with one extra query.
    async fn assemble_comment_dtos(
        &self,
        comments: Vec<Comment>,
    ) -> Result<Vec<CommentDto>, sqlx::Error> {
        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        let authors = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(&user_ids)
            .fetch_all(&self.pool)
            .await?;
        let author_map: HashMap<Uuid, User> =
            authors.into_iter().map(|u| (u.id, u)).collect();

        comments
            .iter()
            .map(|comment| {
                let author = author_map
                    .get(&comment.user_id)
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(CommentDto::from_parts(comment, author))
            })
            .collect()
    }
}

impl CommentExt for DBClient {
    async fn get_comments_by_post(&self, post_id: i64) -> Result<Vec<CommentDto>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        self.assemble_comment_dtos(comments).await
    }

    async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn save_comment(
        &self,
        user_id: Uuid,
        post_id: i64,
        content: &str,
    ) -> Result<CommentDto, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, post_id, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        let mut dtos = self.assemble_comment_dtos(vec![comment]).await?;
        dtos.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn edit_comment(
        &self,
        comment_id: i64,
        content: &str,
    ) -> Result<CommentDto, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $1, updated_at = Now()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(content)
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;

        let mut dtos = self.assemble_comment_dtos(vec![comment]).await?;
        dtos.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comment_replies WHERE comment_id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM reports WHERE comment_id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn get_comment_count(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
