use std::collections::HashMap;

use super::DBClient;
use crate::dtos::ReplyDto;
use crate::models::{CommentReply, User};
use uuid::Uuid;

/// Comment reply database operations trait
pub trait ReplyExt {
    /// Replies under a comment, oldest first, with author embedded
    async fn get_replies_by_comment(&self, comment_id: i64)
    -> Result<Vec<ReplyDto>, sqlx::Error>;

    /// Raw reply row (ownership checks need user_id)
    async fn get_reply(&self, reply_id: i64) -> Result<Option<CommentReply>, sqlx::Error>;

    /// Create a reply under a top-level comment
    async fn save_reply(
        &self,
        user_id: Uuid,
        comment_id: i64,
        content: &str,
    ) -> Result<ReplyDto, sqlx::Error>;

    /// Update reply content; the caller has already checked ownership
    async fn edit_reply(&self, reply_id: i64, content: &str) -> Result<ReplyDto, sqlx::Error>;

    async fn delete_reply(&self, reply_id: i64) -> Result<(), sqlx::Error>;
}

impl DBClient {
    async fn assemble_reply_dtos(
        &self,
        replies: Vec<CommentReply>,
    ) -> Result<Vec<ReplyDto>, sqlx::Error> {
        if replies.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = replies.iter().map(|r| r.user_id).collect();
        let authors = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(&user_ids)
            .fetch_all(&self.pool)
            .await?;
        let author_map: HashMap<Uuid, User> =
            authors.into_iter().map(|u| (u.id, u)).collect();

        replies
            .iter()
            .map(|reply| {
                let author = author_map
                    .get(&reply.user_id)
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(ReplyDto::from_parts(reply, author))
            })
            .collect()
    }
}

impl ReplyExt for DBClient {
    async fn get_replies_by_comment(
        &self,
        comment_id: i64,
    ) -> Result<Vec<ReplyDto>, sqlx::Error> {
        let replies = sqlx::query_as::<_, CommentReply>(
            "SELECT * FROM comment_replies WHERE comment_id = $1 ORDER BY created_at ASC",
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await?;

        self.assemble_reply_dtos(replies).await
    }

    async fn get_reply(&self, reply_id: i64) -> Result<Option<CommentReply>, sqlx::Error> {
        let reply = sqlx::query_as::<_, CommentReply>("SELECT * FROM comment_replies WHERE id = $1")
            .bind(reply_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reply)
    }

    async fn save_reply(
        &self,
        user_id: Uuid,
        comment_id: i64,
        content: &str,
    ) -> Result<ReplyDto, sqlx::Error> {
        let reply = sqlx::query_as::<_, CommentReply>(
            r#"
            INSERT INTO comment_replies (user_id, comment_id, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(comment_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        let mut dtos = self.assemble_reply_dtos(vec![reply]).await?;
        dtos.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn edit_reply(&self, reply_id: i64, content: &str) -> Result<ReplyDto, sqlx::Error> {
        let reply = sqlx::query_as::<_, CommentReply>(
            r#"
            UPDATE comment_replies
            SET content = $1, updated_at = Now()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(content)
        .bind(reply_id)
        .fetch_one(&self.pool)
        .await?;

        let mut dtos = self.assemble_reply_dtos(vec![reply]).await?;
        dtos.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn delete_reply(&self, reply_id: i64) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM comment_replies WHERE id = $1")
            .bind(reply_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }
}
