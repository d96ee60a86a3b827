use std::collections::HashMap;

use super::DBClient;
use crate::dtos::{CategoryDto, PostDto};
use crate::models::{Post, User};
use uuid::Uuid;

/// One row of the post -> category join, used to group categories per post
#[derive(Debug, sqlx::FromRow)]
struct CategoryLinkRow {
    post_id: i64,
    id: i64,
    name: String,
}

/// Post database operations trait
pub trait PostExt {
    /// All posts, newest first, with author and categories embedded
    async fn get_posts(&self) -> Result<Vec<PostDto>, sqlx::Error>;

    /// Single post as a transfer object
    async fn get_post(&self, post_id: i64) -> Result<Option<PostDto>, sqlx::Error>;

    /// Single post as the raw row (ownership checks need user_id)
    async fn get_post_row(&self, post_id: i64) -> Result<Option<Post>, sqlx::Error>;

    /// Insert a post and link the given categories; ids that do not exist
    /// are skipped silently. Post and links commit together.
    async fn save_post(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        category_ids: &[i64],
    ) -> Result<PostDto, sqlx::Error>;

    /// Update title/content; when category_ids is Some the linked set is
    /// replaced wholesale, None leaves it untouched
    async fn update_post(
        &self,
        post_id: i64,
        title: &str,
        content: &str,
        category_ids: Option<&[i64]>,
    ) -> Result<PostDto, sqlx::Error>;

    /// Delete a post and all dependent rows (comments with their replies,
    /// likes, saves, reports, category links) in one transaction
    async fn delete_post(&self, post_id: i64) -> Result<(), sqlx::Error>;

    /// Total number of posts (admin stats)
    async fn get_post_count(&self) -> Result<i64, sqlx::Error>;
}

impl DBClient {
    /// Build PostDtos for a batch of post rows with two extra queries:
    /// one for the authors, one for the category links. Shared by the post
    /// listings and the saved-posts listing.
    pub(crate) async fn assemble_post_dtos(
        &self,
        posts: Vec<Post>,
    ) -> Result<Vec<PostDto>, sqlx::Error> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = posts.iter().map(|p| p.user_id).collect();
        let authors = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(&user_ids)
            .fetch_all(&self.pool)
            .await?;
        let author_map: HashMap<Uuid, User> =
            authors.into_iter().map(|u| (u.id, u)).collect();

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let links = sqlx::query_as::<_, CategoryLinkRow>(
            r#"
            SELECT pc.post_id, c.id, c.name
            FROM post_categories pc
            JOIN categories c ON c.id = pc.category_id
            WHERE pc.post_id = ANY($1)
            ORDER BY c.id
            "#,
        )
        .bind(&post_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut categories_by_post: HashMap<i64, Vec<CategoryDto>> = HashMap::new();
        for link in links {
            categories_by_post
                .entry(link.post_id)
                .or_default()
                .push(CategoryDto {
                    id: link.id,
                    name: link.name,
                });
        }

        posts
            .iter()
            .map(|post| {
                // FK guarantees the author row exists
                let author = author_map
                    .get(&post.user_id)
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(PostDto::from_parts(
                    post,
                    author,
                    categories_by_post.remove(&post.id).unwrap_or_default(),
                ))
            })
            .collect()
    }
}

impl PostExt for DBClient {
    async fn get_posts(&self) -> Result<Vec<PostDto>, sqlx::Error> {
        let posts = sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        self.assemble_post_dtos(posts).await
    }

    async fn get_post(&self, post_id: i64) -> Result<Option<PostDto>, sqlx::Error> {
        let post = self.get_post_row(post_id).await?;

        match post {
            Some(post) => {
                let mut dtos = self.assemble_post_dtos(vec![post]).await?;
                Ok(dtos.pop())
            }
            None => Ok(None),
        }
    }

    async fn get_post_row(&self, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn save_post(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        category_ids: &[i64],
    ) -> Result<PostDto, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        if !category_ids.is_empty() {
            // SELECT against categories keeps unknown ids out of the link
            // table instead of failing the whole insert
            sqlx::query(
                r#"
                INSERT INTO post_categories (post_id, category_id)
                SELECT $1, id FROM categories WHERE id = ANY($2)
                "#,
            )
            .bind(post.id)
            .bind(category_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let mut dtos = self.assemble_post_dtos(vec![post]).await?;
        dtos.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn update_post(
        &self,
        post_id: i64,
        title: &str,
        content: &str,
        category_ids: Option<&[i64]>,
    ) -> Result<PostDto, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $1, content = $2, updated_at = Now()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(category_ids) = category_ids {
            sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
                .bind(post_id)
                .execute(&mut *tx)
                .await?;

            if !category_ids.is_empty() {
                sqlx::query(
                    r#"
                    INSERT INTO post_categories (post_id, category_id)
                    SELECT $1, id FROM categories WHERE id = ANY($2)
                    "#,
                )
                .bind(post_id)
                .bind(category_ids)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        let mut dtos = self.assemble_post_dtos(vec![post]).await?;
        dtos.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn delete_post(&self, post_id: i64) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM comment_replies WHERE comment_id IN (
                SELECT id FROM comments WHERE post_id = $1
            )
            "#,
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM reports WHERE comment_id IN (SELECT id FROM comments WHERE post_id = $1)",
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM reports WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM post_likes WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM saved_posts WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn get_post_count(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
