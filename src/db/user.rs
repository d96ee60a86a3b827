use super::DBClient;
use crate::models::User;
use uuid::Uuid;

/// User database operations trait
pub trait UserExt {
    /// Get a single user by ID or email.
    /// Returns Option - Some(user) if found, None if not found.
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    /// List every user, newest first (admin surface)
    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error>;

    /// Create a new user; role, enabled and blocked take their schema
    /// defaults (user / true / false)
    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
    ) -> Result<User, sqlx::Error>;

    /// Flip the blocked flag, returning the updated row
    async fn toggle_user_block(&self, user_id: Uuid) -> Result<User, sqlx::Error>;

    /// Delete a user together with everything that hangs off them, inside
    /// one transaction: the user's posts (with their comments, replies,
    /// likes, saves and reports), the user's own comments and replies on
    /// other posts (with reports aimed at those comments), the user's
    /// likes, saves and filed reports, and finally the user row. Audit
    /// entries survive; their actor FK is ON DELETE SET NULL.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error>;

    /// Total number of users (admin stats)
    async fn get_user_count(&self) -> Result<i64, sqlx::Error>;
}

impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        }

        Ok(user)
    }

    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
    ) -> Result<User, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name.into())
        .bind(email.into())
        .bind(password.into())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn toggle_user_block(&self, user_id: Uuid) -> Result<User, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET blocked = NOT blocked, updated_at = Now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Dependents of the user's posts go first, deepest leaves upward
        sqlx::query(
            r#"
            DELETE FROM comment_replies WHERE comment_id IN (
                SELECT c.id FROM comments c
                JOIN posts p ON c.post_id = p.id
                WHERE p.user_id = $1
            )
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM reports WHERE comment_id IN (
                SELECT c.id FROM comments c
                JOIN posts p ON c.post_id = p.id
                WHERE p.user_id = $1
            )
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM reports WHERE post_id IN (SELECT id FROM posts WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM comments WHERE post_id IN (SELECT id FROM posts WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM post_likes WHERE post_id IN (SELECT id FROM posts WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM saved_posts WHERE post_id IN (SELECT id FROM posts WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM post_categories WHERE post_id IN (SELECT id FROM posts WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // The user's own activity on other people's posts
        sqlx::query("DELETE FROM comment_replies WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            DELETE FROM comment_replies WHERE comment_id IN (
                SELECT id FROM comments WHERE user_id = $1
            )
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM reports WHERE comment_id IN (SELECT id FROM comments WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM comments WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM post_likes WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM saved_posts WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM reports WHERE reporter_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // Dropping the transaction without commit rolls everything back
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn get_user_count(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
