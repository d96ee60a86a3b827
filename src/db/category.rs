use super::DBClient;
use crate::models::Category;

/// Category database operations trait
pub trait CategoryExt {
    async fn get_categories(&self) -> Result<Vec<Category>, sqlx::Error>;

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>, sqlx::Error>;

    async fn save_category(&self, name: &str) -> Result<Category, sqlx::Error>;

    async fn update_category(&self, category_id: i64, name: &str)
    -> Result<Category, sqlx::Error>;

    /// Remove a category and its post links in one transaction. Posts
    /// themselves are untouched.
    async fn delete_category(&self, category_id: i64) -> Result<(), sqlx::Error>;
}

impl CategoryExt for DBClient {
    async fn get_categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn save_category(&self, name: &str) -> Result<Category, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn update_category(
        &self,
        category_id: i64,
        name: &str,
    ) -> Result<Category, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $1 WHERE id = $2 RETURNING *",
        )
        .bind(name)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn delete_category(&self, category_id: i64) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM post_categories WHERE category_id = $1")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}
