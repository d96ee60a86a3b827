use super::DBClient;
use crate::models::AuditLog;
use uuid::Uuid;

/// Audit log database operations trait. Rows are append-only; nothing in
/// the application updates or deletes them.
pub trait AuditExt {
    /// Append one entry. entity_id is text so user and numeric ids share
    /// the column.
    async fn record_action(
        &self,
        actor_id: Option<Uuid>,
        action: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<AuditLog, sqlx::Error>;

    /// History of one entity, newest first
    async fn get_entity_logs(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditLog>, sqlx::Error>;

    /// Everything one actor did, newest first
    async fn get_actor_logs(&self, actor_id: Uuid) -> Result<Vec<AuditLog>, sqlx::Error>;

    /// Unfiltered tail of the log
    async fn get_recent_logs(&self) -> Result<Vec<AuditLog>, sqlx::Error>;
}

impl AuditExt for DBClient {
    async fn record_action(
        &self,
        actor_id: Option<Uuid>,
        action: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<AuditLog, sqlx::Error> {
        let log = sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (actor_id, action, entity_type, entity_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(actor_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    async fn get_entity_logs(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let logs = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT * FROM audit_logs
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY timestamp DESC
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    async fn get_actor_logs(&self, actor_id: Uuid) -> Result<Vec<AuditLog>, sqlx::Error> {
        let logs = sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs WHERE actor_id = $1 ORDER BY timestamp DESC",
        )
        .bind(actor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    async fn get_recent_logs(&self) -> Result<Vec<AuditLog>, sqlx::Error> {
        let logs = sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs ORDER BY timestamp DESC LIMIT 100",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
