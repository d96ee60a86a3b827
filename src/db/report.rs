use std::collections::HashMap;

use super::DBClient;
use crate::dtos::ReportDto;
use crate::models::{Report, ReportStatus, User};
use uuid::Uuid;

/// Report database operations trait
pub trait ReportExt {
    /// File a report against exactly one target; the caller has already
    /// validated the target. Status starts at pending.
    async fn save_report(
        &self,
        reporter_id: Uuid,
        post_id: Option<i64>,
        comment_id: Option<i64>,
        reason: &str,
    ) -> Result<ReportDto, sqlx::Error>;

    /// All reports, newest first, with reporter embedded
    async fn get_reports(&self) -> Result<Vec<ReportDto>, sqlx::Error>;

    /// Reports in one review state, newest first
    async fn get_reports_by_status(
        &self,
        status: ReportStatus,
    ) -> Result<Vec<ReportDto>, sqlx::Error>;

    async fn update_report_status(
        &self,
        report_id: i64,
        status: ReportStatus,
    ) -> Result<ReportDto, sqlx::Error>;

    async fn delete_report(&self, report_id: i64) -> Result<(), sqlx::Error>;

    async fn get_report_count(&self) -> Result<i64, sqlx::Error>;

    async fn get_pending_report_count(&self) -> Result<i64, sqlx::Error>;
}

impl DBClient {
    async fn assemble_report_dtos(
        &self,
        reports: Vec<Report>,
    ) -> Result<Vec<ReportDto>, sqlx::Error> {
        if reports.is_empty() {
            return Ok(Vec::new());
        }

        let reporter_ids: Vec<Uuid> = reports.iter().map(|r| r.reporter_id).collect();
        let reporters = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(&reporter_ids)
            .fetch_all(&self.pool)
            .await?;
        let reporter_map: HashMap<Uuid, User> =
            reporters.into_iter().map(|u| (u.id, u)).collect();

        reports
            .iter()
            .map(|report| {
                let reporter = reporter_map
                    .get(&report.reporter_id)
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(ReportDto::from_parts(report, reporter))
            })
            .collect()
    }
}

impl ReportExt for DBClient {
    async fn save_report(
        &self,
        reporter_id: Uuid,
        post_id: Option<i64>,
        comment_id: Option<i64>,
        reason: &str,
    ) -> Result<ReportDto, sqlx::Error> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (reporter_id, post_id, comment_id, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(reporter_id)
        .bind(post_id)
        .bind(comment_id)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        let mut dtos = self.assemble_report_dtos(vec![report]).await?;
        dtos.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn get_reports(&self) -> Result<Vec<ReportDto>, sqlx::Error> {
        let reports =
            sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        self.assemble_report_dtos(reports).await
    }

    async fn get_reports_by_status(
        &self,
        status: ReportStatus,
    ) -> Result<Vec<ReportDto>, sqlx::Error> {
        let reports = sqlx::query_as::<_, Report>(
            "SELECT * FROM reports WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        self.assemble_report_dtos(reports).await
    }

    async fn update_report_status(
        &self,
        report_id: i64,
        status: ReportStatus,
    ) -> Result<ReportDto, sqlx::Error> {
        let report = sqlx::query_as::<_, Report>(
            "UPDATE reports SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(report_id)
        .fetch_one(&self.pool)
        .await?;

        let mut dtos = self.assemble_report_dtos(vec![report]).await?;
        dtos.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn delete_report(&self, report_id: i64) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }

    async fn get_report_count(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn get_pending_report_count(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reports WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
