use crate::AppState;
use crate::db::{AuditExt, CommentExt, PostExt, ReportExt, UserExt};
use crate::dtos::{AdminStatsDto, AuditLogDto, AuditLogListResponseDto, AuditLogsQueryDto};
use crate::error::{ErrorMessage, HttpError};
use crate::middleware::{auth, role_check};
use crate::models::UserRole;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::{Router, middleware};
use tracing::instrument;

/// Router for the admin dashboard endpoints
pub fn admin_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/audit-logs", get(get_audit_logs))
        .route_layer(middleware::from_fn(|req, next| {
            role_check(req, next, vec![UserRole::Admin])
        }))
        .route_layer(middleware::from_fn_with_state(app_state, auth))
}

/// Aggregate counters for the dashboard. Reply rows are not part of the
/// comment total.
#[instrument(skip(app_state))]
pub async fn get_stats(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let total_users = app_state.db_client.get_user_count().await.map_err(|e| {
        tracing::error!("DB error, getting user count: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let total_posts = app_state.db_client.get_post_count().await.map_err(|e| {
        tracing::error!("DB error, getting post count: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let total_comments = app_state.db_client.get_comment_count().await.map_err(|e| {
        tracing::error!("DB error, getting comment count: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let total_reports = app_state.db_client.get_report_count().await.map_err(|e| {
        tracing::error!("DB error, getting report count: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let pending_reports = app_state
        .db_client
        .get_pending_report_count()
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting pending report count: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(AdminStatsDto {
        total_users,
        total_posts,
        total_comments,
        total_reports,
        pending_reports,
    }))
}

/// Read back the audit trail. Filter by entityType+entityId, by actorId,
/// or take the unfiltered tail.
#[instrument(skip(app_state))]
pub async fn get_audit_logs(
    Query(query_params): Query<AuditLogsQueryDto>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let logs = match (
        query_params.entity_type.as_deref(),
        query_params.entity_id.as_deref(),
        query_params.actor_id.as_deref(),
    ) {
        (Some(entity_type), Some(entity_id), None) => app_state
            .db_client
            .get_entity_logs(entity_type, entity_id)
            .await
            .map_err(|e| {
                tracing::error!("DB error, getting entity audit logs: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            })?,
        (None, None, Some(actor_id)) => {
            let actor_id = uuid::Uuid::parse_str(actor_id).map_err(|_| {
                tracing::error!(actor_id, "Invalid actor id in audit log query");
                HttpError::bad_request("Invalid actorId".to_string())
            })?;
            app_state
                .db_client
                .get_actor_logs(actor_id)
                .await
                .map_err(|e| {
                    tracing::error!("DB error, getting actor audit logs: {}", e);
                    HttpError::server_error(ErrorMessage::ServerError.to_string())
                })?
        }
        (None, None, None) => app_state.db_client.get_recent_logs().await.map_err(|e| {
            tracing::error!("DB error, getting recent audit logs: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?,
        _ => {
            tracing::error!("Conflicting audit log filters");
            return Err(HttpError::bad_request(
                "Filter by entityType and entityId together, or by actorId alone".to_string(),
            ));
        }
    };

    let response = AuditLogListResponseDto {
        status: "success".to_string(),
        data: AuditLogDto::filter_logs(&logs),
    };
    Ok(Json(response))
}
