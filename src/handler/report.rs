use crate::AppState;
use crate::db::{AuditExt, CommentExt, PostExt, ReportExt};
use crate::dtos::{
    CreateReportDto, ReportListResponseDto, ReportResponseDto, UpdateReportStatusDto,
};
use crate::error::{ErrorMessage, HttpError};
use crate::middleware::{JWTAuthMiddleware, auth, role_check};
use crate::models::{ReportStatus, UserRole};
use axum::Extension;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use tracing::instrument;
use validator::Validate;

/// Router for report endpoints. Any logged-in user can file a report;
/// reviewing them is admin only.
pub fn report_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_report)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route(
            "/",
            get(get_reports)
                .route_layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin])
                }))
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route(
            "/status/{status}",
            get(get_reports_by_status)
                .route_layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin])
                }))
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route(
            "/{report_id}/status",
            put(update_report_status)
                .route_layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin])
                }))
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route(
            "/{report_id}",
            delete(delete_report)
                .route_layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin])
                }))
                .route_layer(middleware::from_fn_with_state(app_state, auth)),
        )
}

/// File a report against exactly one post or one comment
#[instrument(skip(app_state, jwt, body), fields(user_id = %jwt.user.id))]
pub async fn create_report(
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateReportDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid create_report input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    match (body.post_id, body.comment_id) {
        (None, None) => {
            tracing::error!("Report without a target");
            return Err(HttpError::bad_request(
                "Either postId or commentId must be provided".to_string(),
            ));
        }
        (Some(_), Some(_)) => {
            tracing::error!("Report with two targets");
            return Err(HttpError::bad_request(
                "Report must target exactly one of postId or commentId".to_string(),
            ));
        }
        _ => {}
    }

    if let Some(post_id) = body.post_id {
        app_state
            .db_client
            .get_post_row(post_id)
            .await
            .map_err(|e| {
                tracing::error!("DB error, getting post: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            })?
            .ok_or_else(|| HttpError::not_found("Post not found".to_string()))?;
    }

    if let Some(comment_id) = body.comment_id {
        app_state
            .db_client
            .get_comment(comment_id)
            .await
            .map_err(|e| {
                tracing::error!("DB error, getting comment: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            })?
            .ok_or_else(|| HttpError::not_found("Comment not found".to_string()))?;
    }

    let report = app_state
        .db_client
        .save_report(jwt.user.id, body.post_id, body.comment_id, &body.reason)
        .await
        .map_err(|e| {
            tracing::error!("DB error, saving report: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    if let Err(e) = app_state
        .db_client
        .record_action(
            Some(jwt.user.id),
            "CREATE_REPORT",
            "REPORT",
            &report.id.to_string(),
        )
        .await
    {
        tracing::warn!("Failed to record audit entry: {}", e);
    }

    let response = ReportResponseDto {
        status: "success".to_string(),
        data: report,
    };
    tracing::info!("create_report successful");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(app_state))]
pub async fn get_reports(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let reports = app_state.db_client.get_reports().await.map_err(|e| {
        tracing::error!("DB error, getting reports: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let response = ReportListResponseDto {
        status: "success".to_string(),
        data: reports,
    };
    Ok(Json(response))
}

#[instrument(skip(app_state))]
pub async fn get_reports_by_status(
    Path(status): Path<String>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let status = ReportStatus::from_str(&status).ok_or_else(|| {
        tracing::error!(status, "Unknown report status");
        HttpError::bad_request(format!("Invalid report status: {}", status))
    })?;

    let reports = app_state
        .db_client
        .get_reports_by_status(status)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting reports by status: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = ReportListResponseDto {
        status: "success".to_string(),
        data: reports,
    };
    Ok(Json(response))
}

#[instrument(skip(app_state, jwt, body), fields(user_id = %jwt.user.id))]
pub async fn update_report_status(
    Path(report_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateReportStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid update_report_status input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let status = ReportStatus::from_str(&body.status).ok_or_else(|| {
        tracing::error!(status = %body.status, "Unknown report status");
        HttpError::bad_request(format!("Invalid report status: {}", body.status))
    })?;

    let report = app_state
        .db_client
        .update_report_status(report_id, status)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                tracing::error!(report_id, "Report not found for status update");
                HttpError::not_found("Report not found".to_string())
            }
            e => {
                tracing::error!("DB error, updating report status: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        })?;

    if let Err(e) = app_state
        .db_client
        .record_action(
            Some(jwt.user.id),
            "UPDATE_REPORT_STATUS",
            "REPORT",
            &report_id.to_string(),
        )
        .await
    {
        tracing::warn!("Failed to record audit entry: {}", e);
    }

    let response = ReportResponseDto {
        status: "success".to_string(),
        data: report,
    };
    tracing::info!(report_id, "update_report_status successful");
    Ok(Json(response))
}

#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn delete_report(
    Path(report_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .delete_report(report_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                tracing::error!(report_id, "Report not found for deletion");
                HttpError::not_found("Report not found".to_string())
            }
            e => {
                tracing::error!("DB error, deleting report: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        })?;

    if let Err(e) = app_state
        .db_client
        .record_action(
            Some(jwt.user.id),
            "DELETE_REPORT",
            "REPORT",
            &report_id.to_string(),
        )
        .await
    {
        tracing::warn!("Failed to record audit entry: {}", e);
    }

    tracing::info!(report_id, "delete_report successful");
    Ok(StatusCode::NO_CONTENT)
}
