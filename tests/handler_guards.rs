mod common;

use axum::Extension;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use common::{test_state, test_user};
use webblog_backend::dtos::{AuditLogsQueryDto, CreateReportDto, UpdateReportStatusDto};
use webblog_backend::handler::admin::get_audit_logs;
use webblog_backend::handler::report::{
    create_report, get_reports_by_status, update_report_status,
};
use webblog_backend::middleware::JWTAuthMiddleware;

#[tokio::test]
async fn report_without_target_is_rejected() {
    let state = test_state();
    let jwt = JWTAuthMiddleware { user: test_user() };

    let body = CreateReportDto {
        post_id: None,
        comment_id: None,
        reason: "spam".to_string(),
    };

    let err = create_report(State(state), Extension(jwt), axum::Json(body))
        .await
        .err()
        .expect("must be rejected");

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Either postId or commentId must be provided");
}

#[tokio::test]
async fn report_with_two_targets_is_rejected() {
    let state = test_state();
    let jwt = JWTAuthMiddleware { user: test_user() };

    let body = CreateReportDto {
        post_id: Some(1),
        comment_id: Some(2),
        reason: "spam".to_string(),
    };

    let err = create_report(State(state), Extension(jwt), axum::Json(body))
        .await
        .err()
        .expect("must be rejected");

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn report_with_empty_reason_is_rejected() {
    let state = test_state();
    let jwt = JWTAuthMiddleware { user: test_user() };

    let body = CreateReportDto {
        post_id: Some(1),
        comment_id: None,
        reason: "".to_string(),
    };

    let err = create_report(State(state), Extension(jwt), axum::Json(body))
        .await
        .err()
        .expect("must be rejected");

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_status_filter_is_rejected() {
    let state = test_state();

    let err = get_reports_by_status(Path("bogus".to_string()), State(state))
        .await
        .err()
        .expect("must be rejected");

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Invalid report status: bogus");
}

#[tokio::test]
async fn unknown_status_update_is_rejected() {
    let state = test_state();
    let jwt = JWTAuthMiddleware { user: test_user() };

    let body = UpdateReportStatusDto {
        status: "APPROVED".to_string(),
    };

    let err = update_report_status(Path(1), State(state), Extension(jwt), axum::Json(body))
        .await
        .err()
        .expect("must be rejected");

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn audit_log_filters_must_not_conflict() {
    let state = test_state();

    let query = AuditLogsQueryDto {
        entity_type: Some("POST".to_string()),
        entity_id: None,
        actor_id: None,
    };

    let err = get_audit_logs(Query(query), State(state))
        .await
        .err()
        .expect("must be rejected");

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn audit_log_actor_filter_must_be_uuid() {
    let state = test_state();

    let query = AuditLogsQueryDto {
        entity_type: None,
        entity_id: None,
        actor_id: Some("42".to_string()),
    };

    let err = get_audit_logs(Query(query), State(state))
        .await
        .err()
        .expect("must be rejected");

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Invalid actorId");
}
