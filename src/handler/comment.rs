use crate::AppState;
use crate::authz::can_modify;
use crate::db::{AuditExt, CommentExt, PostExt};
use crate::dtos::{CommentInputDto, CommentListResponseDto, CommentResponseDto};
use crate::error::{ErrorMessage, HttpError};
use crate::middleware::JWTAuthMiddleware;
use crate::middleware::auth;
use axum::Extension;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use tracing::instrument;
use validator::Validate;

/// Router for comment endpoints
pub fn comment_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        // GET /post/{post_id} - Comments under a post (public)
        .route("/post/{post_id}", get(get_comments))
        // POST /post/{post_id} - Create comment (requires auth)
        .route(
            "/post/{post_id}",
            post(create_comment)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        // PUT /{comment_id} - Edit comment (owner or admin)
        // DELETE /{comment_id} - Delete comment (owner or admin)
        .route(
            "/{comment_id}",
            put(edit_comment)
                .delete(delete_comment)
                .route_layer(middleware::from_fn_with_state(app_state, auth)),
        )
}

/// Comments under one post, oldest first
#[instrument(skip(app_state))]
pub async fn get_comments(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let comments = app_state
        .db_client
        .get_comments_by_post(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting comments: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = CommentListResponseDto {
        status: "success".to_string(),
        data: comments,
    };
    Ok(Json(response))
}

#[instrument(skip(app_state, jwt, body), fields(user_id = %jwt.user.id))]
pub async fn create_comment(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
    Json(body): Json<CommentInputDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid create_comment input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    app_state
        .db_client
        .get_post_row(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Post not found".to_string()))?;

    let comment = app_state
        .db_client
        .save_comment(jwt.user.id, post_id, &body.content)
        .await
        .map_err(|e| {
            tracing::error!("DB error, saving comment: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = CommentResponseDto {
        status: "success".to_string(),
        data: comment,
    };
    tracing::info!(post_id, "create_comment successful");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(app_state, jwt, body), fields(user_id = %jwt.user.id))]
pub async fn edit_comment(
    Path(comment_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
    Json(body): Json<CommentInputDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid edit_comment input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let comment = app_state
        .db_client
        .get_comment(comment_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting comment: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Comment not found".to_string()))?;

    if !can_modify(&jwt.user, &comment) {
        tracing::error!(comment_id, "Not allowed to edit comment");
        return Err(HttpError::permission_denied(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let updated = app_state
        .db_client
        .edit_comment(comment_id, &body.content)
        .await
        .map_err(|e| {
            tracing::error!("DB error, editing comment: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = CommentResponseDto {
        status: "success".to_string(),
        data: updated,
    };
    tracing::info!(comment_id, "edit_comment successful");
    Ok(Json(response))
}

#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn delete_comment(
    Path(comment_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let comment = app_state
        .db_client
        .get_comment(comment_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting comment: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Comment not found".to_string()))?;

    if !can_modify(&jwt.user, &comment) {
        tracing::error!(comment_id, "Not allowed to delete comment");
        return Err(HttpError::permission_denied(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    app_state
        .db_client
        .delete_comment(comment_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, deleting comment: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    if let Err(e) = app_state
        .db_client
        .record_action(
            Some(jwt.user.id),
            "DELETE_COMMENT",
            "COMMENT",
            &comment_id.to_string(),
        )
        .await
    {
        tracing::warn!("Failed to record audit entry: {}", e);
    }

    tracing::info!(comment_id, "delete_comment successful");
    Ok(StatusCode::NO_CONTENT)
}
