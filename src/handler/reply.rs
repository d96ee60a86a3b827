use crate::AppState;
use crate::authz::can_modify;
use crate::db::{AuditExt, CommentExt, ReplyExt};
use crate::dtos::{CommentInputDto, ReplyListResponseDto, ReplyResponseDto};
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

/// Router for comment reply endpoints. Replies sit one level under a
/// comment; a reply can never have replies of its own.
pub fn reply_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        // GET /comment/{comment_id} - Replies under a comment (public)
        .route("/comment/{comment_id}", get(get_replies))
        // POST /comment/{comment_id} - Create reply (requires auth)
        .route(
            "/comment/{comment_id}",
            post(create_reply)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        // PUT /{reply_id} - Edit reply (owner or admin)
        // DELETE /{reply_id} - Delete reply (owner or admin)
        .route(
            "/{reply_id}",
            put(edit_reply)
                .delete(delete_reply)
                .route_layer(middleware::from_fn_with_state(app_state, auth)),
        )
}

/// Replies under one comment, oldest first
#[instrument(skip(app_state))]
pub async fn get_replies(
    Path(comment_id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let replies = app_state
        .db_client
        .get_replies_by_comment(comment_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting replies: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = ReplyListResponseDto {
        status: "success".to_string(),
        data: replies,
    };
    Ok(Json(response))
}

#[instrument(skip(app_state, jwt, body), fields(user_id = %jwt.user.id))]
pub async fn create_reply(
    Path(comment_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
    Json(body): Json<CommentInputDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid create_reply input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    // The parent must be a top-level comment; reply ids live in a
    // different table so nesting deeper is impossible by construction.
    app_state
        .db_client
        .get_comment(comment_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting parent comment: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Comment not found".to_string()))?;

    let reply = app_state
        .db_client
        .save_reply(jwt.user.id, comment_id, &body.content)
        .await
        .map_err(|e| {
            tracing::error!("DB error, saving reply: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = ReplyResponseDto {
        status: "success".to_string(),
        data: reply,
    };
    tracing::info!(comment_id, "create_reply successful");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(app_state, jwt, body), fields(user_id = %jwt.user.id))]
pub async fn edit_reply(
    Path(reply_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
    Json(body): Json<CommentInputDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid edit_reply input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let reply = app_state
        .db_client
        .get_reply(reply_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting reply: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Reply not found".to_string()))?;

    if !can_modify(&jwt.user, &reply) {
        tracing::error!(reply_id, "Not allowed to edit reply");
        return Err(HttpError::permission_denied(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let updated = app_state
        .db_client
        .edit_reply(reply_id, &body.content)
        .await
        .map_err(|e| {
            tracing::error!("DB error, editing reply: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = ReplyResponseDto {
        status: "success".to_string(),
        data: updated,
    };
    tracing::info!(reply_id, "edit_reply successful");
    Ok(Json(response))
}

#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn delete_reply(
    Path(reply_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let reply = app_state
        .db_client
        .get_reply(reply_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting reply: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Reply not found".to_string()))?;

    if !can_modify(&jwt.user, &reply) {
        tracing::error!(reply_id, "Not allowed to delete reply");
        return Err(HttpError::permission_denied(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    app_state
        .db_client
        .delete_reply(reply_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, deleting reply: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    if let Err(e) = app_state
        .db_client
        .record_action(
            Some(jwt.user.id),
            "DELETE_REPLY",
            "COMMENT_REPLY",
            &reply_id.to_string(),
        )
        .await
    {
        tracing::warn!("Failed to record audit entry: {}", e);
    }

    tracing::info!(reply_id, "delete_reply successful");
    Ok(StatusCode::NO_CONTENT)
}
