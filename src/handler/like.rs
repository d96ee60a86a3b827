use crate::AppState;
use crate::db::{LikeExt, PostExt};
use crate::dtos::{IsLikedResponseDto, LikeCountResponseDto, LikeToggleResponseDto};
use crate::error::{ErrorMessage, HttpError};
use crate::middleware::{JWTAuthMiddleware, auth};
use axum::Extension;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::{Router, middleware};
use tracing::instrument;

/// Router for post like endpoints
pub fn like_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        // POST /{post_id}/toggle - Like or unlike (requires auth)
        .route(
            "/{post_id}/toggle",
            post(toggle_like)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        // GET /{post_id}/count - Like count (public)
        .route("/{post_id}/count", get(get_like_count))
        // GET /{post_id}/is-liked - Whether the caller likes the post
        .route(
            "/{post_id}/is-liked",
            get(is_liked).route_layer(middleware::from_fn_with_state(app_state, auth)),
        )
}

/// Flip the caller's like on a post and return the new state with the
/// updated count
#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn toggle_like(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .get_post_row(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Post not found".to_string()))?;

    let liked = app_state
        .db_client
        .toggle_like(post_id, jwt.user.id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, toggling like: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let like_count = app_state
        .db_client
        .get_like_count(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting like count: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    tracing::info!(post_id, liked, "toggle_like successful");
    Ok(Json(LikeToggleResponseDto { liked, like_count }))
}

#[instrument(skip(app_state))]
pub async fn get_like_count(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let like_count = app_state
        .db_client
        .get_like_count(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting like count: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(LikeCountResponseDto { like_count }))
}

/// Answers for the authenticated caller only
#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn is_liked(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let is_liked = app_state
        .db_client
        .is_liked(post_id, jwt.user.id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, checking like: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(IsLikedResponseDto { is_liked }))
}
