use crate::AppState;
use crate::db::{PostExt, SavedExt};
use crate::dtos::{IsSavedResponseDto, SaveToggleResponseDto, SavedPostListResponseDto};
use crate::error::{ErrorMessage, HttpError};
use crate::middleware::{JWTAuthMiddleware, auth};
use axum::Extension;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::{Router, middleware};
use tracing::instrument;

/// Router for saved post endpoints. Bookmarks are private, so every
/// route requires a token.
pub fn saved_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        // POST /{post_id}/toggle - Save or unsave
        .route("/{post_id}/toggle", post(toggle_save))
        // GET /my-saved - The caller's saved posts
        .route("/my-saved", get(get_my_saved_posts))
        // GET /{post_id}/is-saved - Whether the caller saved the post
        .route("/{post_id}/is-saved", get(is_saved))
        .layer(middleware::from_fn_with_state(app_state, auth))
}

#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn toggle_save(
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

    let saved = app_state
        .db_client
        .toggle_save(jwt.user.id, post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, toggling save: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    tracing::info!(post_id, saved, "toggle_save successful");
    Ok(Json(SaveToggleResponseDto { saved }))
}

/// The caller's bookmarks, most recently saved first
#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn get_my_saved_posts(
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let saved_posts = app_state
        .db_client
        .get_saved_posts(jwt.user.id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting saved posts: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = SavedPostListResponseDto {
        status: "success".to_string(),
        data: saved_posts,
    };
    Ok(Json(response))
}

/// Answers for the authenticated caller only
#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn is_saved(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let is_saved = app_state
        .db_client
        .is_saved(jwt.user.id, post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, checking save: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(IsSavedResponseDto { is_saved }))
}
