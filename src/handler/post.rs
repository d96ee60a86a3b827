use axum::Extension;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use tracing::instrument;
use validator::Validate;

use crate::AppState;
use crate::authz::can_modify;
use crate::db::{AuditExt, PostExt};
use crate::dtos::{CreatePostDto, PostListResponseDto, PostResponseDto, UpdatePostDto};
use crate::error::{ErrorMessage, HttpError};
use crate::middleware::{JWTAuthMiddleware, auth};

/// Router for post endpoints. Reads are public, writes require a token.
pub fn post_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_posts))
        .route(
            "/",
            post(create_post)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route("/{post_id}", get(get_post))
        .route(
            "/{post_id}",
            put(update_post)
                .delete(delete_post)
                .route_layer(middleware::from_fn_with_state(app_state, auth)),
        )
}

#[instrument(skip(app_state))]
pub async fn get_posts(State(app_state): State<AppState>) -> Result<impl IntoResponse, HttpError> {
    let posts = app_state.db_client.get_posts().await.map_err(|e| {
        tracing::error!("DB error, getting posts: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let results = posts.len() as i64;
    let response = PostListResponseDto {
        status: "success".to_string(),
        data: posts,
        results,
    };
    Ok(Json(response))
}

#[instrument(skip(app_state))]
pub async fn get_post(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let post = app_state
        .db_client
        .get_post(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Post not found".to_string()))?;

    let response = PostResponseDto {
        status: "success".to_string(),
        data: post,
    };
    Ok(Json(response))
}

#[instrument(skip(app_state, jwt, body), fields(user_id = %jwt.user.id))]
pub async fn create_post(
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreatePostDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid create_post input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let category_ids = body.category_ids.unwrap_or_default();

    let post = app_state
        .db_client
        .save_post(jwt.user.id, &body.title, &body.content, &category_ids)
        .await
        .map_err(|e| {
            tracing::error!("DB error, saving post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = PostResponseDto {
        status: "success".to_string(),
        data: post,
    };
    tracing::info!("create_post successful");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(app_state, jwt, body), fields(user_id = %jwt.user.id))]
pub async fn update_post(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdatePostDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid update_post input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let post = app_state
        .db_client
        .get_post_row(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Post not found".to_string()))?;

    if !can_modify(&jwt.user, &post) {
        tracing::error!(post_id, "Not allowed to update post");
        return Err(HttpError::permission_denied(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let updated = app_state
        .db_client
        .update_post(post_id, &body.title, &body.content, body.category_ids.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("DB error, updating post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let response = PostResponseDto {
        status: "success".to_string(),
        data: updated,
    };
    tracing::info!(post_id, "update_post successful");
    Ok(Json(response))
}

#[instrument(skip(app_state, jwt), fields(user_id = %jwt.user.id))]
pub async fn delete_post(
    Path(post_id): Path<i64>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let post = app_state
        .db_client
        .get_post_row(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Post not found".to_string()))?;

    if !can_modify(&jwt.user, &post) {
        tracing::error!(post_id, "Not allowed to delete post");
        return Err(HttpError::permission_denied(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    app_state
        .db_client
        .delete_post(post_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, deleting post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    if let Err(e) = app_state
        .db_client
        .record_action(Some(jwt.user.id), "DELETE_POST", "POST", &post_id.to_string())
        .await
    {
        tracing::warn!("Failed to record audit entry: {}", e);
    }

    tracing::info!(post_id, "delete_post successful");
    Ok(StatusCode::NO_CONTENT)
}
