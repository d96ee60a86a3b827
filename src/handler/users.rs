use crate::{
    AppState,
    db::{AuditExt, UserExt},
    dtos::{FilterUserDto, UserData, UserListResponseDto, UserResponseDto},
    error::{ErrorMessage, HttpError},
    middleware::{JWTAuthMiddleware, auth, role_check},
    models::UserRole,
};
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use tracing::instrument;
use uuid::Uuid;

/// Router for user management endpoints. The whole router is admin only.
pub fn users_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{user_id}", get(get_user).delete(delete_user))
        .route("/{user_id}/toggle-block", put(toggle_block_user))
        .route_layer(middleware::from_fn(|req, next| {
            role_check(req, next, vec![UserRole::Admin])
        }))
        .route_layer(middleware::from_fn_with_state(app_state, auth))
}

/// All users, newest first
#[instrument(skip(app_state))]
pub async fn get_users(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state.db_client.get_users().await.map_err(|e| {
        tracing::error!("DB error, getting users: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let results = users.len() as i64;
    let response = UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        results,
    };
    tracing::info!("get_users successful");
    Ok(Json(response))
}

#[instrument(skip(app_state))]
pub async fn get_user(
    Path(user_id): Path<Uuid>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting user: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("User not found".to_string()))?;

    let response = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    };
    Ok(Json(response))
}

/// Flip a user's blocked flag. A blocked user keeps their data but can
/// no longer authenticate.
#[instrument(skip(app_state, jwt), fields(admin_id = %jwt.user.id))]
pub async fn toggle_block_user(
    Path(user_id): Path<Uuid>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .toggle_user_block(user_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                tracing::error!(%user_id, "User not found for toggle-block");
                HttpError::not_found("User not found".to_string())
            }
            e => {
                tracing::error!("DB error, toggling user block: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        })?;

    let action = if user.blocked {
        "BLOCK_USER"
    } else {
        "UNBLOCK_USER"
    };
    if let Err(e) = app_state
        .db_client
        .record_action(Some(jwt.user.id), action, "USER", &user_id.to_string())
        .await
    {
        tracing::warn!("Failed to record audit entry: {}", e);
    }

    let response = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    };
    tracing::info!(%user_id, blocked = user.blocked, "toggle_block_user successful");
    Ok(Json(response))
}

/// Remove a user together with everything they created
#[instrument(skip(app_state, jwt), fields(admin_id = %jwt.user.id))]
pub async fn delete_user(
    Path(user_id): Path<Uuid>,
    State(app_state): State<AppState>,
    Extension(jwt): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .delete_user(user_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                tracing::error!(%user_id, "User not found for deletion");
                HttpError::not_found("User not found".to_string())
            }
            e => {
                tracing::error!("DB error, deleting user: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        })?;

    if let Err(e) = app_state
        .db_client
        .record_action(Some(jwt.user.id), "DELETE_USER", "USER", &user_id.to_string())
        .await
    {
        tracing::warn!("Failed to record audit entry: {}", e);
    }

    tracing::info!(%user_id, "delete_user successful");
    Ok(StatusCode::NO_CONTENT)
}
