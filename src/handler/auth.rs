use crate::{
    AppState,
    db::UserExt,
    dtos::{FilterUserDto, LoginUserDto, RegisterUserDto, Response, UserLoginResponseDto},
    error::{ErrorMessage, HttpError},
    utils::{password, token},
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use validator::Validate;

use tracing::instrument;

/// Router for authentication endpoints
pub fn auth_handler() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user account
///
/// New accounts always get the `user` role. There is no auto-login;
/// the client is expected to call /login afterwards.
#[instrument(skip(app_state, body), fields(email = %body.email))]
pub async fn register(
    State(app_state): State<AppState>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid register input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let hash_password = password::hash(&body.password).map_err(|e| {
        tracing::error!("Password hashing error: {}", e);
        HttpError::server_error(e.to_string())
    })?;

    let result = app_state
        .db_client
        .save_user(&body.name, &body.email, &hash_password)
        .await;

    match result {
        Ok(user) => {
            tracing::info!(user_id = %user.id, email = %body.email, "Register successful");
            Ok((
                StatusCode::CREATED,
                Json(Response {
                    status: "success",
                    message: "Registration successful. Please login.".to_string(),
                }),
            ))
        }
        Err(sqlx::Error::Database(db_err)) => {
            if db_err.is_unique_violation() {
                tracing::error!("DB error, saving user, unique violation: {}", db_err);
                Err(HttpError::unique_constraint_violation(
                    "Email already exists".to_string(),
                ))
            } else {
                tracing::error!("DB error, saving user: {}", db_err);
                Err(HttpError::server_error(
                    ErrorMessage::ServerError.to_string(),
                ))
            }
        }
        Err(e) => {
            tracing::error!("DB error, saving user: {}", e);
            Err(HttpError::server_error(
                ErrorMessage::ServerError.to_string(),
            ))
        }
    }
}

/// Login with email and password
///
/// The issued token carries the user's id and role at signing time;
/// the middleware still re-reads both from the database on every request.
#[instrument(skip(app_state, body), fields(email = %body.email))]
pub async fn login(
    State(app_state): State<AppState>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid login input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let result = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting user: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let user = result.ok_or_else(|| {
        tracing::error!("User not found by email");
        HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string())
    })?;

    let password_matched = password::compare(&body.password, &user.password).map_err(|e| {
        tracing::error!("Password comparison error: {}", e);
        HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string())
    })?;

    if !password_matched {
        tracing::error!(user_id = %user.id, "Password mismatch");
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    if user.blocked {
        tracing::error!(user_id = %user.id, "Blocked user attempted login");
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountBlocked.to_string(),
        ));
    }

    if !user.enabled {
        tracing::error!(user_id = %user.id, "Disabled user attempted login");
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountDisabled.to_string(),
        ));
    }

    let token = token::create_token(
        &user.id.to_string(),
        user.role.to_str(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| {
        tracing::error!("Token creation error: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let response = UserLoginResponseDto {
        status: "success".to_string(),
        token,
        user: FilterUserDto::filter_user(&user),
    };
    tracing::info!(user_id = %user.id, "Login successful");
    Ok(Json(response))
}
