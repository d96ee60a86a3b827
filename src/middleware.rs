use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::IntoResponse,
};

use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    db::UserExt,
    error::{ErrorMessage, HttpError},
    models::{User, UserRole},
    utils::token,
};

/// Middleware extension carrying the authenticated user
///
/// Inserted into the request extensions after successful authentication.
/// Handlers take it as an explicit `Extension(JWTAuthMiddleware)` argument,
/// so the acting identity is always a visible parameter rather than
/// ambient state.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JWTAuthMiddleware {
    pub user: User,
}

/// Authentication middleware validating bearer tokens
///
/// 1. Reads the `Authorization: Bearer <token>` header
/// 2. Validates and decodes the JWT
/// 3. Fetches the user row for the token subject
/// 4. Rejects blocked or disabled accounts
/// 5. Attaches the user to the request extensions
///
/// # Errors
/// Returns 401 Unauthorized if the token is missing, invalid or expired,
/// the user no longer exists, or the account is blocked/disabled.
pub async fn auth(
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_value| {
            if auth_value.starts_with("Bearer ") {
                Some(auth_value[7..].to_owned())
            } else {
                None
            }
        });

    let token = bearer
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    // Signature, expiry and secret are all checked here
    let claims = match token::decode_token(token, app_state.env.jwt_secret.as_bytes()) {
        Ok(claims) => claims,
        Err(_) => {
            return Err(HttpError::unauthorized(
                ErrorMessage::InvalidToken.to_string(),
            ));
        }
    };

    let user_id = uuid::Uuid::parse_str(&claims.sub)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    // The row lookup confirms the user still exists; role and flags are
    // read from the database, never trusted from the token
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|_| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    let user =
        user.ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    if user.blocked {
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountBlocked.to_string(),
        ));
    }

    if !user.enabled {
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountDisabled.to_string(),
        ));
    }

    req.extensions_mut()
        .insert(JWTAuthMiddleware { user: user.clone() });

    Ok(next.run(req).await)
}

/// Role-based access control middleware
///
/// Must run after `auth`; checks the authenticated user's role against the
/// roles allowed for the route.
///
/// # Errors
/// Returns 401 if no authenticated user is present,
/// 403 if the user lacks all of the required roles.
pub async fn role_check(
    req: Request,
    next: Next,
    required_roles: Vec<UserRole>,
) -> Result<impl IntoResponse, HttpError> {
    let user = req
        .extensions()
        .get::<JWTAuthMiddleware>()
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string()))?;

    if !required_roles.contains(&user.user.role) {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    Ok(next.run(req).await)
}
