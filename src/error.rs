use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error response structure sent to clients
///
/// Every failing endpoint answers with this JSON shape:
/// ```json
/// {
///   "status": "fail",
///   "message": "Post not found"
/// }
/// ```
///
/// Kept separate from HttpError so the internal error type can carry
/// context (the status code) that is not part of the body contract.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Shared error phrasing used across handlers and middleware
///
/// Centralizing the messages keeps the client-facing text consistent.
/// PartialEq lets tests match on variants instead of strings.
#[derive(Debug, PartialEq)]
pub enum ErrorMessage {
    // Password validation errors
    EmptyPassword,
    ExceededMaxPasswordLength(usize),
    InvalidHashFormat,
    HashingError,

    // Authentication errors
    InvalidToken,
    TokenNotProvided,
    UserNotAuthenticated,
    WrongCredentials,
    AccountBlocked,
    AccountDisabled,

    // Authorization errors
    PermissionDenied,

    // User management errors
    UserNoLongerExist,

    //Else
    ServerError,
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ErrorMessage::UserNoLongerExist => {
                "User belonging to this token no longer exists".to_string()
            }
            ErrorMessage::EmptyPassword => "Password cannot be empty".to_string(),
            ErrorMessage::HashingError => "Error while hashing password".to_string(),
            ErrorMessage::InvalidHashFormat => "Invalid password hash format".to_string(),
            ErrorMessage::ExceededMaxPasswordLength(max_length) => {
                format!("Password must not be more than {} characters", max_length)
            }
            ErrorMessage::InvalidToken => "Token is invalid or expired".to_string(),
            ErrorMessage::TokenNotProvided => {
                "You are not logged in, please provide a token".to_string()
            }
            ErrorMessage::WrongCredentials => "Email or password is wrong".to_string(),
            ErrorMessage::AccountBlocked => {
                "Your account has been blocked, contact an administrator".to_string()
            }
            ErrorMessage::AccountDisabled => "Your account is disabled".to_string(),
            ErrorMessage::PermissionDenied => {
                "You are not allowed to perform this action".to_string()
            }
            ErrorMessage::UserNotAuthenticated => {
                "Authentication required. Please log in.".to_string()
            }
            ErrorMessage::ServerError => "Server Error. Please try again later".to_string(),
        };
        write!(f, "{}", message)
    }
}

/// Internal HTTP error type used throughout the application
///
/// Handlers return `Result<T, HttpError>`; axum converts the error into a
/// response through IntoResponse, so the status code and message can never
/// drift apart. The builder methods below cover the full error taxonomy:
/// validation (400), authentication (401), permission (403), missing
/// entities (404), unique-field conflicts (409) and everything else (500).
#[derive(Debug, Clone)]
pub struct HttpError {
    pub message: String,
    pub status: StatusCode,
}

impl HttpError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        HttpError {
            message: message.into(),
            status,
        }
    }

    /// 500 Internal Server Error: unexpected failures (database, hashing, ...)
    pub fn server_error(message: impl Into<String>) -> Self {
        HttpError {
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 400 Bad Request: malformed input and validation failures
    pub fn bad_request(message: impl Into<String>) -> Self {
        HttpError {
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// 409 Conflict: duplicate unique fields (email, category name)
    pub fn unique_constraint_violation(message: impl Into<String>) -> Self {
        HttpError {
            message: message.into(),
            status: StatusCode::CONFLICT,
        }
    }

    /// 401 Unauthorized: missing/invalid token or bad credentials
    ///
    /// Note: despite the name, 401 means "unauthenticated"
    pub fn unauthorized(message: impl Into<String>) -> Self {
        HttpError {
            message: message.into(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    /// 403 Forbidden: authenticated but not the owner and not an admin
    pub fn permission_denied(message: impl Into<String>) -> Self {
        HttpError {
            message: message.into(),
            status: StatusCode::FORBIDDEN,
        }
    }

    /// 404 Not Found: the entity referenced by id/parent-id does not exist
    pub fn not_found(message: impl Into<String>) -> Self {
        HttpError {
            message: message.into(),
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn into_http_response(self) -> Response {
        let json_response = Json(ErrorResponse {
            status: "fail".to_string(),
            message: self.message.clone(),
        });

        (self.status, json_response).into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HttpError: message: {}, status: {}",
            self.message, self.status
        )
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_set_expected_status_codes() {
        assert_eq!(
            HttpError::bad_request("x").status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::unauthorized("x").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            HttpError::permission_denied("x").status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(HttpError::not_found("x").status, StatusCode::NOT_FOUND);
        assert_eq!(
            HttpError::unique_constraint_violation("x").status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            HttpError::server_error("x").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_message_includes_password_limit() {
        let text = ErrorMessage::ExceededMaxPasswordLength(64).to_string();
        assert!(text.contains("64"));
    }

    #[test]
    fn permission_denied_phrasing_is_stable() {
        assert_eq!(
            ErrorMessage::PermissionDenied.to_string(),
            "You are not allowed to perform this action"
        );
    }
}
