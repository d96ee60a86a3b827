use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

/// JWT payload: sub is the user id, role the user's role at issue time
///
/// The role rides inside the token so a login response can be checked
/// against the stored role without a second lookup. Authorization itself
/// still reads the database row, so a stale claim cannot widen access.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    user_id: &str,
    role: &str,
    secret: &[u8],
    expires_in_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::seconds(expires_in_seconds)).timestamp() as usize;
    let claims = TokenClaims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iat,
        exp,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<TokenClaims, HttpError> {
    // Validation::new() also rejects expired tokens
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims),
        Err(_) => Err(HttpError::new(
            ErrorMessage::InvalidToken.to_string(),
            StatusCode::UNAUTHORIZED,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    #[test]
    fn create_then_decode_returns_same_claims() {
        let user_id = "0b0f1b2a-9f49-4f6f-9a6c-1f2e3d4c5b6a";
        let token = create_token(user_id, "admin", SECRET, 60).unwrap();

        let claims = decode_token(token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn empty_user_id_is_rejected() {
        assert!(create_token("", "user", SECRET, 60).is_err());
    }

    #[test]
    fn wrong_secret_fails_decoding() {
        let token = create_token("some-user", "user", SECRET, 60).unwrap();
        let err = decode_token(token, b"another-secret").unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn expired_token_fails_decoding() {
        let token = create_token("some-user", "user", SECRET, -60).unwrap();
        assert!(decode_token(token, SECRET).is_err());
    }
}
