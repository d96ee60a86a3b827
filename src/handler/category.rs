use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use tracing::instrument;
use validator::Validate;

use crate::AppState;
use crate::db::CategoryExt;
use crate::dtos::{
    CategoryDto, CategoryInputDto, CategoryListResponseDto, CategoryResponseDto,
};
use crate::error::{ErrorMessage, HttpError};
use crate::middleware::{auth, role_check};
use crate::models::UserRole;

/// Router for category endpoints. Reads are public, writes are admin only.
pub fn category_handler(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_categories))
        .route(
            "/",
            post(create_category)
                .route_layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin])
                }))
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route("/{category_id}", get(get_category))
        .route(
            "/{category_id}",
            put(update_category)
                .delete(delete_category)
                .route_layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin])
                }))
                .route_layer(middleware::from_fn_with_state(app_state, auth)),
        )
}

#[instrument(skip(app_state))]
pub async fn get_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = app_state.db_client.get_categories().await.map_err(|e| {
        tracing::error!("DB error, getting categories: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let response = CategoryListResponseDto {
        status: "success".to_string(),
        data: CategoryDto::filter_categories(&categories),
    };
    Ok(Json(response))
}

#[instrument(skip(app_state))]
pub async fn get_category(
    Path(category_id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let category = app_state
        .db_client
        .get_category(category_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting category: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Category not found".to_string()))?;

    let response = CategoryResponseDto {
        status: "success".to_string(),
        data: CategoryDto::filter_category(&category),
    };
    Ok(Json(response))
}

/// Maps storage failures from the category write path onto the response
/// taxonomy. The `categories.name` unique index fires on both create and
/// rename, so a duplicate name is a conflict from either entry point.
fn category_write_error(err: sqlx::Error) -> HttpError {
    match err {
        sqlx::Error::RowNotFound => HttpError::not_found("Category not found".to_string()),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            tracing::error!("DB error, writing category, unique violation: {}", db_err);
            HttpError::unique_constraint_violation("Category already exists".to_string())
        }
        err => {
            tracing::error!("DB error, writing category: {}", err);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        }
    }
}

#[instrument(skip(app_state, body))]
pub async fn create_category(
    State(app_state): State<AppState>,
    Json(body): Json<CategoryInputDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid create_category input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let category = app_state
        .db_client
        .save_category(&body.name)
        .await
        .map_err(category_write_error)?;

    let response = CategoryResponseDto {
        status: "success".to_string(),
        data: CategoryDto::filter_category(&category),
    };
    tracing::info!(category_id = category.id, "create_category successful");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(app_state, body))]
pub async fn update_category(
    Path(category_id): Path<i64>,
    State(app_state): State<AppState>,
    Json(body): Json<CategoryInputDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid update_category input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let category = app_state
        .db_client
        .update_category(category_id, &body.name)
        .await
        .map_err(category_write_error)?;

    let response = CategoryResponseDto {
        status: "success".to_string(),
        data: CategoryDto::filter_category(&category),
    };
    tracing::info!(category_id, "update_category successful");
    Ok(Json(response))
}

#[instrument(skip(app_state))]
pub async fn delete_category(
    Path(category_id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .delete_category(category_id)
        .await
        .map_err(category_write_error)?;

    tracing::info!(category_id, "delete_category successful");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::fmt;

    #[derive(Debug)]
    struct DuplicateName;

    impl fmt::Display for DuplicateName {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "duplicate key value violates unique constraint \"categories_name_key\""
            )
        }
    }

    impl std::error::Error for DuplicateName {}

    impl DatabaseError for DuplicateName {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"categories_name_key\""
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn duplicate_name_maps_to_conflict() {
        let err = category_write_error(sqlx::Error::Database(Box::new(DuplicateName)));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "Category already exists");
    }

    #[test]
    fn missing_category_maps_to_not_found() {
        let err = category_write_error(sqlx::Error::RowNotFound);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Category not found");
    }

    #[test]
    fn other_failures_map_to_server_error() {
        let err = category_write_error(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, ErrorMessage::ServerError.to_string());
    }
}
