mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use common::{test_app, test_config};
use webblog_backend::utils::token;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"title": "t", "content": "c"}).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn create_post_requires_token() {
    let app = test_app();

    let response = app.oneshot(post_request("/api/posts")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "You are not logged in, please provide a token"
    );
}

#[tokio::test]
async fn non_bearer_authorization_is_rejected() {
    let app = test_app();

    let mut request = post_request("/api/posts");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Basic dXNlcjpwYXNz".parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = test_app();

    let mut request = post_request("/api/posts");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer not.a.jwt".parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token is invalid or expired");
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_rejected() {
    let app = test_app();

    let forged = token::create_token(
        &uuid::Uuid::new_v4().to_string(),
        "user",
        b"some-other-secret",
        3600,
    )
    .unwrap();

    let mut request = post_request("/api/posts");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", forged).parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = test_app();
    let config = test_config();

    let expired = token::create_token(
        &uuid::Uuid::new_v4().to_string(),
        "user",
        config.jwt_secret.as_bytes(),
        -3600,
    )
    .unwrap();

    let mut request = post_request("/api/posts");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", expired).parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_with_non_uuid_subject_is_rejected() {
    let app = test_app();
    let config = test_config();

    let bad_subject =
        token::create_token("definitely-not-a-uuid", "user", config.jwt_secret.as_bytes(), 3600)
            .unwrap();

    let mut request = post_request("/api/posts");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", bad_subject).parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn report_creation_requires_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reports")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"postId": 1, "reason": "spam"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn saved_posts_listing_requires_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/saved-posts/my-saved")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn is_liked_requires_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/post-likes/1/is-liked")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_stats_requires_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/admin/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_management_requires_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
