use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    handler::{
        admin::admin_handler, auth::auth_handler, category::category_handler,
        comment::comment_handler, like::like_handler, post::post_handler, reply::reply_handler,
        report::report_handler, saved::saved_handler, users::users_handler,
    },
};

pub fn create_router(app_state: AppState) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/posts", post_handler(app_state.clone()))
        .nest("/categories", category_handler(app_state.clone()))
        .nest("/comments", comment_handler(app_state.clone()))
        .nest("/comment-replies", reply_handler(app_state.clone()))
        .nest("/post-likes", like_handler(app_state.clone()))
        .nest("/saved-posts", saved_handler(app_state.clone()))
        .nest("/reports", report_handler(app_state.clone()))
        .nest("/users", users_handler(app_state.clone()))
        .nest("/admin", admin_handler(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    Router::new().nest("/api", api_route)
}
