pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::{ApiState, CookieSettings};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_router(state: ApiState) -> Router {
    let session_state = state.clone();
    let upload_limit = state.max_upload_bytes;

    let admin = Router::new()
        .route(
            "/api/admin/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            get(handlers::get_category)
                .patch(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/admin/tags",
            get(handlers::list_tags).post(handlers::create_tag),
        )
        .route(
            "/api/admin/tags/{id}",
            get(handlers::get_tag)
                .patch(handlers::update_tag)
                .delete(handlers::delete_tag),
        )
        .route(
            "/api/admin/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/admin/posts/{id}",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/api/admin/stats", get(handlers::dashboard_stats));

    let auth = Router::new()
        .route("/api/auth/signup", post(handlers::sign_up))
        .route("/api/auth/signin", post(handlers::sign_in))
        .route("/api/auth/session", get(handlers::current_session))
        .route("/api/auth/signout", post(handlers::sign_out));

    let blog = Router::new()
        .route("/api/blog/posts", get(handlers::list_published_posts))
        .route("/api/blog/posts/{slug}", get(handlers::get_published_post))
        .route("/api/blog/categories", get(handlers::list_blog_categories))
        .route(
            "/api/blog/categories/{slug}",
            get(handlers::get_category_posts),
        )
        .route("/api/blog/search", get(handlers::search_posts));

    let upload = Router::new()
        .route("/api/upload/image", post(handlers::upload_image))
        .layer(DefaultBodyLimit::max(upload_limit));

    Router::new()
        .merge(admin)
        .merge(auth)
        .merge(blog)
        .merge(upload)
        .route("/_health/db", get(handlers::db_health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn_with_state(
            session_state,
            middleware::resolve_session,
        ))
        .layer(axum_middleware::from_fn(set_request_context))
}
