pub mod community;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::background::handlers::handle_remove_background;
use crate::content::handlers::{handle_blog_titles, handle_review_resume, handle_write_article};
use crate::images::handlers::{handle_generate_image, handle_remove_object};
use crate::state::AppState;

/// Inline base64 images arrive in the JSON body.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Text content
        .route("/api/blog-titles", post(handle_blog_titles))
        .route("/api/write-article", post(handle_write_article))
        .route("/api/review-resume", post(handle_review_resume))
        // Image tools
        .route("/api/generate-image", post(handle_generate_image))
        .route("/api/remove-background", post(handle_remove_background))
        .route("/api/remove-object", post(handle_remove_object))
        // Community (static demo data)
        .route(
            "/api/community/demo-posts",
            get(community::handle_demo_posts),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
