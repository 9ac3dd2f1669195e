//! Static community feed. There is no storage behind it; the posts are demo data.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoPost {
    pub id: u32,
    pub author: &'static str,
    pub content: &'static str,
    pub tool: &'static str,
    pub likes: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DemoPostsResponse {
    pub posts: Vec<DemoPost>,
}

pub fn demo_posts(now: DateTime<Utc>) -> Vec<DemoPost> {
    vec![
        DemoPost {
            id: 1,
            author: "Demo User",
            content: "Just generated amazing blog titles!",
            tool: "Blog Generator",
            likes: 5,
            created_at: now,
        },
        DemoPost {
            id: 2,
            author: "Creator",
            content: "Background removal is super fast.",
            tool: "BG Remover",
            likes: 8,
            created_at: now,
        },
    ]
}

/// GET /api/community/demo-posts
pub async fn handle_demo_posts() -> Json<DemoPostsResponse> {
    Json(DemoPostsResponse {
        posts: demo_posts(Utc::now()),
    })
}
