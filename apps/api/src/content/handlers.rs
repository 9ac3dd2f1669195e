//! Axum route handlers for the content endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::article::{target_words, write_article};
use crate::content::review::{review_resume, ReviewFeedback};
use crate::content::titles::{
    generate_titles, DEFAULT_TITLE_COUNT, MAX_TITLE_COUNT, MIN_TITLE_COUNT,
};
use crate::errors::AppError;
use crate::params::{clamp_count, loose_text, string_only};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_category() -> String {
    "General".to_string()
}

fn default_tone() -> String {
    "Neutral".to_string()
}

fn default_length() -> String {
    "Medium".to_string()
}

/// Defaults: category "General", tone "Neutral", count 5 (clamped to 3..=10).
#[derive(Debug, Deserialize)]
pub struct BlogTitlesRequest {
    #[serde(default, deserialize_with = "string_only")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub tone: Option<String>,
    #[serde(default)]
    pub count: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct BlogTitlesMeta {
    pub category: String,
    pub tone: String,
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct BlogTitlesResponse {
    pub titles: Vec<String>,
    pub meta: BlogTitlesMeta,
}

/// Defaults: tone "Neutral", length "Medium".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteArticleRequest {
    #[serde(default, deserialize_with = "string_only")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub tone: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub length: Option<String>,
    /// Accepted for client compatibility; the prompt always asks for headings.
    #[serde(default)]
    #[allow(dead_code)]
    pub include_outline: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMeta {
    pub tone: String,
    pub length: String,
    pub target_words: u32,
}

#[derive(Debug, Serialize)]
pub struct WriteArticleResponse {
    pub article: String,
    pub meta: ArticleMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResumeRequest {
    #[serde(default, deserialize_with = "loose_text")]
    pub role: Option<String>,
    #[serde(default)]
    pub resume_text: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResumeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub feedback: ReviewFeedback,
    pub from: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/blog-titles
pub async fn handle_blog_titles(
    State(state): State<AppState>,
    body: Option<Json<BlogTitlesRequest>>,
) -> Result<Json<BlogTitlesResponse>, AppError> {
    let missing = || AppError::Validation("Keyword is required".to_string());
    let Json(request) = body.ok_or_else(missing)?;
    let keyword = request
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(missing)?;

    let count = clamp_count(
        request.count.as_ref(),
        DEFAULT_TITLE_COUNT,
        MIN_TITLE_COUNT,
        MAX_TITLE_COUNT,
    );

    let category = request.category.unwrap_or_else(default_category);
    let tone = request.tone.unwrap_or_else(default_tone);

    let titles = generate_titles(&state.llm, keyword, &category, &tone, count)
        .await
        .map_err(|e| AppError::Llm {
            message: "Failed to generate titles from AI.",
            detail: e.to_string(),
        })?;

    Ok(Json(BlogTitlesResponse {
        titles,
        meta: BlogTitlesMeta {
            category,
            tone,
            count,
        },
    }))
}

/// POST /api/write-article
pub async fn handle_write_article(
    State(state): State<AppState>,
    body: Option<Json<WriteArticleRequest>>,
) -> Result<Json<WriteArticleResponse>, AppError> {
    let missing = || AppError::Validation("Topic is required.".to_string());
    let Json(request) = body.ok_or_else(missing)?;
    let topic = request
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(missing)?;

    let tone = request.tone.unwrap_or_else(default_tone);
    let length = request.length.unwrap_or_else(default_length);

    let words = target_words(&length);
    let article = write_article(&state.llm, topic, &tone, words)
        .await
        .map_err(|e| AppError::Llm {
            message: "Failed to generate article.",
            detail: e.to_string(),
        })?;

    Ok(Json(WriteArticleResponse {
        article,
        meta: ArticleMeta {
            tone,
            length,
            target_words: words,
        },
    }))
}

/// POST /api/review-resume
pub async fn handle_review_resume(
    State(state): State<AppState>,
    body: Option<Json<ReviewResumeRequest>>,
) -> Result<Json<ReviewResumeResponse>, AppError> {
    let missing = || AppError::Validation("resumeText is required.".to_string());
    let Json(request) = body.ok_or_else(missing)?;
    let resume_text = match &request.resume_text {
        Some(Value::String(text)) if !text.is_empty() => text.as_str(),
        _ => return Err(missing()),
    };

    let feedback = review_resume(&state.llm, request.role.as_deref(), resume_text)
        .await
        .map_err(|e| AppError::Llm {
            message: "Failed to review resume.",
            detail: e.to_string(),
        })?;

    Ok(Json(ReviewResumeResponse {
        role: request.role,
        feedback,
        from: "groq-llama",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::backends::CommandRemover;
    use crate::routes::build_router;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Serves a fake chat-completions endpoint that always answers `reply`.
    async fn fake_llm(reply: &'static str) -> String {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move || async move {
                Json(json!({ "choices": [{ "message": { "role": "assistant", "content": reply } }] }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}/v1")
    }

    fn app_with_llm(base_url: &str) -> Router {
        let mut state = AppState::for_tests(
            Arc::new(CommandRemover::new("cat".into(), Vec::new())),
            std::env::temp_dir(),
        );
        state.llm = crate::llm_client::LlmClient::new("test".into(), base_url, "m".into()).unwrap();
        build_router(state)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_blog_titles_requires_keyword() {
        let (status, body) = post_json(
            app_with_llm("http://127.0.0.1:9"),
            "/api/blog-titles",
            json!({ "keyword": "   " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Keyword is required" }));
    }

    #[tokio::test]
    async fn test_blog_titles_clamps_count_and_slices() {
        let base = fake_llm("1. A\n2. B\n3. C\n4. D\n5. E").await;
        let (status, body) = post_json(
            app_with_llm(&base),
            "/api/blog-titles",
            json!({ "keyword": "rust", "count": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["titles"], json!(["A", "B", "C"]));
        assert_eq!(
            body["meta"],
            json!({ "category": "General", "tone": "Neutral", "count": 3 })
        );
    }

    #[tokio::test]
    async fn test_blog_titles_llm_failure_is_500() {
        // Port 9 (discard) refuses connections, so every attempt fails.
        let (status, body) = post_json(
            app_with_llm("http://127.0.0.1:9"),
            "/api/blog-titles",
            json!({ "keyword": "rust" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Failed to generate titles from AI." }));
    }

    #[tokio::test]
    async fn test_write_article_meta() {
        let base = fake_llm("# Ownership\n\n- moves\n- borrows").await;
        let (status, body) = post_json(
            app_with_llm(&base),
            "/api/write-article",
            json!({ "topic": "ownership", "length": "Long", "tone": "Friendly" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"], "# Ownership\n\n- moves\n- borrows");
        assert_eq!(
            body["meta"],
            json!({ "tone": "Friendly", "length": "Long", "targetWords": 1500 })
        );
    }

    #[tokio::test]
    async fn test_write_article_requires_topic() {
        let (status, body) = post_json(
            app_with_llm("http://127.0.0.1:9"),
            "/api/write-article",
            json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Topic is required." }));
    }

    #[tokio::test]
    async fn test_review_resume_requires_string_text() {
        let (status, body) = post_json(
            app_with_llm("http://127.0.0.1:9"),
            "/api/review-resume",
            json!({ "resumeText": 12 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "resumeText is required." }));
    }

    #[tokio::test]
    async fn test_review_resume_defaults_when_reply_is_not_json() {
        let base = fake_llm("Great resume overall.").await;
        let (status, body) = post_json(
            app_with_llm(&base),
            "/api/review-resume",
            json!({ "resumeText": "Rust engineer, 5 years", "role": "Backend" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "role": "Backend",
                "score": 70,
                "summary": "Review completed.",
                "strengths": [],
                "improvements": [],
                "from": "groq-llama"
            })
        );
    }

    #[tokio::test]
    async fn test_review_resume_omits_absent_role() {
        let base = fake_llm("{\"score\": 82, \"summary\": \"Solid.\"}").await;
        let (status, body) = post_json(
            app_with_llm(&base),
            "/api/review-resume",
            json!({ "resumeText": "Rust engineer", "role": { "title": "SRE" } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("role").is_none());
        assert_eq!(body["score"], 82);
        assert_eq!(body["summary"], "Solid.");
    }

    #[tokio::test]
    async fn test_blog_titles_accepts_mistyped_optional_fields() {
        let base = fake_llm("[\"One\", \"Two\", \"Three\"]").await;
        let (status, body) = post_json(
            app_with_llm(&base),
            "/api/blog-titles",
            json!({ "keyword": "rust", "category": 7, "tone": null }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["meta"],
            json!({ "category": "7", "tone": "Neutral", "count": 5 })
        );
    }
}
