//! Resume review. The model is asked for JSON feedback; every field falls back
//! to a default independently when it is missing or malformed.

use serde::Serialize;
use serde_json::Value;

use crate::content::prompts::{RESUME_REVIEW_SYSTEM_TEMPLATE, RESUME_REVIEW_USER_TEMPLATE};
use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{strip_json_fences, ChatMessage, LlmClient, LlmError};

const TEMPERATURE: f32 = 0.4;
const DEFAULT_SCORE: u32 = 70;
const DEFAULT_SUMMARY: &str = "Review completed.";
const UNSPECIFIED_ROLE: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewFeedback {
    pub score: u32,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl Default for ReviewFeedback {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            summary: DEFAULT_SUMMARY.to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
        }
    }
}

pub async fn review_resume(
    llm: &LlmClient,
    role: Option<&str>,
    resume_text: &str,
) -> Result<ReviewFeedback, LlmError> {
    let system = render(
        RESUME_REVIEW_SYSTEM_TEMPLATE,
        &[("json_only", JSON_ONLY_INSTRUCTION)],
    );
    let user = render(
        RESUME_REVIEW_USER_TEMPLATE,
        &[
            ("role", role.filter(|r| !r.is_empty()).unwrap_or(UNSPECIFIED_ROLE)),
            ("resume_text", resume_text.trim()),
        ],
    );

    let raw = llm
        .complete(
            &[ChatMessage::system(&system), ChatMessage::user(&user)],
            TEMPERATURE,
        )
        .await?
        .unwrap_or_else(|| "{}".to_string());

    Ok(parse_feedback(&raw))
}

pub fn parse_feedback(raw: &str) -> ReviewFeedback {
    let parsed: Value = serde_json::from_str(strip_json_fences(raw)).unwrap_or_default();
    let defaults = ReviewFeedback::default();

    ReviewFeedback {
        score: parsed
            .get("score")
            .and_then(Value::as_f64)
            .map(|s| s.round().clamp(0.0, 100.0) as u32)
            .unwrap_or(defaults.score),
        summary: parsed
            .get("summary")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or(defaults.summary),
        strengths: string_list(&parsed, "strengths"),
        improvements: string_list(&parsed, "improvements"),
    }
}

fn string_list(parsed: &Value, field: &str) -> Vec<String> {
    parsed
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
