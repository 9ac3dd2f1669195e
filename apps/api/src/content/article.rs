//! Long-form article writer.

use crate::content::prompts::{ARTICLE_SYSTEM_TEMPLATE, ARTICLE_USER_TEMPLATE};
use crate::llm_client::prompts::render;
use crate::llm_client::{ChatMessage, LlmClient, LlmError};

pub const FALLBACK_ARTICLE: &str = "Sorry, I couldn't generate an article.";

const TEMPERATURE: f32 = 0.8;

/// "Short" → 500, "Long" → 1500, anything else → 800.
pub fn target_words(length: &str) -> u32 {
    match length {
        "Short" => 500,
        "Long" => 1500,
        _ => 800,
    }
}

pub async fn write_article(
    llm: &LlmClient,
    topic: &str,
    tone: &str,
    target_words: u32,
) -> Result<String, LlmError> {
    let target = target_words.to_string();
    let system = render(
        ARTICLE_SYSTEM_TEMPLATE,
        &[("tone", tone), ("target_words", target.as_str())],
    );
    let user = render(ARTICLE_USER_TEMPLATE, &[("topic", topic)]);

    let article = llm
        .complete(
            &[ChatMessage::system(&system), ChatMessage::user(&user)],
            TEMPERATURE,
        )
        .await?;

    Ok(article.unwrap_or_else(|| FALLBACK_ARTICLE.to_string()))
}
