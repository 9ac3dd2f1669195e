//! Blog title generation.

use crate::content::prompts::BLOG_TITLES_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{strip_json_fences, ChatMessage, LlmClient, LlmError};

pub const DEFAULT_TITLE_COUNT: u32 = 5;
pub const MIN_TITLE_COUNT: u32 = 3;
pub const MAX_TITLE_COUNT: u32 = 10;

const TEMPERATURE: f32 = 0.8;

/// Asks the model for `count` titles and returns at most `count` of them.
pub async fn generate_titles(
    llm: &LlmClient,
    keyword: &str,
    category: &str,
    tone: &str,
    count: u32,
) -> Result<Vec<String>, LlmError> {
    let count_str = count.to_string();
    let prompt = render(
        BLOG_TITLES_PROMPT_TEMPLATE,
        &[
            ("count", count_str.as_str()),
            ("keyword", keyword),
            ("category", category),
            ("tone", tone),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let raw = llm
        .complete(&[ChatMessage::user(&prompt)], TEMPERATURE)
        .await?
        .unwrap_or_else(|| "[]".to_string());

    let mut titles = parse_titles(&raw);
    titles.truncate(count as usize);
    Ok(titles)
}

/// A JSON array of strings if the model complied, otherwise one title per
/// non-blank line with any `1.` style enumerator removed.
pub fn parse_titles(raw: &str) -> Vec<String> {
    if let Ok(titles) = serde_json::from_str::<Vec<String>>(strip_json_fences(raw)) {
        return titles;
    }

    raw.lines()
        .map(|line| strip_enumerator(line).trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn strip_enumerator(line: &str) -> &str {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}
