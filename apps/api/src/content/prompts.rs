// All LLM prompt constants for the content endpoints.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Blog-title prompt. Replace: {count}, {keyword}, {category}, {tone}, {json_only}
pub const BLOG_TITLES_PROMPT_TEMPLATE: &str = r#"You are a content marketing assistant.
Generate {count} catchy blog post titles as a JSON array of strings.
Topic: "{keyword}"
Category: {category}
Tone: {tone}

{json_only}"#;

/// Article system prompt. Replace: {tone}, {target_words}
pub const ARTICLE_SYSTEM_TEMPLATE: &str = r#"You are an article-writing assistant.
Write a structured article in Markdown about the given topic.
Tone: {tone}
Target length: about {target_words} words.
Include headings and bullet points. Write in clear English."#;

/// Article user message. Replace: {topic}
pub const ARTICLE_USER_TEMPLATE: &str = "Topic: {topic}";

/// Resume review system prompt. Replace: {json_only}
pub const RESUME_REVIEW_SYSTEM_TEMPLATE: &str = r#"You are a resume reviewer for tech roles.
Given a resume and a target role, return feedback as JSON with keys:
- score (0-100)
- summary (1-3 sentences)
- strengths (array of strings)
- improvements (array of strings)
{json_only}"#;

/// Resume review user message. Replace: {role}, {resume_text}
pub const RESUME_REVIEW_USER_TEMPLATE: &str = "Target role: {role}\n\nResume:\n{resume_text}";
