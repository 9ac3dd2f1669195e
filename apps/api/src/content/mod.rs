// Text content endpoints: blog titles, articles, resume review.
// All LLM calls go through llm_client, no direct HTTP calls here.

pub mod article;
pub mod handlers;
pub mod prompts;
pub mod review;
pub mod titles;
