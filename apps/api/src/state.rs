use crate::background::invoker::RemovalInvoker;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Fetches remote images for the background-removal pipeline.
    /// No timeout: a hung upstream holds only its own request.
    pub http: reqwest::Client,
    /// Removal capability plus its scratch-file fallback. The capability is
    /// chosen at startup via REMOVAL_BACKEND.
    pub invoker: RemovalInvoker,
}

#[cfg(test)]
impl AppState {
    /// State with an unreachable LLM endpoint and the given removal capability.
    pub fn for_tests(
        remover: std::sync::Arc<dyn crate::background::backends::BackgroundRemover>,
        scratch_dir: std::path::PathBuf,
    ) -> Self {
        AppState {
            llm: LlmClient::new(
                "test-key".to_string(),
                "http://127.0.0.1:9/v1",
                "test-model".to_string(),
            )
            .unwrap(),
            http: reqwest::Client::new(),
            invoker: RemovalInvoker::new(remover, scratch_dir),
        }
    }
}
