use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::background::backends::imgly::DEFAULT_MODEL as DEFAULT_REMOVAL_MODEL;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_REMOVAL_BACKEND: &str = "imgly";
const DEFAULT_REMOVAL_COMMAND: &str = "rembg i";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub removal: RemovalBackendConfig,
    /// Parent directory for the fallback scratch directories.
    pub scratch_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

/// Which background-removal capability the service talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalBackendConfig {
    /// In-process ONNX model via `imgly-bgremove`. `model` is a cache id or a
    /// model directory.
    Imgly { model: String },
    /// External CLI, e.g. `rembg i`. Split on whitespace into program + args.
    Command { program: String, args: Vec<String> },
    /// Remote removal service accepting a multipart upload.
    Http {
        url: String,
        api_key: Option<String>,
    },
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let openai_base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        reqwest::Url::parse(&openai_base_url)
            .with_context(|| format!("OPENAI_BASE_URL '{openai_base_url}' is not a valid URL"))?;

        let removal = RemovalBackendConfig::from_parts(
            &std::env::var("REMOVAL_BACKEND")
                .unwrap_or_else(|_| DEFAULT_REMOVAL_BACKEND.to_string()),
            std::env::var("REMOVAL_MODEL").ok(),
            &std::env::var("REMOVAL_COMMAND")
                .unwrap_or_else(|_| DEFAULT_REMOVAL_COMMAND.to_string()),
            std::env::var("REMOVAL_API_URL").ok(),
            std::env::var("REMOVAL_API_KEY").ok(),
        )?;

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            removal,
            scratch_dir: std::env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl RemovalBackendConfig {
    /// Builds the backend selection from raw environment values.
    pub fn from_parts(
        kind: &str,
        model: Option<String>,
        command: &str,
        api_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "imgly" => Ok(RemovalBackendConfig::Imgly {
                model: model
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_REMOVAL_MODEL.to_string()),
            }),
            "command" => {
                let mut parts = command.split_whitespace().map(String::from);
                let program = parts
                    .next()
                    .context("REMOVAL_COMMAND must name a program")?;
                Ok(RemovalBackendConfig::Command {
                    program,
                    args: parts.collect(),
                })
            }
            "http" => {
                let url = api_url
                    .filter(|u| !u.trim().is_empty())
                    .context("REMOVAL_API_URL is required when REMOVAL_BACKEND=http")?;
                reqwest::Url::parse(&url)
                    .with_context(|| format!("REMOVAL_API_URL '{url}' is not a valid URL"))?;
                Ok(RemovalBackendConfig::Http {
                    url,
                    api_key: api_key.filter(|k| !k.is_empty()),
                })
            }
            other => bail!(
                "Unknown REMOVAL_BACKEND '{other}' (expected 'imgly', 'command' or 'http')"
            ),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
