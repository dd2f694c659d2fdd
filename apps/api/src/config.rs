use anyhow::{anyhow, Context, Result};

use crate::errors::AppError;
use crate::llm_client::DEFAULT_MODEL;
use crate::workflow::{MatchingMode, OutputShape, WorkflowConfig};

pub const DEFAULT_STORE_NAME: &str = "案件管理DB";
pub const DEFAULT_JOBS_SHEET: &str = "jobs";
pub const DEFAULT_CANDIDATES_SHEET: &str = "candidates";
pub const DEFAULT_CUTOFF_MARKER: &str = "【社内限定】";

/// Application configuration loaded from environment variables.
/// Startup halts if a required variable is missing.
///
/// Holds credentials: no `Debug`.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// Service-account key JSON, as text.
    pub gcp_json_key: String,
    pub gemini_model: String,
    pub workflow: WorkflowConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let workflow = WorkflowConfig {
            store_name: optional("STORE_NAME", DEFAULT_STORE_NAME),
            jobs_sheet: optional("JOBS_SHEET", DEFAULT_JOBS_SHEET),
            candidates_sheet: optional("CANDIDATES_SHEET", DEFAULT_CANDIDATES_SHEET),
            output_shape: optional("OUTPUT_SHAPE", "json")
                .parse::<OutputShape>()
                .map_err(|e| anyhow!(e))
                .context("OUTPUT_SHAPE is invalid")?,
            matching_mode: optional("MATCHING_MODE", "auto")
                .parse::<MatchingMode>()
                .map_err(|e| anyhow!(e))
                .context("MATCHING_MODE is invalid")?,
            cutoff_marker: optional("INTERNAL_CUTOFF_MARKER", DEFAULT_CUTOFF_MARKER),
        };

        Ok(Config {
            gemini_api_key: require_env(&lookup, "GEMINI_API_KEY")?,
            gcp_json_key: require_env(&lookup, "GCP_JSON_KEY")?,
            gemini_model: optional("GEMINI_MODEL", DEFAULT_MODEL),
            workflow,
            port: optional("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG", "info"),
        })
    }
}

fn require_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            AppError::ConfigurationMissing(format!(
                "Required environment variable '{key}' is not set"
            ))
            .into()
        })
}
