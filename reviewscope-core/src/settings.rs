//! Process-wide settings.
//!
//! Built once from the environment at startup and passed read-only into each
//! client constructor. Nothing re-reads the environment after that.

use crate::{CoreError, CoreResult};

const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";
const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MAX_TOKENS_PER_CHUNK: usize = 7500;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for the search/place provider client
#[derive(Debug, Clone)]
pub struct SerpApiSettings {
    /// SerpApi API key
    pub api_key: String,
    /// Base URL of the provider (overridable for tests)
    pub base_url: String,
    /// Result language passed as `hl`
    pub language: String,
    /// Review sort order passed as `sort_by`
    pub sort_by: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Settings for the LLM inference client and summarizer
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Inference API key
    pub api_key: String,
    /// Base URL of the inference endpoint (overridable for tests)
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Generation-length cap per call
    pub max_output_tokens: u32,
    /// Token budget per prompt chunk
    pub max_tokens_per_chunk: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// All settings for one process
#[derive(Debug, Clone)]
pub struct Settings {
    pub serpapi: SerpApiSettings,
    pub llm: LlmSettings,
}

fn required(name: &str) -> CoreResult<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CoreError::Config(format!("{} must be set", name)))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl SerpApiSettings {
    /// Read provider settings from the environment
    pub fn from_env() -> CoreResult<Self> {
        Ok(Self {
            api_key: required("SERPAPI_API_KEY")?,
            base_url: optional("SERPAPI_BASE_URL", DEFAULT_SERPAPI_BASE_URL),
            language: optional("REVIEWSCOPE_LANGUAGE", "en"),
            sort_by: optional("REVIEWSCOPE_SORT_BY", "qualityScore"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

impl LlmSettings {
    /// Read inference settings from the environment
    pub fn from_env() -> CoreResult<Self> {
        let max_tokens_per_chunk = match std::env::var("REVIEWSCOPE_MAX_TOKENS_PER_CHUNK") {
            Ok(raw) => raw.parse().map_err(|_| {
                CoreError::Config(format!(
                    "REVIEWSCOPE_MAX_TOKENS_PER_CHUNK is not a valid token count: {}",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_MAX_TOKENS_PER_CHUNK,
        };

        Ok(Self {
            api_key: required("GEMINI_API_KEY")?,
            base_url: optional("GEMINI_BASE_URL", DEFAULT_LLM_BASE_URL),
            model: optional("GEMINI_MODEL", DEFAULT_LLM_MODEL),
            temperature: 0.2,
            max_output_tokens: 1024,
            max_tokens_per_chunk,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

impl Settings {
    /// Read all settings from the environment
    pub fn from_env() -> CoreResult<Self> {
        Ok(Self {
            serpapi: SerpApiSettings::from_env()?,
            llm: LlmSettings::from_env()?,
        })
    }
}
