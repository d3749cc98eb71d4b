//! Bot configuration with documented defaults
//!
//! Everything tunable lives here. Values are loaded from a TOML file and
//! passed explicitly to whoever needs them; there is no global config.
//! Secrets (the API key) never come from the file, only the environment.

use crate::core::error::{BotError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub llm: LlmConfig,
    pub brain: BrainConfig,
    pub evaluator: EvaluatorConfig,
}

/// Settings for the intent classifier endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat completions endpoint (OpenAI-compatible unless it points at anthropic.com)
    pub api_url: String,
    pub model: String,
    /// Low temperature keeps the classifier's JSON shape stable
    pub temperature: f64,
    pub max_tokens: u32,
    /// Hard per-request timeout; the core itself never waits on anything
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o".into(),
            temperature: 0.2,
            max_tokens: 1024,
            timeout_secs: 20,
        }
    }
}

/// Where the classifier's instructions and reference data come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    /// Base persona prompt; a built-in prompt is used if the file is missing
    pub prompt_path: PathBuf,
    /// JSON file with a `reference_data` object shown to the classifier
    pub knowledge_path: PathBuf,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            prompt_path: PathBuf::from("data/prompt.txt"),
            knowledge_path: PathBuf::from("data/knowledge.json"),
        }
    }
}

/// Resource limits for the expression evaluator
///
/// Expressions come from an untrusted classifier, so both the raw length
/// and the parenthesis/unary nesting depth are bounded before any
/// recursion happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Maximum expression length in bytes
    pub max_expression_len: usize,
    /// Maximum recursion depth of the parser
    pub max_nesting_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_expression_len: 256,
            max_nesting_depth: 64,
        }
    }
}

impl BotConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file and apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: BotConfig = toml::from_str(&content)?;
        config.apply_env();
        config.validate().map_err(BotError::ConfigError)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        tracing::debug!("No config at {:?}, using defaults", path);
        let mut config = Self::default();
        config.apply_env();
        config.validate().map_err(BotError::ConfigError)?;
        Ok(config)
    }

    /// Optional: LLM_API_URL and LLM_MODEL override the file
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LLM_API_URL") {
            self.llm.api_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.llm.model = model;
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.llm.api_url.trim().is_empty() {
            return Err("llm.api_url must not be empty".into());
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(format!(
                "llm.temperature ({}) must be within 0.0..=2.0",
                self.llm.temperature
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err("llm.timeout_secs must be positive".into());
        }

        if self.evaluator.max_expression_len == 0 || self.evaluator.max_nesting_depth == 0 {
            return Err("Evaluator limits must be positive".into());
        }

        Ok(())
    }
}
