//! TOML-based configuration for the research agent
//!
//! Every section and field is optional; a missing file means built-in
//! defaults. The file path comes from `RESEARCH_CONFIG`, falling back to
//! `research.toml` in the working directory.
//!
//! The LLM credential itself never lives in the file: `[llm].api_key_env`
//! names the environment variable that holds it.

use crate::research::RetryPolicy;
use crate::search::{clamp_max_results, duckduckgo::DEFAULT_BASE_URL};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the config file path
pub const CONFIG_ENV_VAR: &str = "RESEARCH_CONFIG";
/// Config file used when `RESEARCH_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "research.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' is not set")]
    MissingEnvVar(String),
}

/// Root configuration structure loaded from research.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub retry: RetryConfig,
    pub research: CycleConfig,
    pub a2a: A2aConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub log_level: String,
    pub log_format: LogFormat,
    /// Address advertised in the agent card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 10011,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            public_url: None,
        }
    }
}

impl ServerConfig {
    /// The advertised URL, derived from host and port unless configured.
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}/", self.host, self.port))
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub max_results: usize,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: 10,
            timeout_ms: 10_000,
            user_agent: format!(
                "Mozilla/5.0 (compatible; research-agent/{})",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,
    /// Environment variable name containing the API key
    pub api_key_env: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the API key from the environment
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(self.api_key_env.clone()))
    }
}

// ============= Retry Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt, per phase
    pub count: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    pub multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            count: policy.max_retries,
            backoff_base_ms: policy.base_delay.as_millis() as u64,
            backoff_max_ms: policy.max_delay.as_millis() as u64,
            multiplier: policy.multiplier,
            jitter: policy.jitter,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.count,
            base_delay: Duration::from_millis(self.backoff_base_ms),
            max_delay: Duration::from_millis(self.backoff_max_ms),
            multiplier: self.multiplier,
            jitter: self.jitter,
        }
    }
}

// ============= Research Cycle Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Deadline for a whole research cycle; unlimited when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_budget_ms: Option<u64>,
}

impl CycleConfig {
    pub fn overall_budget(&self) -> Option<Duration> {
        self.overall_budget_ms.map(Duration::from_millis)
    }
}

// ============= A2A Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct A2aConfig {
    /// Tasks remembered for `tasks/get`; least recently used are evicted
    pub task_capacity: usize,
}

impl Default for A2aConfig {
    fn default() -> Self {
        Self {
            task_capacity: 1024,
        }
    }
}

// ============= Loading =============

impl ResearchConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Like [`ResearchConfig::load`], but a missing file yields defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(&path) {
            Err(ConfigError::FileNotFound(path)) => {
                info!(path = %path.display(), "No configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Resolve the config path from `RESEARCH_CONFIG` and load it.
    ///
    /// An explicitly configured path must exist; the default path may not.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load(path),
            Err(_) => Self::load_or_default(DEFAULT_CONFIG_PATH),
        }
    }

    /// Parse, normalize and validate TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: ResearchConfig = toml::from_str(content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Clamp values that are tolerated out of range.
    fn normalize(&mut self) {
        let clamped = clamp_max_results(self.search.max_results);
        if clamped != self.search.max_results {
            warn!(
                requested = self.search.max_results,
                using = clamped,
                "search.max_results out of range, clamping"
            );
            self.search.max_results = clamped;
        }
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

        if self.server.port == 0 {
            return invalid("server.port must not be 0".to_string());
        }
        if self.search.timeout_ms == 0 {
            return invalid("search.timeout_ms must be greater than 0".to_string());
        }
        if self.llm.timeout_ms == 0 {
            return invalid("llm.timeout_ms must be greater than 0".to_string());
        }
        if self.research.overall_budget_ms == Some(0) {
            return invalid("research.overall_budget_ms must be greater than 0".to_string());
        }
        if self.a2a.task_capacity == 0 {
            return invalid("a2a.task_capacity must be greater than 0".to_string());
        }
        if self.retry.multiplier.is_nan() || self.retry.multiplier < 1.0 {
            return invalid(format!(
                "retry.multiplier must be at least 1.0, got {}",
                self.retry.multiplier
            ));
        }
        if self.retry.backoff_max_ms < self.retry.backoff_base_ms {
            return invalid(format!(
                "retry.backoff_max_ms ({}) must not be below retry.backoff_base_ms ({})",
                self.retry.backoff_max_ms, self.retry.backoff_base_ms
            ));
        }
        if self.llm.model.trim().is_empty() {
            return invalid("llm.model must not be empty".to_string());
        }

        let mut urls = vec![
            ("search.base_url", self.search.base_url.as_str()),
            ("llm.api_base", self.llm.api_base.as_str()),
        ];
        if let Some(public_url) = &self.server.public_url {
            urls.push(("server.public_url", public_url.as_str()));
        }
        for (field, value) in urls {
            if let Err(e) = Url::parse(value) {
                return invalid(format!("{} is not a valid URL ({}): {}", field, value, e));
            }
        }

        Ok(())
    }
}
