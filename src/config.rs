use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration, loaded from TOML with environment overrides
/// for secrets.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// API credentials and the target namespace.
///
/// All three values default to empty strings; the playground starts
/// unconfigured and reports that state instead of failing. Environment
/// variables (`OPENAI_API_KEY`, `AGENTSET_API_KEY`, `AGENTSET_NAMESPACE_ID`)
/// take precedence over file values so keys never need to live on disk.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub agentset_api_key: String,
    #[serde(default)]
    pub namespace_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub name: String,
    #[serde(default = "default_available_models")]
    pub available: Vec<String>,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            available: default_available_models(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_available_models() -> Vec<String> {
    ["gpt-4o-mini", "gpt-4o", "gpt-4.1-mini", "gpt-4.1"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant. Answer the user's question using the \
     provided context from the knowledge base. If the context does not \
     contain the answer, say so instead of guessing."
        .to_string()
}

/// Retrieval parameters forwarded to the hosted namespace on each query.
#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

fn default_top_k() -> u32 {
    5
}

fn default_min_score() -> f64 {
    0.3
}

/// Endpoints and timeout for the external services.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_agentset_base_url")]
    pub agentset_base_url: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            agentset_base_url: default_agentset_base_url(),
            openai_base_url: default_openai_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_agentset_base_url() -> String {
    "https://api.agentset.ai".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

/// Load configuration from a TOML file, apply environment overrides, and
/// validate.
///
/// A missing file is not an error: the playground runs with built-in
/// defaults so `ragp serve` works before any config exists. A file that
/// exists but fails to parse is still an error.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config: Config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        Config::default()
    };

    apply_env_overrides(&mut config);

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }
    if !(0.0..=1.0).contains(&config.retrieval.min_score) {
        anyhow::bail!("retrieval.min_score must be in [0.0, 1.0]");
    }
    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }
    if config.model.name.is_empty() {
        anyhow::bail!("model.name must not be empty");
    }

    Ok(config)
}

/// Secrets from the process environment win over file values.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            config.credentials.openai_api_key = key;
        }
    }
    if let Ok(key) = std::env::var("AGENTSET_API_KEY") {
        if !key.is_empty() {
            config.credentials.agentset_api_key = key;
        }
    }
    if let Ok(ns) = std::env::var("AGENTSET_NAMESPACE_ID") {
        if !ns.is_empty() {
            config.credentials.namespace_id = ns;
        }
    }
}
