use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Config file read by the CLI when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration for the whole gateway.
///
/// Values come from a YAML file (optional) and are then overridden by
/// environment variables, see [`Config::apply_env`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix every route is mounted under, e.g. `/api`. Empty mounts at the root.
    #[serde(default)]
    pub route_prefix: String,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            route_prefix: String::new(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for the hosted generation API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    /// Bearer key for the API. Without one the provider runs in demo mode.
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gemini.google.com/v1/generate".to_string(),
            api_key: None,
            model: "gemini-pro".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of results returned when a search request omits `top_k`.
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    /// JSON or YAML file with the corpus. `None` uses the built-in demo corpus.
    #[serde(default)]
    pub corpus_path: Option<String>,
}

fn default_top_k() -> usize {
    1
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            corpus_path: None,
        }
    }
}

/// Identity provider settings used to verify bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Service-account credential as a JSON string.
    #[serde(default)]
    pub service_account_json: Option<String>,
    /// Web API key passed to the token lookup endpoint.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_identity_base_url")]
    pub base_url: String,
    /// Fixed tokens accepted without contacting the identity provider.
    #[serde(default)]
    pub static_tokens: Vec<StaticToken>,
}

/// A token that is always accepted, mapped to a user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticToken {
    pub token: String,
    pub uid: String,
}

fn default_identity_base_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            service_account_json: None,
            api_key: None,
            base_url: default_identity_base_url(),
            static_tokens: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.search.default_top_k == 0 {
            return Err(ConfigError::InvalidValue {
                key: "search.default_top_k",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Load the effective configuration for a process.
    ///
    /// Reads `.env` into the environment, loads `path` when it exists (a
    /// missing file means defaults), then applies environment overrides.
    pub fn from_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overrides fields from environment-style variables.
    ///
    /// `lookup` returns the value of a variable, which keeps this testable
    /// without touching the process environment. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(prefix) = get("ROUTE_PREFIX") {
            self.server.route_prefix = prefix;
        }

        if let Some(url) = get("GEMINI_API_URL") {
            self.llm.base_url = url;
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL_ID") {
            self.llm.model = model;
        }
        if let Some(timeout) = get("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_var("LLM_TIMEOUT_SECS", &timeout)?;
        }

        if let Some(top_k) = get("SEARCH_DEFAULT_TOP_K") {
            let top_k: usize = parse_var("SEARCH_DEFAULT_TOP_K", &top_k)?;
            if top_k == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "SEARCH_DEFAULT_TOP_K",
                    value: "0".to_string(),
                });
            }
            self.search.default_top_k = top_k;
        }
        if let Some(path) = get("CORPUS_PATH") {
            self.search.corpus_path = Some(path);
        }

        if let Some(json) = get("FIREBASE_SERVICE_ACCOUNT_JSON") {
            self.identity.service_account_json = Some(json);
        }
        if let Some(key) = get("FIREBASE_API_KEY") {
            self.identity.api_key = Some(key);
        }
        if let Some(url) = get("IDENTITY_BASE_URL") {
            self.identity.base_url = url;
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}
