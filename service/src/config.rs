use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;

/// Service settings.
///
/// Sources, later ones overriding earlier ones: built-in defaults,
/// `config.yaml`, then `CE_`-prefixed environment variables with `__`
/// between nested keys (`CE_UPSTREAM__PAGE_SIZE=25`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub explain: ExplainConfig,
    #[serde(default)]
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `camara_explorer_api=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Browser origins allowed to call the API; `"*"` allows all. A YAML
    /// list or a comma-separated string (the env var form).
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub allowed_origins: Vec<String>,
}

/// Origins from a list or a comma-separated string; empty entries dropped.
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let origins: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(origins.into_iter().filter(|s| !s.is_empty()).collect())
}

/// The Câmara open-data API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,

    /// Items requested per list page (1..=100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Plain-language explanation endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplainConfig {
    /// Generative-text API key. Without it `/api/explain` answers 503.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Lifetime of cached explanations (default: 30 days).
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Redis URL for the explanation cache. In-memory when unset.
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl ExplainConfig {
    /// The API key, if one is configured and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SwaggerConfig {
    /// Serve `/swagger-ui` and `/api-docs/openapi.json`.
    #[serde(default)]
    pub enabled: bool,
}

/// Upstream maximum for the `itens` parameter.
pub const MAX_PAGE_SIZE: u32 = 100;

#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_allowed_origins() -> Vec<String> {
    vec![]
}

fn default_upstream_base_url() -> String {
    crate::camara::DEFAULT_BASE_URL.to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_page_size() -> u32 {
    crate::camara::DEFAULT_PAGE_SIZE
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    15
}

fn default_model() -> String {
    ce_llm::DEFAULT_MODEL.to_string()
}

fn default_llm_base_url() -> String {
    ce_llm::DEFAULT_BASE_URL.to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_cache_ttl_secs() -> u64 {
    crate::explain::DEFAULT_CACHE_TTL.as_secs()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_llm_base_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
            redis_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: default_port(),
                host: default_host(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
            cors: CorsConfig::default(),
            upstream: UpstreamConfig::default(),
            explain: ExplainConfig::default(),
            swagger: SwaggerConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Reject anything that is not an absolute http(s) URL.
fn require_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if is_http_url(value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be an http:// or https:// URL, got '{value}'"
        )))
    }
}

fn require_nonzero(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Validation(format!("{field} must be greater than 0")))
    } else {
        Ok(())
    }
}

impl Config {
    /// Load `config.yaml` from the working directory, then `CE_*` overrides.
    ///
    /// # Errors
    /// Fails when a source cannot be parsed or the result does not validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Same as [`Config::load`] with an explicit YAML path. A missing file
    /// is not an error.
    ///
    /// # Errors
    /// Fails when a source cannot be parsed or the result does not validate.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("CE_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Check the values a running server depends on.
    ///
    /// # Errors
    /// Returns the first offending setting as [`ConfigError::Validation`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("server.port", u64::from(self.server.port))?;

        if let Some(origin) = self
            .cors
            .allowed_origins
            .iter()
            .find(|origin| origin.as_str() != "*" && !is_http_url(origin))
        {
            return Err(ConfigError::Validation(format!(
                "cors.allowed_origins entry '{origin}' must be '*' or an http(s) origin"
            )));
        }

        require_http_url("upstream.base_url", &self.upstream.base_url)?;
        if !(1..=MAX_PAGE_SIZE).contains(&self.upstream.page_size) {
            return Err(ConfigError::Validation(format!(
                "upstream.page_size must be within 1..={MAX_PAGE_SIZE}, got {}",
                self.upstream.page_size
            )));
        }
        require_nonzero("upstream.timeout_secs", self.upstream.timeout_secs)?;

        require_http_url("explain.base_url", &self.explain.base_url)?;
        require_nonzero("explain.cache_ttl_secs", self.explain.cache_ttl_secs)?;

        Ok(())
    }
}
