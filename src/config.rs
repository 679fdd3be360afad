//! Configuration types for content analysis.
//!
//! All analysis behaviour is controlled through [`AnalyzerConfig`], built via
//! its [`AnalyzerConfigBuilder`]. The same config value is shared by the CLI
//! client and by every request the HTTP server handles, so it holds no
//! per-request state.
//!
//! # Credentials are resolved late
//! The API key is *not* captured at startup. Unless an explicit key is set,
//! [`AnalyzerConfig::resolve_api_key`] reads the environment on every request,
//! so a server started without a key reports a configuration error per request
//! instead of refusing to boot, and picks the key up once it is exported.

use crate::error::AnalyzerError;
use std::fmt;

/// Default environment variable holding the provider credential.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for both extraction and analysis.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for content analysis.
///
/// Built via [`AnalyzerConfig::builder()`] or using
/// [`AnalyzerConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_content_analyzer::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .model("gpt-4o")
///     .api_timeout_secs(60)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Chat model used for both calls. Default: `gpt-4o-mini`.
    ///
    /// The mini model is fast and cheap and handles OCR of ordinary
    /// documents well; switch to `gpt-4o` or `gpt-4.1` for dense scans.
    pub model: String,

    /// Base URL of the OpenAI-compatible API, without the
    /// `/chat/completions` suffix. Default: `https://api.openai.com/v1`.
    pub base_url: String,

    /// Explicit API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,

    /// Environment variable read at request time when `api_key` is `None`.
    /// Default: `OPENAI_API_KEY`.
    pub api_key_env: String,

    /// Sampling temperature. `None` leaves the provider default.
    pub temperature: Option<f32>,

    /// Completion token cap per call. `None` leaves the provider default.
    pub max_tokens: Option<u32>,

    /// Per-call timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Minimum extracted characters required before analysis. Default: 10.
    pub min_text_chars: usize,

    /// Largest accepted upload, in bytes of the request body. Default: 20 MiB.
    pub max_upload_bytes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: None,
            max_tokens: None,
            api_timeout_secs: 120,
            min_text_chars: 10,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("min_text_chars", &self.min_text_chars)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the provider credential for one request.
    ///
    /// Empty values count as missing.
    pub fn resolve_api_key(&self) -> Result<String, AnalyzerError> {
        let key = match &self.api_key {
            Some(key) => Some(key.clone()),
            None => std::env::var(&self.api_key_env).ok(),
        };

        key.filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AnalyzerError::ProviderNotConfigured {
                env_var: self.api_key_env.clone(),
            })
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.config.api_key_env = var.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn min_text_chars(mut self, n: usize) -> Self {
        self.config.min_text_chars = n;
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(AnalyzerError::InvalidConfig("Model must not be empty".into()));
        }
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(AnalyzerError::InvalidConfig(format!(
                "Base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        if c.api_timeout_secs == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "Upload limit must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}
