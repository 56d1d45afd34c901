//! Client configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `GEMINI_API_KEY` | required |
//! | `GEMINI_MODEL` | `gemini-1.5-flash` |
//! | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
//! | `GEMINI_STREAMING` | `false` |
//! | `GEMINI_TIMEOUT_SECS` | `30` |

use std::time::Duration;

use url::Url;

use crate::error::{AnalysisError, AnalysisResult};

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`crate::GeminiClient`].
#[derive(Clone)]
pub struct AnalysisConfig {
    api_key: String,
    /// Model name, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// API host; always ends with `/`.
    base_url: Url,
    /// Stream the reply over SSE instead of waiting for the whole answer.
    pub streaming: bool,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("streaming", &self.streaming)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a configuration with defaults and the given key.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingApiKey`] if the key is blank.
    pub fn new(api_key: impl Into<String>) -> AnalysisResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            streaming: false,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or a value cannot be parsed.
    pub fn from_env() -> AnalysisResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup` (variable name → value).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or a value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AnalysisResult<Self> {
        let mut config = Self::new(lookup("GEMINI_API_KEY").unwrap_or_default())?;

        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            config = config.with_base_url(&base_url)?;
        }
        if let Some(streaming) = lookup("GEMINI_STREAMING") {
            config.streaming = parse_bool(&streaming)?;
        }
        if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                AnalysisError::InvalidConfig(format!("GEMINI_TIMEOUT_SECS={secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        tracing::debug!(?config, "Loaded analysis configuration");
        Ok(config)
    }

    /// Use a different model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different API host.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidUrl`] if the URL is malformed.
    pub fn with_base_url(mut self, base_url: &str) -> AnalysisResult<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Enable or disable streaming.
    #[must_use]
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The API host.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint for a single-shot or streamed request.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidUrl`] if the model name does not form
    /// a valid path.
    pub fn endpoint(&self, streaming: bool) -> AnalysisResult<Url> {
        let method = if streaming {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        let mut url = self
            .base_url
            .join(&format!("v1beta/models/{}:{method}", self.model))
            .map_err(|e| AnalysisError::InvalidUrl(e.to_string()))?;
        if streaming {
            url.query_pairs_mut().append_pair("alt", "sse");
        }
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> AnalysisResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| AnalysisError::InvalidUrl(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(AnalysisError::InvalidUrl(format!("{raw} cannot be a base URL")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_bool(raw: &str) -> AnalysisResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AnalysisError::InvalidConfig(format!(
            "GEMINI_STREAMING={other}"
        ))),
    }
}
