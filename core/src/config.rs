//! Client configuration.

use std::fmt;

use serde::Deserialize;
use url::Url;

use crate::error::{ApiError, Result};

/// Production endpoint of the auto.ria.com developer API.
pub const DEFAULT_BASE_URL: &str = "https://developers.ria.com";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Configuration for `AutoRiaClient`.
///
/// Deserializable so callers can load it from whatever config source they
/// already use; `base_url` may be omitted.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
        }
    }

    /// Point the client at a different host (mock server, proxy).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Check the key and parse the base URL.
    pub(crate) fn validate(&self) -> Result<Url> {
        if self.api_key.trim().is_empty() {
            return Err(ApiError::Configuration(
                "API key should not be empty".to_string(),
            ));
        }

        let url = Url::parse(self.base_url.trim_end_matches('/')).map_err(|e| {
            ApiError::Configuration(format!("invalid base URL `{}`: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ApiError::Configuration(format!(
                "base URL `{}` must be an absolute http(s) URL",
                self.base_url
            )));
        }
        Ok(url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
