//! Configuration management for the Notion page Lambda.

use std::env;

/// Default Notion REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Notion API version pinned in every upstream request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Integration token used as the bearer credential
    pub notion_token: Option<String>,
    /// Base URL of the Notion API, without a trailing slash
    pub api_base_url: String,
    /// Value of the `Notion-Version` header
    pub notion_version: String,
    /// ARN of a Secrets Manager secret holding the token (fallback)
    pub token_secret_arn: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notion_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            token_secret_arn: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            notion_token: get("NOTION_TOKEN"),
            api_base_url: get("NOTION_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            notion_version: get("NOTION_VERSION")
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
            token_secret_arn: get("NOTION_TOKEN_SECRET_ARN"),
        }
    }

    /// Set the token, keeping the rest of the configuration.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.notion_token = Some(token.into());
        self
    }
}
