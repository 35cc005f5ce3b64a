//! AWS Secrets Manager integration for the Notion token.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::{Error, Result};

/// Cached secrets with lazy initialization.
static SECRETS_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRETS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// JSON shape accepted for a token secret.
#[derive(Debug, Deserialize)]
struct TokenSecret {
    #[serde(alias = "notion_token", alias = "NOTION_TOKEN")]
    token: String,
}

/// Get a secret value from Secrets Manager with caching.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    {
        let cache = get_cache().read().await;
        if let Some(value) = cache.get(secret_arn) {
            return Ok(value.clone());
        }
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?
        .to_string();

    {
        let mut cache = get_cache().write().await;
        cache.insert(secret_arn.to_string(), secret_string.clone());
    }

    Ok(secret_string)
}

/// Get the Notion token stored under `secret_arn`.
pub async fn get_notion_token(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    let secret_string = get_secret(client, secret_arn).await?;

    parse_notion_token(&secret_string)
        .ok_or_else(|| Error::Aws("Secret does not contain a Notion token".to_string()))
}

/// Extract the token from a secret string.
///
/// Accepts either the bare token or a JSON object with a `token`
/// (or `notion_token`) field.
pub fn parse_notion_token(secret_string: &str) -> Option<String> {
    let trimmed = secret_string.trim();
    if trimmed.starts_with('{') {
        return serde_json::from_str::<TokenSecret>(trimmed)
            .ok()
            .map(|secret| secret.token)
            .filter(|token| !token.is_empty());
    }

    Some(trimmed.to_string()).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_token() {
        assert_eq!(
            parse_notion_token("  secret_abc123\n"),
            Some("secret_abc123".to_string())
        );
    }

    #[test]
    fn test_parse_json_token() {
        let json = r#"{"notion_token":"ntn_456","workspace":"spots"}"#;
        assert_eq!(parse_notion_token(json), Some("ntn_456".to_string()));

        let json = r#"{"token":"ntn_789"}"#;
        assert_eq!(parse_notion_token(json), Some("ntn_789".to_string()));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(parse_notion_token(""), None);
        assert_eq!(parse_notion_token(r#"{"token":""}"#), None);
        assert_eq!(parse_notion_token(r#"{"other":"x"}"#), None);
    }
}
