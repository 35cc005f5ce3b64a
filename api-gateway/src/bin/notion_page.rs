//! Notion Page Lambda - Handles the spots widget's page lookup.
//!
//! Fetches one Notion page by `?id=` and answers with the flat record the
//! scheduling widget renders. The token comes from `NOTION_TOKEN`, or from
//! the Secrets Manager secret named by `NOTION_TOKEN_SECRET_ARN`.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::{get_notion_token, Config, NotionClient};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState {
    http_client: reqwest::Client,
    secrets_client: Option<aws_sdk_secretsmanager::Client>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env();

        let secrets_client = if config.token_secret_arn.is_some() {
            let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            Some(aws_sdk_secretsmanager::Client::new(&aws_config))
        } else {
            None
        };

        Ok(Self {
            http_client: reqwest::Client::new(),
            secrets_client,
        })
    }

    /// Configuration for one invocation, token resolved.
    ///
    /// Re-read on every call so token, base URL and API version changes
    /// apply without a cold start.
    async fn config(&self) -> Config {
        let config = Config::from_env();
        if config.notion_token.is_some() {
            return config;
        }

        let (Some(client), Some(arn)) = (&self.secrets_client, config.token_secret_arn.clone()) else {
            return config;
        };

        match get_notion_token(client, &arn).await {
            Ok(token) => config.with_token(token),
            Err(e) => {
                warn!("Failed to load Notion token from Secrets Manager: {}", e);
                config
            }
        }
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let config = state.config().await;
    let notion_client = NotionClient::new(state.http_client.clone(), &config);
    shared::handle(&event, &config, &notion_client).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
