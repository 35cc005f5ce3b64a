//! Client for the Notion pages endpoint.

use std::future::Future;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::error;

use super::property::NotionPage;
use crate::{Config, Error, Result};

/// Anything that can fetch a page by id.
pub trait PageSource {
    /// Fetch one page, authenticating with `token`.
    fn fetch_page(
        &self,
        token: &str,
        page_id: &str,
    ) -> impl Future<Output = Result<NotionPage>> + Send;
}

/// Notion REST client backed by reqwest.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http_client: reqwest::Client,
    api_base_url: String,
    notion_version: String,
}

impl NotionClient {
    /// Create a new client.
    pub fn new(http_client: reqwest::Client, config: &Config) -> Self {
        Self {
            http_client,
            api_base_url: config.api_base_url.clone(),
            notion_version: config.notion_version.clone(),
        }
    }

    /// URL of a page; the id is percent-encoded so it stays one path segment.
    pub fn page_url(&self, page_id: &str) -> String {
        format!("{}/pages/{}", self.api_base_url, urlencoding::encode(page_id))
    }
}

impl PageSource for NotionClient {
    async fn fetch_page(&self, token: &str, page_id: &str) -> Result<NotionPage> {
        let response = self
            .http_client
            .get(self.page_url(page_id))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header("Notion-Version", &self.notion_version)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            error!("Notion API error: {} {}", status.as_u16(), status_text);
            return Err(Error::Upstream {
                status: status.as_u16(),
                status_text,
            });
        }

        Ok(response.json::<NotionPage>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response on a local port; yields the raw request head.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (Config, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8(request).unwrap()
        });

        let config = Config {
            api_base_url: format!("http://{}/v1", addr),
            ..Config::default()
        };
        (config, server)
    }

    fn header_lines(request: &str) -> Vec<String> {
        request.lines().map(|line| line.to_ascii_lowercase()).collect()
    }

    #[test]
    fn test_page_url() {
        let client = NotionClient::new(reqwest::Client::new(), &Config::default());
        assert_eq!(
            client.page_url("1f2e3d4c-0000-4000-8000-000000000001"),
            "https://api.notion.com/v1/pages/1f2e3d4c-0000-4000-8000-000000000001"
        );
    }

    #[test]
    fn test_page_url_encodes_id() {
        let config = Config {
            api_base_url: "http://localhost:9000/v1".to_string(),
            ..Config::default()
        };
        let client = NotionClient::new(reqwest::Client::new(), &config);
        assert_eq!(
            client.page_url("../users/me"),
            "http://localhost:9000/v1/pages/..%2Fusers%2Fme"
        );
    }

    #[tokio::test]
    async fn test_fetch_page_sends_notion_headers() {
        let (config, server) = serve_once("404 Not Found", r#"{"object":"error","status":404}"#).await;
        let client = NotionClient::new(reqwest::Client::new(), &config);

        let err = client.fetch_page("tok", "abc").await.unwrap_err();
        let request = server.await.unwrap();
        let lines = header_lines(&request);

        assert!(request.starts_with("GET /v1/pages/abc HTTP/1.1\r\n"), "{}", request);
        assert!(lines.contains(&"authorization: bearer tok".to_string()), "{}", request);
        assert!(lines.contains(&"notion-version: 2022-06-28".to_string()), "{}", request);
        assert!(lines.contains(&"content-type: application/json".to_string()), "{}", request);

        match err {
            Error::Upstream { status, status_text } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_uses_configured_version() {
        let (config, server) = serve_once("401 Unauthorized", "{}").await;
        let config = Config {
            notion_version: "2025-09-03".to_string(),
            ..config
        };
        let client = NotionClient::new(reqwest::Client::new(), &config);

        let err = client.fetch_page("tok", "abc").await.unwrap_err();
        let lines = header_lines(&server.await.unwrap());

        assert!(lines.contains(&"notion-version: 2025-09-03".to_string()));
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_string(), "Erro ao buscar dados do Notion: 401");
    }

    #[tokio::test]
    async fn test_fetch_page_decodes_properties() {
        let body = r#"{"object":"page","id":"abc","properties":{"Spots 30":{"id":"x","type":"number","number":3}}}"#;
        let (config, server) = serve_once("200 OK", body).await;
        let client = NotionClient::new(reqwest::Client::new(), &config);

        let page = client.fetch_page("tok", "abc").await.unwrap();
        server.await.unwrap();

        assert_eq!(page.id.as_deref(), Some("abc"));
        assert_eq!(
            page.properties.get("Spots 30"),
            Some(&crate::TypedProperty::Number { number: Some(3.into()) })
        );
    }

    #[tokio::test]
    async fn test_fetch_page_undecodable_body() {
        let (config, server) = serve_once("200 OK", "<html>gateway</html>").await;
        let client = NotionClient::new(reqwest::Client::new(), &config);

        let err = client.fetch_page("tok", "abc").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, Error::Http(_)), "{:?}", err);
        assert_eq!(err.status_code(), 500);
    }
}
