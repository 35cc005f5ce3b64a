//! Error types for the Notion page Lambda.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a page request.
#[derive(Error, Debug)]
pub enum Error {
    /// The `id` query parameter was missing or empty
    #[error("ID do registro é obrigatório")]
    MissingId,

    /// Configuration error
    #[error("{0}")]
    Config(String),

    /// Notion answered with a non-success status
    #[error("Erro ao buscar dados do Notion: {status}")]
    Upstream { status: u16, status_text: String },

    /// Transport or decode failure talking to Notion
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingId => 400,
            Error::Upstream { status, .. } => *status,
            _ => 500,
        }
    }

    /// Token missing from configuration.
    pub fn missing_token() -> Self {
        Error::Config("Token do Notion não configurado".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::MissingId.status_code(), 400);
        assert_eq!(Error::missing_token().status_code(), 500);
        assert_eq!(Error::Aws("boom".to_string()).status_code(), 500);

        let upstream = Error::Upstream {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(upstream.status_code(), 404);
        assert_eq!(upstream.to_string(), "Erro ao buscar dados do Notion: 404");
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(Error::MissingId.to_string(), "ID do registro é obrigatório");
        assert_eq!(
            Error::missing_token().to_string(),
            "Token do Notion não configurado"
        );
    }
}
