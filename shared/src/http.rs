//! HTTP helpers for the Lambda responses.

use lambda_http::http::response::Builder;
use lambda_http::{Body, Response};
use serde::Serialize;

/// Headers attached to every response, preflight included.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Content-Type", "application/json"),
];

/// Error body returned to the widget.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn builder(status: u16) -> Builder {
    CORS_HEADERS
        .iter()
        .fold(Response::builder().status(status), |builder, (name, value)| {
            builder.header(*name, *value)
        })
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, lambda_http::Error> {
    Ok(builder(status)
        .body(Body::from(serde_json::to_string(data)?))
        .map_err(Box::new)?)
}

/// Create an error response with the given status code and body.
pub fn error_response(status: u16, body: ErrorBody) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &body)
}

/// Empty 200 answering a CORS preflight.
pub fn preflight_response() -> Result<Response<Body>, lambda_http::Error> {
    Ok(builder(200).body(Body::Empty).map_err(Box::new)?)
}
