//! Request handling for the Notion page endpoint.
//!
//! `GET ?id=<page id>` fetches the page from Notion and answers with the
//! mapped spots record. Every failure is rendered as a JSON body; nothing
//! partial is ever returned.

use lambda_http::http::Method;
use lambda_http::{Body, Request, RequestExt, Response};
use tracing::{debug, error, info};

use crate::http::{error_response, json_response, preflight_response, ErrorBody};
use crate::mapper::{map_properties, MappedRecord};
use crate::notion::PageSource;
use crate::{Config, Error, Result};

/// Message returned for anything that is not a client, config or upstream error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

/// Serve one request.
pub async fn handle<S: PageSource>(
    event: &Request,
    config: &Config,
    source: &S,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }

    match fetch_record(event, config, source).await {
        Ok(record) => json_response(200, &record),
        Err(e) => error_response(e.status_code(), error_body(&e)),
    }
}

async fn fetch_record<S: PageSource>(
    event: &Request,
    config: &Config,
    source: &S,
) -> Result<MappedRecord> {
    let params = event.query_string_parameters();
    let page_id = params
        .first("id")
        .filter(|id| !id.is_empty())
        .ok_or(Error::MissingId)?;

    let token = config
        .notion_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .ok_or_else(Error::missing_token)?;

    info!("Fetching Notion page: {}", page_id);

    let page = source.fetch_page(token, page_id).await?;
    debug!("Properties received from Notion: {:?}", page.properties);

    let record = map_properties(&page.properties);
    info!("Mapped record: {:?}", record);

    Ok(record)
}

fn error_body(e: &Error) -> ErrorBody {
    match e {
        Error::MissingId | Error::Config(_) => ErrorBody::new(e.to_string()),
        Error::Upstream { status_text, .. } => {
            ErrorBody::new(e.to_string()).with_details(status_text.clone())
        }
        _ => {
            error!("Unexpected failure: {}", e);
            ErrorBody::new(INTERNAL_ERROR_MESSAGE).with_details(e.to_string())
        }
    }
}
