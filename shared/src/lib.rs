//! Shared library for the spots widget Lambda functions.
//!
//! This crate provides the Notion page client, the property mapper and the
//! request handler used by the `notion_page` Lambda.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod mapper;
pub mod notion;
pub mod secrets;

pub use config::Config;
pub use error::{Error, Result};
pub use handler::handle;
pub use mapper::{map_properties, FieldValue, MappedRecord};
pub use notion::{NotionClient, NotionPage, PageSource, PropertyBag, TypedProperty};
pub use secrets::{get_notion_token, get_secret};
