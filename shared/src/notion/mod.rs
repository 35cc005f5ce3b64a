//! Notion API types and client.

pub mod client;
pub mod property;

pub use client::{NotionClient, PageSource};
pub use property::{NotionPage, PropertyBag, RichText, SelectOption, TypedProperty};
