//! Notion page property model.
//!
//! Only the property kinds the mapper reads are modelled; everything else
//! decodes to [`TypedProperty::Other`].

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::collections::HashMap;
use tracing::debug;

/// A page as returned by `GET /v1/pages/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotionPage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: PropertyBag,
}

/// One typed property value, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypedProperty {
    Number {
        #[serde(default)]
        number: Option<Number>,
    },
    Title {
        #[serde(default)]
        title: Option<Vec<RichText>>,
    },
    RichText {
        #[serde(default)]
        rich_text: Option<Vec<RichText>>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Option<Vec<SelectOption>>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    #[serde(other)]
    Other,
}

/// A rich-text span. Mentions and equations carry no `text` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub text: Option<TextContent>,
}

impl RichText {
    /// Plain content of the span, if it is a text span.
    pub fn content(&self) -> Option<&str> {
        self.text.as_ref().and_then(|t| t.content.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
}

/// A select / multi-select option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: Option<String>,
}

/// Property name to typed value.
///
/// Decoding is per property: a payload that does not match its declared
/// kind becomes [`TypedProperty::Other`] rather than failing the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag(HashMap<String, TypedProperty>);

impl PropertyBag {
    pub fn get(&self, name: &str) -> Option<&TypedProperty> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First property present under any of `candidates`, in order.
    pub fn first_of(&self, candidates: &[&str]) -> Option<&TypedProperty> {
        candidates.iter().find_map(|name| self.get(name))
    }
}

impl FromIterator<(String, TypedProperty)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (String, TypedProperty)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for PropertyBag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;

        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| {
                let property = serde_json::from_value(value).unwrap_or_else(|e| {
                    debug!("Property {:?} did not match its declared type: {}", name, e);
                    TypedProperty::Other
                });
                (name, property)
            })
            .collect())
    }
}
