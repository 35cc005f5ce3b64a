//! Maps a Notion property bag onto the flat record the spots widget reads.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Number;

use crate::notion::{PropertyBag, RichText, TypedProperty};

/// Largest float that still maps exactly onto an integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Marker emitted for hyphenated dates that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// A scalar output value. Serialized untagged: numbers stay JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Default a rule falls back to. `const`-constructible, unlike [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Number(i64),
    Text(&'static str),
}

impl FieldDefault {
    pub fn value(self) -> FieldValue {
        match self {
            FieldDefault::Number(n) => n.into(),
            FieldDefault::Text(s) => s.into(),
        }
    }
}

/// How one output field is located in the bag.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    /// Property names tried in order; the first one present wins.
    pub candidates: &'static [&'static str],
    pub default: FieldDefault,
}

pub const SPOTS_30: FieldRule = FieldRule {
    name: "spots30",
    candidates: &["Spots 30\"", "Spots 30", "spots30"],
    default: FieldDefault::Number(0),
};

pub const SPOTS_5: FieldRule = FieldRule {
    name: "spots5",
    candidates: &["Spots 5\"", "Spots 5", "spots5"],
    default: FieldDefault::Number(0),
};

pub const SPOTS_15: FieldRule = FieldRule {
    name: "spots15",
    candidates: &["Spots 15\"", "Spots 15", "spots15"],
    default: FieldDefault::Number(0),
};

pub const SPOTS_60: FieldRule = FieldRule {
    name: "spots60",
    candidates: &["Spots 60\"", "Spots 60", "spots60"],
    default: FieldDefault::Number(0),
};

pub const TEST_60: FieldRule = FieldRule {
    name: "test60",
    candidates: &["Test. 60\"", "Test 60", "test60"],
    default: FieldDefault::Number(0),
};

pub const EMISSORA: FieldRule = FieldRule {
    name: "emissora",
    candidates: &["Emissora", "emissora"],
    default: FieldDefault::Text("Emissora"),
};

pub const INICIO: FieldRule = FieldRule {
    name: "inicio",
    candidates: &["Data inicio", "Data Início", "inicio"],
    default: FieldDefault::Text("01/01/2025"),
};

pub const FIM: FieldRule = FieldRule {
    name: "fim",
    candidates: &["Data fim", "Data Fim", "fim"],
    default: FieldDefault::Text("31/01/2025"),
};

pub const DIAS: FieldRule = FieldRule {
    name: "dias",
    candidates: &["Dias da semana", "Dias", "dias"],
    default: FieldDefault::Text("Seg.,Ter.,Qua.,Qui.,Sex."),
};

/// All rules, in output order.
pub const FIELD_RULES: [FieldRule; 9] = [
    SPOTS_30, SPOTS_5, SPOTS_15, SPOTS_60, TEST_60, EMISSORA, INICIO, FIM, DIAS,
];

/// The record returned to the widget. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedRecord {
    pub spots30: FieldValue,
    pub spots5: FieldValue,
    pub spots15: FieldValue,
    pub spots60: FieldValue,
    pub test60: FieldValue,
    pub emissora: FieldValue,
    pub inicio: FieldValue,
    pub fim: FieldValue,
    pub dias: FieldValue,
}

/// Extract a scalar from one property, falling back to `default`.
///
/// Empty strings and empty option lists count as absent. Unknown kinds
/// always yield the default.
pub fn extract_value(property: Option<&TypedProperty>, default: &FieldValue) -> FieldValue {
    let Some(property) = property else {
        return default.clone();
    };

    let text = match property {
        TypedProperty::Number { number } => {
            return FieldValue::Number(number.as_ref().map_or_else(|| 0.into(), integral));
        }
        TypedProperty::Title { title } => first_span(title.as_deref()),
        TypedProperty::RichText { rich_text } => first_span(rich_text.as_deref()),
        TypedProperty::Date { date } => date.as_ref().and_then(|d| d.start.clone()),
        TypedProperty::MultiSelect { multi_select } => multi_select.as_ref().map(|options| {
            options
                .iter()
                .map(|o| o.name.as_deref().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(",")
        }),
        TypedProperty::Select { select } => select.as_ref().and_then(|s| s.name.clone()),
        TypedProperty::Other => None,
    };

    match text {
        Some(text) if !text.is_empty() => FieldValue::Text(text),
        _ => default.clone(),
    }
}

/// Whole floats (`10.0`) are written back as integers (`10`).
fn integral(number: &Number) -> Number {
    match number.as_f64() {
        Some(f) if !number.is_i64() && !number.is_u64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
            (f as i64).into()
        }
        _ => number.clone(),
    }
}

fn first_span(spans: Option<&[RichText]>) -> Option<String> {
    spans
        .and_then(|spans| spans.first())
        .and_then(RichText::content)
        .map(str::to_string)
}

/// Resolve one field against the bag.
pub fn resolve(bag: &PropertyBag, rule: &FieldRule) -> FieldValue {
    extract_value(bag.first_of(rule.candidates), &rule.default.value())
}

/// Reformat an ISO date to `DD/MM/YYYY`.
///
/// Only values containing a hyphen are treated as ISO; anything else is
/// returned unchanged.
pub fn normalize_date(value: &str) -> String {
    if !value.contains('-') {
        return value.to_string();
    }

    match parse_calendar_date(value.trim()) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|datetime| datetime.date())
}

fn normalize_date_field(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(text) => FieldValue::Text(normalize_date(&text)),
        number => number,
    }
}

/// Build the full record from a property bag.
pub fn map_properties(bag: &PropertyBag) -> MappedRecord {
    MappedRecord {
        spots30: resolve(bag, &SPOTS_30),
        spots5: resolve(bag, &SPOTS_5),
        spots15: resolve(bag, &SPOTS_15),
        spots60: resolve(bag, &SPOTS_60),
        test60: resolve(bag, &TEST_60),
        emissora: resolve(bag, &EMISSORA),
        inicio: normalize_date_field(resolve(bag, &INICIO)),
        fim: normalize_date_field(resolve(bag, &FIM)),
        dias: resolve(bag, &DIAS),
    }
}
