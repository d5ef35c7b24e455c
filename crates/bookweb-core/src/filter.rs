//! Filter state for list views and its query-string encoding
//!
//! A key is either constrained or absent. Values that carry no constraint
//! (blank text, non-finite numbers, unchecked flags) are dropped when set,
//! so the encoded query only ever holds meaningful parameters.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;

/// Scalar filter value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    /// Sent as `true` when set; an unchecked flag is never sent
    Flag(bool),
}

impl FilterValue {
    /// Wire form, `None` when the value constrains nothing
    pub fn encode(&self) -> Option<String> {
        match self {
            FilterValue::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            FilterValue::Number(n) if n.is_finite() => Some(format_number(*n)),
            FilterValue::Number(_) => None,
            FilterValue::Flag(true) => Some("true".to_string()),
            FilterValue::Flag(false) => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// How a filter input is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Number,
    Flag,
}

impl FilterKind {
    /// Parse raw form input for a filter of this kind
    pub fn parse(self, field: &str, raw: &str) -> CoreResult<Option<FilterValue>> {
        let raw = raw.trim();
        match self {
            FilterKind::Text => Ok(Some(FilterValue::Text(raw.to_string()))),
            FilterKind::Number if raw.is_empty() => Ok(None),
            FilterKind::Number => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| Some(FilterValue::Number(n)))
                .ok_or_else(|| CoreError::InvalidInput {
                    field: field.to_string(),
                    message: format!("Filter '{}' must be a number", field),
                }),
            FilterKind::Flag => Ok(Some(FilterValue::Flag(matches!(raw, "true" | "on" | "1")))),
        }
    }
}

/// Active constraints of one list view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a key. Values without a constraint clear it.
    pub fn set(&mut self, key: &str, value: Option<FilterValue>) {
        match value.filter(|v| v.encode().is_some()) {
            Some(value) => {
                self.values.insert(key.to_string(), value);
            }
            None => {
                self.values.remove(key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Text of a key for refilling a form input
    pub fn display(&self, key: &str) -> String {
        self.get(key).and_then(FilterValue::encode).unwrap_or_default()
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Query parameters in key order
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter_map(|(key, value)| value.encode().map(|v| (key.clone(), v)))
            .collect()
    }
}

/// Filter keys understood by `GET /books`
pub mod book_filters {
    use super::FilterKind;

    pub const QUERY: &str = "q";
    pub const GENRE_ID: &str = "genre_id";
    pub const MIN_PRICE: &str = "minPrice";
    pub const MAX_PRICE: &str = "maxPrice";
    pub const IN_STOCK: &str = "inStock";
    pub const YEAR_FROM: &str = "yearFrom";
    pub const YEAR_TO: &str = "yearTo";

    pub const ALL: [(&str, FilterKind); 7] = [
        (QUERY, FilterKind::Text),
        (GENRE_ID, FilterKind::Text),
        (MIN_PRICE, FilterKind::Number),
        (MAX_PRICE, FilterKind::Number),
        (IN_STOCK, FilterKind::Flag),
        (YEAR_FROM, FilterKind::Number),
        (YEAR_TO, FilterKind::Number),
    ];

    pub fn kind_of(key: &str) -> Option<FilterKind> {
        ALL.iter().find(|(k, _)| *k == key).map(|(_, kind)| *kind)
    }
}
