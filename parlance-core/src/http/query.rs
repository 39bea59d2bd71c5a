//! Deterministic query-string serialization
//!
//! Parameters are sorted by key, array values are comma-joined before
//! percent-encoding, so a literal comma inside a value is escaped rather
//! than acting as a separator.

use std::collections::BTreeMap;
use url::form_urlencoded;

/// A typed query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    Int(i64),
    Bool(bool),
    /// Serialized as a single comma-joined value
    List(Vec<String>),
}

impl QueryValue {
    fn render(&self) -> String {
        match self {
            QueryValue::String(s) => s.clone(),
            QueryValue::Int(n) => n.to_string(),
            QueryValue::Bool(b) => b.to_string(),
            QueryValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::String(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::String(v)
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::Int(v as i64)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::List(v)
    }
}

/// Serialize parameters to a URL-encoded query string.
///
/// Returns an empty string when there are no parameters. Keys come out in
/// sorted order (`BTreeMap` iteration order), so the result is stable for a
/// given parameter set.
pub fn stringify(params: &BTreeMap<String, QueryValue>) -> String {
    if params.is_empty() {
        return String::new();
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, &value.render());
    }
    serializer.finish()
}
