//! Caller-supplied query inputs.

use crate::params::ParamSet;
use serde_json::{Map, Value};

/// A query in whatever shape the caller has it.
///
/// Mappings are weakly typed JSON so that callers can forward
/// configuration or request bodies untouched; the classifier rejects
/// `query` and `filters` values of the wrong shape.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    /// A literal CQL query, possibly ending in a `sortBy` clause
    Cql(String),
    /// Keys `query`, `filters`, `sort` plus passthrough parameters
    Mapping(Map<String, Value>),
    /// An already-built parameter set with the same keys
    Params(ParamSet),
}

impl QueryInput {
    /// Build an input from a JSON value.
    ///
    /// Strings become CQL and objects become mappings; `null` and every
    /// other shape mean there is no query.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::String(query) => Some(QueryInput::Cql(query)),
            Value::Object(map) => Some(QueryInput::Mapping(map)),
            _ => None,
        }
    }
}

impl From<&str> for QueryInput {
    fn from(query: &str) -> Self {
        QueryInput::Cql(query.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(query: String) -> Self {
        QueryInput::Cql(query)
    }
}

impl From<Map<String, Value>> for QueryInput {
    fn from(map: Map<String, Value>) -> Self {
        QueryInput::Mapping(map)
    }
}

impl From<ParamSet> for QueryInput {
    fn from(params: ParamSet) -> Self {
        QueryInput::Params(params)
    }
}
