//! Query input classification.
//!
//! Turns a [`QueryInput`] into the facts the normalizer needs: the captured
//! query or filter strings, which dialects the input fits, the requested sort
//! direction, and the parameters to pass through untouched.
//!
//! The checks overlap on weakly typed input, so [`ParsedQuery::parse`] runs
//! them in a fixed order and lets later findings overwrite earlier ones:
//!
//! 1. a literal CQL string (CQL only if it has a `sortBy` clause)
//! 2. a `query` key (CQL only)
//! 3. a `filters` key (ERM only, replaces the captured strings)
//! 4. a `sort` key (ERM only, captured strings untouched)

use crate::dialect::Dialects;
use crate::error::{QueryError, Result};
use crate::input::QueryInput;
use crate::params::{keys, ParamSet};
use crate::sort::{self, SortDirection};
use serde_json::Value;
use tracing::debug;

/// Everything the normalizer learns from one query input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    /// Captured query string, or the filter list for ERM inputs
    pub values: Vec<String>,
    pub dialects: Dialects,
    pub sort: SortDirection,
    /// Caller's ERM `sort` value
    pub sort_value: Option<String>,
    /// The input selects every record (`None` or bare `cql.allRecords=1`)
    pub is_default: bool,
    /// CQL predicate in front of the caller's `sortBy` clause
    pub custom_cql: Option<String>,
    pub passthrough: ParamSet,
}

impl ParsedQuery {
    /// Classify `input`; `None` is the query matching every record.
    pub fn parse(input: Option<&QueryInput>) -> Result<Self> {
        let Some(input) = input else {
            return Ok(Self {
                is_default: true,
                ..Self::default()
            });
        };

        let mut parsed = Self {
            passthrough: extract_passthrough(input),
            ..Self::default()
        };

        let (literal, is_cql) = extract_literal_string(input);
        if let Some(literal) = literal {
            if is_cql {
                parsed.dialects = Dialects::cql_only();
            }
            parsed.is_default = sort::is_default_cql(&literal);
            parsed.values = vec![literal];
        }

        if let Some(query) = extract_structured_query(input)? {
            parsed.dialects = Dialects::cql_only();
            parsed.is_default = sort::is_default_cql(&query);
            parsed.values = vec![query];
        }

        if let Some(filters) = extract_filters(input)? {
            parsed.dialects = Dialects::erm_only();
            parsed.is_default = false;
            parsed.values = filters;
        }

        if detect_erm_by_sort_key(input) {
            parsed.dialects = Dialects::erm_only();
            parsed.sort_value = extract_sort_value(input);
        }

        parsed.sort = detect_sort_direction(input)?;
        parsed.custom_cql = extract_custom_cql_prefix(input)?;

        debug!(
            dialects = ?parsed.dialects,
            sort = ?parsed.sort,
            is_default = parsed.is_default,
            values = parsed.values.len(),
            "classified query input"
        );

        Ok(parsed)
    }
}

/// A reserved key's raw value, in either structured input shape
enum Field<'a> {
    Json(&'a Value),
    Params(&'a [String]),
}

fn field<'a>(input: &'a QueryInput, key: &str) -> Option<Field<'a>> {
    match input {
        QueryInput::Cql(_) => None,
        QueryInput::Mapping(map) => map.get(key).map(Field::Json),
        QueryInput::Params(params) => params
            .contains_key(key)
            .then(|| Field::Params(params.get_all(key))),
    }
}

/// Flatten a JSON value into query parameter values.
fn param_values(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Null => vec![String::new()],
        Value::Array(items) => items.iter().flat_map(param_values).collect(),
        other => vec![other.to_string()],
    }
}

/// A plain string input, and whether it carries a CQL `sortBy` clause.
pub fn extract_literal_string(input: &QueryInput) -> (Option<String>, bool) {
    match input {
        QueryInput::Cql(query) => (Some(query.clone()), sort::has_sort_clause(query)),
        _ => (None, false),
    }
}

/// The single string under `query`.
///
/// An empty parameter list counts as absent.
pub fn extract_structured_query(input: &QueryInput) -> Result<Option<String>> {
    match field(input, keys::QUERY) {
        None => Ok(None),
        Some(Field::Json(Value::String(query))) => Ok(Some(query.clone())),
        Some(Field::Json(other)) => Err(QueryError::QueryNotString {
            value: other.to_string(),
        }),
        Some(Field::Params(values)) => match values {
            [] => Ok(None),
            [query] => Ok(Some(query.clone())),
            many => Err(QueryError::MultipleQueries {
                count: many.len(),
                values: many.to_vec(),
            }),
        },
    }
}

/// The strings under `filters`; a lone string is a one-element list.
pub fn extract_filters(input: &QueryInput) -> Result<Option<Vec<String>>> {
    match field(input, keys::FILTERS) {
        None => Ok(None),
        Some(Field::Json(Value::String(filter))) => Ok(Some(vec![filter.clone()])),
        Some(Field::Json(Value::Array(items))) => items
            .iter()
            .map(|item| match item {
                Value::String(filter) => Ok(filter.clone()),
                other => Err(QueryError::FilterNotString {
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(Field::Json(other)) => Err(QueryError::FilterNotString {
            value: other.to_string(),
        }),
        Some(Field::Params(values)) => Ok(Some(values.to_vec())),
    }
}

/// Any `sort` key marks the input as ERM, whatever its value.
pub fn detect_erm_by_sort_key(input: &QueryInput) -> bool {
    field(input, keys::SORT).is_some()
}

fn extract_sort_value(input: &QueryInput) -> Option<String> {
    match field(input, keys::SORT)? {
        Field::Json(value) => param_values(value).into_iter().next(),
        Field::Params(values) => values.first().cloned(),
    }
}

/// Sort direction from the literal string, else the `query` value, else the
/// `sort` value.
///
/// A `query` without a `sortBy` clause defers to `sort`.
pub fn detect_sort_direction(input: &QueryInput) -> Result<SortDirection> {
    if let QueryInput::Cql(query) = input {
        return Ok(sort::cql_sort_direction(query));
    }

    if let Some(query) = extract_structured_query(input)? {
        let direction = sort::cql_sort_direction(&query);
        if direction.is_explicit() {
            return Ok(direction);
        }
    }

    Ok(extract_sort_value(input)
        .map(|value| sort::erm_sort_direction(&value))
        .unwrap_or_default())
}

/// Caller's CQL predicate ahead of its `sortBy` clause, if any.
pub fn extract_custom_cql_prefix(input: &QueryInput) -> Result<Option<String>> {
    let query = match input {
        QueryInput::Cql(query) => Some(query.clone()),
        _ => extract_structured_query(input)?,
    };
    Ok(query.as_deref().and_then(sort::cql_prefix).map(str::to_string))
}

/// Every parameter of `input` except the reserved protocol keys.
pub fn extract_passthrough(input: &QueryInput) -> ParamSet {
    match input {
        QueryInput::Cql(_) => ParamSet::new(),
        QueryInput::Mapping(map) => map
            .iter()
            .filter(|(key, _)| !keys::RESERVED.contains(&key.as_str()))
            .flat_map(|(key, value)| {
                param_values(value)
                    .into_iter()
                    .map(move |value| (key.clone(), value))
            })
            .collect(),
        QueryInput::Params(params) => params
            .multi_items()
            .filter(|(key, _)| !keys::RESERVED.contains(key))
            .collect(),
    }
}
