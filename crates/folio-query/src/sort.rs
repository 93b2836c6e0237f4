//! Sort clause detection.
//!
//! Only a fixed set of textual forms is recognized, enough to tell whether a
//! caller already sorted by id and in which direction:
//! - `... sortBy id`, `... sortBy id asc`, `... sortBy id DESC`
//! - `... sortBy id/sort.ascending`, `... sortby id/sort.desc`
//! - ERM `sort` values `id;asc` and `id;desc`
//!
//! Anything else after `sortBy` still counts as a sort, just not one we can
//! page by id through.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker that starts a CQL sort clause
static SORTBY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)sortby").unwrap());

/// A sort clause on `id` alone, starting at the `sortby` marker
static SORTBY_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^sortby\s*id(?:(?:/sort\.|\s+)(asc|ascending|desc|descending))?\s*$").unwrap()
});

/// The CQL query matching every record
static DEFAULT_CQL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*cql\.allRecords\s*=\s*1\s*$").unwrap());

/// How an input asked for its results to be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// No sort marker at all
    #[default]
    Unsorted,
    /// Sorted, but not by id in a recognizable direction
    Nonstandard,
    Ascending,
    Descending,
}

impl SortDirection {
    /// True when the caller asked for any ordering.
    pub fn is_explicit(self) -> bool {
        self != SortDirection::Unsorted
    }

    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

/// True when `query` contains a `sortby` marker, in any case.
pub fn has_sort_clause(query: &str) -> bool {
    SORTBY_RE.is_match(query)
}

/// Direction of the sort clause in a CQL string.
pub fn cql_sort_direction(query: &str) -> SortDirection {
    let Some(marker) = SORTBY_RE.find(query) else {
        return SortDirection::Unsorted;
    };

    let Some(caps) = SORTBY_ID_RE.captures(&query[marker.start()..]) else {
        return SortDirection::Nonstandard;
    };

    match caps.get(1).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(dir) if dir.starts_with("desc") => SortDirection::Descending,
        _ => SortDirection::Ascending,
    }
}

/// Direction of an ERM `sort` parameter value.
pub fn erm_sort_direction(sort: &str) -> SortDirection {
    match sort {
        "id;asc" => SortDirection::Ascending,
        "id;desc" => SortDirection::Descending,
        _ => SortDirection::Nonstandard,
    }
}

/// The trimmed predicate in front of a CQL sort clause.
///
/// `None` when there is no sort clause or nothing precedes it.
pub fn cql_prefix(query: &str) -> Option<&str> {
    let marker = SORTBY_RE.find(query)?;
    let prefix = query[..marker.start()].trim();
    (!prefix.is_empty()).then_some(prefix)
}

/// True when the predicate part of `query` is `cql.allRecords=1`.
pub fn is_default_cql(query: &str) -> bool {
    let predicate = match SORTBY_RE.find(query) {
        Some(marker) => &query[..marker.start()],
        None => query,
    };
    DEFAULT_CQL_RE.is_match(predicate)
}
