//! Ordered, multi-valued query parameters.
//!
//! `ParamSet` is the object handed to the HTTP layer. Keys keep their first
//! insertion position and each key holds one or more values, so repeated
//! parameters like ERM's `filters` survive a round trip.

use std::borrow::Cow;
use std::fmt;

/// Parameter names the CQL and ERM protocols give meaning to.
pub mod keys {
    pub const QUERY: &str = "query";
    pub const FILTERS: &str = "filters";
    pub const LIMIT: &str = "limit";
    pub const PER_PAGE: &str = "perPage";
    pub const OFFSET: &str = "offset";
    pub const STATS: &str = "stats";
    pub const SORT: &str = "sort";

    /// Keys never forwarded from the caller as passthrough
    pub const RESERVED: [&str; 7] = [QUERY, FILTERS, LIMIT, PER_PAGE, OFFSET, STATS, SORT];
}

/// An ordered multi-value collection of query parameters.
///
/// Equality ignores ordering between keys, since endpoints don't care about
/// it, but values repeated under one key are compared as a sorted multiset.
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    entries: Vec<(String, Vec<String>)>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `key=value&key=value` query string, percent-decoding each part.
    ///
    /// A leading `?` is ignored and pairs without `=` get an empty value.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect()
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for `key` in insertion order (empty when absent)
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Replace every value of `key` with `value`.
    ///
    /// An existing key keeps its position; a new key goes to the end.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.values_mut(&key) {
            Some(values) => *values = vec![value],
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Append `value` to `key`, keeping existing values.
    pub fn add(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.values_mut(&key) {
            Some(values) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Remove `key` and return its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Overlay `other`: each of its keys replaces the same key here.
    pub fn merge(&mut self, other: ParamSet) {
        for (key, values) in other.entries {
            match self.values_mut(&key) {
                Some(existing) => *existing = values,
                None => self.entries.push((key, values)),
            }
        }
    }

    /// Every `(key, value)` pair, repeated keys included
    pub fn multi_items(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.as_str(), value.as_str()))
        })
    }

    /// Number of `(key, value)` pairs
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Percent-encoded form suitable for appending to a URL after `?`.
    pub fn to_query_string(&self) -> String {
        self.multi_items()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn values(&self, key: &str) -> Option<&Vec<String>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values)
    }

    fn values_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values)
    }

    fn sorted_items(&self) -> Vec<(&str, &str)> {
        let mut items: Vec<_> = self.multi_items().collect();
        items.sort_unstable();
        items
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(Cow::into_owned)
        .unwrap_or(raw)
}

impl PartialEq for ParamSet {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_items() == other.sorted_items()
    }
}

impl Eq for ParamSet {}

/// Unencoded `key=value&...` form, for logs and assertions.
impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.multi_items().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParamSet::new();
        for (key, value) in iter {
            params.add(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: ToString> Extend<(K, V)> for ParamSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}
