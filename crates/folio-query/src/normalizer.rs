//! Dialect-aware parameter synthesis.
//!
//! [`QueryParams`] turns one classified query into the parameter sets FOLIO
//! endpoints expect. While a dialect is still unknown, its parameters are
//! emitted alongside the other's; endpoints ignore keys they don't use.

use crate::config::{PagingConfig, DEFAULT_PAGE_SIZE};
use crate::dialect::Dialects;
use crate::error::Result;
use crate::input::QueryInput;
use crate::params::{keys, ParamSet};
use crate::parser::ParsedQuery;
use crate::sort::SortDirection;
use tracing::{debug, trace};

/// ERM endpoints silently cap `perPage` here
pub const ERM_MAX_PER_PAGE: usize = 100;

/// CQL query matching every record
pub const DEFAULT_QUERY: &str = "cql.allRecords=1";

/// First cursor when paging ascending by id
pub const LOWEST_ID: &str = "00000000-0000-0000-0000-000000000000";

/// First cursor when paging descending by id
pub const HIGHEST_ID: &str = "99999999-9999-9999-9999-999999999999";

const ID_TIEBREAK: &str = " sortBy id";
const ID_ASC: &str = "id;asc";
const ID_DESC: &str = "id;desc";

/// Query parameters for one request against a CQL or ERM endpoint.
///
/// Built fresh for each request. Pages of one session are produced by
/// rebuilding from the same input and limit.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    limit: usize,
    parsed: ParsedQuery,
}

impl QueryParams {
    /// Classify `query` for pages of `limit` records.
    pub fn new(query: Option<QueryInput>, limit: usize) -> Result<Self> {
        let parsed = ParsedQuery::parse(query.as_ref())?;
        Ok(Self { limit, parsed })
    }

    /// Classify `query` for pages of [`DEFAULT_PAGE_SIZE`] records.
    pub fn with_default_limit(query: Option<QueryInput>) -> Result<Self> {
        Self::new(query, DEFAULT_PAGE_SIZE)
    }

    pub fn from_config(query: Option<QueryInput>, config: &PagingConfig) -> Result<Self> {
        Self::new(query, config.page_size)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn dialects(&self) -> Dialects {
        self.parsed.dialects
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.parsed.sort
    }

    /// Records per page the endpoint will actually return.
    ///
    /// ERM endpoints cap pages at [`ERM_MAX_PER_PAGE`].
    pub fn effective_limit(&self) -> usize {
        if self.parsed.dialects.erm.is_affirmed() {
            self.limit.min(ERM_MAX_PER_PAGE)
        } else {
            self.limit
        }
    }

    /// Parameters every endpoint of the input's dialect(s) accepts.
    pub fn normalized(&self) -> ParamSet {
        let params = self.build(None);
        trace!(%params, "normalized parameters");
        params
    }

    /// Parameters for reading `totalRecords` without fetching a page.
    pub fn stats(&self) -> ParamSet {
        let mut params = self.sorted_by_default();
        for key in [keys::LIMIT, keys::PER_PAGE] {
            if params.contains_key(key) {
                params.set(key, 1);
            }
        }
        trace!(%params, "stats parameters");
        params
    }

    /// Parameters for the zero-based page `page` of a stable, offset-paged
    /// listing.
    pub fn offset_paging(&self, page: usize) -> ParamSet {
        let mut params = self.sorted_by_default();

        if self.parsed.dialects.is_unresolved() && self.limit > ERM_MAX_PER_PAGE {
            // ERM would silently truncate the page
            debug!(
                limit = self.limit,
                "page too large for ERM, dropping ERM parameters"
            );
            for key in [keys::STATS, keys::SORT, keys::PER_PAGE] {
                params.remove(key);
            }
        }

        let effective_limit = self.effective_limit();
        if self.parsed.dialects.erm.is_affirmed() {
            params.set(keys::PER_PAGE, effective_limit);
        }

        params.set(keys::OFFSET, page.saturating_mul(effective_limit));
        trace!(%params, page, "offset paging parameters");
        params
    }

    /// Parameters for the page after record `last_id`, or the first page when
    /// `None`.
    ///
    /// Pages are ordered by id; descending when the input asked for it,
    /// ascending otherwise.
    pub fn id_paging(&self, last_id: Option<&str>) -> ParamSet {
        let descending = self.parsed.sort.is_descending();
        let cursor = last_id.unwrap_or(if descending { HIGHEST_ID } else { LOWEST_ID });
        let predicate = if descending {
            format!("id<{}", cursor)
        } else {
            format!("id>{}", cursor)
        };

        let mut params = self.build(None);

        if self.parsed.dialects.cql.is_possible() {
            let mut query = predicate.clone();
            if let Some(custom) = self.caller_predicate() {
                query = format!("{} and ({})", query, custom);
            }
            query.push_str(if descending {
                " sortBy id/sort.descending"
            } else {
                ID_TIEBREAK
            });
            params.set(keys::QUERY, query);
        }

        if self.parsed.dialects.erm.is_possible() {
            params.set(keys::SORT, if descending { ID_DESC } else { ID_ASC });
            params.add(keys::FILTERS, predicate);
        }

        trace!(%params, cursor, "id paging parameters");
        params
    }

    /// Base parameter set, with `default_sort` used for ERM when the caller
    /// gave no `sort`.
    fn build(&self, default_sort: Option<&str>) -> ParamSet {
        let cql = self.parsed.dialects.cql.is_possible();
        let erm = self.parsed.dialects.erm.is_possible();
        let mut params = self.parsed.passthrough.clone();

        if cql {
            params.set(keys::QUERY, self.cql_query());
        }

        if erm {
            if !self.parsed.is_default {
                for value in &self.parsed.values {
                    params.add(keys::FILTERS, value);
                }
            }
            if let Some(sort) = self.parsed.sort_value.as_deref().or(default_sort) {
                params.set(keys::SORT, sort);
            }
        }

        if cql {
            params.set(keys::LIMIT, self.limit);
        }

        if erm {
            params.set(keys::PER_PAGE, self.limit);
            // ERM only reports totalRecords when asked
            params.set(keys::STATS, true);
        }

        params
    }

    /// Base parameters, sorted by id unless the caller chose an order.
    fn sorted_by_default(&self) -> ParamSet {
        let mut params = self.build(Some(ID_ASC));
        if !self.parsed.sort.is_explicit() {
            if let Some(query) = params.get(keys::QUERY).map(|q| format!("{}{}", q, ID_TIEBREAK)) {
                params.set(keys::QUERY, query);
            }
        }
        params
    }

    fn cql_query(&self) -> &str {
        match self.parsed.values.as_slice() {
            [query] => query.as_str(),
            _ => DEFAULT_QUERY,
        }
    }

    /// The caller's own CQL predicate to keep when paging by id.
    fn caller_predicate(&self) -> Option<&str> {
        if self.parsed.is_default {
            return None;
        }
        if let Some(custom) = self.parsed.custom_cql.as_deref() {
            return Some(custom);
        }
        match self.parsed.values.as_slice() {
            [query] => Some(query.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Compatibility;
    use serde_json::json;

    fn params(query: Option<QueryInput>, limit: usize) -> QueryParams {
        QueryParams::new(query, limit).unwrap()
    }

    #[test]
    fn test_default_normalized() {
        let actual = params(None, 100).normalized();
        assert_eq!(
            actual.to_string(),
            "query=cql.allRecords=1&limit=100&perPage=100&stats=true"
        );
    }

    #[test]
    fn test_simple_query_emits_both_dialects() {
        let actual = params(Some("simple query".into()), 100).normalized();
        assert_eq!(
            actual.to_string(),
            "query=simple query&filters=simple query&limit=100&perPage=100&stats=true"
        );
    }

    #[test]
    fn test_default_literal_emits_no_filters() {
        let actual = params(Some("cql.allRecords=1".into()), 100).normalized();
        assert_eq!(actual, params(None, 100).normalized());
    }

    #[test]
    fn test_multiple_values_fall_back_to_default_query() {
        let mut parsed = ParsedQuery::parse(None).unwrap();
        parsed.is_default = false;
        parsed.values = vec!["a".to_string(), "b".to_string()];
        let qp = QueryParams { limit: 10, parsed };

        let actual = qp.normalized();
        assert_eq!(actual.get(keys::QUERY), Some(DEFAULT_QUERY));
        assert_eq!(actual.get_all(keys::FILTERS), ["a", "b"]);
    }

    #[test]
    fn test_passthrough_is_kept() {
        let input = QueryInput::from_json(json!({"filters": "x", "expand": "true"}));
        let actual = params(input, 100).normalized();
        assert_eq!(actual.get("expand"), Some("true"));
    }

    #[test]
    fn test_stats_default() {
        let actual = params(None, 1000).stats();
        assert_eq!(
            actual.to_string(),
            "query=cql.allRecords=1 sortBy id&sort=id;asc&limit=1&perPage=1&stats=true"
        );
    }

    #[test]
    fn test_stats_keeps_caller_sort() {
        let actual = params(Some("a sortBy title".into()), 100).stats();
        assert_eq!(actual.to_string(), "query=a sortBy title&limit=1");

        let input = QueryInput::from_json(json!({"filters": "a", "sort": "name;desc"}));
        let actual = params(input, 100).stats();
        assert_eq!(
            actual.to_string(),
            "filters=a&sort=name;desc&perPage=1&stats=true"
        );
    }

    #[test]
    fn test_effective_limit() {
        let erm = QueryInput::from_json(json!({"filters": "a"}));
        assert_eq!(params(erm, 1000).effective_limit(), ERM_MAX_PER_PAGE);
        assert_eq!(params(None, 1000).effective_limit(), 1000);
        assert_eq!(params(Some("a sortBy b".into()), 1000).effective_limit(), 1000);
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let actual = params(None, 100).offset_paging(usize::MAX / 10);
        assert_eq!(actual.get(keys::OFFSET), Some(usize::MAX.to_string().as_str()));
    }

    #[test]
    fn test_oversized_unknown_page_drops_erm_keys() {
        let actual = params(Some("simple query".into()), 500).offset_paging(2);
        assert_eq!(
            actual,
            ParamSet::parse("query=simple query sortBy id&filters=simple query&limit=500&offset=1000")
        );
    }

    #[test]
    fn test_id_paging_conjoins_custom_prefix() {
        let qp = params(Some("title=x sortBy title".into()), 100);
        assert_eq!(qp.dialects().cql, Compatibility::Compatible);
        assert_eq!(
            qp.id_paging(None).to_string(),
            format!("query=id>{} and (title=x) sortBy id&limit=100", LOWEST_ID)
        );
    }

    #[test]
    fn test_id_paging_descending_erm() {
        let input = QueryInput::from_json(json!({"filters": "a", "sort": "id;desc"}));
        let actual = params(input, 100).id_paging(Some("abc"));
        assert_eq!(
            actual.to_string(),
            "filters=a&filters=id<abc&sort=id;desc&perPage=100&stats=true"
        );
    }
}
