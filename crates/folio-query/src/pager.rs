//! Paging sessions over a caller-supplied transport.
//!
//! The transport owns everything about HTTP (base URL, auth, retries). A
//! [`Pager`] only decides which parameters to send for each page and reads
//! the records back out of the response.

use crate::envelope::Envelope;
use crate::error::PagingError;
use crate::input::QueryInput;
use crate::normalizer::{QueryParams, ERM_MAX_PER_PAGE};
use crate::params::ParamSet;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Submits a parameter set to a FOLIO endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` with `params` and return the decoded JSON body.
    async fn get(&self, path: &str, params: &ParamSet) -> anyhow::Result<Value>;
}

/// Walks the records of one endpoint for one query.
pub struct Pager {
    transport: Arc<dyn Transport>,
    path: String,
    query: Option<QueryInput>,
    limit: usize,
}

impl Pager {
    pub fn new(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        query: Option<QueryInput>,
        limit: usize,
    ) -> Self {
        Self {
            transport,
            path: path.into(),
            query,
            limit,
        }
    }

    /// Total records matching the query, from a one-row probe.
    pub async fn total_records(&self) -> Result<u64, PagingError> {
        let params = self.query_params()?.stats();
        Ok(self.fetch(&params).await?.total_records)
    }

    /// Zero-based page `page` of the offset-paged listing
    pub async fn offset_page(&self, page: usize) -> Result<Envelope, PagingError> {
        let params = self.query_params()?.offset_paging(page);
        self.fetch(&params).await
    }

    /// The page after `last_id`, or the first page when `None`
    pub async fn id_page(&self, last_id: Option<&str>) -> Result<Envelope, PagingError> {
        let params = self.query_params()?.id_paging(last_id);
        self.fetch(&params).await
    }

    /// Every record, fetched page by page in id order.
    ///
    /// Stops at the first short page, or at a page whose last record has no
    /// string `id` to continue from. A page counts as short against the ERM
    /// cap whenever the endpoint could be ERM.
    pub async fn collect_by_id(&self) -> Result<Vec<Value>, PagingError> {
        let params = self.query_params()?;
        let page_size = if params.dialects().erm.is_possible() {
            params.limit().min(ERM_MAX_PER_PAGE)
        } else {
            params.limit()
        };
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.id_page(cursor.as_deref()).await?;
            let count = page.records.len();
            let next = page.last_id().map(str::to_string);
            records.extend(page.records);

            if count == 0 || count < page_size {
                break;
            }
            match next {
                Some(id) => cursor = Some(id),
                None => {
                    debug!(path = %self.path, "last record has no id, stopping");
                    break;
                }
            }
        }

        debug!(path = %self.path, records = records.len(), "collected records by id");
        Ok(records)
    }

    // Rebuilt per request so pages never share state
    fn query_params(&self) -> Result<QueryParams, PagingError> {
        Ok(QueryParams::new(self.query.clone(), self.limit)?)
    }

    async fn fetch(&self, params: &ParamSet) -> Result<Envelope, PagingError> {
        trace!(path = %self.path, %params, "fetching page");
        let body = self
            .transport
            .get(&self.path, params)
            .await
            .map_err(|source| PagingError::Transport {
                path: self.path.clone(),
                source,
            })?;
        Ok(Envelope::from_value(body)?)
    }
}
