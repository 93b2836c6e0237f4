//! # folio-query
//!
//! A compatibility layer over FOLIO query parameters.
//!
//! FOLIO collection endpoints come in two dialects. Most take a CQL `query`
//! string with an optional `sortBy` clause; the ERM modules take repeated
//! `filters` and a separate `sort`. This crate classifies a query written in
//! either style (or in no particular style) and emits parameter sets that
//! work for the endpoints it could be meant for:
//!
//! - [`QueryParams::normalized`] for a plain request
//! - [`QueryParams::stats`] for a one-row probe of `totalRecords`
//! - [`QueryParams::offset_paging`] for numbered pages
//! - [`QueryParams::id_paging`] for pages keyed on the last seen id
//!
//! ```
//! use folio_query::QueryParams;
//!
//! let params = QueryParams::new(Some("name=~A".into()), 100)?;
//! let first = params.offset_paging(0);
//! assert_eq!(first.get("query"), Some("name=~A sortBy id"));
//! assert_eq!(first.get("filters"), Some("name=~A"));
//! assert_eq!(first.get("offset"), Some("0"));
//! # Ok::<(), folio_query::QueryError>(())
//! ```
//!
//! Sending the parameters is left to a [`Transport`]; [`Pager`] drives one
//! over a whole listing.

pub mod config;
pub mod dialect;
pub mod envelope;
pub mod error;
pub mod input;
pub mod normalizer;
pub mod pager;
pub mod params;
pub mod parser;
pub mod sort;

pub use config::{PagingConfig, DEFAULT_PAGE_SIZE};
pub use dialect::{Compatibility, Dialects};
pub use envelope::Envelope;
pub use error::{ConfigError, EnvelopeError, PagingError, QueryError, Result};
pub use input::QueryInput;
pub use normalizer::{QueryParams, DEFAULT_QUERY, ERM_MAX_PER_PAGE, HIGHEST_ID, LOWEST_ID};
pub use pager::{Pager, Transport};
pub use params::ParamSet;
pub use parser::ParsedQuery;
pub use sort::SortDirection;
