//! Paging settings.
//!
//! Deserializes from partial documents; missing fields take their defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Records requested per page when the caller doesn't say
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Settings for building query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Records per page
    #[serde(alias = "pageSize", alias = "limit")]
    pub page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PagingConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}
