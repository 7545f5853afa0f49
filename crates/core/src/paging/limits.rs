use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Process-wide bounds applied when a list request becomes a [`Pageable`](super::Pageable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingLimits {
    /// Page size used when the request does not name one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Largest page size a caller may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PagingLimits {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PagingLimits {
    pub fn resolve_page_size(&self, requested: Option<u64>) -> DomainResult<u64> {
        let size = requested.unwrap_or(self.default_page_size);
        if size > self.max_page_size {
            return Err(DomainError::validation(format!(
                "page size {size} exceeds the maximum of {}",
                self.max_page_size
            )));
        }
        Ok(size)
    }
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}
