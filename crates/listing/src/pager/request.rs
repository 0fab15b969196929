//! Page selection from request parameters.

use std::collections::HashMap;

use super::types::PagerConfig;

/// Requested page, resolved against the pager configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested page (1-indexed).
    pub page: u64,

    /// Zero-based index of the first requested item.
    pub offset: u64,

    /// Items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Request for a given page number. Page 0 is treated as page 1.
    pub fn new(page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        Self {
            page,
            offset: (page - 1).saturating_mul(page_size),
            page_size,
        }
    }

    /// Read the page number from `config.page_param`.
    ///
    /// Missing or non-numeric values select the first page.
    pub fn from_params(params: &HashMap<String, String>, config: &PagerConfig) -> Self {
        let page = params
            .get(&config.page_param)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(1);
        Self::new(page, config.page_size)
    }
}
