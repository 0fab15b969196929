//! Pager types.
//!
//! - PageWindow: Item range and button sequence for one page
//! - PageButton: One navigable page (or a collapsed jump marker)
//! - PagerConfig: Page size, button budget, and query parameter name

use serde::{Deserialize, Serialize};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u64 = 15;

/// Default maximum number of numbered buttons.
pub const DEFAULT_MAX_BUTTONS: u64 = 11;

/// Default query parameter carrying the 1-based page number.
pub const DEFAULT_PAGE_PARAM: &str = "pg";

/// A single pagination button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageButton {
    /// Target page (1-indexed).
    pub page: u64,

    /// Text shown on the button.
    pub label: String,

    /// Whether this is the page being displayed.
    pub current: bool,

    /// Whether this is a collapsed jump to the first or last page.
    #[serde(default)]
    pub jump: bool,
}

impl PageButton {
    pub(crate) fn numbered(page: u64, current: u64) -> Self {
        Self {
            page,
            label: page.to_string(),
            current: page == current,
            jump: false,
        }
    }

    pub(crate) fn jump_to_first() -> Self {
        Self {
            page: 1,
            label: "1 …".to_string(),
            current: false,
            jump: true,
        }
    }

    pub(crate) fn jump_to_last(max_page: u64) -> Self {
        Self {
            page: max_page,
            label: format!("… {max_page}"),
            current: false,
            jump: true,
        }
    }
}

/// Computed pagination state for one page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Total matching items (before paging).
    pub total_items: u64,

    /// 1-based index of the first item shown, 0 when there are no items.
    pub offset: u64,

    /// 1-based index of the last item shown, never above `total_items`.
    pub offset_limit: u64,

    /// Page being displayed, 0 when there are no items.
    pub current_page: u64,

    /// Number of pages.
    pub max_page: u64,

    /// Items per page.
    pub page_size: u64,

    /// Buttons in display order.
    pub buttons: Vec<PageButton>,
}

impl PageWindow {
    /// Window for an empty result set.
    pub fn empty(page_size: u64) -> Self {
        Self {
            total_items: 0,
            offset: 0,
            offset_limit: 0,
            current_page: 0,
            max_page: 0,
            page_size,
            buttons: Vec::new(),
        }
    }

    /// Whether the result set has no items.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Whether there's a next page.
    pub fn has_next(&self) -> bool {
        self.current_page < self.max_page
    }

    /// Whether there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Numbered buttons only, without the jump markers.
    pub fn numbered(&self) -> impl Iterator<Item = &PageButton> {
        self.buttons.iter().filter(|b| !b.jump)
    }
}

/// Pager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Maximum number of numbered buttons.
    #[serde(default = "default_max_buttons")]
    pub max_buttons: u64,

    /// Query parameter carrying the page number.
    #[serde(default = "default_page_param")]
    pub page_param: String,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_max_buttons() -> u64 {
    DEFAULT_MAX_BUTTONS
}

fn default_page_param() -> String {
    DEFAULT_PAGE_PARAM.to_string()
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_buttons: default_max_buttons(),
            page_param: default_page_param(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_config_defaults() {
        let config = PagerConfig::default();
        assert_eq!(config.page_size, 15);
        assert_eq!(config.max_buttons, 11);
        assert_eq!(config.page_param, "pg");
    }

    #[test]
    fn pager_config_partial_deserialize() {
        let config: PagerConfig = serde_json::from_str(r#"{"page_size": 50}"#).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_buttons, 11);
    }

    #[test]
    fn jump_labels() {
        assert_eq!(PageButton::jump_to_first().label, "1 …");
        assert_eq!(PageButton::jump_to_last(10).label, "… 10");
        assert!(PageButton::jump_to_last(10).jump);
        assert!(!PageButton::numbered(3, 3).jump);
        assert!(PageButton::numbered(3, 3).current);
    }

    #[test]
    fn empty_window() {
        let window = PageWindow::empty(15);
        assert!(window.is_empty());
        assert!(!window.has_next());
        assert!(!window.has_prev());
        assert!(window.buttons.is_empty());
    }
}
