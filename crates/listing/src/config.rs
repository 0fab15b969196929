//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::pager::PagerConfig;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pager settings (LISTING_PAGE_SIZE, LISTING_MAX_BUTTONS, LISTING_PAGE_PARAM).
    pub pager: PagerConfig,

    /// Default listing definition file (LISTING_FIELDS_FILE).
    pub fields_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = PagerConfig::default();

        let page_size = match lookup("LISTING_PAGE_SIZE") {
            Some(v) => v
                .trim()
                .parse()
                .context("LISTING_PAGE_SIZE must be a valid u64")?,
            None => defaults.page_size,
        };
        if page_size == 0 {
            anyhow::bail!("LISTING_PAGE_SIZE must be positive");
        }

        let max_buttons = match lookup("LISTING_MAX_BUTTONS") {
            Some(v) => v
                .trim()
                .parse()
                .context("LISTING_MAX_BUTTONS must be a valid u64")?,
            None => defaults.max_buttons,
        };
        if max_buttons == 0 {
            anyhow::bail!("LISTING_MAX_BUTTONS must be positive");
        }

        let page_param = lookup("LISTING_PAGE_PARAM")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.page_param);

        let fields_file = lookup("LISTING_FIELDS_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            pager: PagerConfig {
                page_size,
                max_buttons,
                page_param,
            },
            fields_file,
        })
    }
}
