//! Listing CLI.
//!
//! Computes page windows and renders the SQL a listing definition produces
//! for a given query string.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use listing_kernel::{Config, FilterOutcome, Listing, ListingDefinition, PageRequest, pager, params};

#[derive(Debug, Parser)]
#[command(name = "listing", version, about = "Admin listing pager and filter compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the page window for a result set.
    Pager {
        /// Total matching items.
        #[arg(long)]
        total: u64,

        /// Zero-based offset of the first requested item.
        #[arg(long, conflicts_with = "page")]
        offset: Option<u64>,

        /// Requested page (1-indexed).
        #[arg(long)]
        page: Option<u64>,

        /// Items per page (default: LISTING_PAGE_SIZE).
        #[arg(long)]
        page_size: Option<u64>,

        /// Maximum numbered buttons (default: LISTING_MAX_BUTTONS).
        #[arg(long)]
        buttons: Option<u64>,
    },

    /// Compile a query string against a listing definition.
    Filter {
        /// Definition file (default: LISTING_FIELDS_FILE).
        #[arg(long)]
        definition: Option<PathBuf>,

        /// Raw query string, e.g. `name_op=is_like&name_v1=ann&pg=2`.
        #[arg(long, default_value = "")]
        query: String,
    },
}

#[derive(Debug, Serialize)]
struct FilterReport {
    select_sql: String,
    count_sql: String,
    page: u64,
    offset: u64,
    filters: FilterOutcome,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let output = match cli.command {
        Command::Pager {
            total,
            offset,
            page,
            page_size,
            buttons,
        } => {
            let page_size = page_size.unwrap_or(config.pager.page_size);
            let offset = match (offset, page) {
                (Some(offset), _) => offset,
                (None, Some(page)) => PageRequest::new(page, page_size).offset,
                (None, None) => 0,
            };
            let window = pager::compute(
                total,
                offset,
                page_size,
                buttons.unwrap_or(config.pager.max_buttons),
            )?;
            serde_json::to_string_pretty(&window)?
        }
        Command::Filter { definition, query } => {
            let path = definition
                .or(config.fields_file.clone())
                .context("no definition given and LISTING_FIELDS_FILE is not set")?;

            let built = ListingDefinition::parse(&path)?.build()?;

            let (listing, plan) = Listing::from_built(built, config.pager.clone());
            let prepared = listing.prepare(plan, &params::parse_query_string(&query));
            info!(definition = %path.display(), "filters compiled");

            serde_json::to_string_pretty(&FilterReport {
                select_sql: prepared.select_sql,
                count_sql: prepared.count_sql,
                page: prepared.page.page,
                offset: prepared.page.offset,
                filters: prepared.outcome,
            })?
        }
    };

    println!("{output}");
    Ok(())
}

/// Initialize tracing subscriber with environment filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
