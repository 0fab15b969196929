//! Admin listing kernel.
//!
//! Page window computation, column filter compilation onto SeaQuery plans,
//! and display tables for paginated admin listings.

pub mod config;
pub mod definitions;
pub mod error;
pub mod filter;
pub mod listing;
pub mod pager;
pub mod params;
pub mod query;
pub mod table;

pub use config::Config;
pub use definitions::{BuiltListing, ListingDefinition, ProjectionSpec, SortSpec};
pub use error::{ListingError, ListingResult};
pub use filter::{
    FieldKind, FieldSpec, FieldState, FieldStatus, FilterField, FilterHandler, FilterInput,
    FilterOperator, FilterOutcome, FilterRegistry, FilterRequest,
};
pub use listing::{Listing, ListingPage, PreparedListing};
pub use pager::{PageButton, PageRequest, PageWindow, PagerConfig};
pub use query::{QueryPlan, SortDirection};
pub use table::{ColumnSpec, Table, TableColumn, TablePage};
