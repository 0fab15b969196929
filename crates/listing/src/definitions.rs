//! Listing definitions loaded from TOML.
//!
//! A definition names the base table, the computed projections, the
//! filterable fields and the display columns of one admin listing:
//!
//! ```toml
//! base_table = "users"
//!
//! [[projections]]
//! name = "post_count"
//! sql = "(SELECT COUNT(*) FROM posts WHERE posts.user_id = users.id)"
//!
//! [[fields]]
//! name = "name"
//! kind = "varchar"
//!
//! [[fields]]
//! name = "post_count"
//! kind = "bigint"
//! subquery = true
//!
//! [[columns]]
//! name = "name"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use sea_query::Expr;
use serde::{Deserialize, Serialize};

use crate::error::ListingError;
use crate::filter::{FieldSpec, FilterRegistry};
use crate::query::{QueryPlan, SortDirection};
use crate::table::{ColumnSpec, Table, TableColumn};

/// A computed column, given as raw SQL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectionSpec {
    pub name: String,
    pub sql: String,
}

/// Default ordering of the listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// One admin listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingDefinition {
    pub base_table: String,

    #[serde(default)]
    pub projections: Vec<ProjectionSpec>,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    #[serde(default)]
    pub columns: Vec<ColumnSpec>,

    #[serde(default)]
    pub sorts: Vec<SortSpec>,
}

/// Registry, table and base plan built from a definition.
#[derive(Debug, Clone)]
pub struct BuiltListing {
    pub registry: FilterRegistry,
    pub table: Table,
    pub plan: QueryPlan,
    /// Entries that were skipped, one error per rejected field or column.
    pub rejected: Vec<ListingError>,
}

impl ListingDefinition {
    /// Parse a definition file from the given path.
    pub fn parse(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read listing definition: {}", path.display()))?;

        Self::parse_str(&content)
            .with_context(|| format!("invalid listing definition at {}", path.display()))
    }

    /// Parse a definition from a TOML string.
    pub fn parse_str(content: &str) -> Result<Self> {
        let definition: ListingDefinition =
            toml::from_str(content).context("failed to parse listing definition TOML")?;

        if definition.base_table.trim().is_empty() {
            anyhow::bail!("listing definition has empty 'base_table' field");
        }

        Ok(definition)
    }

    /// Build the registry, table and base plan.
    ///
    /// Duplicate projections are fatal since the plan cannot be built without
    /// them. Rejected fields and columns are collected and the rest is built.
    pub fn build(&self) -> Result<BuiltListing> {
        let mut plan = QueryPlan::new(&self.base_table).select_all();
        for projection in &self.projections {
            plan = plan
                .select_expr_as(Expr::cust(projection.sql.clone()), &projection.name)
                .with_context(|| format!("projection '{}'", projection.name))?;
        }
        for sort in &self.sorts {
            plan = plan.order_by(&sort.column, sort.direction);
        }

        let mut rejected = Vec::new();

        let mut registry = FilterRegistry::new();
        for spec in &self.fields {
            if let Err(e) = registry.register_spec(spec.clone()) {
                rejected.push(e);
            }
        }

        let mut table = Table::new();
        for spec in &self.columns {
            if let Err(e) = table.add(TableColumn::from(spec.clone())) {
                rejected.push(e);
            }
        }

        tracing::info!(
            base_table = %self.base_table,
            fields = registry.len(),
            columns = table.len(),
            rejected = rejected.len(),
            "listing definition built"
        );

        Ok(BuiltListing {
            registry,
            table,
            plan,
            rejected,
        })
    }
}
