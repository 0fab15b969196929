//! A complete admin listing: filters, display table and pager together.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::definitions::BuiltListing;
use crate::error::ListingResult;
use crate::filter::{FilterOutcome, FilterRegistry};
use crate::pager::{PageRequest, PagerConfig};
use crate::query::QueryPlan;
use crate::table::{Table, TablePage};

/// Queries and filter state for one request.
#[derive(Debug, Clone)]
pub struct PreparedListing {
    /// Page query with `LIMIT`/`OFFSET` applied.
    pub select_sql: String,

    /// Count of every row matching the filters.
    pub count_sql: String,

    pub outcome: FilterOutcome,
    pub page: PageRequest,
}

/// A rendered page together with the filter form state.
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub table: TablePage,
    pub filters: FilterOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub filters: FilterRegistry,
    pub table: Table,
    pub pager: PagerConfig,
}

impl Listing {
    pub fn new(filters: FilterRegistry, table: Table, pager: PagerConfig) -> Self {
        Self {
            filters,
            table,
            pager,
        }
    }

    /// Assemble from a built definition, returning its base plan alongside.
    pub fn from_built(built: BuiltListing, pager: PagerConfig) -> (Self, QueryPlan) {
        (Self::new(built.registry, built.table, pager), built.plan)
    }

    /// Apply the request's filters and page to `plan`.
    pub fn prepare(&self, plan: QueryPlan, params: &HashMap<String, String>) -> PreparedListing {
        let request = self.filters.request_from_params(params);
        let page = PageRequest::from_params(params, &self.pager);

        let applied = self.filters.apply(plan, &request);

        tracing::debug!(
            base_table = %applied.plan.base_table(),
            applied = applied.outcome.applied().count(),
            page = page.page,
            "listing prepared"
        );

        PreparedListing {
            select_sql: applied.plan.build(page.offset, page.page_size),
            count_sql: applied.plan.build_count(),
            outcome: applied.outcome,
            page,
        }
    }

    /// Render the rows fetched for `prepared`, given the count query's result.
    ///
    /// The requested offset is clamped to the last page when the filters
    /// shrank the result set below it.
    pub fn finish(
        &self,
        prepared: &PreparedListing,
        rows: &[Value],
        total_items: u64,
    ) -> ListingResult<ListingPage> {
        let table = self.table.render(
            rows,
            total_items,
            prepared.page.offset,
            prepared.page.page_size,
            self.pager.max_buttons,
        )?;

        Ok(ListingPage {
            table,
            filters: prepared.outcome.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FieldKind, FieldStatus, FilterField};
    use crate::table::TableColumn;
    use serde_json::json;

    fn listing() -> Listing {
        let mut filters = FilterRegistry::new();
        filters
            .register(FilterField::new("name", FieldKind::Text))
            .unwrap();
        filters
            .register(FilterField::new("age", FieldKind::Numeric))
            .unwrap();

        let mut table = Table::new();
        table.add(TableColumn::new("name")).unwrap();

        Listing::new(filters, table, PagerConfig::default())
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn prepare_applies_filters_and_page() {
        let prepared = listing().prepare(
            QueryPlan::new("users").select_all(),
            &params(&[("age_op", "is_greater_than"), ("age_v1", "30"), ("pg", "3")]),
        );

        assert!(prepared.select_sql.contains("> '30'"), "{}", prepared.select_sql);
        assert!(prepared.select_sql.contains("OFFSET 30"), "{}", prepared.select_sql);
        assert!(prepared.count_sql.contains("> '30'"), "{}", prepared.count_sql);
        assert!(!prepared.count_sql.contains("OFFSET"), "{}", prepared.count_sql);

        assert_eq!(
            prepared.outcome.get("age").map(|s| s.status),
            Some(FieldStatus::Applied)
        );
        assert_eq!(
            prepared.outcome.get("name").map(|s| s.status),
            Some(FieldStatus::NotSubmitted)
        );
    }

    #[test]
    fn finish_clamps_past_end() {
        let listing = listing();
        let prepared = listing.prepare(QueryPlan::new("users"), &params(&[("pg", "9")]));
        let rows = vec![json!({"name": "Ann"})];

        let page = listing.finish(&prepared, &rows, 16).unwrap();

        assert_eq!(page.table.window.current_page, 2);
        assert_eq!(page.table.window.offset, 16);
        assert_eq!(page.table.rows[0].get("name"), Some("Ann"));
    }
}
