//! Query plan built on SeaQuery.
//!
//! Wraps a `SELECT` over one base table and keeps a name → expression map
//! of computed projections so that sub-query columns can be filtered by
//! name. Renders PostgreSQL for the page query and a windowed count query.

use std::collections::HashMap;

use sea_query::{
    Alias, Asterisk, Expr, ExprTrait, Order, PostgresQueryBuilder, Query, SelectStatement,
    SimpleExpr,
};
use serde::{Deserialize, Serialize};

use crate::error::{ListingError, ListingResult};

/// Alias of the derived table wrapped by the count query.
const COUNT_SUBQUERY_ALIAS: &str = "listing_count";

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A composable `SELECT` over a base table.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    base_table: String,
    select: SelectStatement,
    has_selects: bool,
    projections: HashMap<String, SimpleExpr>,
}

impl QueryPlan {
    /// Start a plan selecting from `base_table`.
    pub fn new(base_table: &str) -> Self {
        let mut select = Query::select();
        select.from(Alias::new(base_table));

        Self {
            base_table: base_table.to_string(),
            select,
            has_selects: false,
            projections: HashMap::new(),
        }
    }

    /// Base table name.
    pub fn base_table(&self) -> &str {
        &self.base_table
    }

    /// Select every column of the base table.
    pub fn select_all(mut self) -> Self {
        self.select
            .column((Alias::new(&self.base_table), Asterisk));
        self.has_selects = true;
        self
    }

    /// Select a base table column.
    pub fn select_column(mut self, name: &str) -> Self {
        self.select
            .column((Alias::new(&self.base_table), Alias::new(name)));
        self.has_selects = true;
        self
    }

    /// Select a computed expression under `name`.
    ///
    /// The expression is remembered so that filters can target it by name.
    /// Names must be unique within a plan.
    pub fn select_expr_as(mut self, expr: impl Into<SimpleExpr>, name: &str) -> ListingResult<Self> {
        if self.projections.contains_key(name) {
            return Err(ListingError::DuplicateProjection(name.to_string()));
        }

        let expr = expr.into();
        self.select.expr_as(expr.clone(), Alias::new(name));
        self.projections.insert(name.to_string(), expr);
        self.has_selects = true;
        Ok(self)
    }

    /// Expression projected under `name`, if any.
    pub fn projection(&self, name: &str) -> Option<&SimpleExpr> {
        self.projections.get(name)
    }

    /// Reference to a table column. Defaults to the base table.
    pub fn column(&self, table: Option<&str>, name: &str) -> SimpleExpr {
        let table = table.unwrap_or(&self.base_table);
        Expr::col((Alias::new(table), Alias::new(name))).into()
    }

    /// Add a `WHERE` condition, combined with existing ones by `AND`.
    pub fn and_where(mut self, condition: SimpleExpr) -> Self {
        self.select.and_where(condition);
        self
    }

    /// Order by a base table column, or by a projection of that name.
    pub fn order_by(mut self, name: &str, direction: SortDirection) -> Self {
        let order = match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let expr = match self.projections.get(name) {
            Some(expr) => expr.clone(),
            None => self.column(None, name),
        };
        self.select.order_by_expr(expr, order);
        self
    }

    /// Build the page query with `LIMIT`/`OFFSET`.
    pub fn build(&self, offset: u64, limit: u64) -> String {
        let mut query = self.unpaged();
        query.limit(limit);
        query.offset(offset);
        query.to_string(PostgresQueryBuilder)
    }

    /// Build a query counting every row the plan matches.
    pub fn build_count(&self) -> String {
        let mut query = Query::select();
        query
            .expr(Expr::col(Asterisk).count())
            .from_subquery(self.unpaged(), Alias::new(COUNT_SUBQUERY_ALIAS));
        query.to_string(PostgresQueryBuilder)
    }

    /// Underlying statement, selecting `base.*` when nothing was projected.
    fn unpaged(&self) -> SelectStatement {
        let mut query = self.select.clone();
        if !self.has_selects {
            query.column((Alias::new(&self.base_table), Asterisk));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan_selects_all() {
        let sql = QueryPlan::new("users").build(0, 15);

        assert!(sql.contains("\"users\".*"), "{sql}");
        assert!(sql.contains("FROM \"users\""), "{sql}");
        assert!(sql.contains("LIMIT 15"), "{sql}");
        assert!(sql.contains("OFFSET 0"), "{sql}");
    }

    #[test]
    fn page_offset_rendered() {
        let sql = QueryPlan::new("users").select_all().build(60, 15);
        assert!(sql.contains("OFFSET 60"), "{sql}");
    }

    #[test]
    fn conditions_are_conjunctive() {
        let plan = QueryPlan::new("users").select_all();
        let name = plan.column(None, "name");
        let age = plan.column(None, "age");
        let sql = plan
            .and_where(name.eq("ann"))
            .and_where(age.gt(30))
            .build(0, 10);

        assert!(
            sql.contains("\"users\".\"name\" = 'ann' AND \"users\".\"age\" > 30"),
            "{sql}"
        );
    }

    #[test]
    fn count_query_wraps_unpaged_plan() {
        let plan = QueryPlan::new("users").select_all();
        let name = plan.column(None, "name");
        let sql = plan.and_where(name.eq("ann")).build_count();

        assert!(sql.contains("COUNT(*)"), "{sql}");
        assert!(sql.contains("AS \"listing_count\""), "{sql}");
        assert!(sql.contains("'ann'"), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
    }

    #[test]
    fn projections_resolve_by_name() {
        let plan = QueryPlan::new("users")
            .select_all()
            .select_expr_as(
                Expr::cust("(SELECT COUNT(*) FROM posts WHERE posts.user_id = users.id)"),
                "post_count",
            )
            .unwrap();

        assert!(plan.projection("post_count").is_some());
        assert!(plan.projection("missing").is_none());

        let sql = plan.build(0, 10);
        assert!(sql.contains("AS \"post_count\""), "{sql}");
    }

    #[test]
    fn duplicate_projection_rejected() {
        let result = QueryPlan::new("users")
            .select_expr_as(Expr::cust("1"), "one")
            .and_then(|plan| plan.select_expr_as(Expr::cust("2"), "one"));

        assert_eq!(
            result.map(|_| ()),
            Err(ListingError::DuplicateProjection("one".to_string()))
        );
    }

    #[test]
    fn qualified_column() {
        let plan = QueryPlan::new("users");
        let sql = plan
            .clone()
            .and_where(plan.column(Some("groups"), "name").eq("admin"))
            .build(0, 10);
        assert!(sql.contains("\"groups\".\"name\" = 'admin'"), "{sql}");
    }

    #[test]
    fn order_by_column_and_projection() {
        let sql = QueryPlan::new("users")
            .select_all()
            .select_expr_as(Expr::cust("(SELECT 1)"), "rank")
            .unwrap()
            .order_by("created", SortDirection::Desc)
            .order_by("rank", SortDirection::Asc)
            .build(0, 10);

        assert!(sql.contains("ORDER BY \"users\".\"created\" DESC"), "{sql}");
        assert!(sql.contains("(SELECT 1) ASC"), "{sql}");
    }

    #[test]
    fn sort_direction_serialization() {
        let json = serde_json::to_string(&SortDirection::Desc).unwrap();
        assert_eq!(json, "\"desc\"");
    }
}
