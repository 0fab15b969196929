//! Filter field registry and request application.
//!
//! Fields are registered once during setup. `apply` borrows the registry
//! immutably and returns the per-request state alongside the refined plan,
//! so a registry behind an `Arc` can serve concurrent requests.

use std::collections::HashMap;
use std::sync::Arc;

use super::field::{FieldSpec, FilterField, FilterHandler};
use super::predicate::build_condition;
use super::request::{FilterInput, FilterRequest};
use super::types::{FieldState, FieldStatus, FilterOutcome, OperatorOption};
use crate::error::{ListingError, ListingResult};
use crate::query::QueryPlan;

/// Refined plan plus the per-field outcome of one request.
#[derive(Debug, Clone)]
pub struct FilterApplication {
    pub plan: QueryPlan,
    pub outcome: FilterOutcome,
}

/// Registry of filterable fields, in registration order.
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    fields: Vec<FilterField>,
    index: HashMap<String, usize>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field. Duplicate names are rejected.
    pub fn register(&mut self, field: FilterField) -> ListingResult<()> {
        if self.index.contains_key(&field.name) {
            tracing::warn!(field = %field.name, "filter field already registered; ignoring");
            return Err(ListingError::DuplicateField(field.name));
        }

        self.index.insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    /// Register a field whose kind is given by name.
    ///
    /// Unsupported kinds leave the registry unchanged.
    pub fn register_spec(&mut self, spec: FieldSpec) -> ListingResult<()> {
        match spec.into_field() {
            Ok(field) => self.register(field),
            Err(e) => {
                tracing::warn!(error = %e, "filter field not registered");
                Err(e)
            }
        }
    }

    /// Attach a custom handler to an already registered field.
    pub fn set_handler(
        &mut self,
        name: &str,
        handler: impl FilterHandler + 'static,
    ) -> ListingResult<()> {
        let Some(&position) = self.index.get(name) else {
            return Err(ListingError::UnknownField(name.to_string()));
        };
        self.fields[position].handler = Some(Arc::new(handler));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FilterField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn fields(&self) -> impl Iterator<Item = &FilterField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a request from flat parameters for every registered field.
    pub fn request_from_params(&self, params: &HashMap<String, String>) -> FilterRequest {
        FilterRequest::from_params(params, self.fields.iter().map(|f| f.name.as_str()))
    }

    /// Outcome with nothing submitted, for rendering an empty filter form.
    pub fn blank_outcome(&self) -> FilterOutcome {
        FilterOutcome {
            fields: self.fields.iter().map(blank_state).collect(),
        }
    }

    /// Apply submitted values to `plan`.
    ///
    /// Fields without a primary value are untouched. Bad per-field input is
    /// skipped and reported through [`FieldStatus`]; this never fails.
    pub fn apply(&self, mut plan: QueryPlan, request: &FilterRequest) -> FilterApplication {
        let mut states = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            let mut state = blank_state(field);

            let Some(input) = request.get(&field.name).filter(|i| !i.value1.is_empty()) else {
                states.push(state);
                continue;
            };

            let Some(column) = resolve_column(&plan, field) else {
                tracing::debug!(field = %field.name, "no projection with this name; skipping");
                state.status = FieldStatus::UnresolvedColumn;
                states.push(state);
                continue;
            };

            record(&mut state, input);

            if let Some(ref handler) = field.handler {
                plan = handler.apply(plan, &column, input);
                state.status = FieldStatus::Delegated;
            } else {
                match build_condition(field.kind, &column, input) {
                    Ok(condition) => {
                        plan = plan.and_where(condition);
                        state.status = FieldStatus::Applied;
                    }
                    Err(status) => {
                        tracing::debug!(
                            field = %field.name,
                            operator = %input.operator,
                            ?status,
                            "filter skipped"
                        );
                        state.status = status;
                    }
                }
            }

            states.push(state);
        }

        FilterApplication {
            plan,
            outcome: FilterOutcome { fields: states },
        }
    }
}

fn resolve_column(plan: &QueryPlan, field: &FilterField) -> Option<sea_query::SimpleExpr> {
    if field.is_subquery {
        plan.projection(&field.name).cloned()
    } else {
        Some(plan.column(field.table.as_deref(), &field.name))
    }
}

fn record(state: &mut FieldState, input: &FilterInput) {
    state.operator = input.operator.clone();
    state.value1 = input.value1.clone();
    state.value2 = input.value2.clone();
}

fn blank_state(field: &FilterField) -> FieldState {
    FieldState {
        name: field.name.clone(),
        kind: field.kind,
        label: field.label.clone(),
        help_text: field.help_text.clone(),
        widget: field.kind.widget(),
        operators: field
            .kind
            .operators()
            .iter()
            .map(|op| OperatorOption {
                token: op.token().to_string(),
                label: op.label(field.kind).to_string(),
            })
            .collect(),
        value_options: field
            .kind
            .value_options()
            .iter()
            .map(|(token, label)| OperatorOption {
                token: (*token).to_string(),
                label: (*label).to_string(),
            })
            .collect(),
        operator: String::new(),
        value1: String::new(),
        value2: String::new(),
        status: FieldStatus::NotSubmitted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FieldKind;
    use sea_query::{Expr, ExprTrait, SimpleExpr};

    fn registry() -> FilterRegistry {
        let mut registry = FilterRegistry::new();
        registry
            .register(FilterField::new("name", FieldKind::Text).label("Name"))
            .unwrap();
        registry
            .register(FilterField::new("age", FieldKind::Numeric))
            .unwrap();
        registry
            .register(FilterField::new("post_count", FieldKind::Numeric).subquery())
            .unwrap();
        registry
    }

    fn plan() -> QueryPlan {
        QueryPlan::new("users").select_all()
    }

    #[test]
    fn registration_order_preserved() {
        let binding = registry();
        let names: Vec<&str> = binding.fields().map(|f| f.name()).collect();
        assert_eq!(names, vec!["name", "age", "post_count"]);
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = registry();
        let result = registry.register(FilterField::new("age", FieldKind::Text));

        assert_eq!(result, Err(ListingError::DuplicateField("age".to_string())));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("age").map(|f| f.kind()), Some(FieldKind::Numeric));
    }

    #[test]
    fn unsupported_kind_is_ignored() {
        // Unknown kinds never produce a field; the caller may discard the error.
        let mut registry = FilterRegistry::new();
        let result = registry.register_spec(FieldSpec {
            name: "payload".to_string(),
            kind: "pickletype".to_string(),
            label: None,
            help_text: String::new(),
            table: None,
            subquery: false,
        });

        assert!(matches!(result, Err(ListingError::UnsupportedKind { .. })));
        assert!(registry.is_empty());
        assert!(registry.get("payload").is_none());
    }

    #[test]
    fn empty_request_leaves_plan_alone() {
        let before = plan().build(0, 15);
        let applied = registry().apply(plan(), &FilterRequest::new());

        assert_eq!(applied.plan.build(0, 15), before);
        assert!(applied.outcome.applied().next().is_none());
        assert_eq!(applied.outcome.fields.len(), 3);
        assert!(
            applied
                .outcome
                .fields
                .iter()
                .all(|f| f.status == FieldStatus::NotSubmitted)
        );
    }

    #[test]
    fn fields_combine_with_and() {
        let request = FilterRequest::new()
            .with("name", "is_equal", "ann", "")
            .with("age", "is_greater_than", "30", "");

        let applied = registry().apply(plan(), &request);
        let sql = applied.plan.build(0, 15);

        assert!(sql.contains("\"users\".\"name\" = 'ann'"), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
        assert!(sql.contains("\"users\".\"age\" > '30'"), "{sql}");
        assert_eq!(applied.outcome.applied().count(), 2);
    }

    #[test]
    fn empty_primary_value_not_submitted() {
        let request = FilterRequest::new().with("age", "is_null", "", "");
        let applied = registry().apply(plan(), &request);

        let state = applied.outcome.get("age").unwrap();
        assert_eq!(state.status, FieldStatus::NotSubmitted);
        assert_eq!(state.operator, "");
    }

    #[test]
    fn submitted_values_echoed() {
        let request = FilterRequest::new().with("age", "is_between", "18", "30");
        let applied = registry().apply(plan(), &request);

        let state = applied.outcome.get("age").unwrap();
        assert_eq!(state.status, FieldStatus::Applied);
        assert_eq!(state.operator, "is_between");
        assert_eq!(state.value1, "18");
        assert_eq!(state.value2, "30");
    }

    #[test]
    fn skipped_fields_still_echo_input() {
        let request = FilterRequest::new().with("age", "is_between", "18", "");
        let applied = registry().apply(plan(), &request);

        let state = applied.outcome.get("age").unwrap();
        assert_eq!(state.status, FieldStatus::MissingSecondValue);
        assert_eq!(state.value1, "18");
    }

    #[test]
    fn subquery_field_uses_projection_expression() {
        let plan = plan()
            .select_expr_as(
                Expr::cust("(SELECT COUNT(*) FROM posts WHERE posts.user_id = users.id)"),
                "post_count",
            )
            .unwrap();
        let request = FilterRequest::new().with("post_count", "is_greater_equal_than", "3", "");

        let applied = registry().apply(plan, &request);
        let sql = applied.plan.build(0, 15);

        let (_, condition) = sql.split_once("FROM \"users\" WHERE ").unwrap();
        assert!(
            condition.contains("(SELECT COUNT(*) FROM posts WHERE posts.user_id = users.id)"),
            "{sql}"
        );
        assert!(condition.contains(">= '3'"), "{sql}");
        assert_eq!(
            applied.outcome.get("post_count").map(|s| s.status),
            Some(FieldStatus::Applied)
        );
    }

    #[test]
    fn subquery_field_without_projection_skipped() {
        let request = FilterRequest::new().with("post_count", "is_equal", "3", "");
        let before = plan().build(0, 15);

        let applied = registry().apply(plan(), &request);

        assert_eq!(applied.plan.build(0, 15), before);
        let state = applied.outcome.get("post_count").unwrap();
        assert_eq!(state.status, FieldStatus::UnresolvedColumn);
        assert_eq!(state.value1, "");
    }

    #[test]
    fn handler_receives_resolved_column_and_raw_operator() {
        let mut registry = FilterRegistry::new();
        registry
            .register(FilterField::new("location", FieldKind::Geometry).handler(
                |plan: QueryPlan, column: &SimpleExpr, input: &FilterInput| {
                    if input.operator == "is_in_radius" {
                        plan.and_where(column.clone().is_not_null())
                    } else {
                        plan
                    }
                },
            ))
            .unwrap();

        let request = FilterRequest::new().with("location", "is_in_radius", "1,2", "5");
        let applied = registry.apply(plan(), &request);
        let sql = applied.plan.build(0, 15);

        assert!(sql.contains("\"users\".\"location\" IS NOT NULL"), "{sql}");
        assert_eq!(
            applied.outcome.get("location").map(|s| s.status),
            Some(FieldStatus::Delegated)
        );
    }

    #[test]
    fn set_handler_on_registered_field() {
        let mut registry = registry();
        registry
            .set_handler("name", |plan: QueryPlan, _: &SimpleExpr, _: &FilterInput| plan)
            .unwrap();
        assert!(registry.get("name").unwrap().has_handler());

        assert_eq!(
            registry
                .set_handler("missing", |plan: QueryPlan, _: &SimpleExpr, _: &FilterInput| plan),
            Err(ListingError::UnknownField("missing".to_string()))
        );
    }

    #[test]
    fn blank_outcome_lists_menus() {
        let outcome = registry().blank_outcome();
        let name = outcome.get("name").unwrap();

        assert_eq!(name.label, "Name");
        assert_eq!(name.operators.len(), 6);
        assert_eq!(name.operators[0].token, "is_equal");
        assert_eq!(name.operators[0].label, "is equal");
    }

    #[test]
    fn request_from_registered_names() {
        let params: HashMap<String, String> = [
            ("age_op".to_string(), "is_less_than".to_string()),
            ("age_v1".to_string(), "40".to_string()),
            ("other_v1".to_string(), "x".to_string()),
        ]
        .into_iter()
        .collect();

        let request = registry().request_from_params(&params);
        assert_eq!(request.len(), 1);
        assert!(request.get("other").is_none());
    }
}
