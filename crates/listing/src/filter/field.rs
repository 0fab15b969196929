//! Filterable field definitions and custom predicate handlers.

use std::fmt;
use std::sync::Arc;

use sea_query::SimpleExpr;
use serde::{Deserialize, Serialize};

use super::request::FilterInput;
use super::types::FieldKind;
use crate::error::{ListingError, ListingResult};
use crate::query::QueryPlan;

/// Builds the refined plan for one field instead of the built-in predicates.
///
/// Receives the plan, the resolved column expression and the submitted
/// input (the operator token is passed through unparsed, so handlers may
/// accept tokens outside the kind's menu).
pub trait FilterHandler: Send + Sync {
    fn apply(&self, plan: QueryPlan, column: &SimpleExpr, input: &FilterInput) -> QueryPlan;
}

impl<F> FilterHandler for F
where
    F: Fn(QueryPlan, &SimpleExpr, &FilterInput) -> QueryPlan + Send + Sync,
{
    fn apply(&self, plan: QueryPlan, column: &SimpleExpr, input: &FilterInput) -> QueryPlan {
        self(plan, column, input)
    }
}

/// A filterable column.
#[derive(Clone)]
pub struct FilterField {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) label: String,
    pub(crate) help_text: String,
    pub(crate) table: Option<String>,
    pub(crate) is_subquery: bool,
    pub(crate) handler: Option<Arc<dyn FilterHandler>>,
}

impl FilterField {
    /// Field filtering the base table column `name`.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            help_text: String::new(),
            table: None,
            is_subquery: false,
            handler: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Qualify the column with a joined table instead of the base table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Resolve the column among the plan's named projections.
    pub fn subquery(mut self) -> Self {
        self.is_subquery = true;
        self
    }

    /// Delegate predicate building to `handler`.
    pub fn handler(mut self, handler: impl FilterHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_subquery(&self) -> bool {
        self.is_subquery
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl fmt::Debug for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("table", &self.table)
            .field("is_subquery", &self.is_subquery)
            .field("handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}

/// Declarative field definition with an unchecked kind name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column (or projection) name.
    pub name: String,

    /// Kind token or SQL type name, e.g. `"numeric"` or `"varchar"`.
    pub kind: String,

    /// Label for the filter UI (defaults to the name).
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub help_text: String,

    /// Table qualifier for joined columns.
    #[serde(default)]
    pub table: Option<String>,

    /// Whether the field targets a named projection.
    #[serde(default)]
    pub subquery: bool,
}

impl FieldSpec {
    /// Resolve the kind name into a field.
    pub fn into_field(self) -> ListingResult<FilterField> {
        let Some(kind) = FieldKind::parse(&self.kind) else {
            return Err(ListingError::UnsupportedKind {
                field: self.name,
                kind: self.kind,
            });
        };

        let mut field = FilterField::new(self.name, kind).help_text(self.help_text);
        if let Some(label) = self.label {
            field = field.label(label);
        }
        if let Some(table) = self.table {
            field = field.table(table);
        }
        if self.subquery {
            field = field.subquery();
        }
        Ok(field)
    }
}
