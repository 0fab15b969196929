//! Filter compiler types.
//!
//! - FieldKind: Closed set of abstract column kinds
//! - FilterOperator: Comparison operators and their wire tokens
//! - FieldStatus / FieldState / FilterOutcome: Per-request results

use serde::{Deserialize, Serialize};

/// Abstract kind of a filterable column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Numeric,
    Boolean,
    Enum,
    NullMarker,
    List,
    Geometry,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Timestamp,
}

const TEXT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equal,
    FilterOperator::NotEqual,
    FilterOperator::Like,
    FilterOperator::NotLike,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const ORDERED_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equal,
    FilterOperator::NotEqual,
    FilterOperator::LessThan,
    FilterOperator::LessOrEqual,
    FilterOperator::GreaterThan,
    FilterOperator::GreaterOrEqual,
    FilterOperator::Between,
    FilterOperator::NotBetween,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const CHOICE_OPERATORS: &[FilterOperator] = &[FilterOperator::Equal, FilterOperator::NotEqual];

const LIST_OPERATORS: &[FilterOperator] = &[FilterOperator::In, FilterOperator::NotIn];

const GEOMETRY_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Point,
    FilterOperator::Polygon,
    FilterOperator::InRadius,
];

impl FieldKind {
    /// Resolve a kind token or SQL type name (case-insensitive).
    ///
    /// Returns `None` for types outside the supported set.
    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name.trim().to_ascii_lowercase().as_str() {
            "text" | "string" | "autostring" | "varchar" | "oid" | "inet" | "domain" => {
                Self::Text
            }
            "numeric" | "integer" | "smallint" | "bigint" | "real" | "double_precision" => {
                Self::Numeric
            }
            "boolean" | "bool" => Self::Boolean,
            "enum" => Self::Enum,
            "null_marker" | "nulltype" => Self::NullMarker,
            "list" | "array" => Self::List,
            "geometry" => Self::Geometry,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            _ => return None,
        };
        Some(kind)
    }

    /// Operators legal for this kind, in menu order.
    pub fn operators(self) -> &'static [FilterOperator] {
        match self {
            Self::Text => TEXT_OPERATORS,
            Self::Numeric | Self::Date | Self::DateTime | Self::Timestamp => ORDERED_OPERATORS,
            Self::Boolean | Self::Enum | Self::NullMarker => CHOICE_OPERATORS,
            Self::List => LIST_OPERATORS,
            Self::Geometry => GEOMETRY_OPERATORS,
        }
    }

    /// Whether `operator` is on this kind's menu.
    pub fn allows(self, operator: FilterOperator) -> bool {
        self.operators().contains(&operator)
    }

    /// Fixed value choices for select-style inputs.
    pub fn value_options(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Boolean => &[("0", "False"), ("1", "True")],
            Self::NullMarker => &[(NULL_TOKEN, "NULL")],
            _ => &[],
        }
    }

    /// Input widget suited to this kind.
    pub fn widget(self) -> InputWidget {
        match self {
            Self::Text | Self::List => InputWidget::Textarea,
            Self::Boolean | Self::Enum | Self::NullMarker => InputWidget::Select,
            Self::Geometry => InputWidget::Text,
            Self::Numeric => InputWidget::Number,
            Self::Date | Self::DateTime | Self::Timestamp => InputWidget::Date,
        }
    }

    /// Whether predicates for this kind can only come from a custom handler.
    pub fn requires_handler(self) -> bool {
        matches!(self, Self::Geometry)
    }
}

/// Value submitted for a null-marker field to mean SQL `NULL`.
pub const NULL_TOKEN: &str = "null";

/// Input widget hint for the rendering layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputWidget {
    Textarea,
    Select,
    Text,
    Number,
    Date,
}

/// Comparison operators for filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    #[serde(rename = "is_equal")]
    Equal,
    #[serde(rename = "is_not_equal")]
    NotEqual,
    /// Case-insensitive substring match.
    #[serde(rename = "is_like")]
    Like,
    #[serde(rename = "is_not_like")]
    NotLike,
    #[serde(rename = "is_null")]
    IsNull,
    #[serde(rename = "is_not_null")]
    IsNotNull,
    #[serde(rename = "is_less_than")]
    LessThan,
    #[serde(rename = "is_less_equal_than")]
    LessOrEqual,
    #[serde(rename = "is_greater_than")]
    GreaterThan,
    #[serde(rename = "is_greater_equal_than")]
    GreaterOrEqual,
    /// Inclusive range; needs the secondary value.
    #[serde(rename = "is_between")]
    Between,
    #[serde(rename = "is_not_between")]
    NotBetween,
    /// Membership in a comma-separated list.
    #[serde(rename = "is_in")]
    In,
    #[serde(rename = "is_not_in")]
    NotIn,
    #[serde(rename = "is_point")]
    Point,
    #[serde(rename = "is_polygon")]
    Polygon,
    #[serde(rename = "is_in_radius")]
    InRadius,
}

impl FilterOperator {
    /// Every operator, in declaration order.
    pub const ALL: [FilterOperator; 17] = [
        Self::Equal,
        Self::NotEqual,
        Self::Like,
        Self::NotLike,
        Self::IsNull,
        Self::IsNotNull,
        Self::LessThan,
        Self::LessOrEqual,
        Self::GreaterThan,
        Self::GreaterOrEqual,
        Self::Between,
        Self::NotBetween,
        Self::In,
        Self::NotIn,
        Self::Point,
        Self::Polygon,
        Self::InRadius,
    ];

    /// Wire token submitted in `{field}_op`.
    pub fn token(self) -> &'static str {
        match self {
            Self::Equal => "is_equal",
            Self::NotEqual => "is_not_equal",
            Self::Like => "is_like",
            Self::NotLike => "is_not_like",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
            Self::LessThan => "is_less_than",
            Self::LessOrEqual => "is_less_equal_than",
            Self::GreaterThan => "is_greater_than",
            Self::GreaterOrEqual => "is_greater_equal_than",
            Self::Between => "is_between",
            Self::NotBetween => "is_not_between",
            Self::In => "is_in",
            Self::NotIn => "is_not_in",
            Self::Point => "is_point",
            Self::Polygon => "is_polygon",
            Self::InRadius => "is_in_radius",
        }
    }

    /// Parse a wire token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    /// Menu label as shown for a field of `kind`.
    pub fn label(self, kind: FieldKind) -> &'static str {
        let choice = matches!(
            kind,
            FieldKind::Boolean | FieldKind::Enum | FieldKind::NullMarker
        );
        match self {
            Self::Equal if choice => "is",
            Self::NotEqual if choice => "is not",
            Self::Equal => "is equal",
            Self::NotEqual => "is not equal",
            Self::Like => "is like",
            Self::NotLike => "is not like",
            Self::IsNull => "is null",
            Self::IsNotNull => "is not null",
            Self::LessThan => "is less than",
            Self::LessOrEqual => "is less equal than",
            Self::GreaterThan => "is greater than",
            Self::GreaterOrEqual => "is greater equal than",
            Self::Between => "is between .. and ..",
            Self::NotBetween => "is not between .. and ..",
            Self::In => "is in",
            Self::NotIn => "is not in",
            Self::Point => "is point",
            Self::Polygon => "is polygon",
            Self::InRadius => "is in radius",
        }
    }

    /// Whether the operator reads the secondary value.
    pub fn is_range(self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }
}

/// What happened to one registered field during `apply`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// No primary value was submitted.
    NotSubmitted,
    /// A built-in predicate was added.
    Applied,
    /// The field's custom handler refined the plan.
    Delegated,
    /// Sub-query field with no projection of that name on the plan.
    UnresolvedColumn,
    /// Operator token missing or not recognised.
    UnknownOperator,
    /// Recognised operator outside the kind's menu.
    OperatorNotAllowed,
    /// Range operator without a secondary value.
    MissingSecondValue,
    /// List operator whose value held no items.
    EmptyList,
    /// Kind has no built-in predicates and no handler is registered.
    RequiresHandler,
}

impl FieldStatus {
    /// Whether the field contributed to the plan.
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied | Self::Delegated)
    }
}

/// One entry of an operator menu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatorOption {
    pub token: String,
    pub label: String,
}

/// Per-request view of a registered field, for echoing the filter form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldState {
    pub name: String,
    pub kind: FieldKind,
    pub label: String,
    pub help_text: String,
    pub widget: InputWidget,
    pub operators: Vec<OperatorOption>,
    pub value_options: Vec<OperatorOption>,

    /// Submitted operator token (empty when nothing was recorded).
    pub operator: String,
    pub value1: String,
    pub value2: String,

    pub status: FieldStatus,
}

impl FieldState {
    /// Whether the field contributed to the plan.
    pub fn is_applied(&self) -> bool {
        self.status.is_applied()
    }
}

/// Result of applying a request to every registered field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Field states in registration order.
    pub fields: Vec<FieldState>,
}

impl FilterOutcome {
    /// State of a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that contributed to the plan.
    pub fn applied(&self) -> impl Iterator<Item = &FieldState> {
        self.fields.iter().filter(|f| f.is_applied())
    }
}
