//! Built-in predicate construction.
//!
//! Maps a field kind and submitted operator onto a SeaQuery condition.
//! Values are forwarded as string literals without validation.

use sea_query::{ExprTrait, Func, SimpleExpr};

use super::request::FilterInput;
use super::types::{FieldKind, FieldStatus, FilterOperator, NULL_TOKEN};

/// Build the condition for one field, or the reason it was skipped.
pub(crate) fn build_condition(
    kind: FieldKind,
    column: &SimpleExpr,
    input: &FilterInput,
) -> Result<SimpleExpr, FieldStatus> {
    if kind.requires_handler() {
        return Err(FieldStatus::RequiresHandler);
    }

    let operator =
        FilterOperator::from_token(&input.operator).ok_or(FieldStatus::UnknownOperator)?;
    if !kind.allows(operator) {
        return Err(FieldStatus::OperatorNotAllowed);
    }

    let col = column.clone();
    let value = input.value1.clone();

    let condition = match operator {
        FilterOperator::Equal if is_null_marker(kind, &value) => col.is_null(),
        FilterOperator::NotEqual if is_null_marker(kind, &value) => col.is_not_null(),
        FilterOperator::Equal => col.eq(value),
        FilterOperator::NotEqual => col.ne(value),
        FilterOperator::LessThan => col.lt(value),
        FilterOperator::LessOrEqual => col.lte(value),
        FilterOperator::GreaterThan => col.gt(value),
        FilterOperator::GreaterOrEqual => col.gte(value),
        FilterOperator::Like => lowered(col).like(contains_pattern(&value)),
        FilterOperator::NotLike => lowered(col).not_like(contains_pattern(&value)),
        FilterOperator::IsNull => col.is_null(),
        FilterOperator::IsNotNull => col.is_not_null(),
        FilterOperator::Between | FilterOperator::NotBetween => {
            if input.value2.is_empty() {
                return Err(FieldStatus::MissingSecondValue);
            }
            let upper = input.value2.clone();
            if operator == FilterOperator::Between {
                col.between(value, upper)
            } else {
                col.not_between(value, upper)
            }
        }
        FilterOperator::In | FilterOperator::NotIn => {
            let items = split_list(&value);
            if items.is_empty() {
                return Err(FieldStatus::EmptyList);
            }
            if operator == FilterOperator::In {
                col.is_in(items)
            } else {
                col.is_not_in(items)
            }
        }
        FilterOperator::Point | FilterOperator::Polygon | FilterOperator::InRadius => {
            return Err(FieldStatus::RequiresHandler);
        }
    };

    Ok(condition)
}

fn is_null_marker(kind: FieldKind, value: &str) -> bool {
    kind == FieldKind::NullMarker && value.eq_ignore_ascii_case(NULL_TOKEN)
}

fn lowered(col: SimpleExpr) -> SimpleExpr {
    Func::lower(col).into()
}

/// Case-insensitive substring pattern with LIKE wildcards escaped.
fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like_wildcards(&value.to_lowercase()))
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Comma-separated items, trimmed, empties dropped.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryPlan;

    fn render(kind: FieldKind, operator: &str, v1: &str, v2: &str) -> Result<String, FieldStatus> {
        let plan = QueryPlan::new("t");
        let column = plan.column(None, "c");
        let condition = build_condition(kind, &column, &FilterInput::new(operator, v1, v2))?;
        Ok(plan.and_where(condition).build(0, 1))
    }

    #[test]
    fn comparison_operators() {
        let cases = [
            ("is_equal", "\"t\".\"c\" = '5'"),
            ("is_not_equal", "\"t\".\"c\" <> '5'"),
            ("is_less_than", "\"t\".\"c\" < '5'"),
            ("is_less_equal_than", "\"t\".\"c\" <= '5'"),
            ("is_greater_than", "\"t\".\"c\" > '5'"),
            ("is_greater_equal_than", "\"t\".\"c\" >= '5'"),
            ("is_null", "\"t\".\"c\" IS NULL"),
            ("is_not_null", "\"t\".\"c\" IS NOT NULL"),
        ];

        for (operator, expected) in cases {
            let sql = render(FieldKind::Numeric, operator, "5", "").unwrap();
            assert!(sql.contains(expected), "{operator}: {sql}");
        }
    }

    #[test]
    fn between_needs_second_value() {
        assert_eq!(
            render(FieldKind::Numeric, "is_between", "10", ""),
            Err(FieldStatus::MissingSecondValue)
        );

        let sql = render(FieldKind::Numeric, "is_between", "10", "20").unwrap();
        assert!(sql.contains("\"t\".\"c\" BETWEEN '10' AND '20'"), "{sql}");

        let sql = render(FieldKind::Date, "is_not_between", "2024-01-01", "2024-12-31").unwrap();
        assert!(
            sql.contains("\"t\".\"c\" NOT BETWEEN '2024-01-01' AND '2024-12-31'"),
            "{sql}"
        );
    }

    #[test]
    fn like_is_case_insensitive_substring() {
        let sql = render(FieldKind::Text, "is_like", "Ann", "").unwrap();
        assert!(sql.contains("LOWER(\"t\".\"c\") LIKE '%ann%'"), "{sql}");

        let sql = render(FieldKind::Text, "is_not_like", "ann", "").unwrap();
        assert!(sql.contains("NOT LIKE '%ann%'"), "{sql}");
    }

    #[test]
    fn like_wildcards_escaped() {
        assert_eq!(contains_pattern("100%_Done"), "%100\\%\\_done%");
        assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
    }

    #[test]
    fn list_membership() {
        let sql = render(FieldKind::List, "is_in", "a, b,,c", "").unwrap();
        assert!(sql.contains("\"t\".\"c\" IN ('a', 'b', 'c')"), "{sql}");

        let sql = render(FieldKind::List, "is_not_in", "a", "").unwrap();
        assert!(sql.contains("\"t\".\"c\" NOT IN ('a')"), "{sql}");

        assert_eq!(
            render(FieldKind::List, "is_in", " , ", ""),
            Err(FieldStatus::EmptyList)
        );
    }

    #[test]
    fn null_marker_equality() {
        let sql = render(FieldKind::NullMarker, "is_equal", "null", "").unwrap();
        assert!(sql.contains("\"t\".\"c\" IS NULL"), "{sql}");

        let sql = render(FieldKind::NullMarker, "is_not_equal", "NULL", "").unwrap();
        assert!(sql.contains("\"t\".\"c\" IS NOT NULL"), "{sql}");

        let sql = render(FieldKind::Enum, "is_equal", "null", "").unwrap();
        assert!(sql.contains("\"t\".\"c\" = 'null'"), "{sql}");
    }

    #[test]
    fn operator_outside_menu_skipped() {
        assert_eq!(
            render(FieldKind::Text, "is_between", "a", "b"),
            Err(FieldStatus::OperatorNotAllowed)
        );
        assert_eq!(
            render(FieldKind::Boolean, "is_like", "1", ""),
            Err(FieldStatus::OperatorNotAllowed)
        );
    }

    #[test]
    fn unknown_operator_skipped() {
        assert_eq!(
            render(FieldKind::Text, "is_roughly", "a", ""),
            Err(FieldStatus::UnknownOperator)
        );
        assert_eq!(
            render(FieldKind::Text, "", "a", ""),
            Err(FieldStatus::UnknownOperator)
        );
    }

    #[test]
    fn geometry_always_needs_handler() {
        for operator in ["is_point", "is_polygon", "is_in_radius", "is_equal"] {
            assert_eq!(
                render(FieldKind::Geometry, operator, "POINT(0 0)", ""),
                Err(FieldStatus::RequiresHandler)
            );
        }
    }

    #[test]
    fn malformed_values_forwarded() {
        let sql = render(FieldKind::Numeric, "is_greater_than", "twelve", "").unwrap();
        assert!(sql.contains("\"t\".\"c\" > 'twelve'"), "{sql}");
    }
}
