//! Submitted filter values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Parameter suffix carrying the operator token.
pub const OPERATOR_SUFFIX: &str = "_op";

/// Parameter suffix carrying the primary value.
pub const VALUE1_SUFFIX: &str = "_v1";

/// Parameter suffix carrying the secondary (range) value.
pub const VALUE2_SUFFIX: &str = "_v2";

/// Values submitted for one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterInput {
    /// Operator token, e.g. `is_between`.
    pub operator: String,
    pub value1: String,
    /// Only read by range operators.
    pub value2: String,
}

impl FilterInput {
    pub fn new(
        operator: impl Into<String>,
        value1: impl Into<String>,
        value2: impl Into<String>,
    ) -> Self {
        Self {
            operator: operator.into().trim().to_string(),
            value1: value1.into().trim().to_string(),
            value2: value2.into().trim().to_string(),
        }
    }
}

/// Filter values for one request, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    inputs: HashMap<String, FilterInput>,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field's input.
    pub fn with(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value1: impl Into<String>,
        value2: impl Into<String>,
    ) -> Self {
        self.insert(field, FilterInput::new(operator, value1, value2));
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, input: FilterInput) {
        self.inputs.insert(field.into(), input);
    }

    pub fn get(&self, field: &str) -> Option<&FilterInput> {
        self.inputs.get(field)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Collect `{field}_op`, `{field}_v1` and `{field}_v2` for each field.
    ///
    /// Fields with none of the three parameters are left out.
    pub fn from_params<'a>(
        params: &HashMap<String, String>,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut request = Self::new();

        for field in fields {
            let operator = params.get(&format!("{field}{OPERATOR_SUFFIX}"));
            let value1 = params.get(&format!("{field}{VALUE1_SUFFIX}"));
            let value2 = params.get(&format!("{field}{VALUE2_SUFFIX}"));

            if operator.is_none() && value1.is_none() && value2.is_none() {
                continue;
            }

            request.insert(
                field,
                FilterInput::new(
                    operator.cloned().unwrap_or_default(),
                    value1.cloned().unwrap_or_default(),
                    value2.cloned().unwrap_or_default(),
                ),
            );
        }

        request
    }
}
