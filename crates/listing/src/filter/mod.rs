//! Column filter compiler.
//!
//! This module provides:
//! - FilterRegistry: Registered fields and request application
//! - FilterField / FieldSpec: Field definitions, typed or by kind name
//! - FilterHandler: Custom predicate delegation
//! - Types: FieldKind, FilterOperator, FieldStatus, FilterOutcome

mod field;
mod predicate;
mod registry;
mod request;
pub mod types;

pub use field::{FieldSpec, FilterField, FilterHandler};
pub use registry::{FilterApplication, FilterRegistry};
pub use request::{FilterInput, FilterRequest, OPERATOR_SUFFIX, VALUE1_SUFFIX, VALUE2_SUFFIX};
pub use types::{
    FieldKind, FieldState, FieldStatus, FilterOperator, FilterOutcome, InputWidget,
    OperatorOption,
};
