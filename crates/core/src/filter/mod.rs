//! Native filter model and transformation engine.
//!
//! This module turns a dashboard's native filter descriptors into the
//! filter-state mapping the dashboard server accepts.
//!
//! # Modules
//!
//! - `kind` - The closed set of filter kinds
//! - `descriptor` - Server-issued filter definitions
//! - `value` - Runtime filter values and their wire payloads
//! - `defaults` - Seeding values from descriptors
//! - `mapping` - The value mapping and edit dispatch
//! - `select`, `numeric_range`, `time_range`, `time_grain`, `time_column` -
//!   One transition family per kind
//! - `error` - Engine error types

pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod kind;
pub mod mapping;
pub mod numeric_range;
pub mod select;
pub mod time_column;
pub mod time_grain;
pub mod time_range;
pub mod value;

#[cfg(test)]
mod engine_props;
#[cfg(test)]
mod tests;

pub use defaults::{DefaultValues, SkipReason, SkippedFilter, build_default_values, default_value};
pub use descriptor::{
    ControlValues, DashboardMetadata, DataMask, DescriptorKind, FilterDescriptor, FilterScope,
    FilterTarget, SelectControlValues, TargetColumn, find_by_name,
};
pub use error::FilterError;
pub use kind::FilterKind;
pub use mapping::{FilterEdit, FilterValueMapping};
pub use numeric_range::{NumericRangeEngine, RangeBounds};
pub use select::SelectEngine;
pub use time_column::TimeColumnEngine;
pub use time_grain::{TimeGrain, TimeGrainEngine};
pub use time_range::{TimeRangeEngine, TimeRangeInput, TimeRangePreset};
pub use value::{
    FilterState, FilterValue, NativeFilter, NumericRangeFilter, OwnState, Predicate,
    PredicateFormData, PredicateOp, SelectFilter, Slot, TimeColumnFilter, TimeColumnFormData,
    TimeGrainFilter, TimeGrainFormData, TimeRangeFilter, TimeRangeFormData,
};
