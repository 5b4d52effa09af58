//! Numeric range filter transitions.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::filter::descriptor::FilterDescriptor;
use crate::filter::error::FilterError;
use crate::filter::value::{
    FilterState, NumericRangeFilter, Predicate, PredicateFormData, PredicateOp, Slot,
};

/// Inclusive bounds of a numeric range. Either side may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Lower bound, inclusive.
    pub min: Option<Number>,
    /// Upper bound, inclusive.
    pub max: Option<Number>,
}

impl RangeBounds {
    /// Both bounds.
    #[must_use]
    pub fn between(min: impl Into<Number>, max: impl Into<Number>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Lower bound only.
    #[must_use]
    pub fn at_least(min: impl Into<Number>) -> Self {
        Self {
            min: Some(min.into()),
            max: None,
        }
    }

    /// Upper bound only.
    #[must_use]
    pub fn at_most(max: impl Into<Number>) -> Self {
        Self {
            min: None,
            max: Some(max.into()),
        }
    }

    /// Builds bounds from floating point input such as configuration.
    ///
    /// Integral values are kept as JSON integers so `40.0` is sent as `40`.
    /// Non-finite values are treated as an open bound.
    #[must_use]
    pub fn from_f64(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.and_then(json_number),
            max: max.and_then(json_number),
        }
    }

    /// Whether neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn json_number(value: f64) -> Option<Number> {
    const I64_RANGE: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() < I64_RANGE {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

/// Stateless transitions for numeric range filters.
pub struct NumericRangeEngine;

impl NumericRangeEngine {
    /// Restricts the first target column to `bounds`.
    ///
    /// Emits a `>=` predicate iff `min` is set and a `<=` predicate iff `max`
    /// is set, in that order. Unbounded input behaves like
    /// [`NumericRangeEngine::with_no_value`].
    pub fn with_value(
        descriptor: &FilterDescriptor,
        current: &NumericRangeFilter,
        bounds: &RangeBounds,
    ) -> Result<NumericRangeFilter, FilterError> {
        if bounds.is_unbounded() {
            return Ok(Self::with_no_value(descriptor, current));
        }
        debug_assert_eq!(descriptor.id, current.id);

        let col = descriptor
            .target_column()
            .ok_or_else(|| FilterError::MissingTarget {
                filter_id: descriptor.id.clone(),
            })?;

        let bound = |op: PredicateOp, val: &Number| Predicate {
            col: col.to_string(),
            op,
            val: Value::Number(val.clone()),
        };
        let filters = [
            bounds
                .min
                .as_ref()
                .map(|min| bound(PredicateOp::GreaterOrEqual, min)),
            bounds
                .max
                .as_ref()
                .map(|max| bound(PredicateOp::LessOrEqual, max)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let filter_state = FilterState {
            value: Slot::Value([bounds.min.clone(), bounds.max.clone()]),
            exclude_filter_values: Slot::Value(false),
            ..FilterState::default()
        };

        Ok(current.replaced(PredicateFormData::with_filters(filters), filter_state))
    }

    /// Removes both bounds.
    #[must_use]
    pub fn with_no_value(
        descriptor: &FilterDescriptor,
        current: &NumericRangeFilter,
    ) -> NumericRangeFilter {
        debug_assert_eq!(descriptor.id, current.id);
        current.replaced(PredicateFormData::empty(), FilterState::default())
    }
}
