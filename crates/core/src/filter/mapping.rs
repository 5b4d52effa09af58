//! The per-dashboard mapping of filter values and edit dispatch.

use std::collections::BTreeMap;

use filterlink_shared::FilterId;
use serde::Serialize;

use crate::filter::descriptor::FilterDescriptor;
use crate::filter::error::FilterError;
use crate::filter::kind::FilterKind;
use crate::filter::numeric_range::{NumericRangeEngine, RangeBounds};
use crate::filter::select::SelectEngine;
use crate::filter::time_column::TimeColumnEngine;
use crate::filter::time_grain::{TimeGrain, TimeGrainEngine};
use crate::filter::time_range::{TimeRangeEngine, TimeRangeInput};
use crate::filter::value::FilterValue;

/// A requested change to one filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEdit {
    /// Include exactly these options.
    Select(Vec<String>),
    /// Restrict to inclusive bounds.
    NumericRange(RangeBounds),
    /// Restrict to a time range.
    TimeRange(TimeRangeInput),
    /// Bucket by this grain.
    TimeGrain(TimeGrain),
    /// Use this temporal column.
    TimeColumn(String),
    /// Remove any value, whatever the kind.
    Clear,
}

impl FilterEdit {
    /// Kind the edit applies to; `None` for [`FilterEdit::Clear`].
    #[must_use]
    pub const fn kind(&self) -> Option<FilterKind> {
        match self {
            Self::Select(_) => Some(FilterKind::Select),
            Self::NumericRange(_) => Some(FilterKind::NumericRange),
            Self::TimeRange(_) => Some(FilterKind::TimeRange),
            Self::TimeGrain(_) => Some(FilterKind::TimeGrain),
            Self::TimeColumn(_) => Some(FilterKind::TimeColumn),
            Self::Clear => None,
        }
    }

    /// Computes the successor of `current` without touching it.
    pub fn apply_to(
        &self,
        descriptor: &FilterDescriptor,
        current: &FilterValue,
    ) -> Result<FilterValue, FilterError> {
        let Some(requested) = self.kind() else {
            return Ok(current.with_no_value(descriptor));
        };

        match (self, current) {
            (Self::Select(options), FilterValue::Select(f)) => Ok(FilterValue::Select(
                SelectEngine::with_value(descriptor, f, options)?,
            )),
            (Self::NumericRange(bounds), FilterValue::NumericRange(f)) => Ok(
                FilterValue::NumericRange(NumericRangeEngine::with_value(descriptor, f, bounds)?),
            ),
            (Self::TimeRange(input), FilterValue::TimeRange(f)) => Ok(FilterValue::TimeRange(
                TimeRangeEngine::with_value(descriptor, f, input),
            )),
            (Self::TimeGrain(grain), FilterValue::TimeGrain(f)) => Ok(FilterValue::TimeGrain(
                TimeGrainEngine::with_value(descriptor, f, *grain),
            )),
            (Self::TimeColumn(column), FilterValue::TimeColumn(f)) => Ok(FilterValue::TimeColumn(
                TimeColumnEngine::with_value(descriptor, f, column),
            )),
            (_, value) => Err(FilterError::KindMismatch {
                filter_id: descriptor.id.clone(),
                actual: value.kind(),
                requested,
            }),
        }
    }
}

/// Filter values of one dashboard, keyed by filter id.
///
/// Serializes as a plain JSON object `{ "<id>": <value>, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterValueMapping(BTreeMap<FilterId, FilterValue>);

impl FilterValueMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under its own id, returning the value it replaces.
    pub fn insert(&mut self, value: FilterValue) -> Option<FilterValue> {
        self.0.insert(value.id().clone(), value)
    }

    /// Value of the filter with id `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FilterValue> {
        self.0.get(id)
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping holds no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates values in id order.
    pub fn values(&self) -> impl Iterator<Item = &FilterValue> {
        self.0.values()
    }

    /// Applies `edit` to the filter described by `descriptor`, replacing its
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownFilter` if the mapping has no entry for
    /// the descriptor, or the engine's error for the edit. The mapping is
    /// unchanged on error.
    pub fn apply(
        &mut self,
        descriptor: &FilterDescriptor,
        edit: &FilterEdit,
    ) -> Result<(), FilterError> {
        let current = self
            .0
            .get(&descriptor.id)
            .ok_or_else(|| FilterError::UnknownFilter(descriptor.id.clone()))?;
        let next = edit.apply_to(descriptor, current)?;
        self.0.insert(descriptor.id.clone(), next);
        Ok(())
    }

    /// Encodes the mapping as the JSON string the upload body carries.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
