//! Select filter transitions.

use serde_json::Value;

use crate::filter::descriptor::FilterDescriptor;
use crate::filter::error::FilterError;
use crate::filter::value::{
    FilterState, Predicate, PredicateFormData, PredicateOp, SelectFilter, Slot,
};

/// Stateless transitions for select filters.
///
/// Only inclusion is exposed: the filter bar's "exclude" toggle
/// (`excludeFilterValues: true` with a `NOT IN` predicate) is never produced.
pub struct SelectEngine;

impl SelectEngine {
    /// Selects exactly `options`.
    ///
    /// # Arguments
    /// * `descriptor` - Descriptor of the filter; its first target column is used
    /// * `current` - The filter's current value
    /// * `options` - Options to include, in order
    ///
    /// # Returns
    /// * `Ok(SelectFilter)` with an `IN` predicate over `options`
    /// * `Err(FilterError::MissingTarget)` if the descriptor has no target column
    pub fn with_value(
        descriptor: &FilterDescriptor,
        current: &SelectFilter,
        options: &[String],
    ) -> Result<SelectFilter, FilterError> {
        debug_assert_eq!(descriptor.id, current.id);
        let col = descriptor
            .target_column()
            .ok_or_else(|| FilterError::MissingTarget {
                filter_id: descriptor.id.clone(),
            })?;

        let values: Vec<Value> = options.iter().cloned().map(Value::String).collect();

        let extra_form_data = PredicateFormData::with_filters(vec![Predicate {
            col: col.to_string(),
            op: PredicateOp::In,
            val: Value::Array(values.clone()),
        }]);
        let filter_state = FilterState {
            value: Slot::Value(values),
            exclude_filter_values: Slot::Value(false),
            ..FilterState::default()
        };

        Ok(current.replaced(extra_form_data, filter_state))
    }

    /// Clears the selection.
    #[must_use]
    pub fn with_no_value(descriptor: &FilterDescriptor, current: &SelectFilter) -> SelectFilter {
        debug_assert_eq!(descriptor.id, current.id);
        current.replaced(PredicateFormData::empty(), FilterState::default())
    }
}
