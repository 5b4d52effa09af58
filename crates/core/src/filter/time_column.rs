//! Time column filter transitions.

use crate::filter::descriptor::FilterDescriptor;
use crate::filter::value::{FilterState, Slot, TimeColumnFilter, TimeColumnFormData};

/// Stateless transitions for time column filters.
pub struct TimeColumnEngine;

impl TimeColumnEngine {
    /// Uses `column` as the time axis of every chart in scope.
    #[must_use]
    pub fn with_value(
        descriptor: &FilterDescriptor,
        current: &TimeColumnFilter,
        column: &str,
    ) -> TimeColumnFilter {
        debug_assert_eq!(descriptor.id, current.id);
        current.replaced(
            TimeColumnFormData {
                granularity_sqla: Slot::Value(column.to_string()),
                ..TimeColumnFormData::default()
            },
            FilterState::of(vec![column.to_string()]),
        )
    }

    /// Falls back to each chart's own time column.
    #[must_use]
    pub fn with_no_value(
        descriptor: &FilterDescriptor,
        current: &TimeColumnFilter,
    ) -> TimeColumnFilter {
        debug_assert_eq!(descriptor.id, current.id);
        current.replaced(TimeColumnFormData::default(), FilterState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::defaults::default_value;
    use crate::filter::value::FilterValue;
    use serde_json::json;

    #[test]
    fn test_with_value_and_back() {
        let desc: FilterDescriptor = serde_json::from_value(json!({
            "id": "NATIVE_FILTER-col",
            "name": "Time Column",
            "filterType": "filter_timecolumn",
            "targets": [{ "datasetId": 3 }],
            "defaultDataMask": {
                "extraFormData": { "granularity_sqla": "order_date" },
                "filterState": { "value": ["order_date"] }
            }
        }))
        .unwrap();
        let Some(FilterValue::TimeColumn(current)) = default_value(&desc) else {
            panic!("expected a time column value");
        };

        let next = TimeColumnEngine::with_value(&desc, &current, "ship_date");
        assert_eq!(
            serde_json::to_value(&next).unwrap(),
            json!({
                "id": "NATIVE_FILTER-col",
                "extraFormData": { "granularity_sqla": "ship_date" },
                "filterState": { "value": ["ship_date"] },
                "ownState": {}
            })
        );

        let cleared = TimeColumnEngine::with_no_value(&desc, &next);
        assert_eq!(serde_json::to_value(&cleared.extra_form_data).unwrap(), json!({}));
        assert!(cleared.filter_state.is_empty());
    }
}
