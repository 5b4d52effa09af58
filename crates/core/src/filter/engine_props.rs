//! Property-based tests for the filter transition engines.
//!
//! Covers the laws every kind must obey: clearing is idempotent and
//! forgets history, predicates and filter state agree, and edits never
//! leak back into descriptors.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{Value, json};

use super::defaults::build_default_values;
use super::descriptor::{DashboardMetadata, FilterDescriptor, find_by_name};
use super::mapping::{FilterEdit, FilterValueMapping};
use super::numeric_range::RangeBounds;
use super::time_grain::TimeGrain;
use super::time_range::{TimeRangeInput, TimeRangePreset, format_bound};
use super::value::FilterValue;

fn dashboard() -> Vec<FilterDescriptor> {
    let metadata = json!({
        "native_filter_configuration": [
            {
                "id": "NATIVE_FILTER-select",
                "name": "Country",
                "filterType": "filter_select",
                "targets": [{ "column": { "name": "country" }, "datasetId": 1 }],
                "defaultDataMask": {
                    "extraFormData": {
                        "filters": [{ "col": "country", "op": "IN", "val": ["France"] }]
                    },
                    "filterState": { "value": ["France"], "label": "France" }
                }
            },
            {
                "id": "NATIVE_FILTER-range",
                "name": "Quantity",
                "filterType": "filter_range",
                "targets": [{ "column": { "name": "quantity" }, "datasetId": 1 }]
            },
            {
                "id": "NATIVE_FILTER-time",
                "name": "Time Range",
                "filterType": "filter_time",
                "targets": [{}],
                "defaultDataMask": {
                    "extraFormData": { "time_range": "No filter" },
                    "filterState": { "value": "No filter", "validateStatus": false }
                }
            },
            {
                "id": "NATIVE_FILTER-grain",
                "name": "Time Grain",
                "filterType": "filter_timegrain",
                "targets": [{ "datasetId": 1 }]
            },
            {
                "id": "NATIVE_FILTER-column",
                "name": "Time Column",
                "filterType": "filter_timecolumn",
                "targets": [{ "datasetId": 1 }]
            }
        ]
    });
    DashboardMetadata::from_json_str(&metadata.to_string())
        .unwrap()
        .native_filter_configuration
}

fn options_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z ]{1,12}", 1..6)
}

fn bound_strategy() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(-1_000_000i64..1_000_000i64)
}

fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    // 2000-01-01 .. 2040-01-01, millisecond resolution
    (946_684_800_000i64..2_208_988_800_000i64)
        .prop_map(|ms| Utc.timestamp_millis_opt(ms).single().unwrap())
}

fn grain_strategy() -> impl Strategy<Value = TimeGrain> {
    prop::sample::select(TimeGrain::ALL.to_vec())
}

fn preset_strategy() -> impl Strategy<Value = TimeRangePreset> {
    prop::sample::select(TimeRangePreset::ALL.to_vec())
}

/// An edit paired with the name of the filter it targets.
fn edit_strategy() -> impl Strategy<Value = (&'static str, FilterEdit)> {
    prop_oneof![
        options_strategy().prop_map(|o| ("Country", FilterEdit::Select(o))),
        (bound_strategy(), bound_strategy()).prop_map(|(min, max)| (
            "Quantity",
            FilterEdit::NumericRange(RangeBounds {
                min: min.map(Into::into),
                max: max.map(Into::into),
            })
        )),
        preset_strategy().prop_map(|p| ("Time Range", FilterEdit::TimeRange(TimeRangeInput::Preset(p)))),
        (instant_strategy(), instant_strategy()).prop_map(|(begin, end)| (
            "Time Range",
            FilterEdit::TimeRange(TimeRangeInput::Between { begin, end })
        )),
        grain_strategy().prop_map(|g| ("Time Grain", FilterEdit::TimeGrain(g))),
        "[a-z_]{1,16}".prop_map(|c| ("Time Column", FilterEdit::TimeColumn(c))),
    ]
}

fn encoded(mapping: &FilterValueMapping, id: &str) -> Value {
    serde_json::to_value(mapping.get(id).unwrap()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Clearing twice equals clearing once, and a cleared value does not
    /// remember the edits that preceded it.
    #[test]
    fn prop_clear_is_idempotent_and_forgets_history(
        edits in prop::collection::vec(edit_strategy(), 0..8),
    ) {
        let descs = dashboard();
        let defaults = build_default_values(&descs).filters;
        let mut edited = defaults.clone();
        for (name, edit) in &edits {
            edited.apply(find_by_name(&descs, name).unwrap(), edit).unwrap();
        }

        for desc in &descs {
            let from_edited = edited.get(desc.id.as_str()).unwrap().with_no_value(desc);
            let from_default = defaults.get(desc.id.as_str()).unwrap().with_no_value(desc);
            prop_assert_eq!(&from_edited, &from_default);
            prop_assert_eq!(from_edited.with_no_value(desc), from_edited.clone());
            prop_assert!(!from_edited.has_value());
        }
    }

    /// Applying edits never changes the descriptors they were seeded from.
    #[test]
    fn prop_edits_leave_descriptors_untouched(
        edits in prop::collection::vec(edit_strategy(), 1..8),
    ) {
        let descs = dashboard();
        let snapshot = descs.clone();
        let mut filters = build_default_values(&descs).filters;
        for (name, edit) in &edits {
            filters.apply(find_by_name(&descs, name).unwrap(), edit).unwrap();
        }

        prop_assert_eq!(&descs, &snapshot);
        prop_assert_eq!(filters.len(), descs.len());
    }

    /// The select predicate and filter state carry the same options, in order.
    #[test]
    fn prop_select_predicate_matches_state(options in options_strategy()) {
        let descs = dashboard();
        let mut filters = build_default_values(&descs).filters;
        filters
            .apply(find_by_name(&descs, "Country").unwrap(), &FilterEdit::Select(options.clone()))
            .unwrap();

        let value = encoded(&filters, "NATIVE_FILTER-select");
        let expected: Vec<Value> = options.into_iter().map(Value::String).collect();
        prop_assert_eq!(
            &value["extraFormData"],
            &json!({ "filters": [{ "col": "country", "op": "IN", "val": expected.clone() }] })
        );
        prop_assert_eq!(
            &value["filterState"],
            &json!({ "value": expected, "excludeFilterValues": false })
        );
    }

    /// One predicate per present bound, lower first; the state always holds
    /// both slots.
    #[test]
    fn prop_range_predicates_follow_bounds(min in bound_strategy(), max in bound_strategy()) {
        let descs = dashboard();
        let mut filters = build_default_values(&descs).filters;
        let bounds = RangeBounds { min: min.map(Into::into), max: max.map(Into::into) };
        filters
            .apply(find_by_name(&descs, "Quantity").unwrap(), &FilterEdit::NumericRange(bounds))
            .unwrap();

        let value = encoded(&filters, "NATIVE_FILTER-range");
        let mut expected = Vec::new();
        if let Some(min) = min {
            expected.push(json!({ "col": "quantity", "op": ">=", "val": min }));
        }
        if let Some(max) = max {
            expected.push(json!({ "col": "quantity", "op": "<=", "val": max }));
        }
        prop_assert_eq!(&value["extraFormData"], &json!({ "filters": expected }));

        if min.is_none() && max.is_none() {
            prop_assert_eq!(&value["filterState"], &json!({}));
        } else {
            prop_assert_eq!(
                &value["filterState"],
                &json!({ "value": [min, max], "excludeFilterValues": false })
            );
        }
    }

    /// Explicit bounds render identically in the query and the UI payloads,
    /// and unmodeled state keys survive.
    #[test]
    fn prop_date_range_renders_both_bounds(
        begin in instant_strategy(),
        end in instant_strategy(),
    ) {
        let descs = dashboard();
        let mut filters = build_default_values(&descs).filters;
        filters
            .apply(
                find_by_name(&descs, "Time Range").unwrap(),
                &FilterEdit::TimeRange(TimeRangeInput::Between { begin, end }),
            )
            .unwrap();

        let value = encoded(&filters, "NATIVE_FILTER-time");
        let range = format!("{} : {}", format_bound(&begin), format_bound(&end));
        prop_assert_eq!(&value["extraFormData"], &json!({ "time_range": range.clone() }));
        prop_assert_eq!(
            &value["filterState"],
            &json!({ "value": range, "validateStatus": false })
        );
    }

    /// Every grain round-trips through its ISO literal.
    #[test]
    fn prop_grain_literal_is_sent_verbatim(grain in grain_strategy()) {
        let descs = dashboard();
        let mut filters = build_default_values(&descs).filters;
        filters
            .apply(find_by_name(&descs, "Time Grain").unwrap(), &FilterEdit::TimeGrain(grain))
            .unwrap();

        let Some(FilterValue::TimeGrain(f)) = filters.get("NATIVE_FILTER-grain") else {
            panic!("expected a time grain value");
        };
        let literal = f.extra_form_data.time_grain_sqla.clone().into_value().unwrap();
        prop_assert_eq!(literal.parse::<TimeGrain>().unwrap(), grain);
        prop_assert_eq!(f.filter_state.value.as_value().map(String::as_str), Some(literal.as_str()));
    }
}
