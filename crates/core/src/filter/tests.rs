//! Tests across descriptors, default construction, and the value mapping.

use serde_json::{Value, json};

use filterlink_shared::FilterId;

use super::*;

/// A dashboard configuration in the shape the server stores it.
fn sample_metadata() -> Value {
    json!({
        "native_filter_configuration": [
            {
                "id": "NATIVE_FILTER-country",
                "name": "Country",
                "filterType": "filter_select",
                "type": "NATIVE_FILTER",
                "targets": [{ "column": { "name": "country" }, "datasetId": 1 }],
                "controlValues": { "multiSelect": true, "enableEmptyFilter": false },
                "defaultDataMask": {
                    "extraFormData": {
                        "filters": [{ "col": "country", "op": "IN", "val": ["France"] }]
                    },
                    "filterState": { "value": ["France"], "label": "France" },
                    "ownState": {}
                }
            },
            {
                "id": "NATIVE_FILTER_DIVIDER-1",
                "type": "DIVIDER",
                "title": "Dates",
                "description": ""
            },
            {
                "id": "NATIVE_FILTER-time",
                "name": "Time Range",
                "filterType": "filter_time",
                "targets": [{}],
                "defaultDataMask": {
                    "extraFormData": { "time_range": "Last week" },
                    "filterState": { "value": "Last week" }
                }
            },
            {
                "id": "NATIVE_FILTER-qty",
                "name": "Order Quantity",
                "filterType": "filter_range",
                "targets": [{ "column": { "name": "quantity_ordered" }, "datasetId": 1 }],
                "defaultDataMask": {
                    "extraFormData": {
                        "filters": [
                            { "col": "quantity_ordered", "op": ">=", "val": 10 },
                            { "col": "quantity_ordered", "op": "<=", "val": 50 }
                        ]
                    },
                    "filterState": { "value": [10, 50] }
                }
            },
            {
                "id": "NATIVE_FILTER-grain",
                "name": "Time Grain",
                "filterType": "filter_timegrain",
                "targets": [{ "datasetId": 1 }],
                "defaultDataMask": {
                    "extraFormData": { "time_grain_sqla": "P1D" },
                    "filterState": { "label": "Day", "value": ["P1D"] }
                }
            },
            {
                "id": "NATIVE_FILTER-future",
                "name": "Future",
                "filterType": "filter_geo",
                "targets": [{ "column": { "name": "region" }, "datasetId": 1 }]
            },
            {
                "id": "NATIVE_FILTER-col",
                "name": "Time Column",
                "filterType": "filter_timecolumn",
                "targets": [{ "datasetId": 1 }],
                "defaultDataMask": { "extraFormData": {}, "filterState": { "value": null } }
            }
        ]
    })
}

fn sample_descriptors() -> Vec<FilterDescriptor> {
    let metadata = DashboardMetadata::from_json_str(&sample_metadata().to_string()).unwrap();
    metadata.native_filter_configuration
}

fn descriptor<'a>(descs: &'a [FilterDescriptor], name: &str) -> &'a FilterDescriptor {
    find_by_name(descs, name).unwrap()
}

#[test]
fn test_defaults_deep_equal_descriptor_masks() {
    let raw = sample_metadata();
    let descs = sample_descriptors();
    let defaults = build_default_values(&descs);

    for entry in raw["native_filter_configuration"].as_array().unwrap() {
        let id = entry["id"].as_str().unwrap();
        let Some(value) = defaults.filters.get(id) else {
            continue;
        };
        let encoded = serde_json::to_value(value).unwrap();
        assert_eq!(encoded["id"], json!(id));
        assert_eq!(
            encoded["extraFormData"],
            entry["defaultDataMask"]["extraFormData"],
            "{id}"
        );
        assert_eq!(
            encoded["filterState"],
            entry["defaultDataMask"]["filterState"],
            "{id}"
        );
        assert_eq!(encoded["ownState"], json!({}));
    }
}

#[test]
fn test_unrecognized_kinds_are_skipped_not_fatal() {
    let descs = sample_descriptors();
    let defaults = build_default_values(&descs);

    assert_eq!(defaults.filters.len(), 5);
    assert!(defaults.filters.get("NATIVE_FILTER_DIVIDER-1").is_none());
    assert!(defaults.filters.get("NATIVE_FILTER-future").is_none());

    let skipped: Vec<_> = defaults.skipped.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(skipped, ["NATIVE_FILTER_DIVIDER-1", "NATIVE_FILTER-future"]);
    assert_eq!(defaults.skipped[1].filter_type.as_deref(), Some("filter_geo"));
    assert_eq!(defaults.skipped[1].reason, SkipReason::UnrecognizedKind);
    assert_eq!(
        defaults.skipped[1].to_string(),
        "NATIVE_FILTER-future (Future): unrecognized filter kind 'filter_geo'"
    );

    let only_known: Vec<_> = descs
        .iter()
        .filter(|d| d.filter_kind().is_some())
        .cloned()
        .collect();
    assert_eq!(build_default_values(&only_known).filters, defaults.filters);
}

#[test]
fn test_malformed_default_is_skipped_with_reason() {
    let mut raw = sample_metadata();
    raw["native_filter_configuration"]
        .as_array_mut()
        .unwrap()
        .push(json!({
            "id": "NATIVE_FILTER-bad",
            "name": "Broken",
            "filterType": "filter_select",
            "defaultDataMask": { "filterState": "France" }
        }));
    let descs = DashboardMetadata::from_json_str(&raw.to_string())
        .unwrap()
        .native_filter_configuration;
    let defaults = build_default_values(&descs);

    assert_eq!(defaults.filters.len(), 5);
    let skipped = defaults.skipped.last().unwrap();
    assert_eq!(skipped.id, FilterId::new("NATIVE_FILTER-bad"));
    assert_eq!(skipped.filter_type.as_deref(), Some("filter_select"));
    assert!(matches!(skipped.reason, SkipReason::MalformedDefault(_)));
    assert!(
        skipped
            .to_string()
            .starts_with("NATIVE_FILTER-bad (Broken): unreadable default value: ")
    );
}

#[test]
fn test_seeded_defaults_with_raw_slots_still_edit() {
    let descs = sample_descriptors();
    let mut filters = build_default_values(&descs).filters;
    let grain = descriptor(&descs, "Time Grain");

    let seeded = serde_json::to_value(filters.get(grain.id.as_str()).unwrap()).unwrap();
    assert_eq!(seeded["filterState"]["value"], json!(["P1D"]));

    filters
        .apply(grain, &FilterEdit::TimeGrain(TimeGrain::Week))
        .unwrap();
    let edited = serde_json::to_value(filters.get(grain.id.as_str()).unwrap()).unwrap();
    assert_eq!(edited["extraFormData"], json!({ "time_grain_sqla": "P1W" }));
    assert_eq!(edited["filterState"], json!({ "value": "P1W" }));
}

#[test]
fn test_edits_never_reach_the_descriptor() {
    let descs = sample_descriptors();
    let before = descs.clone();
    let mut filters = build_default_values(&descs).filters;

    let country = descriptor(&descs, "Country");
    filters
        .apply(country, &FilterEdit::Select(vec!["Japan".into()]))
        .unwrap();
    let qty = descriptor(&descs, "Order Quantity");
    filters.apply(qty, &FilterEdit::Clear).unwrap();

    assert_eq!(descs, before);
    assert_eq!(build_default_values(&descs).filters.len(), filters.len());
    assert_ne!(build_default_values(&descs).filters, filters);
}

#[test]
fn test_apply_replaces_only_the_target_entry() {
    let descs = sample_descriptors();
    let defaults = build_default_values(&descs).filters;
    let mut filters = defaults.clone();

    let grain = descriptor(&descs, "Time Grain");
    filters
        .apply(grain, &FilterEdit::TimeGrain(TimeGrain::Month))
        .unwrap();

    for value in defaults.values() {
        if value.id() == &grain.id {
            assert_ne!(filters.get(value.id().as_str()), Some(value));
        } else {
            assert_eq!(filters.get(value.id().as_str()), Some(value));
        }
    }
    assert!(filters.get(grain.id.as_str()).unwrap().has_value());
}

#[test]
fn test_kind_mismatch_leaves_mapping_unchanged() {
    let descs = sample_descriptors();
    let mut filters = build_default_values(&descs).filters;
    let before = filters.clone();

    let country = descriptor(&descs, "Country");
    let err = filters
        .apply(country, &FilterEdit::TimeColumn("order_date".into()))
        .unwrap_err();

    assert_eq!(
        err,
        FilterError::KindMismatch {
            filter_id: country.id.clone(),
            actual: FilterKind::Select,
            requested: FilterKind::TimeColumn,
        }
    );
    assert_eq!(filters, before);
}

#[test]
fn test_apply_to_unseeded_filter_fails() {
    let descs = sample_descriptors();
    let mut filters = FilterValueMapping::new();

    let err = filters
        .apply(descriptor(&descs, "Country"), &FilterEdit::Clear)
        .unwrap_err();
    assert_eq!(
        err,
        FilterError::UnknownFilter("NATIVE_FILTER-country".into())
    );
}

#[test]
fn test_clear_uses_each_kinds_empty_shape() {
    let descs = sample_descriptors();
    let mut filters = build_default_values(&descs).filters;

    for name in ["Country", "Time Range", "Order Quantity", "Time Grain", "Time Column"] {
        filters.apply(descriptor(&descs, name), &FilterEdit::Clear).unwrap();
    }

    let encoded = serde_json::to_value(&filters).unwrap();
    assert_eq!(encoded["NATIVE_FILTER-country"]["extraFormData"], json!({ "filters": [] }));
    assert_eq!(encoded["NATIVE_FILTER-qty"]["extraFormData"], json!({ "filters": [] }));
    assert_eq!(encoded["NATIVE_FILTER-time"]["extraFormData"], json!({}));
    assert_eq!(encoded["NATIVE_FILTER-grain"]["extraFormData"], json!({}));
    assert_eq!(encoded["NATIVE_FILTER-col"]["extraFormData"], json!({}));
    for value in filters.values() {
        assert!(!value.has_value());
        assert_eq!(encoded[value.id().as_str()]["filterState"], json!({}));
    }
}

#[test]
fn test_upload_string_is_json_of_the_mapping() {
    let descs = sample_descriptors();
    let mut filters = build_default_values(&descs).filters;
    filters
        .apply(
            descriptor(&descs, "Order Quantity"),
            &FilterEdit::NumericRange(RangeBounds::between(30, 40)),
        )
        .unwrap();

    let encoded = filters.to_json_string().unwrap();
    let decoded: Value = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded, serde_json::to_value(&filters).unwrap());
    assert_eq!(
        decoded["NATIVE_FILTER-qty"]["filterState"]["value"],
        json!([30, 40])
    );
    assert_eq!(decoded.as_object().unwrap().len(), 5);
}
