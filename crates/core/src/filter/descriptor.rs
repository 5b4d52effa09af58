//! Server-issued native filter descriptors.

use filterlink_shared::FilterId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::filter::kind::FilterKind;
use crate::filter::value::{
    FilterState, JsonMap, PredicateFormData, RangeValue, TimeColumnFormData, TimeGrainFormData,
    TimeRangeFormData,
};

/// Charts and tabs a filter applies to. Carried through, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterScope {
    /// Layout path the scope is rooted at.
    #[serde(default)]
    pub root_path: Vec<String>,
    /// Chart ids excluded from the scope.
    #[serde(default)]
    pub excluded: Vec<Value>,
}

/// Column a filter targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetColumn {
    /// Column name.
    pub name: String,
}

/// One dataset column a filter is bound to.
///
/// Time grain and time column filters name only a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterTarget {
    /// Bound column, if any.
    #[serde(default)]
    pub column: Option<TargetColumn>,
    /// Dataset id.
    #[serde(default)]
    pub dataset_id: Option<i64>,
}

/// `defaultDataMask`: the value a filter starts with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMask<E, S> {
    /// Query-facing payload.
    #[serde(default)]
    pub extra_form_data: E,
    /// UI-facing payload.
    #[serde(default)]
    pub filter_state: S,
}

/// Control options of a select filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectControlValues {
    /// Users may type values that are not in the option list.
    pub creatable: bool,
    /// Preselect the first option.
    pub default_to_first_item: bool,
    /// See [`ControlValues::enable_empty_filter`].
    pub enable_empty_filter: bool,
    /// The filter bar offers an exclusion toggle.
    pub inverse_selection: bool,
    /// More than one option may be selected.
    pub multi_select: bool,
    /// Options are searched server-side.
    pub search_all_options: bool,
    /// Options the engine does not model.
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Control options shared by the non-select kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlValues {
    /// Server flag named "enable empty filter".
    ///
    /// Observed servers treat `true` as "a value is required", the opposite
    /// of what the name suggests. The engine never branches on it; confirm
    /// the polarity against the target server version before relying on it.
    pub enable_empty_filter: bool,
    /// Options the engine does not model.
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Kind-specific part of a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorKind {
    /// `filter_select`.
    Select {
        /// Control options.
        control_values: SelectControlValues,
        /// Initial value.
        default_data_mask: DataMask<PredicateFormData, FilterState<Vec<Value>>>,
    },
    /// `filter_time`.
    TimeRange {
        /// Control options.
        control_values: ControlValues,
        /// Initial value.
        default_data_mask: DataMask<TimeRangeFormData, FilterState<String>>,
    },
    /// `filter_range`.
    NumericRange {
        /// Control options.
        control_values: ControlValues,
        /// Initial value.
        default_data_mask: DataMask<PredicateFormData, FilterState<RangeValue>>,
    },
    /// `filter_timegrain`.
    TimeGrain {
        /// Control options.
        control_values: ControlValues,
        /// Initial value.
        default_data_mask: DataMask<TimeGrainFormData, FilterState<String>>,
    },
    /// `filter_timecolumn`.
    TimeColumn {
        /// Control options.
        control_values: ControlValues,
        /// Initial value.
        default_data_mask: DataMask<TimeColumnFormData, FilterState<Vec<String>>>,
    },
    /// A kind this engine does not know, or an entry without `filterType`
    /// (layout dividers).
    Unrecognized {
        /// The raw `filterType`, if any.
        filter_type: Option<String>,
    },
    /// A known kind whose `defaultDataMask` is not a pair of JSON objects.
    ///
    /// Such a filter cannot be seeded; the rest of the dashboard still is.
    Malformed {
        /// Declared kind.
        kind: FilterKind,
        /// Decoder message.
        reason: String,
    },
}

impl DescriptorKind {
    /// Returns the filter kind, or `None` for entries that cannot be seeded.
    #[must_use]
    pub const fn kind(&self) -> Option<FilterKind> {
        match self {
            Self::Select { .. } => Some(FilterKind::Select),
            Self::TimeRange { .. } => Some(FilterKind::TimeRange),
            Self::NumericRange { .. } => Some(FilterKind::NumericRange),
            Self::TimeGrain { .. } => Some(FilterKind::TimeGrain),
            Self::TimeColumn { .. } => Some(FilterKind::TimeColumn),
            Self::Unrecognized { .. } | Self::Malformed { .. } => None,
        }
    }
}

/// Immutable definition of one native filter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawDescriptor")]
pub struct FilterDescriptor {
    /// Unique id within the dashboard.
    pub id: FilterId,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Charts and tabs affected.
    pub scope: FilterScope,
    /// Resolved chart ids in scope.
    pub charts_in_scope: Vec<i64>,
    /// Resolved tab ids in scope.
    pub tabs_in_scope: Vec<String>,
    /// Filters this one depends on. Cascades are resolved server-side.
    pub cascade_parent_ids: Vec<FilterId>,
    /// Bound dataset columns, in server order.
    pub targets: Vec<FilterTarget>,
    /// Kind-specific options and default value.
    pub kind: DescriptorKind,
}

impl FilterDescriptor {
    /// Name of the first target column.
    ///
    /// Predicates are always built against this column only; additional
    /// targets are ignored.
    #[must_use]
    pub fn target_column(&self) -> Option<&str> {
        self.targets
            .first()
            .and_then(|target| target.column.as_ref())
            .map(|column| column.name.as_str())
    }

    /// Kind of the filter, `None` when unrecognized or malformed.
    #[must_use]
    pub const fn filter_kind(&self) -> Option<FilterKind> {
        self.kind.kind()
    }
}

/// Finds a descriptor by display name.
#[must_use]
pub fn find_by_name<'a>(
    descriptors: &'a [FilterDescriptor],
    name: &str,
) -> Option<&'a FilterDescriptor> {
    descriptors.iter().find(|desc| desc.name == name)
}

/// Decoded `json_metadata` of a dashboard resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardMetadata {
    /// The dashboard's native filter descriptors.
    #[serde(default)]
    pub native_filter_configuration: Vec<FilterDescriptor>,
}

impl DashboardMetadata {
    /// Decodes the JSON string the server stores as dashboard metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not JSON or an entry lacks an `id`.
    /// Payloads of individual descriptors never fail the decode.
    pub fn from_json_str(json_metadata: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_metadata)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    id: FilterId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    filter_type: Option<String>,
    #[serde(default)]
    scope: FilterScope,
    #[serde(default)]
    charts_in_scope: Vec<i64>,
    #[serde(default)]
    tabs_in_scope: Vec<String>,
    #[serde(default)]
    cascade_parent_ids: Vec<FilterId>,
    #[serde(default)]
    targets: Vec<FilterTarget>,
    #[serde(default)]
    control_values: Value,
    #[serde(default)]
    default_data_mask: Value,
}

/// Decodes `value`, treating `null` or a missing field as the default.
fn decode_or_default<T: DeserializeOwned + Default>(value: Value) -> Result<T, serde_json::Error> {
    if value.is_null() {
        Ok(T::default())
    } else {
        serde_json::from_value(value)
    }
}

/// Decodes control values. Unreadable ones fall back to the defaults.
fn decode_controls<T: DeserializeOwned + Default>(id: &FilterId, value: Value) -> T {
    decode_or_default(value).unwrap_or_else(|e| {
        warn!(filter_id = %id, error = %e, "Ignoring unreadable control values");
        T::default()
    })
}

/// Decodes the kind-specific payloads of a recognized descriptor.
///
/// Only a mask that is not made of JSON objects fails; value slots of an
/// unexpected shape are kept raw.
fn decode_kind(
    kind: FilterKind,
    id: &FilterId,
    controls: Value,
    mask: Value,
) -> Result<DescriptorKind, serde_json::Error> {
    let kind = match kind {
        FilterKind::Select => DescriptorKind::Select {
            control_values: decode_controls(id, controls),
            default_data_mask: decode_or_default(mask)?,
        },
        FilterKind::TimeRange => DescriptorKind::TimeRange {
            control_values: decode_controls(id, controls),
            default_data_mask: decode_or_default(mask)?,
        },
        FilterKind::NumericRange => DescriptorKind::NumericRange {
            control_values: decode_controls(id, controls),
            default_data_mask: decode_or_default(mask)?,
        },
        FilterKind::TimeGrain => DescriptorKind::TimeGrain {
            control_values: decode_controls(id, controls),
            default_data_mask: decode_or_default(mask)?,
        },
        FilterKind::TimeColumn => DescriptorKind::TimeColumn {
            control_values: decode_controls(id, controls),
            default_data_mask: decode_or_default(mask)?,
        },
    };
    Ok(kind)
}

impl From<RawDescriptor> for FilterDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        let recognized = raw
            .filter_type
            .as_deref()
            .and_then(|name| name.parse::<FilterKind>().ok());

        let kind = match recognized {
            Some(kind) => {
                decode_kind(kind, &raw.id, raw.control_values, raw.default_data_mask)
                    .unwrap_or_else(|e| DescriptorKind::Malformed {
                        kind,
                        reason: e.to_string(),
                    })
            }
            None => DescriptorKind::Unrecognized {
                filter_type: raw.filter_type,
            },
        };

        Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            scope: raw.scope,
            charts_in_scope: raw.charts_in_scope,
            tabs_in_scope: raw.tabs_in_scope,
            cascade_parent_ids: raw.cascade_parent_ids,
            targets: raw.targets,
            kind,
        }
    }
}
