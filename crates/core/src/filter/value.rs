//! Runtime filter values and their wire payloads.
//!
//! A value pairs a query-facing `extraFormData` payload with a UI-facing
//! `filterState` payload. Both are typed per kind, and both keep any keys the
//! engine does not model so that server-provided defaults survive untouched.

use filterlink_shared::FilterId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::filter::descriptor::{DataMask, FilterDescriptor};
use crate::filter::kind::FilterKind;
use crate::filter::numeric_range::NumericRangeEngine;
use crate::filter::select::SelectEngine;
use crate::filter::time_column::TimeColumnEngine;
use crate::filter::time_grain::TimeGrainEngine;
use crate::filter::time_range::TimeRangeEngine;

/// JSON object used for keys the engine passes through without reading.
pub type JsonMap = Map<String, Value>;

/// `[lower, upper]` bounds of a numeric range; `None` encodes as `null`.
pub type RangeValue = [Option<Number>; 2];

/// One modelled key of a wire payload.
///
/// A missing key and an explicit `null` stay distinct. A value of an
/// unexpected shape is held as raw JSON instead of failing the decode.
/// Either way the slot re-encodes exactly as it was read.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    /// Key not present. Never written.
    Absent,
    /// Key present with `null`.
    Null,
    /// Key present with a value of the modelled type.
    Value(T),
    /// Key present with a value the model does not fit.
    Raw(Value),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Slot<T> {
    /// Whether the key is missing.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Whether the key holds something other than `null`.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Value(_) | Self::Raw(_))
    }

    /// The typed value, if the key held one.
    #[must_use]
    pub const fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the slot, keeping only a typed value.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for Slot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Value(value) => value.serialize(serializer),
            Self::Raw(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Slot<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if raw.is_null() {
            return Ok(Self::Null);
        }
        match T::deserialize(&raw) {
            Ok(value) => Ok(Self::Value(value)),
            Err(_) => Ok(Self::Raw(raw)),
        }
    }
}

/// Reserved per-filter state. Always serialized as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnState {}

/// The state of one native filter, as uploaded to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeFilter<E, S> {
    /// Id of the descriptor this value belongs to.
    pub id: FilterId,
    /// Query-filtering instruction understood by the server.
    pub extra_form_data: E,
    /// UI-facing representation of the value.
    pub filter_state: S,
    /// Reserved, never populated.
    #[serde(default)]
    pub own_state: OwnState,
}

impl<E: Clone, S: Clone> NativeFilter<E, S> {
    /// Seeds a value from a descriptor's default data mask.
    ///
    /// The payloads are cloned, so later edits never reach the descriptor.
    #[must_use]
    pub fn from_mask(id: &FilterId, mask: &DataMask<E, S>) -> Self {
        Self {
            id: id.clone(),
            extra_form_data: mask.extra_form_data.clone(),
            filter_state: mask.filter_state.clone(),
            own_state: OwnState::default(),
        }
    }
}

impl<E, S> NativeFilter<E, S> {
    /// Builds a successor of `self` with both payloads replaced.
    #[must_use]
    pub fn replaced(&self, extra_form_data: E, filter_state: S) -> Self {
        Self {
            id: self.id.clone(),
            extra_form_data,
            filter_state,
            own_state: self.own_state,
        }
    }
}

/// Comparison operator of a column predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicateOp {
    /// Column value is one of `val`.
    #[serde(rename = "IN")]
    In,
    /// Column value is none of `val`.
    #[serde(rename = "NOT IN")]
    NotIn,
    /// Column value is at least `val`.
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// Column value is at most `val`.
    #[serde(rename = "<=")]
    LessOrEqual,
    /// Any other operator found in a server default.
    #[serde(untagged)]
    Other(String),
}

/// A column-scoped predicate inside `extraFormData.filters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Column name.
    pub col: String,
    /// Operator.
    pub op: PredicateOp,
    /// Operand: an option list for `IN`, a number for bounds.
    pub val: Value,
}

/// `extraFormData` of predicate-list kinds (select, numeric range).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredicateFormData {
    /// Predicates; absent in some server defaults.
    #[serde(default, skip_serializing_if = "Slot::is_absent")]
    pub filters: Slot<Vec<Predicate>>,
    /// Keys the engine does not model.
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl PredicateFormData {
    /// Canonical no-value form: `{ "filters": [] }`.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_filters(Vec::new())
    }

    /// Form data holding exactly `filters`.
    #[must_use]
    pub fn with_filters(filters: Vec<Predicate>) -> Self {
        Self {
            filters: Slot::Value(filters),
            extra: JsonMap::new(),
        }
    }

    fn has_value(&self) -> bool {
        match &self.filters {
            Slot::Value(filters) => !filters.is_empty(),
            Slot::Raw(raw) => raw.as_array().is_none_or(|filters| !filters.is_empty()),
            Slot::Absent | Slot::Null => false,
        }
    }
}

/// `extraFormData` of time range filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRangeFormData {
    /// `"<begin> : <end>"` or a preset label.
    #[serde(default, skip_serializing_if = "Slot::is_absent")]
    pub time_range: Slot<String>,
    /// Keys the engine does not model.
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// `extraFormData` of time grain filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeGrainFormData {
    /// ISO-8601 duration literal.
    #[serde(default, skip_serializing_if = "Slot::is_absent")]
    pub time_grain_sqla: Slot<String>,
    /// Keys the engine does not model.
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// `extraFormData` of time column filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeColumnFormData {
    /// Temporal column name.
    #[serde(default, skip_serializing_if = "Slot::is_absent")]
    pub granularity_sqla: Slot<String>,
    /// Keys the engine does not model.
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// `filterState` payload. `Default` is the no-value form `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: DeserializeOwned"))]
pub struct FilterState<T> {
    /// Current value as shown in the filter bar.
    #[serde(default, skip_serializing_if = "Slot::is_absent")]
    pub value: Slot<T>,
    /// Only meaningful when the select filter allows inverse selection.
    #[serde(default, skip_serializing_if = "Slot::is_absent")]
    pub exclude_filter_values: Slot<bool>,
    /// Keys the engine does not model (`label`, `validateStatus`, ...).
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl<T> Default for FilterState<T> {
    fn default() -> Self {
        Self {
            value: Slot::Absent,
            exclude_filter_values: Slot::Absent,
            extra: JsonMap::new(),
        }
    }
}

impl<T> FilterState<T> {
    /// State holding only `value`.
    #[must_use]
    pub fn of(value: T) -> Self {
        Self {
            value: Slot::Value(value),
            ..Self::default()
        }
    }

    /// Whether this is the no-value form `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_absent() && self.exclude_filter_values.is_absent() && self.extra.is_empty()
    }
}

/// Value of a select filter.
pub type SelectFilter = NativeFilter<PredicateFormData, FilterState<Vec<Value>>>;
/// Value of a numeric range filter.
pub type NumericRangeFilter = NativeFilter<PredicateFormData, FilterState<RangeValue>>;
/// Value of a time range filter.
pub type TimeRangeFilter = NativeFilter<TimeRangeFormData, FilterState<String>>;
/// Value of a time grain filter.
pub type TimeGrainFilter = NativeFilter<TimeGrainFormData, FilterState<String>>;
/// Value of a time column filter.
pub type TimeColumnFilter = NativeFilter<TimeColumnFormData, FilterState<Vec<String>>>;

/// A filter value of any recognized kind.
///
/// Serializes to the bare `{ id, extraFormData, filterState, ownState }`
/// object; the kind is not written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Select filter.
    Select(SelectFilter),
    /// Time range filter.
    TimeRange(TimeRangeFilter),
    /// Numeric range filter.
    NumericRange(NumericRangeFilter),
    /// Time grain filter.
    TimeGrain(TimeGrainFilter),
    /// Time column filter.
    TimeColumn(TimeColumnFilter),
}

impl FilterValue {
    /// Id of the filter.
    #[must_use]
    pub fn id(&self) -> &FilterId {
        match self {
            Self::Select(f) => &f.id,
            Self::TimeRange(f) => &f.id,
            Self::NumericRange(f) => &f.id,
            Self::TimeGrain(f) => &f.id,
            Self::TimeColumn(f) => &f.id,
        }
    }

    /// Kind of the filter.
    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::Select(_) => FilterKind::Select,
            Self::TimeRange(_) => FilterKind::TimeRange,
            Self::NumericRange(_) => FilterKind::NumericRange,
            Self::TimeGrain(_) => FilterKind::TimeGrain,
            Self::TimeColumn(_) => FilterKind::TimeColumn,
        }
    }

    /// Whether the value restricts the dashboard's queries.
    #[must_use]
    pub fn has_value(&self) -> bool {
        match self {
            Self::Select(f) => f.extra_form_data.has_value(),
            Self::NumericRange(f) => f.extra_form_data.has_value(),
            Self::TimeRange(f) => f.extra_form_data.time_range.is_present(),
            Self::TimeGrain(f) => f.extra_form_data.time_grain_sqla.is_present(),
            Self::TimeColumn(f) => f.extra_form_data.granularity_sqla.is_present(),
        }
    }

    /// Clears the value through its kind's `with_no_value`.
    #[must_use]
    pub fn with_no_value(&self, descriptor: &FilterDescriptor) -> Self {
        match self {
            Self::Select(f) => Self::Select(SelectEngine::with_no_value(descriptor, f)),
            Self::TimeRange(f) => Self::TimeRange(TimeRangeEngine::with_no_value(descriptor, f)),
            Self::NumericRange(f) => {
                Self::NumericRange(NumericRangeEngine::with_no_value(descriptor, f))
            }
            Self::TimeGrain(f) => Self::TimeGrain(TimeGrainEngine::with_no_value(descriptor, f)),
            Self::TimeColumn(f) => {
                Self::TimeColumn(TimeColumnEngine::with_no_value(descriptor, f))
            }
        }
    }
}
