//! Native filter kinds.

use serde::{Deserialize, Serialize};

use crate::filter::error::FilterError;

/// Kind of a native filter, as carried in the descriptor's `filterType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    /// Value picker over a column's distinct values.
    #[serde(rename = "filter_select")]
    Select,
    /// Time range, explicit or relative.
    #[serde(rename = "filter_time")]
    TimeRange,
    /// Numeric range with inclusive bounds.
    #[serde(rename = "filter_range")]
    NumericRange,
    /// Time grain used to bucket temporal columns.
    #[serde(rename = "filter_timegrain")]
    TimeGrain,
    /// Temporal column used as the time axis.
    #[serde(rename = "filter_timecolumn")]
    TimeColumn,
}

impl FilterKind {
    /// All kinds the engine understands.
    pub const ALL: [Self; 5] = [
        Self::Select,
        Self::TimeRange,
        Self::NumericRange,
        Self::TimeGrain,
        Self::TimeColumn,
    ];

    /// Returns the wire name used in `filterType`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "filter_select",
            Self::TimeRange => "filter_time",
            Self::NumericRange => "filter_range",
            Self::TimeGrain => "filter_timegrain",
            Self::TimeColumn => "filter_timecolumn",
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FilterError::UnrecognizedKind(s.to_string()))
    }
}
