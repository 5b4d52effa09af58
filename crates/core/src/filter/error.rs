//! Filter engine error types.

use filterlink_shared::{AppError, FilterId};
use thiserror::Error;

use crate::filter::kind::FilterKind;

/// Errors raised when an edit cannot be applied to a filter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The descriptor has no target column to build a predicate against.
    #[error("Filter {filter_id} has no target column")]
    MissingTarget {
        /// The filter that was edited.
        filter_id: FilterId,
    },

    /// The edit belongs to a different filter kind than the filter's value.
    #[error("Filter {filter_id} is a {actual} filter, cannot apply a {requested} edit")]
    KindMismatch {
        /// The filter that was edited.
        filter_id: FilterId,
        /// Kind of the filter's current value.
        actual: FilterKind,
        /// Kind the edit was written for.
        requested: FilterKind,
    },

    /// The mapping holds no value for this filter.
    #[error("No value for filter {0}")]
    UnknownFilter(FilterId),

    /// A `filterType` string the engine does not understand.
    #[error("Unrecognized filter kind '{0}'")]
    UnrecognizedKind(String),

    /// A relative time range label outside the known presets.
    #[error("Unknown time range preset '{0}'")]
    UnknownTimePreset(String),

    /// A time grain outside the known enumeration.
    #[error("Unknown time grain '{0}'")]
    UnknownTimeGrain(String),
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        Self::Filter(err.to_string())
    }
}
