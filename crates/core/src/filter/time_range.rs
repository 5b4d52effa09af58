//! Time range filter transitions.
//!
//! A time range is either an explicit `[begin, end)` pair rendered as
//! `"YYYY-MM-DDTHH:MM:SS.mmm : YYYY-MM-DDTHH:MM:SS.mmm"` in UTC, or one of the
//! server's named relative ranges. The same string is sent as
//! `extraFormData.time_range` and shown as `filterState.value`.

use chrono::{DateTime, Utc};

use crate::filter::descriptor::FilterDescriptor;
use crate::filter::error::FilterError;
use crate::filter::value::{FilterState, Slot, TimeRangeFilter, TimeRangeFormData};

/// Named relative ranges understood by the dashboard server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRangePreset {
    /// `Last day`.
    LastDay,
    /// `Last week`.
    LastWeek,
    /// `Last month`.
    LastMonth,
    /// `Last quarter`.
    LastQuarter,
    /// `Last year`.
    LastYear,
    /// `previous calendar week`.
    PreviousCalendarWeek,
    /// `previous calendar month`.
    PreviousCalendarMonth,
    /// `previous calendar quarter`.
    PreviousCalendarQuarter,
    /// `previous calendar year`.
    PreviousCalendarYear,
    /// `Current day`.
    CurrentDay,
    /// `Current week`.
    CurrentWeek,
    /// `Current month`.
    CurrentMonth,
    /// `Current year`.
    CurrentYear,
    /// `Current quarter`.
    CurrentQuarter,
}

impl TimeRangePreset {
    /// Every preset.
    pub const ALL: [Self; 14] = [
        Self::LastDay,
        Self::LastWeek,
        Self::LastMonth,
        Self::LastQuarter,
        Self::LastYear,
        Self::PreviousCalendarWeek,
        Self::PreviousCalendarMonth,
        Self::PreviousCalendarQuarter,
        Self::PreviousCalendarYear,
        Self::CurrentDay,
        Self::CurrentWeek,
        Self::CurrentMonth,
        Self::CurrentYear,
        Self::CurrentQuarter,
    ];

    /// Label the server expects, case included.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LastDay => "Last day",
            Self::LastWeek => "Last week",
            Self::LastMonth => "Last month",
            Self::LastQuarter => "Last quarter",
            Self::LastYear => "Last year",
            Self::PreviousCalendarWeek => "previous calendar week",
            Self::PreviousCalendarMonth => "previous calendar month",
            Self::PreviousCalendarQuarter => "previous calendar quarter",
            Self::PreviousCalendarYear => "previous calendar year",
            Self::CurrentDay => "Current day",
            Self::CurrentWeek => "Current week",
            Self::CurrentMonth => "Current month",
            Self::CurrentYear => "Current year",
            Self::CurrentQuarter => "Current quarter",
        }
    }
}

impl std::fmt::Display for TimeRangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TimeRangePreset {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.label() == s)
            .ok_or_else(|| FilterError::UnknownTimePreset(s.to_string()))
    }
}

/// New value for a time range filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeRangeInput {
    /// A named relative range.
    Preset(TimeRangePreset),
    /// Explicit bounds; `end` is exclusive.
    Between {
        /// Start, inclusive.
        begin: DateTime<Utc>,
        /// End, exclusive.
        end: DateTime<Utc>,
    },
}

/// Renders an instant the way the server parses explicit bounds: UTC,
/// millisecond precision, no zone designator.
#[must_use]
pub fn format_bound(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

/// Renders `[begin, end)` as a server time range string.
///
/// The end bound is encoded exactly like the begin bound; the server treats
/// it as exclusive.
#[must_use]
pub fn format_range(begin: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    format!("{} : {}", format_bound(begin), format_bound(end))
}

/// Stateless transitions for time range filters.
pub struct TimeRangeEngine;

impl TimeRangeEngine {
    /// Applies either form of [`TimeRangeInput`].
    #[must_use]
    pub fn with_value(
        descriptor: &FilterDescriptor,
        current: &TimeRangeFilter,
        input: &TimeRangeInput,
    ) -> TimeRangeFilter {
        match input {
            TimeRangeInput::Preset(preset) => Self::with_preset(descriptor, current, *preset),
            TimeRangeInput::Between { begin, end } => {
                Self::with_date_range(descriptor, current, begin, end)
            }
        }
    }

    /// Sets a named relative range. Replaces the whole filter state.
    #[must_use]
    pub fn with_preset(
        descriptor: &FilterDescriptor,
        current: &TimeRangeFilter,
        preset: TimeRangePreset,
    ) -> TimeRangeFilter {
        debug_assert_eq!(descriptor.id, current.id);
        let range = preset.label().to_string();
        current.replaced(
            TimeRangeFormData {
                time_range: Slot::Value(range.clone()),
                ..TimeRangeFormData::default()
            },
            FilterState::of(range),
        )
    }

    /// Sets explicit `[begin, end)` bounds.
    ///
    /// Keys of the current filter state the engine does not model are kept;
    /// `value` is overwritten.
    #[must_use]
    pub fn with_date_range(
        descriptor: &FilterDescriptor,
        current: &TimeRangeFilter,
        begin: &DateTime<Utc>,
        end: &DateTime<Utc>,
    ) -> TimeRangeFilter {
        debug_assert_eq!(descriptor.id, current.id);
        let range = format_range(begin, end);
        let filter_state = FilterState {
            value: Slot::Value(range.clone()),
            exclude_filter_values: Slot::Absent,
            extra: current.filter_state.extra.clone(),
        };
        current.replaced(
            TimeRangeFormData {
                time_range: Slot::Value(range),
                ..TimeRangeFormData::default()
            },
            filter_state,
        )
    }

    /// Removes the time restriction.
    #[must_use]
    pub fn with_no_value(descriptor: &FilterDescriptor, current: &TimeRangeFilter) -> TimeRangeFilter {
        debug_assert_eq!(descriptor.id, current.id);
        current.replaced(TimeRangeFormData::default(), FilterState::default())
    }
}
