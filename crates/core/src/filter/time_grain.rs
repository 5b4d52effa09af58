//! Time grain filter transitions.

use crate::filter::descriptor::FilterDescriptor;
use crate::filter::error::FilterError;
use crate::filter::value::{FilterState, Slot, TimeGrainFilter, TimeGrainFormData};

/// Time grains known to the dashboard server, as ISO-8601 durations.
///
/// The week variants anchored to a weekday are intervals with a fixed epoch
/// week boundary rather than plain durations.
///
/// Some server grain tables also list the literal `seconD` labelled
/// "Second". It is not an ISO-8601 duration and duplicates [`PT1S`], so it
/// has no variant here and does not parse.
///
/// [`PT1S`]: TimeGrain::Second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeGrain {
    /// `PT1S`
    Second,
    /// `PT5S`
    FiveSeconds,
    /// `PT30S`
    ThirtySeconds,
    /// `PT1M`
    Minute,
    /// `PT5M`
    FiveMinutes,
    /// `PT10M`
    TenMinutes,
    /// `PT15M`
    FifteenMinutes,
    /// `PT30M`
    ThirtyMinutes,
    /// `PT0.5H`
    HalfHour,
    /// `PT1H`
    Hour,
    /// `PT6H`
    SixHours,
    /// `P1D`
    Day,
    /// `P1W`
    Week,
    /// `1969-12-28T00:00:00Z/P1W`
    WeekStartingSunday,
    /// `1969-12-29T00:00:00Z/P1W`
    WeekStartingMonday,
    /// `P1W/1970-01-03T00:00:00Z`
    WeekEndingSaturday,
    /// `P1W/1970-01-04T00:00:00Z`
    WeekEndingSunday,
    /// `P1M`
    Month,
    /// `P3M`
    Quarter,
    /// `P0.25Y`
    QuarterYear,
    /// `P1Y`
    Year,
}

impl TimeGrain {
    /// Every grain.
    pub const ALL: [Self; 21] = [
        Self::Second,
        Self::FiveSeconds,
        Self::ThirtySeconds,
        Self::Minute,
        Self::FiveMinutes,
        Self::TenMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::HalfHour,
        Self::Hour,
        Self::SixHours,
        Self::Day,
        Self::Week,
        Self::WeekStartingSunday,
        Self::WeekStartingMonday,
        Self::WeekEndingSaturday,
        Self::WeekEndingSunday,
        Self::Month,
        Self::Quarter,
        Self::QuarterYear,
        Self::Year,
    ];

    /// ISO-8601 literal sent as `time_grain_sqla`.
    #[must_use]
    pub const fn as_iso(self) -> &'static str {
        match self {
            Self::Second => "PT1S",
            Self::FiveSeconds => "PT5S",
            Self::ThirtySeconds => "PT30S",
            Self::Minute => "PT1M",
            Self::FiveMinutes => "PT5M",
            Self::TenMinutes => "PT10M",
            Self::FifteenMinutes => "PT15M",
            Self::ThirtyMinutes => "PT30M",
            Self::HalfHour => "PT0.5H",
            Self::Hour => "PT1H",
            Self::SixHours => "PT6H",
            Self::Day => "P1D",
            Self::Week => "P1W",
            Self::WeekStartingSunday => "1969-12-28T00:00:00Z/P1W",
            Self::WeekStartingMonday => "1969-12-29T00:00:00Z/P1W",
            Self::WeekEndingSaturday => "P1W/1970-01-03T00:00:00Z",
            Self::WeekEndingSunday => "P1W/1970-01-04T00:00:00Z",
            Self::Month => "P1M",
            Self::Quarter => "P3M",
            Self::QuarterYear => "P0.25Y",
            Self::Year => "P1Y",
        }
    }

    /// snake_case name, accepted by `FromStr` alongside the ISO literal.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::FiveSeconds => "five_seconds",
            Self::ThirtySeconds => "thirty_seconds",
            Self::Minute => "minute",
            Self::FiveMinutes => "five_minutes",
            Self::TenMinutes => "ten_minutes",
            Self::FifteenMinutes => "fifteen_minutes",
            Self::ThirtyMinutes => "thirty_minutes",
            Self::HalfHour => "half_hour",
            Self::Hour => "hour",
            Self::SixHours => "six_hours",
            Self::Day => "day",
            Self::Week => "week",
            Self::WeekStartingSunday => "week_starting_sunday",
            Self::WeekStartingMonday => "week_starting_monday",
            Self::WeekEndingSaturday => "week_ending_saturday",
            Self::WeekEndingSunday => "week_ending_sunday",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::QuarterYear => "quarter_year",
            Self::Year => "year",
        }
    }
}

impl std::fmt::Display for TimeGrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_iso())
    }
}

impl std::str::FromStr for TimeGrain {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|grain| grain.as_iso() == s || grain.name() == s)
            .ok_or_else(|| FilterError::UnknownTimeGrain(s.to_string()))
    }
}

/// Stateless transitions for time grain filters.
pub struct TimeGrainEngine;

impl TimeGrainEngine {
    /// Sets the grain.
    #[must_use]
    pub fn with_value(
        descriptor: &FilterDescriptor,
        current: &TimeGrainFilter,
        grain: TimeGrain,
    ) -> TimeGrainFilter {
        debug_assert_eq!(descriptor.id, current.id);
        let literal = grain.as_iso().to_string();
        current.replaced(
            TimeGrainFormData {
                time_grain_sqla: Slot::Value(literal.clone()),
                ..TimeGrainFormData::default()
            },
            FilterState::of(literal),
        )
    }

    /// Falls back to each chart's own grain.
    #[must_use]
    pub fn with_no_value(descriptor: &FilterDescriptor, current: &TimeGrainFilter) -> TimeGrainFilter {
        debug_assert_eq!(descriptor.id, current.id);
        current.replaced(TimeGrainFormData::default(), FilterState::default())
    }
}
