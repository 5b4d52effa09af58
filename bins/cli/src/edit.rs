//! Conversion of configured edits into engine edits.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use filterlink_core::filter::{FilterEdit, RangeBounds, TimeGrain, TimeRangeInput, TimeRangePreset};
use filterlink_shared::config::EditConfig;

/// Parses the string fields of a configured edit.
pub fn to_filter_edit(config: &EditConfig) -> Result<FilterEdit> {
    let edit = match config {
        EditConfig::Select { values } => FilterEdit::Select(values.clone()),
        EditConfig::NumericRange { min, max } => {
            FilterEdit::NumericRange(RangeBounds::from_f64(*min, *max))
        }
        EditConfig::TimeRange { begin, end } => FilterEdit::TimeRange(TimeRangeInput::Between {
            begin: parse_instant(begin)?,
            end: parse_instant(end)?,
        }),
        EditConfig::TimePreset { preset } => {
            FilterEdit::TimeRange(TimeRangeInput::Preset(preset.parse::<TimeRangePreset>()?))
        }
        EditConfig::TimeGrain { grain } => FilterEdit::TimeGrain(grain.parse::<TimeGrain>()?),
        EditConfig::TimeColumn { column } => FilterEdit::TimeColumn(column.clone()),
        EditConfig::Clear => FilterEdit::Clear,
    };
    Ok(edit)
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .with_context(|| format!("'{raw}' is not an RFC 3339 timestamp"))
}
