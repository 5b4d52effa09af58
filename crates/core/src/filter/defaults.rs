//! Seeding filter values from descriptors.

use filterlink_shared::FilterId;
use tracing::warn;

use crate::filter::descriptor::{DescriptorKind, FilterDescriptor};
use crate::filter::mapping::FilterValueMapping;
use crate::filter::value::{FilterValue, NativeFilter};

/// Why a descriptor was not seeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Missing or unknown `filterType`.
    UnrecognizedKind,
    /// Known kind with an undecodable `defaultDataMask`.
    MalformedDefault(String),
}

/// A descriptor left out of the default mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFilter {
    /// Descriptor id.
    pub id: FilterId,
    /// Descriptor name.
    pub name: String,
    /// Raw `filterType`, if the entry had one.
    pub filter_type: Option<String>,
    /// Why it was skipped.
    pub reason: SkipReason,
}

impl std::fmt::Display for SkippedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): ", self.id, self.name)?;
        match (&self.reason, &self.filter_type) {
            (SkipReason::MalformedDefault(reason), _) => {
                write!(f, "unreadable default value: {reason}")
            }
            (SkipReason::UnrecognizedKind, Some(kind)) => {
                write!(f, "unrecognized filter kind '{kind}'")
            }
            (SkipReason::UnrecognizedKind, None) => f.write_str("no filter kind"),
        }
    }
}

/// Result of [`build_default_values`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultValues {
    /// One value per recognized descriptor.
    pub filters: FilterValueMapping,
    /// Descriptors that were not seeded.
    pub skipped: Vec<SkippedFilter>,
}

/// Seeds the value of one descriptor from its default data mask.
///
/// Returns `None` for unrecognized kinds and malformed defaults.
#[must_use]
pub fn default_value(descriptor: &FilterDescriptor) -> Option<FilterValue> {
    let id = &descriptor.id;
    let value = match &descriptor.kind {
        DescriptorKind::Select {
            default_data_mask, ..
        } => FilterValue::Select(NativeFilter::from_mask(id, default_data_mask)),
        DescriptorKind::TimeRange {
            default_data_mask, ..
        } => FilterValue::TimeRange(NativeFilter::from_mask(id, default_data_mask)),
        DescriptorKind::NumericRange {
            default_data_mask, ..
        } => FilterValue::NumericRange(NativeFilter::from_mask(id, default_data_mask)),
        DescriptorKind::TimeGrain {
            default_data_mask, ..
        } => FilterValue::TimeGrain(NativeFilter::from_mask(id, default_data_mask)),
        DescriptorKind::TimeColumn {
            default_data_mask, ..
        } => FilterValue::TimeColumn(NativeFilter::from_mask(id, default_data_mask)),
        DescriptorKind::Unrecognized { .. } | DescriptorKind::Malformed { .. } => return None,
    };
    Some(value)
}

/// Builds the initial value mapping of a dashboard.
///
/// Descriptors of unrecognized kinds or with malformed defaults are skipped
/// and reported; they never fail the build.
#[must_use]
pub fn build_default_values(descriptors: &[FilterDescriptor]) -> DefaultValues {
    let mut result = DefaultValues::default();

    for descriptor in descriptors {
        if let Some(value) = default_value(descriptor) {
            result.filters.insert(value);
            continue;
        }

        let (filter_type, reason) = match &descriptor.kind {
            DescriptorKind::Unrecognized { filter_type } => {
                warn!(
                    filter_id = %descriptor.id,
                    filter_type = filter_type.as_deref().unwrap_or("<none>"),
                    "Skipping native filter of unrecognized kind"
                );
                (filter_type.clone(), SkipReason::UnrecognizedKind)
            }
            DescriptorKind::Malformed { kind, reason } => {
                warn!(
                    filter_id = %descriptor.id,
                    filter_type = %kind,
                    error = %reason,
                    "Skipping native filter with malformed default"
                );
                (
                    Some(kind.to_string()),
                    SkipReason::MalformedDefault(reason.clone()),
                )
            }
            _ => continue,
        };
        result.skipped.push(SkippedFilter {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            filter_type,
            reason,
        });
    }

    result
}
