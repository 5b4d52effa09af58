//! One pass over a dashboard: log in, seed defaults, edit, share.

use filterlink_core::filter::{
    FilterDescriptor, FilterEdit, FilterValueMapping, SkippedFilter, build_default_values,
    find_by_name,
};
use filterlink_shared::{AppError, AppResult, DashboardId};
use tracing::{debug, info};
use url::Url;

use crate::client::DashboardClient;
use crate::session::SessionContext;

/// Filter values of one dashboard plus the session that can share them.
///
/// Network calls take `&mut self`, so a session never has two requests in
/// flight.
#[derive(Debug)]
pub struct DashboardFilterSession<'a> {
    client: &'a DashboardClient,
    ctx: SessionContext,
    dashboard_id: DashboardId,
    descriptors: Vec<FilterDescriptor>,
    filters: FilterValueMapping,
    skipped: Vec<SkippedFilter>,
}

impl<'a> DashboardFilterSession<'a> {
    /// Authenticates, fetches the dashboard's descriptors and seeds every
    /// filter with its default value.
    pub async fn open(
        client: &'a DashboardClient,
        username: &str,
        password: &str,
        dashboard_id: DashboardId,
    ) -> AppResult<Self> {
        let mut ctx = client.authenticate(username, password).await?;
        let descriptors = client
            .fetch_filter_descriptors(&mut ctx, &dashboard_id)
            .await?;
        let defaults = build_default_values(&descriptors);

        info!(
            dashboard_id = %dashboard_id,
            filters = defaults.filters.len(),
            skipped = defaults.skipped.len(),
            "Dashboard filter session opened"
        );

        Ok(Self {
            client,
            ctx,
            dashboard_id,
            descriptors,
            filters: defaults.filters,
            skipped: defaults.skipped,
        })
    }

    /// Dashboard being filtered.
    #[must_use]
    pub fn dashboard_id(&self) -> &DashboardId {
        &self.dashboard_id
    }

    /// Every descriptor the server returned, recognized or not.
    #[must_use]
    pub fn descriptors(&self) -> &[FilterDescriptor] {
        &self.descriptors
    }

    /// Current filter values.
    #[must_use]
    pub fn filters(&self) -> &FilterValueMapping {
        &self.filters
    }

    /// Descriptors left out of the value mapping.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedFilter] {
        &self.skipped
    }

    /// Session credentials.
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Finds a descriptor by display name.
    #[must_use]
    pub fn descriptor_by_name(&self, name: &str) -> Option<&FilterDescriptor> {
        find_by_name(&self.descriptors, name)
    }

    /// Applies `edit` to the filter named `name`.
    ///
    /// # Errors
    ///
    /// `AppError::NotFound` if the dashboard has no such filter,
    /// `AppError::Filter` if the engine refuses the edit. Values are
    /// unchanged on error.
    pub fn apply(&mut self, name: &str, edit: &FilterEdit) -> AppResult<()> {
        let descriptor = find_by_name(&self.descriptors, name).ok_or_else(|| {
            AppError::NotFound(format!(
                "native filter '{name}' on dashboard {}",
                self.dashboard_id
            ))
        })?;
        debug!(filter_id = %descriptor.id, filter = name, ?edit, "Applying filter edit");
        self.filters.apply(descriptor, edit)?;
        Ok(())
    }

    /// Applies `edit` to the filter with id `id`.
    ///
    /// # Errors
    ///
    /// Same as [`DashboardFilterSession::apply`].
    pub fn apply_by_id(&mut self, id: &str, edit: &FilterEdit) -> AppResult<()> {
        let descriptor = self
            .descriptors
            .iter()
            .find(|desc| desc.id.as_str() == id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "native filter {id} on dashboard {}",
                    self.dashboard_id
                ))
            })?;
        debug!(filter_id = id, ?edit, "Applying filter edit");
        self.filters.apply(descriptor, edit)?;
        Ok(())
    }

    /// Uploads the current values and returns the shareable dashboard URL.
    pub async fn share(&mut self) -> AppResult<Url> {
        self.client
            .upload_filter_values(&mut self.ctx, &self.dashboard_id, &self.filters)
            .await
    }
}
