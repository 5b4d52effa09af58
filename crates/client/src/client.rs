//! REST client for the dashboard server.

use std::time::Duration;

use filterlink_core::filter::{DashboardMetadata, FilterDescriptor, FilterValueMapping};
use filterlink_shared::config::ServerConfig;
use filterlink_shared::{AppError, AppResult, DashboardId};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::cookie::session_cookie_from;
use crate::session::SessionContext;

/// Query parameter the dashboard page reads its filter state key from.
pub const FILTER_KEY_PARAM: &str = "native_filters_key";

const DEFAULT_VIEW_PATH: &str = "superset/dashboard/";

/// Client for one dashboard server.
///
/// Holds no credentials; those live in the [`SessionContext`] returned by
/// [`DashboardClient::authenticate`].
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: Client,
    base: Url,
    view_base: Url,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    provider: &'static str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct CsrfResponse {
    result: String,
}

#[derive(Deserialize)]
struct DashboardResponse {
    result: DashboardResource,
}

#[derive(Deserialize)]
struct DashboardResource {
    json_metadata: String,
}

#[derive(Serialize)]
struct FilterStateRequest {
    value: String,
}

#[derive(Deserialize)]
struct FilterStateResponse {
    key: String,
}

impl DashboardClient {
    /// Creates a client from server configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if either base address is not an
    /// absolute URL or the HTTP client cannot be built.
    pub fn new(config: &ServerConfig) -> AppResult<Self> {
        let base = parse_base(&config.base_url)?;
        let view_base = match &config.dashboard_view_base {
            Some(view) => parse_base(view)?,
            None => base
                .join(DEFAULT_VIEW_PATH)
                .map_err(|e| AppError::Configuration(format!("dashboard view base: {e}")))?,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            view_base,
        })
    }

    /// Server base address, always ending in `/`.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Prefix of shareable dashboard links, always ending in `/`.
    #[must_use]
    pub fn view_base(&self) -> &Url {
        &self.view_base
    }

    /// Logs in and fetches a CSRF token.
    ///
    /// # Arguments
    /// * `username` - Database auth provider user
    /// * `password` - Its password; never logged
    ///
    /// # Returns
    /// * `Ok(SessionContext)` carrying the bearer token, CSRF token and the
    ///   latest session cookie either response set
    /// * `Err(AppError::Authentication)` if either request is rejected
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<SessionContext> {
        let url = self.endpoint(&["api", "v1", "security", "login"])?;
        debug!(%url, "Logging in");
        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                username,
                password,
                provider: "db",
            })
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response, true).await?;
        let cookie = session_cookie_from(response.headers());
        let login: LoginResponse = read_json(response, "login response").await?;

        let mut ctx = SessionContext::new(self.base.clone(), login.access_token, "", cookie);

        let url = self.endpoint(&["api", "v1", "security", "csrf_token", ""])?;
        debug!(%url, "Fetching CSRF token");
        let response = self
            .http
            .get(url)
            .headers(ctx.auth_headers(false)?)
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response, true).await?;
        ctx.refresh_session_cookie(session_cookie_from(response.headers()));
        let csrf: CsrfResponse = read_json(response, "CSRF token response").await?;
        ctx.set_csrf_token(csrf.result);

        info!(
            username,
            has_session_cookie = ctx.session_cookie().is_some(),
            "Authenticated"
        );
        Ok(ctx)
    }

    /// Fetches the native filter descriptors of a dashboard.
    ///
    /// Refreshes the session cookie of `ctx` from the response.
    pub async fn fetch_filter_descriptors(
        &self,
        ctx: &mut SessionContext,
        dashboard_id: &DashboardId,
    ) -> AppResult<Vec<FilterDescriptor>> {
        let url = self.endpoint(&["api", "v1", "dashboard", dashboard_id.as_str()])?;
        debug!(%url, "Fetching dashboard");
        let response = self
            .http
            .get(url)
            .headers(ctx.auth_headers(true)?)
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response, false).await?;
        ctx.refresh_session_cookie(session_cookie_from(response.headers()));

        let dashboard: DashboardResponse = read_json(response, "dashboard response").await?;
        let metadata = DashboardMetadata::from_json_str(&dashboard.result.json_metadata)
            .map_err(|e| AppError::Parse(format!("dashboard {dashboard_id} json_metadata: {e}")))?;

        let descriptors = metadata.native_filter_configuration;
        info!(
            dashboard_id = %dashboard_id,
            count = descriptors.len(),
            "Fetched native filter descriptors"
        );
        Ok(descriptors)
    }

    /// Uploads a filter value mapping and returns the shareable dashboard URL.
    ///
    /// Refreshes the session cookie of `ctx` from the response.
    pub async fn upload_filter_values(
        &self,
        ctx: &mut SessionContext,
        dashboard_id: &DashboardId,
        filters: &FilterValueMapping,
    ) -> AppResult<Url> {
        let value = filters
            .to_json_string()
            .map_err(|e| AppError::Parse(format!("Failed to encode filter state: {e}")))?;

        let url = self.endpoint(&["api", "v1", "dashboard", dashboard_id.as_str(), "filter_state"])?;
        debug!(%url, filters = filters.len(), "Uploading filter state");
        let response = self
            .http
            .post(url)
            .headers(ctx.auth_headers(true)?)
            .json(&FilterStateRequest { value })
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response, false).await?;
        ctx.refresh_session_cookie(session_cookie_from(response.headers()));

        let uploaded: FilterStateResponse = read_json(response, "filter state response").await?;
        let link = self.shareable_url(dashboard_id, &uploaded.key)?;
        info!(dashboard_id = %dashboard_id, url = %link, "Filter state uploaded");
        Ok(link)
    }

    /// Builds `<view base>/<id>/?native_filters_key=<key>`.
    pub fn shareable_url(&self, dashboard_id: &DashboardId, key: &str) -> AppResult<Url> {
        let mut url = self.view_base.clone();
        url.path_segments_mut()
            .map_err(|()| cannot_be_a_base(&self.view_base))?
            .pop_if_empty()
            .push(dashboard_id.as_str())
            .push("");
        url.set_query(Some(&format!(
            "{FILTER_KEY_PARAM}={}",
            urlencoding::encode(key)
        )));
        Ok(url)
    }

    /// Appends percent-encoded `segments` to the base address.
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| cannot_be_a_base(&self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Parses a base address and makes sure its path ends in `/`.
fn parse_base(raw: &str) -> AppResult<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| AppError::Configuration(format!("invalid URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(cannot_be_a_base(&url));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn cannot_be_a_base(url: &Url) -> AppError {
    AppError::Configuration(format!("'{url}' cannot be used as a base address"))
}

#[allow(clippy::needless_pass_by_value)]
fn transport(err: reqwest::Error) -> AppError {
    AppError::Transport(err.to_string())
}

/// Passes successful responses through; otherwise reads the body into the
/// matching error.
async fn ensure_success(response: Response, handshake: bool) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(text) => format!("Body: {text}"),
        Err(e) => format!("Body error: {e}"),
    };
    let status = status.as_u16();
    if handshake {
        Err(AppError::Authentication { status, body })
    } else {
        Err(AppError::Http { status, body })
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> AppResult<T> {
    let text = response.text().await.map_err(transport)?;
    serde_json::from_str(&text).map_err(|e| AppError::Parse(format!("{what}: {e}")))
}
