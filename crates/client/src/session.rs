//! Authenticated session state shared by every call after login.

use filterlink_shared::{AppError, AppResult};
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;
use url::Url;

use crate::cookie::SESSION_COOKIE;

/// Header carrying the CSRF token on state-changing calls.
pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrftoken");

/// Credentials of one logged-in session.
///
/// Owned by a single caller and updated through `&mut` borrows; there is no
/// interior mutability.
#[derive(Clone)]
pub struct SessionContext {
    base: Url,
    access_token: String,
    csrf_token: String,
    session_cookie: Option<String>,
}

impl SessionContext {
    /// Creates a context from already obtained credentials.
    #[must_use]
    pub fn new(
        base: Url,
        access_token: impl Into<String>,
        csrf_token: impl Into<String>,
        session_cookie: Option<String>,
    ) -> Self {
        Self {
            base,
            access_token: access_token.into(),
            csrf_token: csrf_token.into(),
            session_cookie,
        }
    }

    /// Server base address.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Bearer token from login.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// CSRF token.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Most recently observed session cookie value.
    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    pub(crate) fn set_csrf_token(&mut self, csrf_token: String) {
        self.csrf_token = csrf_token;
    }

    /// Records the cookie a response set, if any.
    ///
    /// A newly observed value replaces the stored one; `None` never clears it.
    pub fn refresh_session_cookie(&mut self, observed: Option<String>) {
        if let Some(cookie) = observed {
            debug!("Session cookie refreshed");
            self.session_cookie = Some(cookie);
        }
    }

    /// Headers for an authenticated call.
    ///
    /// Always carries the bearer token and the session cookie when one is
    /// known; `x-csrftoken` is added when `with_csrf` is set.
    pub fn auth_headers(&self, with_csrf: bool) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            secret_header(&format!("Bearer {}", self.access_token), "access token")?,
        );
        if let Some(cookie) = &self.session_cookie {
            headers.insert(
                COOKIE,
                secret_header(&format!("{SESSION_COOKIE}={cookie}"), "session cookie")?,
            );
        }
        if with_csrf {
            headers.insert(CSRF_HEADER, secret_header(&self.csrf_token, "CSRF token")?);
        }
        Ok(headers)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("base", &self.base.as_str())
            .field("access_token", &"[hidden]")
            .field("csrf_token", &"[hidden]")
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[hidden]"),
            )
            .finish()
    }
}

fn secret_header(value: &str, what: &str) -> AppResult<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| AppError::Configuration(format!("{what} cannot be sent as a header")))?;
    header.set_sensitive(true);
    Ok(header)
}
