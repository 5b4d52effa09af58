//! Session cookie extraction from `Set-Cookie` headers.

use reqwest::header::{HeaderMap, SET_COOKIE};
use tracing::warn;

/// Name of the cookie carrying the server session.
pub const SESSION_COOKIE: &str = "session";

/// Returns the value of the first `session` cookie set by a response.
///
/// Headers without a `=` are logged and skipped. The value runs up to the
/// first `;`; attributes are ignored.
#[must_use]
pub fn session_cookie_from(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(SET_COOKIE) {
        let Ok(raw) = header.to_str() else {
            warn!("Ignoring Set-Cookie header that is not visible ASCII");
            continue;
        };
        let Some((name, rest)) = raw.split_once('=') else {
            warn!(cookie = raw, "Invalid cookie");
            continue;
        };
        if name != SESSION_COOKIE {
            continue;
        }
        let value = rest.split_once(';').map_or(rest, |(value, _)| value);
        return Some(value.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use rstest::rstest;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for cookie in cookies {
            map.append(SET_COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        map
    }

    #[rstest]
    #[case::plain(&["session=abc"], Some("abc"))]
    #[case::attributes(&["session=abc; HttpOnly; Path=/"], Some("abc"))]
    #[case::empty_value(&["session=; Path=/"], Some(""))]
    #[case::after_others(&["lang=en; Path=/", "session=xyz; Secure"], Some("xyz"))]
    #[case::first_wins(&["session=one", "session=two"], Some("one"))]
    #[case::invalid_skipped(&["garbage", "session=ok"], Some("ok"))]
    #[case::prefix_is_not_a_match(&["session_id=nope"], None)]
    #[case::case_sensitive(&["Session=nope"], None)]
    #[case::none(&[], None)]
    fn test_session_cookie_from(#[case] cookies: &[&str], #[case] expected: Option<&str>) {
        assert_eq!(
            session_cookie_from(&headers(cookies)).as_deref(),
            expected
        );
    }

    #[test]
    fn test_value_keeps_equals_signs() {
        let map = headers(&["session=a=b==; Path=/"]);
        assert_eq!(session_cookie_from(&map).as_deref(), Some("a=b=="));
    }
}
