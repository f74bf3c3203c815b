use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use hyper::Uri;
use hyper::header::{COOKIE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::token::{Credentials, SetCookie, TokenKind};

/// Extract cookie value by name. Every `Cookie` header is searched; the first
/// match wins.
pub fn get_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name.trim() == cookie_name).then(|| value.trim().to_string())
        })
        .inspect(|_| debug!("Cookie found: {}", cookie_name))
}

/// The three token cookies the coordinators care about, undecoded.
pub fn credentials(headers: &HeaderMap) -> Credentials {
    Credentials {
        auth: get_cookie(headers, TokenKind::Auth.cookie_name()),
        state: get_cookie(headers, TokenKind::State.cookie_name()),
        invite: get_cookie(headers, TokenKind::Invite.cookie_name()),
    }
}

/// First value of query parameter `name`, percent-decoded.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Render a [`SetCookie`] into a `Set-Cookie` header value.
pub fn set_cookie(cookie: &SetCookie, now: DateTime<Utc>) -> Result<HeaderValue> {
    HeaderValue::from_str(&cookie.render(now)).map_err(|e| {
        warn!("Failed to create cookie header for {}: {}", cookie.name, e);
        anyhow!("Invalid cookie value: {}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn cookie_found_among_several() {
        let headers = headers_with_cookie("theme=dark; auth=abc.def.ghi; state=xyz");
        assert_eq!(get_cookie(&headers, "auth").as_deref(), Some("abc.def.ghi"));
        assert_eq!(get_cookie(&headers, "state").as_deref(), Some("xyz"));
        assert_eq!(get_cookie(&headers, "invite"), None);
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let headers = headers_with_cookie("xauth=1; auth_old=2");
        assert_eq!(get_cookie(&headers, "auth"), None);
    }

    #[test]
    fn cookies_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("auth=a"));
        headers.append(COOKIE, HeaderValue::from_static("state=s"));
        let creds = credentials(&headers);
        assert_eq!(creds.auth.as_deref(), Some("a"));
        assert_eq!(creds.state.as_deref(), Some("s"));
        assert_eq!(creds.invite, None);
    }

    #[test]
    fn no_cookie_header_gives_empty_credentials() {
        assert_eq!(credentials(&HeaderMap::new()), Credentials::default());
    }

    #[test]
    fn query_param_is_decoded() {
        let uri: Uri = "/board?id=a%20b&x=1".parse().unwrap();
        assert_eq!(query_param(&uri, "id").as_deref(), Some("a b"));
        assert_eq!(query_param(&uri, "x").as_deref(), Some("1"));
        assert_eq!(query_param(&uri, "y"), None);
    }

    #[test]
    fn query_param_without_query() {
        let uri: Uri = "/board".parse().unwrap();
        assert_eq!(query_param(&uri, "id"), None);
    }

    #[test]
    fn header_value_from_set_cookie() {
        let cookie = SetCookie::clear(TokenKind::State);
        let value = set_cookie(&cookie, Utc::now()).unwrap();
        let text = value.to_str().unwrap();
        assert!(text.starts_with("state=;"));
        assert!(text.contains("Max-Age=0"));
    }
}
