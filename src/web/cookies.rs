//! Cookie plumbing for the built-in screens.
//!
//! The client holds the agent id and both credentials in cookies; status
//! notifications ride a post-redirect-get cycle in their own cookies and are
//! cleared on display. Values never contain `;`, `=` or whitespace: keys come
//! from the configured alphabet, and notification texts use underscores in
//! place of spaces.

use axum::http::{header, HeaderMap};

pub const AGENT_ID: &str = "AGENT_ID";
pub const LOGIN_KEY: &str = "LOGIN_KEY";
pub const SESSION_KEY: &str = "SESSION_KEY";
pub const LOGGED_OUT_STATUS: &str = "LOGGED_OUT_STATUS";
pub const LOGIN_DENIED_STATUS: &str = "LOGIN_DENIED_STATUS";
pub const MESSAGE_SENDING_STATUS: &str = "MESSAGE_SENDING_STATUS";

/// Find a cookie by name in the request headers.
pub fn get(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// A Set-Cookie value storing `value` under `name`.
pub fn set(name: &str, value: &str) -> String {
    format!("{}={}; Path=/", name, value)
}

/// A Set-Cookie value deleting `name`.
pub fn clear(name: &str) -> String {
    format!("{}=; Max-Age=0; Path=/", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn request_headers(cookie_line: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie_line).unwrap());
        headers
    }

    #[test]
    fn test_get_finds_named_cookie() {
        let headers = request_headers("AGENT_ID=alice; SESSION_KEY=abc123");

        assert_eq!(get(&headers, AGENT_ID), Some("alice".to_string()));
        assert_eq!(get(&headers, SESSION_KEY), Some("abc123".to_string()));
        assert_eq!(get(&headers, LOGIN_KEY), None);
    }

    #[test]
    fn test_get_without_cookie_header() {
        let headers = HeaderMap::new();

        assert_eq!(get(&headers, AGENT_ID), None);
    }

    #[test]
    fn test_key_values_survive_the_symbol_alphabet() {
        let headers = request_headers("LOGIN_KEY=aB3!%^&*()");

        assert_eq!(get(&headers, LOGIN_KEY), Some("aB3!%^&*()".to_string()));
    }

    #[test]
    fn test_set_and_clear_shapes() {
        assert_eq!(set("AGENT_ID", "alice"), "AGENT_ID=alice; Path=/");
        assert_eq!(clear("AGENT_ID"), "AGENT_ID=; Max-Age=0; Path=/");
    }
}
