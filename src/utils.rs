use axum::http::{HeaderMap, header::COOKIE};
use rand::{Rng, distr::Alphanumeric};

use crate::config::CookieSettings;

pub const SESSION_COOKIE: &str = "sessionId";
pub const TOKEN_COOKIE: &str = "access_token";
pub const STATE_COOKIE: &str = "oauth_state";

/// Lifetime of the `oauth_state` cookie in seconds.
pub const STATE_COOKIE_MAX_AGE: u64 = 600;

const STATE_LENGTH: usize = 16;
const SESSION_ID_LENGTH: usize = 48;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Anti-forgery value sent along with the authorization request.
pub fn generate_state() -> String {
    random_alphanumeric(STATE_LENGTH)
}

pub fn generate_session_id() -> String {
    random_alphanumeric(SESSION_ID_LENGTH)
}

/// Returns the value of the cookie `name` from the request's `Cookie` headers.
///
/// Browsers send `name1=value1; name2=value2`, possibly split across several
/// headers. The first non-empty match wins.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| key.trim() == name && !value.trim().is_empty())
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

/// Builds a `Set-Cookie` value. All relay cookies are http-only.
pub fn build_cookie(
    name: &str,
    value: &str,
    path: &str,
    max_age: Option<u64>,
    settings: &CookieSettings,
) -> String {
    let mut cookie = format!("{name}={value}; HttpOnly; Path={path}; SameSite=Lax");
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if settings.secure {
        cookie.push_str("; Secure");
    }
    if let Some(domain) = &settings.domain {
        cookie.push_str(&format!("; Domain={domain}"));
    }
    cookie
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn generated_identifiers_are_alphanumeric_and_distinct() {
        let state = generate_state();
        assert_eq!(state.len(), 16);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

        let a = generate_session_id();
        let b = generate_session_id();
        assert_eq!(a.len(), SESSION_ID_LENGTH);
        assert_ne!(a, b);
    }

    #[test]
    fn reads_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sessionId=abc123 ; other=x"),
        );
        assert_eq!(read_cookie(&headers, SESSION_COOKIE).as_deref(), Some("abc123"));
        assert_eq!(read_cookie(&headers, TOKEN_COOKIE), None);
    }

    #[test]
    fn reads_cookie_from_second_header_and_skips_empty_values() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("access_token="));
        headers.append(COOKIE, HeaderValue::from_static("access_token=\"tok\""));
        assert_eq!(read_cookie(&headers, TOKEN_COOKIE).as_deref(), Some("tok"));
    }

    #[test]
    fn cookie_flags_follow_settings() {
        let plain = build_cookie("sessionId", "v", "/", None, &CookieSettings::default());
        assert_eq!(plain, "sessionId=v; HttpOnly; Path=/; SameSite=Lax");

        let hardened = build_cookie(
            "oauth_state",
            "s",
            "/callback",
            Some(600),
            &CookieSettings {
                secure: true,
                domain: Some("example.test".into()),
            },
        );
        assert!(hardened.contains("Max-Age=600"));
        assert!(hardened.contains("; Secure"));
        assert!(hardened.ends_with("; Domain=example.test"));
    }
}
