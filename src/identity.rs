//! Username cookie handling. The cookie is trusted as-is: there is no
//! signature, so anyone can claim any identity.
//!
//! The value is form-urlencoded on the way out so usernames with `;`, spaces
//! or non-ASCII characters survive as a single cookie-safe token.

use crate::errors::JarError;
use axum::http::{header, HeaderMap};
use url::form_urlencoded;

pub const COOKIE_NAME: &str = "username";

const ONE_YEAR_SECS: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// Normalizes a submitted username (trim + lowercase).
    pub fn from_login(raw: &str) -> Result<Self, JarError> {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            return Err(JarError::Validation("Username is required".to_string()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn resolve(headers: &HeaderMap) -> Option<Identity> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .flat_map(|value| value.as_bytes().split(|byte| *byte == b';'))
        .filter_map(|pair| {
            let pair = pair.trim_ascii();
            let split = pair.iter().position(|byte| *byte == b'=')?;
            Some((&pair[..split], pair[split + 1..].trim_ascii()))
        })
        .find(|(name, _)| *name == COOKIE_NAME.as_bytes())
        .and_then(|(_, value)| decode_value(value))
        .map(Identity)
}

/// Undoes [`build_cookie`]'s encoding. A value holding a raw `=` or `&`
/// never came from us.
fn decode_value(raw: &[u8]) -> Option<String> {
    if raw.is_empty() || raw.iter().any(|byte| matches!(byte, b'=' | b'&')) {
        return None;
    }
    let (name, _) = form_urlencoded::parse(raw).next()?;
    (!name.is_empty()).then(|| name.into_owned())
}

pub fn require(headers: &HeaderMap) -> Result<Identity, JarError> {
    resolve(headers).ok_or(JarError::Unauthenticated)
}

pub fn login_cookie(identity: &Identity, secure: bool) -> String {
    build_cookie(identity.as_str(), ONE_YEAR_SECS, secure)
}

pub fn logout_cookie(secure: bool) -> String {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, max_age: u64, secure: bool) -> String {
    let value: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    let mut cookie =
        format!("{COOKIE_NAME}={value}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn resolves_username_among_other_cookies() {
        let headers = headers_with("theme=dark; username=ash; lang=en");
        assert_eq!(resolve(&headers).unwrap().as_str(), "ash");
    }

    #[test]
    fn missing_or_empty_cookie_is_unauthenticated() {
        assert!(resolve(&HeaderMap::new()).is_none());
        assert!(resolve(&headers_with("username=")).is_none());
        assert!(matches!(
            require(&headers_with("theme=dark")),
            Err(JarError::Unauthenticated)
        ));
    }

    #[test]
    fn login_normalizes_and_rejects_blank() {
        assert_eq!(Identity::from_login("  Ash ").unwrap().as_str(), "ash");
        assert!(matches!(
            Identity::from_login("   "),
            Err(JarError::Validation(_))
        ));
    }

    #[test]
    fn cookies_carry_lifetime_and_flags() {
        let identity = Identity::from_login("ash").unwrap();
        let cookie = login_cookie(&identity, true);
        assert!(cookie.starts_with("username=ash;"));
        assert!(cookie.contains("Max-Age=31536000"));
        assert!(cookie.ends_with("; Secure"));

        assert!(logout_cookie(false).contains("Max-Age=0"));
        assert!(!logout_cookie(false).contains("Secure"));
    }

    /// Feeds a login Set-Cookie back the way a browser would.
    fn round_trip(username: &str) -> Option<Identity> {
        let identity = Identity::from_login(username).unwrap();
        let cookie = login_cookie(&identity, false);
        assert!(cookie.is_ascii(), "{cookie}");
        let pair = cookie.split("; ").next().unwrap();
        resolve(&headers_with(&format!("theme=dark; {pair}")))
    }

    #[test]
    fn special_usernames_survive_the_cookie() {
        for name in ["ash", "josé", "a;b", "mr mime", "50%=half&more"] {
            assert_eq!(round_trip(name).unwrap().as_str(), name);
        }

        let identity = Identity::from_login("José").unwrap();
        assert!(login_cookie(&identity, false).starts_with("username=jos%C3%A9;"));
    }

    #[test]
    fn raw_non_ascii_cookie_bytes_still_resolve() {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_bytes("username=josé".as_bytes()).unwrap();
        headers.insert(header::COOKIE, value);
        assert_eq!(resolve(&headers).unwrap().as_str(), "josé");
    }

    #[test]
    fn malformed_cookie_value_is_unauthenticated() {
        assert!(resolve(&headers_with("username=a=b")).is_none());
        assert!(resolve(&headers_with("username=a&b")).is_none());
    }
}
