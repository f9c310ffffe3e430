//! Double-submit CSRF tokens: the value set in a readable cookie must be
//! echoed back in the `X-CSRF-Token` header on state-changing requests.

use axum::{Json, http::HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration as CookieDuration;
use rand_core::{OsRng, RngCore};
use serde_json::{Value, json};

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";
const CSRF_TTL_SECS: i64 = 3600;
const CSRF_TOKEN_BYTES: usize = 16;

/// `GET /api/csrf`: mints a token and hands it out both as the response
/// body and as a cookie the browser can read back.
pub async fn issue(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);

    let mut cookie = Cookie::new(CSRF_COOKIE, token.clone());
    cookie.set_path("/");
    // Deliberately readable from JS: the double-submit scheme needs the
    // frontend to copy the value into a header.
    cookie.set_http_only(false);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::seconds(CSRF_TTL_SECS));

    (jar.add(cookie), Json(json!({ "csrf_token": token })))
}

/// Both sides must be present and equal; comparison is constant-time.
pub fn verify_double_submit(headers: &HeaderMap, jar: &CookieJar) -> bool {
    let Some(header_token) = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let Some(cookie_token) = jar.get(CSRF_COOKIE) else {
        return false;
    };
    constant_time_eq(cookie_token.value(), header_token)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn jar_with(token: &str) -> CookieJar {
        CookieJar::new().add(Cookie::new(CSRF_COOKIE, token.to_string()))
    }

    fn headers_with(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    #[test]
    fn constant_time_eq_matches_equality() {
        assert!(constant_time_eq("abc123", "abc123"));
        assert!(!constant_time_eq("abc123", "abc124"));
        assert!(!constant_time_eq("abc", "abc123"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn verification_requires_both_sides() {
        assert!(verify_double_submit(
            &headers_with("tok"),
            &jar_with("tok")
        ));
        assert!(!verify_double_submit(
            &headers_with("tok"),
            &jar_with("other")
        ));
        assert!(!verify_double_submit(&HeaderMap::new(), &jar_with("tok")));
        assert!(!verify_double_submit(
            &headers_with("tok"),
            &CookieJar::new()
        ));
    }
}
