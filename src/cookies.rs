// SPDX-License-Identifier: MIT

//! Session cookie codec.
//!
//! Pure string transforms over the two HttpOnly session cookies. The
//! client never reads these values; it only triggers their creation and
//! destruction through the session endpoint.

/// Cookie holding the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
/// Cookie holding the long-lived refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Default access cookie lifetime when the client reports no `expires_in`.
pub const DEFAULT_ACCESS_TOKEN_MAX_AGE: i64 = 3600;
/// Refresh cookie lifetime: 30 days.
pub const REFRESH_TOKEN_MAX_AGE: i64 = 60 * 60 * 24 * 30;

/// Serialize a Set-Cookie header value.
///
/// Always sets `Path=/`, `HttpOnly` and `SameSite=Lax`; sets `Secure` only
/// for production deployments. `Max-Age` is appended only when a value is
/// supplied: `None` yields a session-lifetime cookie, `Some(0)` expires
/// the cookie immediately.
pub fn build_cookie(name: &str, value: &str, max_age: Option<i64>, secure: bool) -> String {
    let mut parts = vec![
        format!("{}={}", name, urlencoding::encode(value)),
        "Path=/".to_string(),
        "HttpOnly".to_string(),
    ];
    if secure {
        parts.push("Secure".to_string());
    }
    parts.push("SameSite=Lax".to_string());
    if let Some(max_age) = max_age {
        parts.push(format!("Max-Age={}", max_age));
    }
    parts.join("; ")
}

/// Serialize a Set-Cookie header value that removes the named cookie.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    build_cookie(name, "", Some(0), secure)
}

/// Extract a cookie value from a raw `Cookie` request header.
///
/// Splits on `;`, trims each segment, splits on the first `=` and
/// URL-decodes the value. Returns `None` when the header is absent or the
/// name is not found.
pub fn read_cookie(name: &str, raw_header: Option<&str>) -> Option<String> {
    let raw_header = raw_header?;
    for part in raw_header.split(';') {
        let part = part.trim();
        let Some((n, v)) = part.split_once('=') else {
            continue;
        };
        if n == name {
            return Some(
                urlencoding::decode(v)
                    .map(|c| c.into_owned())
                    .unwrap_or_else(|_| v.to_string()),
            );
        }
    }
    None
}
