//! Raw store rows to canonical [`Cookie`] records.
//!
//! Pure mapping; every timestamp goes through the time codec. Columns that the
//! store did not have map to `None`/`false`, never to a code that means
//! something (a missing `samesite` is not `SameSite=None`).

use crate::cookies::cookie::{normalize_domain, Cookie, SameSite};
use crate::cookies::schema::{scheme_map, source_scheme};
use crate::cookies::store::{ChromiumRow, FirefoxRow, RawRow};
use crate::cookies::timecodec::{to_unix_seconds, TimeEncoding};

pub fn normalize(row: RawRow) -> Cookie {
    match row {
        RawRow::Chromium(row) => normalize_chromium(row),
        RawRow::Firefox(row) => normalize_firefox(row),
    }
}

pub fn normalize_all(rows: impl IntoIterator<Item = RawRow>) -> Vec<Cookie> {
    rows.into_iter().map(normalize).collect()
}

pub fn normalize_chromium(row: ChromiumRow) -> Cookie {
    let expires = to_unix_seconds(row.expires_utc, TimeEncoding::ChromeMicros);
    let session = expires.is_none();

    if row.has_expires.is_some_and(|flag| (flag != 0) == session) {
        tracing::debug!(
            domain = %row.host_key,
            name = %row.name,
            "has_expires disagrees with expires_utc; session state follows expires_utc"
        );
    }

    Cookie {
        domain: normalize_domain(&row.host_key).to_string(),
        name: row.name,
        value: row.value,
        path: row.path,
        expires,
        secure: flag(row.is_secure),
        http_only: flag(row.is_httponly),
        same_site: row.samesite.map(SameSite::from_code),
        created: to_unix_seconds(row.creation_utc, TimeEncoding::ChromeMicros),
        last_accessed: to_unix_seconds(row.last_access_utc, TimeEncoding::ChromeMicros),
        session,
        persistent: !session,
        source_scheme: row.source_scheme.map(chromium_source_scheme),
    }
}

pub fn normalize_firefox(row: FirefoxRow) -> Cookie {
    let expires = to_unix_seconds(row.expiry, TimeEncoding::UnixSeconds);
    let session = expires.is_none();

    Cookie {
        domain: normalize_domain(&row.host).to_string(),
        name: row.name,
        value: row.value,
        path: row.path,
        expires,
        secure: flag(row.is_secure),
        http_only: flag(row.is_http_only),
        // moz_cookies cannot distinguish an unset SameSite from None
        same_site: None,
        created: to_unix_seconds(row.creation_time, TimeEncoding::UnixMicros),
        last_accessed: to_unix_seconds(row.last_accessed, TimeEncoding::UnixMicros),
        session,
        persistent: !session,
        source_scheme: row.scheme_map.map(firefox_scheme_map),
    }
}

fn flag(value: Option<i64>) -> bool {
    value.is_some_and(|v| v != 0)
}

fn chromium_source_scheme(code: i64) -> String {
    match code {
        source_scheme::UNSET => "unset".to_string(),
        source_scheme::NON_SECURE => "non-secure".to_string(),
        source_scheme::SECURE => "secure".to_string(),
        other => other.to_string(),
    }
}

fn firefox_scheme_map(bits: i64) -> String {
    let schemes: Vec<&str> = [
        (scheme_map::HTTP, "http"),
        (scheme_map::HTTPS, "https"),
        (scheme_map::FILE, "file"),
    ]
    .into_iter()
    .filter(|(bit, _)| bits & bit != 0)
    .map(|(_, name)| name)
    .collect();

    if schemes.is_empty() {
        "unset".to_string()
    } else {
        schemes.join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::timecodec::unix_to_chrome_micros;

    fn chromium_row() -> ChromiumRow {
        ChromiumRow {
            host_key: ".example.com".into(),
            name: "sid".into(),
            value: "abc".into(),
            path: "/".into(),
            expires_utc: Some(unix_to_chrome_micros(1_900_000_000).unwrap()),
            is_secure: Some(1),
            is_httponly: Some(0),
            creation_utc: Some(unix_to_chrome_micros(1_700_000_000).unwrap()),
            last_access_utc: Some(0),
            has_expires: Some(1),
            is_persistent: Some(1),
            samesite: Some(0),
            source_scheme: Some(2),
        }
    }

    #[test]
    fn test_chromium_row() {
        let cookie = normalize_chromium(chromium_row());
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.expires, Some(1_900_000_000.0));
        assert_eq!(cookie.created, Some(1_700_000_000.0));
        assert_eq!(cookie.last_accessed, None);
        assert!(cookie.secure);
        assert!(!cookie.http_only);
        assert!(cookie.persistent && !cookie.session);
        assert_eq!(cookie.same_site, Some(SameSite::NoRestriction));
        assert_eq!(cookie.source_scheme.as_deref(), Some("secure"));
    }

    #[test]
    fn test_chromium_reduced_row_has_no_samesite() {
        let row = ChromiumRow {
            samesite: None,
            source_scheme: None,
            ..chromium_row()
        };
        let cookie = normalize_chromium(row);
        assert_eq!(cookie.same_site, None);
        assert_eq!(cookie.source_scheme, None);
    }

    #[test]
    fn test_chromium_session_cookie() {
        let row = ChromiumRow {
            expires_utc: Some(0),
            has_expires: Some(0),
            is_persistent: Some(0),
            ..chromium_row()
        };
        let cookie = normalize_chromium(row);
        assert_eq!(cookie.expires, None);
        assert!(cookie.session && !cookie.persistent);
    }

    #[test]
    fn test_firefox_row() {
        let row = FirefoxRow {
            host: ".shop.example.com".into(),
            name: "cart".into(),
            value: "1".into(),
            path: "/".into(),
            expiry: Some(1_900_000_000),
            is_secure: Some(0),
            is_http_only: Some(1),
            creation_time: Some(1_700_000_000_000_000),
            last_accessed: Some(1_700_000_100_000_000),
            scheme_map: Some(scheme_map::HTTP | scheme_map::HTTPS),
        };
        let cookie = normalize_firefox(row);
        assert_eq!(cookie.domain, "shop.example.com");
        assert_eq!(cookie.expires, Some(1_900_000_000.0));
        assert_eq!(cookie.created, Some(1_700_000_000.0));
        assert_eq!(cookie.last_accessed, Some(1_700_000_100.0));
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, None);
        assert_eq!(cookie.source_scheme.as_deref(), Some("http|https"));
    }

    #[test]
    fn test_firefox_zero_expiry_is_session() {
        let row = FirefoxRow {
            host: "example.com".into(),
            name: "a".into(),
            expiry: Some(0),
            ..FirefoxRow::default()
        };
        let cookie = normalize(RawRow::Firefox(row));
        assert!(cookie.session);
        assert_eq!(cookie.same_site, None);
        assert!(!cookie.secure);
    }
}
