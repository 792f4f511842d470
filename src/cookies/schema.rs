//! Cookie store column sets and raw code tables.
//!
//! ## Reference Files
//! - Chromium: `net/extras/sqlite/sqlite_persistent_cookie_store.cc`
//! - Chromium: `net/cookies/cookie_constants.h`
//! - Firefox: `netwerk/cookie/CookiePersistentStorage.cpp`
//!
//! Each dialect has a primary (superset) column list and a reduced list for
//! older browser versions. Queries select columns in a fixed order so the
//! normalizer can read rows positionally.

use crate::cookies::browser::Dialect;

/// Which column list a store was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSet {
    Primary,
    Reduced,
}

/// Chromium `cookies` columns, primary form.
pub const CHROMIUM_PRIMARY_COLUMNS: &[&str] = &[
    "host_key",
    "name",
    "value",
    "path",
    "expires_utc",
    "is_secure",
    "is_httponly",
    "creation_utc",
    "last_access_utc",
    "has_expires",
    "is_persistent",
    "samesite",
    "source_scheme",
];

/// Chromium columns before `samesite`/`source_scheme` existed.
pub const CHROMIUM_REDUCED_COLUMNS: &[&str] = &[
    "host_key",
    "name",
    "value",
    "path",
    "expires_utc",
    "is_secure",
    "is_httponly",
    "creation_utc",
    "last_access_utc",
    "has_expires",
    "is_persistent",
];

/// Firefox `moz_cookies` columns, primary form.
///
/// `sameSite` is never read: Firefox stores `0` (None) for cookies that were
/// sent without the attribute, so the column cannot tell "unset" from "None".
pub const FIREFOX_PRIMARY_COLUMNS: &[&str] = &[
    "host",
    "name",
    "value",
    "path",
    "expiry",
    "isSecure",
    "isHttpOnly",
    "creationTime",
    "lastAccessed",
    "schemeMap",
];

/// Firefox columns before `schemeMap` existed.
pub const FIREFOX_REDUCED_COLUMNS: &[&str] = &[
    "host",
    "name",
    "value",
    "path",
    "expiry",
    "isSecure",
    "isHttpOnly",
    "creationTime",
    "lastAccessed",
];

pub const CHROMIUM_TABLE: &str = "cookies";
pub const FIREFOX_TABLE: &str = "moz_cookies";

/// Column list for a dialect and column set.
pub fn columns(dialect: Dialect, set: ColumnSet) -> &'static [&'static str] {
    match (dialect, set) {
        (Dialect::Chromium, ColumnSet::Primary) => CHROMIUM_PRIMARY_COLUMNS,
        (Dialect::Chromium, ColumnSet::Reduced) => CHROMIUM_REDUCED_COLUMNS,
        (Dialect::Firefox, ColumnSet::Primary) => FIREFOX_PRIMARY_COLUMNS,
        (Dialect::Firefox, ColumnSet::Reduced) => FIREFOX_REDUCED_COLUMNS,
    }
}

pub fn table(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Chromium => CHROMIUM_TABLE,
        Dialect::Firefox => FIREFOX_TABLE,
    }
}

/// `SELECT` statement for a dialect and column set.
pub fn select_query(dialect: Dialect, set: ColumnSet) -> String {
    format!(
        "SELECT {} FROM {}",
        columns(dialect, set).join(", "),
        table(dialect)
    )
}

/// Chromium `CookieSameSite` values.
///
/// Reference: `net/cookies/cookie_constants.h`
pub mod samesite {
    pub const UNSPECIFIED: i64 = -1;
    pub const NO_RESTRICTION: i64 = 0;
    pub const LAX: i64 = 1;
    pub const STRICT: i64 = 2;
}

/// Chromium `CookieSourceScheme` values.
///
/// Reference: `net/cookies/cookie_constants.h`
pub mod source_scheme {
    pub const UNSET: i64 = 0;
    pub const NON_SECURE: i64 = 1;
    pub const SECURE: i64 = 2;
}

/// Firefox `schemeMap` bits.
pub mod scheme_map {
    pub const HTTP: i64 = 1 << 0;
    pub const HTTPS: i64 = 1 << 1;
    pub const FILE: i64 = 1 << 2;
}
