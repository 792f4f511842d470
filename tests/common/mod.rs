//! SQLite fixtures shaped like real browser cookie stores.

#![allow(dead_code)]

use cookieaudit::cookies::timecodec::unix_to_chrome_micros;
use rusqlite::{params, Connection};
use std::path::Path;

pub const NOW_UNIX: i64 = 1_735_689_600; // 2025-01-01T00:00:00Z
pub const DAY: i64 = 86_400;

/// One row for either fixture dialect.
pub struct Row<'a> {
    pub host: &'a str,
    pub name: &'a str,
    pub value: &'a str,
    /// Unix seconds, `0` for a session cookie.
    pub expires: i64,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: i64,
}

impl<'a> Row<'a> {
    pub fn new(host: &'a str, name: &'a str) -> Self {
        Self {
            host,
            name,
            value: "v",
            expires: 0,
            secure: false,
            http_only: false,
            same_site: -1,
        }
    }

    pub fn expires_in_days(mut self, days: i64) -> Self {
        self.expires = NOW_UNIX + days * DAY;
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn same_site(mut self, code: i64) -> Self {
        self.same_site = code;
        self
    }
}

/// Chromium `Cookies` database. `primary` adds `samesite`/`source_scheme`.
pub fn chromium_store(path: &Path, primary: bool, rows: &[Row<'_>]) {
    let conn = Connection::open(path).unwrap();
    let extra = if primary {
        ", samesite INTEGER NOT NULL DEFAULT -1, source_scheme INTEGER NOT NULL DEFAULT 0"
    } else {
        ""
    };
    conn.execute_batch(&format!(
        "CREATE TABLE meta (key LONGVARCHAR NOT NULL UNIQUE PRIMARY KEY, value LONGVARCHAR);
         CREATE TABLE cookies (
            creation_utc INTEGER NOT NULL, host_key TEXT, top_frame_site_key TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL, value TEXT NOT NULL, encrypted_value BLOB NOT NULL DEFAULT x'',
            path TEXT NOT NULL, expires_utc INTEGER NOT NULL, is_secure INTEGER NOT NULL,
            is_httponly INTEGER NOT NULL, last_access_utc INTEGER NOT NULL,
            has_expires INTEGER NOT NULL DEFAULT 1, is_persistent INTEGER NOT NULL DEFAULT 1,
            priority INTEGER NOT NULL DEFAULT 1{extra});"
    ))
    .unwrap();

    let created = unix_to_chrome_micros(NOW_UNIX - 30 * DAY).unwrap();
    for row in rows {
        let expires = if row.expires == 0 {
            0
        } else {
            unix_to_chrome_micros(row.expires).unwrap()
        };
        let persistent = i64::from(row.expires != 0);
        conn.execute(
            "INSERT INTO cookies (creation_utc, host_key, name, value, path, expires_utc,
                is_secure, is_httponly, last_access_utc, has_expires, is_persistent)
             VALUES (?1, ?2, ?3, ?4, '/', ?5, ?6, ?7, ?1, ?8, ?8)",
            params![
                created,
                row.host,
                row.name,
                row.value,
                expires,
                row.secure,
                row.http_only,
                persistent
            ],
        )
        .unwrap();
        if primary {
            conn.execute(
                "UPDATE cookies SET samesite = ?1, source_scheme = 2 WHERE name = ?2",
                params![row.same_site, row.name],
            )
            .unwrap();
        }
    }
}

/// Firefox `cookies.sqlite`. `primary` adds `sameSite`/`schemeMap`.
pub fn firefox_store(path: &Path, primary: bool, rows: &[Row<'_>]) {
    let conn = Connection::open(path).unwrap();
    let extra = if primary {
        ", sameSite INTEGER DEFAULT 0, schemeMap INTEGER DEFAULT 0"
    } else {
        ""
    };
    conn.execute_batch(&format!(
        "CREATE TABLE moz_cookies (
            id INTEGER PRIMARY KEY, originAttributes TEXT NOT NULL DEFAULT '',
            name TEXT, value TEXT, host TEXT, path TEXT, expiry INTEGER,
            lastAccessed INTEGER, creationTime INTEGER, isSecure INTEGER,
            isHttpOnly INTEGER{extra});"
    ))
    .unwrap();

    let created = (NOW_UNIX - 30 * DAY) * 1_000_000;
    for row in rows {
        conn.execute(
            "INSERT INTO moz_cookies (name, value, host, path, expiry, lastAccessed,
                creationTime, isSecure, isHttpOnly)
             VALUES (?1, ?2, ?3, '/', ?4, ?5, ?5, ?6, ?7)",
            params![row.name, row.value, row.host, row.expires, created, row.secure, row.http_only],
        )
        .unwrap();
        if primary {
            // Firefox has no "unspecified"; it stores None (0) instead.
            let same_site = row.same_site.max(0);
            conn.execute(
                "UPDATE moz_cookies SET sameSite = ?1, schemeMap = 2 WHERE name = ?2",
                params![same_site, row.name],
            )
            .unwrap();
        }
    }
}
