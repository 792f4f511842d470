//! Raw row access to Chromium and Firefox cookie stores.
//!
//! [`StoreReader`] opens one SQLite file, detects which column set it carries
//! (primary first, reduced once on a schema error), and pulls rows positionally.
//! It never writes to the store; callers hand it a [`Snapshot`](super::snapshot::Snapshot)
//! path rather than the browser's live file.

use crate::base::auditerror::AuditError;
use crate::base::readstate::ReadState;
use crate::cookies::browser::Dialect;
use crate::cookies::schema::{self, ColumnSet};
use rusqlite::{ffi::ErrorCode, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};

/// One row of a Chromium `cookies` table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChromiumRow {
    pub host_key: String,
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires_utc: Option<i64>,
    pub is_secure: Option<i64>,
    pub is_httponly: Option<i64>,
    pub creation_utc: Option<i64>,
    pub last_access_utc: Option<i64>,
    pub has_expires: Option<i64>,
    pub is_persistent: Option<i64>,
    /// Absent on the reduced column set.
    pub samesite: Option<i64>,
    /// Absent on the reduced column set.
    pub source_scheme: Option<i64>,
}

/// One row of a Firefox `moz_cookies` table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FirefoxRow {
    pub host: String,
    pub name: String,
    pub value: String,
    pub path: String,
    pub expiry: Option<i64>,
    pub is_secure: Option<i64>,
    pub is_http_only: Option<i64>,
    pub creation_time: Option<i64>,
    pub last_accessed: Option<i64>,
    /// Absent on the reduced column set.
    pub scheme_map: Option<i64>,
}

/// A raw store row, tagged with its dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRow {
    Chromium(ChromiumRow),
    Firefox(FirefoxRow),
}

/// Rows read from one store.
#[derive(Debug, Clone)]
pub struct RawRows {
    pub rows: Vec<RawRow>,
    pub column_set: ColumnSet,
    /// Rows that could not be decoded and were left out.
    pub skipped: usize,
}

/// Reader over a single cookie store file.
pub struct StoreReader {
    conn: Connection,
    path: PathBuf,
    dialect: Dialect,
    state: ReadState,
    column_set: Option<ColumnSet>,
}

impl std::fmt::Debug for StoreReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreReader")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .field("state", &self.state)
            .field("column_set", &self.column_set)
            .finish()
    }
}

impl StoreReader {
    /// Open `path` read-only as a `dialect` store.
    ///
    /// Fails with `Unreadable` if the file is missing or is not SQLite.
    pub fn open(path: &Path, dialect: Dialect) -> Result<Self, AuditError> {
        Self::open_with_flags(path, dialect, OpenFlags::SQLITE_OPEN_READ_ONLY)
    }

    /// Open a private snapshot copy. Read-write access lets SQLite replay a copied
    /// `-wal` journal; the original store is never touched.
    pub fn open_snapshot(path: &Path, dialect: Dialect) -> Result<Self, AuditError> {
        Self::open_with_flags(path, dialect, OpenFlags::SQLITE_OPEN_READ_WRITE)
    }

    fn open_with_flags(
        path: &Path,
        dialect: Dialect,
        flags: OpenFlags,
    ) -> Result<Self, AuditError> {
        if !path.is_file() {
            return Err(AuditError::unreadable(
                path.display().to_string(),
                "file not found",
            ));
        }

        let conn = Connection::open_with_flags(path, flags | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .map_err(|e| store_error(path, dialect, e))?;

        // SQLite opens lazily; touch the header so non-database files fail here.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| store_error(path, dialect, e))?;

        tracing::debug!(path = %path.display(), %dialect, "cookie store opened");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            dialect,
            state: ReadState::Opened,
            column_set: None,
        })
    }

    pub fn state(&self) -> ReadState {
        self.state
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find the column set this store supports.
    ///
    /// The primary set is tried first. A schema error (missing column or table)
    /// triggers exactly one retry with the reduced set; if that also fails the
    /// store is `SchemaUnsupported`. Any other SQLite error is `Unreadable`.
    pub fn detect_schema(&mut self) -> Result<ColumnSet, AuditError> {
        if let Some(set) = self.column_set {
            return Ok(set);
        }

        let primary = schema::select_query(self.dialect, ColumnSet::Primary);
        // Only the outcome matters; the statement must not outlive the match.
        let primary_result = self.conn.prepare(&primary).map(|_| ());
        let set = match primary_result {
            Ok(()) => ColumnSet::Primary,
            Err(e) if is_schema_error(&e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "primary cookie columns missing, retrying with reduced column set"
                );
                let reduced = schema::select_query(self.dialect, ColumnSet::Reduced);
                let reduced_result = self.conn.prepare(&reduced).map(|_| ());
                match reduced_result {
                    Ok(()) => ColumnSet::Reduced,
                    Err(e) => return Err(self.fail(e)),
                }
            }
            Err(e) => return Err(self.fail(e)),
        };

        tracing::debug!(path = %self.path.display(), column_set = ?set, "cookie schema detected");
        self.column_set = Some(set);
        self.state = ReadState::SchemaDetected;
        Ok(set)
    }

    /// Read every row of the cookie table, detecting the schema first if needed.
    ///
    /// Rows that fail to decode are skipped and counted. On success the reader
    /// is `Closed`.
    pub fn read_rows(&mut self) -> Result<RawRows, AuditError> {
        let column_set = self.detect_schema()?;
        self.state = ReadState::Streaming;

        let query = schema::select_query(self.dialect, column_set);
        let dialect = self.dialect;
        let result = (|| {
            let mut stmt = self.conn.prepare(&query)?;
            let mapped = stmt.query_map([], |row| decode_row(row, dialect, column_set))?;

            let mut rows = Vec::new();
            let mut skipped = 0usize;
            for row in mapped {
                match row {
                    Ok(row) => rows.push(row),
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(path = %self.path.display(), error = %e, "skipping undecodable cookie row");
                    }
                }
            }
            Ok::<_, rusqlite::Error>((rows, skipped))
        })();

        match result {
            Ok((rows, skipped)) => {
                tracing::debug!(
                    path = %self.path.display(),
                    count = rows.len(),
                    skipped,
                    "cookie rows read"
                );
                self.state = ReadState::Closed;
                Ok(RawRows {
                    rows,
                    column_set,
                    skipped,
                })
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, err: rusqlite::Error) -> AuditError {
        self.state = ReadState::Failed;
        store_error(&self.path, self.dialect, err)
    }
}

fn decode_row(row: &Row<'_>, dialect: Dialect, set: ColumnSet) -> rusqlite::Result<RawRow> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    let extended = set == ColumnSet::Primary;

    match dialect {
        Dialect::Chromium => Ok(RawRow::Chromium(ChromiumRow {
            host_key: row.get(0)?,
            name: text(1)?,
            value: text(2)?,
            path: text(3)?,
            expires_utc: row.get(4)?,
            is_secure: row.get(5)?,
            is_httponly: row.get(6)?,
            creation_utc: row.get(7)?,
            last_access_utc: row.get(8)?,
            has_expires: row.get(9)?,
            is_persistent: row.get(10)?,
            samesite: if extended { row.get(11)? } else { None },
            source_scheme: if extended { row.get(12)? } else { None },
        })),
        Dialect::Firefox => Ok(RawRow::Firefox(FirefoxRow {
            host: row.get(0)?,
            name: text(1)?,
            value: text(2)?,
            path: text(3)?,
            expiry: row.get(4)?,
            is_secure: row.get(5)?,
            is_http_only: row.get(6)?,
            creation_time: row.get(7)?,
            last_accessed: row.get(8)?,
            scheme_map: if extended { row.get(9)? } else { None },
        })),
    }
}

/// "no such column" / "no such table" surface as a generic SQLITE_ERROR, either
/// plain or, from `prepare`, with the offending SQL attached.
fn is_schema_error(err: &rusqlite::Error) -> bool {
    let is_schema_message = |m: &str| m.contains("no such column") || m.contains("no such table");
    match err {
        rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::Unknown => {
            msg.as_deref().is_some_and(is_schema_message)
        }
        rusqlite::Error::SqlInputError { error, msg, .. } if error.code == ErrorCode::Unknown => {
            is_schema_message(msg.as_str())
        }
        _ => false,
    }
}

fn store_error(path: &Path, dialect: Dialect, err: rusqlite::Error) -> AuditError {
    let path = path.display().to_string();
    match &err {
        _ if is_schema_error(&err) => AuditError::schema_unsupported(path, dialect, err.to_string()),
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked =>
        {
            AuditError::unreadable(path, "database is locked")
        }
        _ => AuditError::unreadable(path, err.to_string()),
    }
}
