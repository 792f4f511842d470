//! Cookie persistence - save and load cookie arrays and classified batches as JSON.

use crate::base::auditerror::AuditError;
use crate::base::context::IoResultExt;
use crate::classify::classifier::ClassifiedBatch;
use crate::cookies::cookie::Cookie;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Save cookies as a flat, pretty-printed JSON array.
///
/// # Example
/// ```ignore
/// persistence::save_cookies(&cookies, Path::new("chrome_cookies.json"))?;
/// ```
pub fn save_cookies(cookies: &[Cookie], path: &Path) -> Result<(), AuditError> {
    write_json(cookies, path)
}

/// Load a JSON cookie array from any source.
///
/// Every record is re-normalized, so a file with `.domain` hosts or an
/// inconsistent `session` flag still yields valid [`Cookie`]s.
pub fn load_cookies(path: &Path) -> Result<Vec<Cookie>, AuditError> {
    let json = fs::read_to_string(path).path_context(path)?;
    let cookies: Vec<Cookie> = serde_json::from_str(&json)?;
    Ok(cookies.into_iter().map(Cookie::normalized).collect())
}

/// Save a classified batch as `{tracking, non_tracking, summary}`.
pub fn save_batch(batch: &ClassifiedBatch, path: &Path) -> Result<(), AuditError> {
    write_json(batch, path)
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), AuditError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).path_context(path)
}
