//! Browser timestamp encodings.
//!
//! Chromium stores times as microseconds since 1601-01-01 00:00:00 UTC (the
//! Windows FILETIME epoch). Firefox stores `creationTime`/`lastAccessed` as
//! microseconds since the Unix epoch and `expiry` as plain Unix seconds.
//! Everything is converted to Unix seconds as `f64`.
//!
//! A raw value of `0` (or a NULL column) means "no timestamp" and converts to
//! `None`, never to the 1601 or 1970 epoch.

use crate::base::auditerror::AuditError;
use std::fmt;
use time::OffsetDateTime;

/// Seconds between 1601-01-01 and 1970-01-01.
pub const CHROME_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// The same offset in microseconds.
///
/// Reference: `base/time/time.h`
pub const CHROME_EPOCH_OFFSET_MICROS: i64 = CHROME_EPOCH_OFFSET_SECS * 1_000_000;

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// How a raw integer timestamp column is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEncoding {
    /// Microseconds since 1601-01-01 (Chrome, Edge, Chromium).
    ChromeMicros,
    /// Microseconds since 1970-01-01 (Firefox `creationTime`, `lastAccessed`).
    UnixMicros,
    /// Seconds since 1970-01-01 (Firefox `expiry`).
    UnixSeconds,
}

impl fmt::Display for TimeEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeEncoding::ChromeMicros => "chrome microseconds",
            TimeEncoding::UnixMicros => "unix microseconds",
            TimeEncoding::UnixSeconds => "unix seconds",
        })
    }
}

/// Convert a non-zero raw timestamp, reporting values that do not map to a real instant.
///
/// Negative raw values and results outside the range `time` can represent are
/// rejected with [`AuditError::ConversionSkipped`].
pub fn try_to_unix_seconds(raw: i64, encoding: TimeEncoding) -> Result<f64, AuditError> {
    let skipped = || AuditError::ConversionSkipped { raw, encoding };

    if raw < 0 {
        return Err(skipped());
    }

    let secs = match encoding {
        TimeEncoding::ChromeMicros => (raw - CHROME_EPOCH_OFFSET_MICROS) as f64 / MICROS_PER_SEC,
        TimeEncoding::UnixMicros => raw as f64 / MICROS_PER_SEC,
        TimeEncoding::UnixSeconds => raw as f64,
    };

    if !secs.is_finite() || OffsetDateTime::from_unix_timestamp(secs.trunc() as i64).is_err() {
        return Err(skipped());
    }
    Ok(secs)
}

/// Best-effort conversion to Unix seconds.
///
/// `None` and `0` mean "no timestamp". Unconvertible values are logged and
/// dropped to `None` so one bad column never aborts a batch.
pub fn to_unix_seconds(raw: Option<i64>, encoding: TimeEncoding) -> Option<f64> {
    let raw = raw.filter(|&v| v != 0)?;
    match try_to_unix_seconds(raw, encoding) {
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::trace!(raw, %encoding, error = %e, "timestamp conversion skipped");
            None
        }
    }
}

/// Convert Unix seconds back to Chrome epoch microseconds, `None` on overflow.
pub fn unix_to_chrome_micros(unix_secs: i64) -> Option<i64> {
    unix_secs
        .checked_mul(1_000_000)?
        .checked_add(CHROME_EPOCH_OFFSET_MICROS)
}

/// Interpret Unix seconds as an instant, if representable.
pub fn to_offset_datetime(unix_secs: f64) -> Option<OffsetDateTime> {
    if !unix_secs.is_finite() {
        return None;
    }
    OffsetDateTime::from_unix_timestamp_nanos((unix_secs * 1e9) as i128).ok()
}

/// Unix seconds for an instant, with sub-second precision.
pub fn unix_seconds_of(instant: OffsetDateTime) -> f64 {
    instant.unix_timestamp_nanos() as f64 / 1e9
}
