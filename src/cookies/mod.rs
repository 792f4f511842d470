//! Cookie store extraction.
//!
//! This module reads browser cookie stores and produces canonical [`Cookie`](cookie::Cookie)
//! records:
//!
//! - **Discovery**: default store locations per browser and OS ([`browser`])
//! - **Snapshot**: private copies of live stores, removed on drop ([`snapshot`])
//! - **Store Reader**: schema detection with a one-step fallback, raw rows ([`store`])
//! - **Normalizer**: raw rows to [`Cookie`](cookie::Cookie), via the [`timecodec`]
//! - **Persistence**: JSON import/export ([`persistence`])
//!
//! # Architecture
//!
//! | Dialect | Table | Time encoding | Fallback columns |
//! |---------|-------|---------------|------------------|
//! | Chromium (Chrome, Edge) | `cookies` | µs since 1601 | drop `samesite`, `source_scheme` |
//! | Firefox | `moz_cookies` | µs / s since 1970 | drop `schemeMap` |
//!
//! # Reading a store
//!
//! ```rust,no_run
//! use cookieaudit::cookies::browser::Dialect;
//! use cookieaudit::cookies::normalize::normalize_all;
//! use cookieaudit::cookies::snapshot::Snapshot;
//! use cookieaudit::cookies::store::StoreReader;
//! use std::path::Path;
//!
//! let source = Path::new("/home/me/.config/google-chrome/Default/Cookies");
//! let snapshot = Snapshot::take(source)?;
//! let mut reader = StoreReader::open_snapshot(snapshot.path(), Dialect::Chromium)?;
//! let cookies = normalize_all(reader.read_rows()?.rows);
//! println!("Found {} cookies", cookies.len());
//! # Ok::<(), cookieaudit::base::auditerror::AuditError>(())
//! ```

pub mod browser;
pub mod cookie;
pub mod normalize;
pub mod persistence;
pub mod schema;
pub mod snapshot;
pub mod store;
pub mod timecodec;
