//! Tracking and third-party classification.
//!
//! - **Rules**: versioned heuristic lists, built-in or loaded from JSON ([`rules`])
//! - **Domain Index**: observed domains of one batch ([`domainindex`])
//! - **Classifier**: per-cookie verdict with reasons ([`classifier`])
//! - **Aggregator**: batch summary ([`aggregate`])
//!
//! Classification is deterministic for a given rule table, batch and
//! evaluation instant.
//!
//! ```rust
//! use cookieaudit::classify::classifier::Classifier;
//! use cookieaudit::classify::rules::RuleTable;
//! use cookieaudit::cookies::cookie::Cookie;
//! use time::OffsetDateTime;
//!
//! let classifier = Classifier::new(RuleTable::builtin())?;
//! let batch = classifier.classify_batch(
//!     vec![Cookie::new(".doubleclick.net", "IDE", "x", "/")],
//!     OffsetDateTime::now_utc(),
//! );
//! assert_eq!(batch.summary.tracking_cookies, 1);
//! # Ok::<(), cookieaudit::base::auditerror::AuditError>(())
//! ```

pub mod aggregate;
pub mod classifier;
pub mod domainindex;
pub mod rules;
