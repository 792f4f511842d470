//! End-to-end store audits.
//!
//! One pipeline per store: snapshot, read, normalize, filter, classify. Stores
//! are independent, so [`CookieAuditor::audit_stores`] runs each one on the
//! blocking pool and reports a [`StoreOutcome`] per source. A failed store is an
//! `Err` in its outcome and never hides behind an empty batch.

use crate::base::auditerror::AuditError;
use crate::classify::classifier::{ClassifiedBatch, Classifier};
use crate::classify::rules::RuleTable;
use crate::cookies::browser::{Browser, Dialect};
use crate::cookies::cookie::Cookie;
use crate::cookies::normalize::normalize_all;
use crate::cookies::schema::ColumnSet;
use crate::cookies::snapshot::{Snapshot, SnapshotMode};
use crate::cookies::store::StoreReader;
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;

/// A cookie store to audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSource {
    /// Display name, e.g. `chrome` or a file name.
    pub label: String,
    pub path: PathBuf,
    pub dialect: Dialect,
    /// Where snapshot copies go. Defaults to the system temp directory.
    pub snapshot_dir: Option<PathBuf>,
}

impl StoreSource {
    /// The default store of `browser`, optionally for a named profile.
    pub fn from_browser(browser: Browser, profile: Option<&str>) -> Result<Self, AuditError> {
        let path = browser
            .default_store_path(profile)
            .ok_or_else(|| AuditError::StoreNotFound {
                browser: browser.name().to_string(),
            })?;
        Ok(Self {
            label: browser.name().to_string(),
            path,
            dialect: browser.dialect(),
            snapshot_dir: None,
        })
    }

    /// A store at an explicit path.
    pub fn custom(label: impl Into<String>, path: impl Into<PathBuf>, dialect: Dialect) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            dialect,
            snapshot_dir: None,
        }
    }

    /// Create snapshot copies under `dir`.
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }
}

/// Normalized cookies of one store, with read diagnostics.
#[derive(Debug)]
pub struct Extraction {
    pub cookies: Vec<Cookie>,
    pub snapshot: SnapshotMode,
    pub column_set: ColumnSet,
    /// Rows the reader could not decode.
    pub skipped_rows: usize,
    /// Non-fatal conditions hit while reading.
    pub warnings: Vec<AuditError>,
}

/// Snapshot, read and normalize one store.
///
/// The snapshot copy is removed before this returns, on every path.
pub fn extract(source: &StoreSource) -> Result<Extraction, AuditError> {
    let snapshot = match &source.snapshot_dir {
        Some(base) => Snapshot::take_in(&source.path, base)?,
        None => Snapshot::take(&source.path)?,
    };
    let warnings: Vec<AuditError> = snapshot.warning(&source.path).into_iter().collect();

    let mut reader = if snapshot.is_copy() {
        StoreReader::open_snapshot(snapshot.path(), source.dialect)?
    } else {
        StoreReader::open(snapshot.path(), source.dialect)?
    };
    let raw = reader.read_rows()?;

    if raw.column_set == ColumnSet::Reduced {
        tracing::debug!(store = %source.label, "store read with reduced column set");
    }

    let cookies = normalize_all(raw.rows);
    tracing::debug!(store = %source.label, count = cookies.len(), "cookies extracted");

    Ok(Extraction {
        cookies,
        snapshot: snapshot.mode().clone(),
        column_set: raw.column_set,
        skipped_rows: raw.skipped,
        warnings,
    })
}

/// Audit configuration.
#[derive(Debug, Clone, Default)]
pub struct AuditConfig {
    rules: RuleTable,
    domain_filter: Vec<String>,
    now: Option<OffsetDateTime>,
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the built-in rule table.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// Keep only cookies whose domain contains one of `patterns`.
    pub fn with_domain_filter<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_filter = patterns
            .into_iter()
            .map(|p| p.into().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Classify against a fixed instant instead of the current time.
    pub fn with_now(mut self, now: OffsetDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn domain_filter(&self) -> &[String] {
        &self.domain_filter
    }
}

/// Classified result of one store.
#[derive(Debug)]
pub struct StoreAudit {
    pub batch: ClassifiedBatch,
    pub snapshot: SnapshotMode,
    pub column_set: ColumnSet,
    pub skipped_rows: usize,
    /// Cookies removed by the domain filter.
    pub filtered_out: usize,
    pub warnings: Vec<AuditError>,
}

/// Per-store result of a multi-store run.
#[derive(Debug)]
pub struct StoreOutcome {
    pub source: StoreSource,
    pub result: Result<StoreAudit, AuditError>,
}

impl StoreOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the audit pipeline over one or more stores.
#[derive(Debug, Clone)]
pub struct CookieAuditor {
    classifier: Arc<Classifier>,
    domain_filter: Arc<[String]>,
    now: Option<OffsetDateTime>,
}

impl CookieAuditor {
    /// Fails with `InvalidRules` if the configured rule table does not validate.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        let classifier = Classifier::new(config.rules)?;
        Ok(Self {
            classifier: Arc::new(classifier),
            domain_filter: config.domain_filter.into(),
            now: config.now,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn now(&self) -> OffsetDateTime {
        self.now.unwrap_or_else(OffsetDateTime::now_utc)
    }

    /// Apply the domain filter. Without patterns every cookie is kept.
    pub fn filter(&self, cookies: Vec<Cookie>) -> Vec<Cookie> {
        if self.domain_filter.is_empty() {
            return cookies;
        }
        cookies
            .into_iter()
            .filter(|c| {
                let domain = c.domain.to_lowercase();
                self.domain_filter.iter().any(|p| domain.contains(p.as_str()))
            })
            .collect()
    }

    /// Filter and classify cookies from any source.
    pub fn classify(&self, cookies: Vec<Cookie>) -> ClassifiedBatch {
        self.classifier.classify_batch(self.filter(cookies), self.now())
    }

    /// Run the full pipeline for one store.
    pub fn audit_store(&self, source: &StoreSource) -> Result<StoreAudit, AuditError> {
        let extraction = extract(source)?;
        let extracted = extraction.cookies.len();

        let cookies = self.filter(extraction.cookies);
        let filtered_out = extracted - cookies.len();
        if filtered_out > 0 {
            tracing::debug!(store = %source.label, kept = cookies.len(), filtered_out, "domain filter applied");
        }

        let batch = self.classifier.classify_batch(cookies, self.now());
        Ok(StoreAudit {
            batch,
            snapshot: extraction.snapshot,
            column_set: extraction.column_set,
            skipped_rows: extraction.skipped_rows,
            filtered_out,
            warnings: extraction.warnings,
        })
    }

    /// Audit every source concurrently. Outcomes come back in input order.
    pub async fn audit_stores(&self, sources: Vec<StoreSource>) -> Vec<StoreOutcome> {
        let handles: Vec<_> = sources
            .into_iter()
            .map(|source| {
                let auditor = self.clone();
                let task_source = source.clone();
                let handle = tokio::task::spawn_blocking(move || auditor.audit_store(&task_source));
                (source, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (source, handle) in handles {
            let result = handle.await.unwrap_or_else(|e| {
                tracing::error!(store = %source.label, error = %e, "store audit task failed");
                Err(AuditError::TaskFailed {
                    label: source.label.clone(),
                    reason: e.to_string(),
                })
            });
            if let Err(e) = &result {
                tracing::warn!(store = %source.label, kind = e.kind(), error = %e, "store audit failed");
            }
            outcomes.push(StoreOutcome { source, result });
        }
        outcomes
    }
}
