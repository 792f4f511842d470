//! Curated heuristic rule tables.
//!
//! All list-driven signals read their patterns from a [`RuleTable`]. The
//! built-in table is [`RuleTable::builtin`]; updated tables can be loaded from
//! JSON without touching the classifier. Order inside each list is significant:
//! the first matching entry is the one named in the classification reason.

use crate::base::auditerror::AuditError;
use crate::base::context::IoResultExt;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version of the built-in table.
pub const BUILTIN_RULES_VERSION: u32 = 1;

/// Cookie name prefixes used by common analytics and ad SDKs.
const TRACKING_PREFIXES: &[&str] = &[
    "_ga", "_gid", "_gcl", "_fbp", "_uetsid", "_uetvid", "_hjid", "_hj", "AMP_TOKEN", "AMCV_",
    "AMCVS_", "NID", "IDE", "uuid", "UIDR", "VISITOR", "segment_", "track", "mp_", "mixpanel",
    "amplitude", "parsely_", "personalization_id", "utag_", "intercom-", "km_", "id",
];

/// Domain substrings of well-known tracking and ad networks.
const TRACKING_DOMAINS: &[&str] = &[
    "analytics", "tracker", "pixel", "ad.", "ads.", "adservice", "doubleclick",
    "google-analytics", "googletagmanager", "googlesyndication", "facebook", "twitter",
    "linkedin", "yahoo", "criteo", "quantserve", "mediamath", "adroll", "taboola", "outbrain",
    "pubmatic", "rubiconproject", "adnxs", "amazon-adsystem", "scorecardresearch",
    "casalemedia",
];

/// Domain substrings that mark a cookie third-party outright.
const THIRD_PARTY_DOMAINS: &[&str] = &[
    // Analytics & measurement
    "google-analytics", "doubleclick", "analytics", "segment.io", "mixpanel", "amplitude",
    "chartbeat", "clarity.ms", "hotjar", "parsely", "stats",
    // Advertising platforms
    "adsystem", "adnxs", "adserver", "adsrvr", "pubmatic", "rubiconproject", "taboola",
    "outbrain", "criteo", "mediamath", "advertising.com",
    // Tracking & fingerprinting
    "scorecardresearch", "qualtrics", "quantserve", "trustarc", "moatads", "mathtag",
    "techtarget", "fingerprint", "muid", "onetrust",
    // Social
    "facebook", "fbcdn", "twitter", "linkedin", "pinterest", "tiktok",
    // Shared identity
    "sharedid", "rlcdn", "bizible", "demdex", "optimizely", "branch.io",
];

/// Exact cookie names set by third-party trackers.
const TRACKING_COOKIE_NAMES: &[&str] = &[
    "_ga", "_gcl_au", "_fbp", "_scid", "_uetsid", "_uetvid", "MUID", "NID", "_sharedid",
    "OptanonConsent", "cf_clearance",
];

const KEYWORD_CATEGORIES: &[(&str, &[&str])] = &[
    ("tracking", &["tracking", "tracker", "analytics", "pixel", "stat"]),
    ("advertising", &["ad", "ads", "advert", "banner", "sponsor", "marketing"]),
    ("consent", &["consent", "gdpr", "ccpa", "privacy", "cookie-law"]),
    ("sharing", &["share", "social", "connect", "widget"]),
];

const IDENTIFIER_PATTERN: &str = "(id|uid|user|visitor|session|tracking)";

const FINGERPRINTING_TERMS: &[&str] = &["canvas", "webgl", "audio", "fingerprint", "device"];

const LONG_EXPIRATION_DAYS: i64 = 365;

/// A named group of domain keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordCategory {
    pub category: String,
    pub patterns: Vec<String>,
}

/// Versioned, ordered heuristic data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleTable {
    pub version: u32,
    /// Case-insensitive name prefixes (tracking signal 1).
    pub tracking_prefixes: Vec<String>,
    /// Case-insensitive name regex (tracking signal 2).
    pub identifier_pattern: String,
    /// Domain substrings (tracking signal 3).
    pub tracking_domains: Vec<String>,
    /// Domain substrings (third-party rule 2).
    pub third_party_domains: Vec<String>,
    /// Exact, case-sensitive names (third-party rule 3).
    pub tracking_cookie_names: Vec<String>,
    /// Domain keywords by category (third-party rule 6).
    pub third_party_keywords: Vec<KeywordCategory>,
    /// Case-insensitive name substrings (tracking signal 6).
    pub fingerprinting_terms: Vec<String>,
    /// Expiry horizon, in whole days, beyond which a cookie is long-lived.
    pub long_expiration_days: i64,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleTable {
    /// The rule table shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_RULES_VERSION,
            tracking_prefixes: owned(TRACKING_PREFIXES),
            identifier_pattern: IDENTIFIER_PATTERN.to_string(),
            tracking_domains: owned(TRACKING_DOMAINS),
            third_party_domains: owned(THIRD_PARTY_DOMAINS),
            tracking_cookie_names: owned(TRACKING_COOKIE_NAMES),
            third_party_keywords: KEYWORD_CATEGORIES
                .iter()
                .map(|(category, patterns)| KeywordCategory {
                    category: category.to_string(),
                    patterns: owned(patterns),
                })
                .collect(),
            fingerprinting_terms: owned(FINGERPRINTING_TERMS),
            long_expiration_days: LONG_EXPIRATION_DAYS,
        }
    }

    /// Parse and validate a JSON rule table.
    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        let table: RuleTable = serde_json::from_str(json)
            .map_err(|e| AuditError::invalid_rules(format!("malformed rule table: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    /// Load a JSON rule table from disk.
    pub fn load(path: &Path) -> Result<Self, AuditError> {
        let json = std::fs::read_to_string(path).path_context(path)?;
        let table = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), version = table.version, "rule table loaded");
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tables that would silently match everything or nothing.
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.version == 0 {
            return Err(AuditError::invalid_rules("version must be at least 1"));
        }
        if self.long_expiration_days < 0 {
            return Err(AuditError::invalid_rules(
                "long_expiration_days must not be negative",
            ));
        }

        let lists = [
            ("tracking_prefixes", &self.tracking_prefixes),
            ("tracking_domains", &self.tracking_domains),
            ("third_party_domains", &self.third_party_domains),
            ("tracking_cookie_names", &self.tracking_cookie_names),
            ("fingerprinting_terms", &self.fingerprinting_terms),
        ];
        for (name, list) in lists {
            if list.iter().any(|p| p.is_empty()) {
                return Err(AuditError::invalid_rules(format!(
                    "{} contains an empty pattern",
                    name
                )));
            }
        }
        for category in &self.third_party_keywords {
            if category.patterns.iter().any(|p| p.is_empty()) {
                return Err(AuditError::invalid_rules(format!(
                    "keyword category '{}' contains an empty pattern",
                    category.category
                )));
            }
        }

        self.compile_identifier_pattern()?;
        Ok(())
    }

    pub(crate) fn compile_identifier_pattern(&self) -> Result<regex::Regex, AuditError> {
        if self.identifier_pattern.is_empty() {
            return Err(AuditError::invalid_rules("identifier_pattern is empty"));
        }
        RegexBuilder::new(&self.identifier_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AuditError::invalid_rules(format!("identifier_pattern: {}", e)))
    }
}
