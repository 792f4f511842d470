//! Rule-ordered tracking and third-party classification.
//!
//! Tracking signals are all evaluated, in a fixed order; every match adds a
//! reason and a feature flag. The third-party test is first-match-wins:
//!
//! | # | Rule | Verdict |
//! |---|------|---------|
//! | 1 | no domain | first-party |
//! | 2 | domain contains a third-party domain pattern | third-party |
//! | 3 | name is a known tracking cookie | third-party |
//! | 4 | `SameSite=None` and `Secure` | third-party |
//! | 5 | domain matches the batch's [`DomainIndex`] | first-party |
//! | 6 | domain contains a category keyword | third-party |
//! | 7 | anything else | third-party |
//!
//! Classification depends on the evaluation instant (long-expiration signal),
//! which is always passed in explicitly.

use crate::base::auditerror::AuditError;
use crate::classify::aggregate::{summarize, Summary};
use crate::classify::domainindex::DomainIndex;
use crate::classify::rules::RuleTable;
use crate::cookies::cookie::{normalize_domain, Cookie, SameSite};
use crate::cookies::timecodec::unix_seconds_of;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const SECS_PER_DAY: f64 = 86_400.0;

/// Feature flags set by the tracking signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub known_tracker: bool,
    pub fingerprinting_related: bool,
    pub long_expiration: bool,
    pub third_party: bool,
    pub suspicious_name: bool,
}

/// Verdict for one cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub is_tracking: bool,
    pub is_third_party: bool,
    /// One entry per triggered signal, in evaluation order.
    pub reasons: Vec<String>,
    pub features: Features,
}

/// Which third-party rule decided the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdPartyRule {
    NoDomain,
    TrackingDomain,
    TrackingCookieName,
    SameSiteNoneSecure,
    FirstPartyDomain,
    CategoryKeyword,
    Unmatched,
}

/// Outcome of the third-party test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyVerdict {
    pub is_third_party: bool,
    pub rule: ThirdPartyRule,
    /// Present whenever `is_third_party` is true.
    pub reason: Option<String>,
}

impl ThirdPartyVerdict {
    fn first_party(rule: ThirdPartyRule) -> Self {
        Self {
            is_third_party: false,
            rule,
            reason: None,
        }
    }

    fn third_party(rule: ThirdPartyRule, reason: String) -> Self {
        Self {
            is_third_party: true,
            rule,
            reason: Some(reason),
        }
    }
}

/// A cookie with its classification attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCookie {
    #[serde(flatten)]
    pub cookie: Cookie,
    pub classification: Classification,
}

/// Classification output for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedBatch {
    pub tracking: Vec<ClassifiedCookie>,
    pub non_tracking: Vec<ClassifiedCookie>,
    pub summary: Summary,
}

impl ClassifiedBatch {
    /// All cookies, tracking first, each group in input order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedCookie> {
        self.tracking.iter().chain(self.non_tracking.iter())
    }
}

/// Heuristic cookie classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTable,
    identifier: Regex,
    lowercase_prefixes: Vec<String>,
}

impl Classifier {
    /// Build a classifier over a validated rule table.
    pub fn new(rules: RuleTable) -> Result<Self, AuditError> {
        rules.validate()?;
        let identifier = rules.compile_identifier_pattern()?;
        let lowercase_prefixes = rules
            .tracking_prefixes
            .iter()
            .map(|p| p.to_lowercase())
            .collect();
        Ok(Self {
            rules,
            identifier,
            lowercase_prefixes,
        })
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Classify a whole batch at `now`.
    ///
    /// The [`DomainIndex`] is built once over `cookies`. Cookies keep their input
    /// order within the tracking and non-tracking groups.
    pub fn classify_batch(&self, cookies: Vec<Cookie>, now: OffsetDateTime) -> ClassifiedBatch {
        let index = DomainIndex::build(&cookies);

        let (tracking, non_tracking): (Vec<_>, Vec<_>) = cookies
            .into_iter()
            .map(|cookie| {
                let classification = self.classify(&cookie, &index, now);
                ClassifiedCookie {
                    cookie,
                    classification,
                }
            })
            .partition(|c| c.classification.is_tracking);

        let summary = summarize(&tracking, &non_tracking, index.len());
        tracing::debug!(
            total = summary.total_cookies,
            tracking = summary.tracking_cookies,
            third_party = summary.third_party_cookies,
            "cookie batch classified"
        );

        ClassifiedBatch {
            tracking,
            non_tracking,
            summary,
        }
    }

    /// Classify one cookie against a batch's domain index.
    pub fn classify(
        &self,
        cookie: &Cookie,
        index: &DomainIndex,
        now: OffsetDateTime,
    ) -> Classification {
        let name = cookie.name.as_str();
        let name_lower = name.to_lowercase();
        let domain = normalize_domain(&cookie.domain).to_lowercase();

        let mut features = Features::default();
        let mut reasons = Vec::new();

        // 1. Tracking name prefix
        if let Some(idx) = self
            .lowercase_prefixes
            .iter()
            .position(|p| name_lower.starts_with(p.as_str()))
        {
            reasons.push(format!(
                "Name starts with tracking prefix '{}'",
                self.rules.tracking_prefixes[idx]
            ));
            features.known_tracker = true;
        }

        // 2. Identifier-like name
        if self.identifier.is_match(name) {
            reasons.push("Name contains tracking identifiers".to_string());
            features.suspicious_name = true;
        }

        // 3. Tracking domain
        if let Some(pattern) = first_contained(&domain, &self.rules.tracking_domains) {
            reasons.push(format!(
                "Domain contains known tracking pattern '{}'",
                pattern
            ));
            features.known_tracker = true;
        }

        // 4. Third party
        let verdict = self.third_party(cookie, index);
        features.third_party = verdict.is_third_party;
        if let Some(reason) = verdict.reason {
            reasons.push(reason);
        }

        // 5. Long expiration
        if let Some(days) = self.days_until_expiry(cookie, now) {
            if days > self.rules.long_expiration_days {
                reasons.push(format!("Long-lived cookie (expires in {} days)", days));
                features.long_expiration = true;
            }
        }

        // 6. Fingerprinting
        if self
            .rules
            .fingerprinting_terms
            .iter()
            .any(|term| name_lower.contains(&term.to_lowercase()))
        {
            reasons.push("Cookie name suggests fingerprinting".to_string());
            features.fingerprinting_related = true;
        }

        Classification {
            is_tracking: !reasons.is_empty(),
            is_third_party: verdict.is_third_party,
            reasons,
            features,
        }
    }

    /// Run the ordered third-party test for one cookie.
    pub fn third_party(&self, cookie: &Cookie, index: &DomainIndex) -> ThirdPartyVerdict {
        let domain = normalize_domain(&cookie.domain).to_lowercase();

        if domain.is_empty() {
            return ThirdPartyVerdict::first_party(ThirdPartyRule::NoDomain);
        }

        if let Some(pattern) = first_contained(&domain, &self.rules.third_party_domains) {
            return ThirdPartyVerdict::third_party(
                ThirdPartyRule::TrackingDomain,
                format!("Domain contains known tracking pattern '{}'", pattern),
            );
        }

        if self.rules.tracking_cookie_names.iter().any(|n| *n == cookie.name) {
            return ThirdPartyVerdict::third_party(
                ThirdPartyRule::TrackingCookieName,
                format!("Cookie name matches known tracking cookie '{}'", cookie.name),
            );
        }

        if cookie.same_site == Some(SameSite::NoRestriction) && cookie.secure {
            return ThirdPartyVerdict::third_party(
                ThirdPartyRule::SameSiteNoneSecure,
                "SameSite=None and Secure attribute indicates third-party usage".to_string(),
            );
        }

        if index.matches(&domain) {
            return ThirdPartyVerdict::first_party(ThirdPartyRule::FirstPartyDomain);
        }

        for category in &self.rules.third_party_keywords {
            if let Some(pattern) = first_contained(&domain, &category.patterns) {
                return ThirdPartyVerdict::third_party(
                    ThirdPartyRule::CategoryKeyword,
                    format!("Domain contains known third-party pattern '{}'", pattern),
                );
            }
        }

        // TODO: back this default with a public-suffix lookup; unseen first-party
        // domains with no keyword overlap currently land here.
        ThirdPartyVerdict::third_party(
            ThirdPartyRule::Unmatched,
            "Domain does not match any first-party domain and is likely third-party".to_string(),
        )
    }

    /// Whole days from `now` until the cookie expires, rounded down.
    fn days_until_expiry(&self, cookie: &Cookie, now: OffsetDateTime) -> Option<i64> {
        let expires = cookie.expires.filter(|t| t.is_finite())?;
        let days = ((expires - unix_seconds_of(now)) / SECS_PER_DAY).floor();
        (days.abs() < i64::MAX as f64).then_some(days as i64)
    }
}

fn first_contained<'a>(haystack: &str, patterns: &'a [String]) -> Option<&'a str> {
    patterns
        .iter()
        .find(|p| haystack.contains(&p.to_lowercase()))
        .map(String::as_str)
}
