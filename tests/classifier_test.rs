use cookieaudit::classify::classifier::Classifier;
use cookieaudit::classify::domainindex::DomainIndex;
use cookieaudit::classify::rules::RuleTable;
use cookieaudit::cookies::cookie::{normalize_domain, Cookie, SameSite};
use cookieaudit::cookies::timecodec::{to_unix_seconds, TimeEncoding};
use time::macros::datetime;
use time::OffsetDateTime;

const NOW: OffsetDateTime = datetime!(2025-01-01 0:00 UTC);
const DAY: f64 = 86_400.0;

fn classifier() -> Classifier {
    Classifier::new(RuleTable::builtin()).unwrap()
}

fn now_secs() -> f64 {
    NOW.unix_timestamp() as f64
}

fn mixed_batch() -> Vec<Cookie> {
    vec![
        Cookie::new(".example.com", "session_id", "1", "/"),
        Cookie::new("shop.example.com", "cart", "2", "/"),
        Cookie::new(".doubleclick.net", "IDE", "3", "/")
            .with_expires(Some(now_secs() + 390.0 * DAY))
            .with_secure(true)
            .with_same_site(Some(SameSite::NoRestriction)),
        Cookie::new("news.bbc.co.uk", "prefs", "4", "/").with_expires(Some(now_secs() + 30.0 * DAY)),
        Cookie::new("cdn.widgets.io", "theme", "5", "/")
            .with_secure(true)
            .with_same_site(Some(SameSite::NoRestriction)),
        Cookie::new("", "orphan", "6", "/"),
    ]
}

#[test]
fn test_reference_tracker_cookie() {
    let cookie = Cookie::new("doubleclick.net", "_ga", "GA1.2.3", "/")
        .with_expires(Some(now_secs() + 400.0 * DAY))
        .with_secure(true)
        .with_same_site(Some(SameSite::NoRestriction));

    let c = classifier().classify(&cookie, &DomainIndex::new(), NOW);
    assert!(c.is_tracking);
    assert!(c.is_third_party);
    assert!(c.features.known_tracker);
    assert!(c.features.long_expiration);
    assert!(!c.reasons.is_empty());
}

#[test]
fn test_shared_base_domain_is_first_party() {
    let batch = classifier().classify_batch(
        vec![
            Cookie::new("example.com", "session", "a", "/"),
            Cookie::new("shop.example.com", "cart", "b", "/"),
        ],
        NOW,
    );
    let cart = batch.iter().find(|c| c.cookie.name == "cart").unwrap();
    assert!(!cart.classification.is_third_party);
}

#[test]
fn test_summary_partitions_add_up() {
    let batch = classifier().classify_batch(mixed_batch(), NOW);
    let s = batch.summary;

    assert_eq!(s.total_cookies, 6);
    assert_eq!(s.tracking_cookies + s.non_tracking_cookies, s.total_cookies);
    assert_eq!(s.first_party_cookies + s.third_party_cookies, s.total_cookies);
    assert_eq!(batch.tracking.len(), s.tracking_cookies);
    assert_eq!(batch.non_tracking.len(), s.non_tracking_cookies);
}

#[test]
fn test_reasons_empty_iff_not_tracking() {
    let batch = classifier().classify_batch(mixed_batch(), NOW);
    for item in batch.iter() {
        assert_eq!(
            item.classification.reasons.is_empty(),
            !item.classification.is_tracking,
            "cookie {}",
            item.cookie.name
        );
    }
}

#[test]
fn test_mixed_batch_verdicts() {
    let batch = classifier().classify_batch(mixed_batch(), NOW);
    let verdict = |name: &str| {
        batch
            .iter()
            .find(|c| c.cookie.name == name)
            .map(|c| c.classification.clone())
            .unwrap()
    };

    assert!(verdict("session_id").features.suspicious_name);
    assert!(!verdict("cart").is_tracking);
    assert!(!verdict("prefs").is_tracking);

    let ide = verdict("IDE");
    assert!(ide.is_third_party);
    assert!(ide.features.long_expiration);

    let theme = verdict("theme");
    assert!(theme.is_third_party);
    assert_eq!(
        theme.reasons,
        vec!["SameSite=None and Secure attribute indicates third-party usage".to_string()]
    );

    let orphan = verdict("orphan");
    assert!(!orphan.is_third_party);
}

#[test]
fn test_order_preserved_within_groups() {
    let batch = classifier().classify_batch(mixed_batch(), NOW);
    let names: Vec<&str> = batch
        .non_tracking
        .iter()
        .map(|c| c.cookie.name.as_str())
        .collect();
    assert_eq!(names, vec!["cart", "prefs", "orphan"]);
}

#[test]
fn test_classification_is_deterministic_for_fixed_now() {
    let first = classifier().classify_batch(mixed_batch(), NOW);
    let second = classifier().classify_batch(mixed_batch(), NOW);
    assert_eq!(first, second);
}

#[test]
fn test_evaluation_time_changes_long_expiration() {
    let cookie = Cookie::new("example.com", "cart", "1", "/")
        .with_expires(Some(now_secs() + 380.0 * DAY));
    let index = DomainIndex::from_domains(["example.com"]);

    let today = classifier().classify(&cookie, &index, NOW);
    assert!(today.features.long_expiration);

    let later = classifier().classify(&cookie, &index, datetime!(2025-02-01 0:00 UTC));
    assert!(!later.features.long_expiration);
}

#[test]
fn test_empty_batch_summary() {
    let batch = classifier().classify_batch(Vec::new(), NOW);
    assert_eq!(batch.summary.total_cookies, 0);
    assert_eq!(batch.summary.tracking_percentage, 0.0);
    assert_eq!(batch.summary.unique_domains, 0);
}

#[test]
fn test_unique_domains_counts_reductions() {
    let batch = classifier().classify_batch(
        vec![
            Cookie::new("a.example.com", "x", "1", "/"),
            Cookie::new("b.example.com", "y", "1", "/"),
        ],
        NOW,
    );
    // a.example.com, b.example.com, example.com
    assert_eq!(batch.summary.unique_domains, 3);
}

#[test]
fn test_unique_domains_counts_missing_domain() {
    let batch = classifier().classify_batch(
        vec![
            Cookie::new("example.com", "x", "1", "/"),
            Cookie::new("", "y", "1", "/"),
            Cookie::new(".", "z", "1", "/"),
        ],
        NOW,
    );
    assert_eq!(batch.summary.unique_domains, 2);
    assert_eq!(batch.summary.third_party_cookies, 0);
}

#[test]
fn test_domain_normalization_idempotent() {
    for domain in [".a.b.example", "a.b.example", "...x", ""] {
        let once = normalize_domain(domain);
        assert_eq!(normalize_domain(once), once);
    }
}

#[test]
fn test_time_codec_reference_values() {
    assert_eq!(
        to_unix_seconds(Some(13_275_776_400_000_000), TimeEncoding::ChromeMicros),
        Some(1_631_302_800.0)
    );
    assert_eq!(to_unix_seconds(Some(0), TimeEncoding::ChromeMicros), None);
    assert_eq!(to_unix_seconds(None, TimeEncoding::UnixSeconds), None);
}
