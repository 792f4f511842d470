//! Example: Audit the local browsers' cookie stores.
//!
//! Classifies every cookie of each installed browser and prints a summary plus
//! the first few tracking cookies with their reasons.
//!
//! Usage: cargo run --example audit_browsers -- [BROWSER...] [--domain PATTERN] [--rules FILE] [--out DIR]
//!
//! With no browser names, every supported browser is tried. Stores are read
//! from snapshot copies, so a running browser is fine.

use cookieaudit::audit::{AuditConfig, CookieAuditor, StoreSource};
use cookieaudit::classify::rules::RuleTable;
use cookieaudit::cookies::browser::Browser;
use cookieaudit::cookies::persistence::save_batch;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut browsers = Vec::new();
    let mut domains = Vec::new();
    let mut rules = None;
    let mut out_dir = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--domain" => domains.extend(args.next()),
            "--rules" => rules = args.next().map(PathBuf::from),
            "--out" => out_dir = args.next().map(PathBuf::from),
            name => browsers.push(name.parse::<Browser>()?),
        }
    }
    if browsers.is_empty() {
        browsers = Browser::ALL.to_vec();
    }

    let mut config = AuditConfig::new().with_domain_filter(domains);
    if let Some(path) = rules {
        config = config.with_rules(RuleTable::load(&path)?);
    }
    let auditor = CookieAuditor::new(config)?;

    println!("=== Cookie Audit ===\n");

    let mut sources = Vec::new();
    for browser in browsers {
        match StoreSource::from_browser(browser, None) {
            Ok(source) if source.path.exists() => sources.push(source),
            Ok(source) => println!("--- {} ---\n  Store not found: {}\n", browser, source.path.display()),
            Err(e) => println!("--- {} ---\n  {}\n", browser, e),
        }
    }

    for outcome in auditor.audit_stores(sources).await {
        println!("--- {} ---", outcome.source.label);
        let audit = match outcome.result {
            Ok(audit) => audit,
            Err(e) => {
                println!("  Error ({}): {}\n", e.kind(), e);
                continue;
            }
        };

        if audit.snapshot.is_degraded() {
            println!("  Warning: read the live store, results may be incomplete");
        }
        for warning in &audit.warnings {
            println!("  Warning: {}", warning);
        }

        let s = &audit.batch.summary;
        println!("  Cookies:      {}", s.total_cookies);
        println!("  Tracking:     {} ({}%)", s.tracking_cookies, s.tracking_percentage);
        println!("  Third-party:  {}", s.third_party_cookies);
        println!("  Domains:      {}", s.unique_domains);
        if audit.skipped_rows > 0 {
            println!("  Skipped rows: {}", audit.skipped_rows);
        }

        for item in audit.batch.tracking.iter().take(5) {
            println!("    - {} ({})", item.cookie.name, item.cookie.domain);
            for reason in &item.classification.reasons {
                println!("        {}", reason);
            }
        }
        if audit.batch.tracking.len() > 5 {
            println!("    ... and {} more", audit.batch.tracking.len() - 5);
        }

        if let Some(dir) = &out_dir {
            let path = dir.join(format!("{}_classified.json", outcome.source.label));
            save_batch(&audit.batch, &path)?;
            println!("  Saved: {}", path.display());
        }
        println!();
    }

    Ok(())
}
