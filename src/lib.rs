//! # cookieaudit
//!
//! Offline, explainable tracking analysis of browser cookie stores.
//!
//! `cookieaudit` reads Chromium-family and Firefox cookie databases, converts
//! every row to a canonical [`Cookie`](cookies::cookie::Cookie), and labels each
//! cookie as tracking or not and as first- or third-party, with the reasons
//! that triggered each verdict.
//!
//! ## Features
//!
//! - **Store discovery**: default locations for Chrome, Chromium, Edge and Firefox
//! - **Safe reads**: scoped snapshot copies, so a running browser's lock never matters
//! - **Schema fallback**: older stores without `samesite`/`source_scheme` still load
//! - **Rule tables**: versioned heuristic lists, built in or loaded from JSON
//! - **Multi-store runs**: independent stores audited concurrently
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cookieaudit::audit::{AuditConfig, CookieAuditor, StoreSource};
//! use cookieaudit::cookies::browser::Browser;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cookieaudit::base::auditerror::AuditError> {
//!     let auditor = CookieAuditor::new(AuditConfig::new())?;
//!     let sources = vec![
//!         StoreSource::from_browser(Browser::Chrome, None)?,
//!         StoreSource::from_browser(Browser::Firefox, None)?,
//!     ];
//!     for outcome in auditor.audit_stores(sources).await {
//!         match outcome.result {
//!             Ok(audit) => println!("{}: {:?}", outcome.source.label, audit.batch.summary),
//!             Err(e) => eprintln!("{}: {}", outcome.source.label, e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error taxonomy and reader state
//! - [`cookies`] - Store discovery, reading, normalization and persistence
//! - [`classify`] - Rule tables, domain index, classifier and summary
//! - [`audit`] - End-to-end pipeline over one or many stores
//!
//! ## Time dependence
//!
//! The long-expiration signal compares expiry against an evaluation instant.
//! Pass a fixed instant with [`AuditConfig::with_now`](audit::AuditConfig::with_now)
//! for reproducible results.

pub mod audit;
pub mod base;
pub mod classify;
pub mod cookies;
