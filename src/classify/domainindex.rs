//! Observed-domain index for first-party detection.
//!
//! Built once per batch: every cookie domain, plus the last two labels of any
//! domain with three or more labels (`sub.example.com` adds `example.com`).
//! There is no public-suffix knowledge, so `a.example.co.uk` reduces to
//! `co.uk`; multi-label suffixes group unrelated sites together.

use crate::cookies::cookie::{normalize_domain, Cookie};
use std::collections::{BTreeSet, HashSet};

/// Last two dot-separated labels of a domain with more than two labels.
pub fn reduce_domain(domain: &str) -> Option<&str> {
    base_domain(domain).filter(|base| base.len() < domain.len())
}

/// Last two labels of a domain with at least two labels.
fn base_domain(domain: &str) -> Option<&str> {
    let last_dot = domain.rfind('.')?;
    match domain[..last_dot].rfind('.') {
        Some(dot) => Some(&domain[dot + 1..]),
        None => Some(domain),
    }
}

/// Set of domains observed in one batch.
#[derive(Debug, Clone, Default)]
pub struct DomainIndex {
    domains: BTreeSet<String>,
    // Two-label bases of every entry, for the shared-base test.
    bases: HashSet<String>,
}

impl DomainIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every cookie domain of a batch.
    pub fn build(cookies: &[Cookie]) -> Self {
        Self::from_domains(cookies.iter().map(|c| c.domain.as_str()))
    }

    pub fn from_domains<'a>(domains: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = Self::new();
        for domain in domains {
            index.insert(domain);
        }
        index
    }

    /// Add a domain and, if it has more than two labels, its reduction.
    ///
    /// An empty domain is an entry too; it only matches domains ending in `.`.
    pub fn insert(&mut self, domain: &str) {
        let domain = normalize_domain(domain).to_ascii_lowercase();
        if let Some(reduced) = reduce_domain(&domain) {
            self.add(reduced.to_string());
        }
        self.add(domain);
    }

    fn add(&mut self, domain: String) {
        if let Some(base) = base_domain(&domain) {
            self.bases.insert(base.to_string());
        }
        self.domains.insert(domain);
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Number of distinct entries, reductions included.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Entries in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    /// Whether `domain` equals an entry, is a subdomain of one, or shares its
    /// last two labels with one.
    ///
    /// `domain` must already be normalized and lowercase.
    pub fn matches(&self, domain: &str) -> bool {
        if self.domains.contains(domain) {
            return true;
        }

        // Dot-suffix: any proper parent of `domain` present as an entry.
        let mut rest = domain;
        while let Some(dot) = rest.find('.') {
            rest = &rest[dot + 1..];
            if self.domains.contains(rest) {
                return true;
            }
        }

        base_domain(domain).is_some_and(|base| self.bases.contains(base))
    }
}
