//! Batch summary.

use crate::classify::classifier::ClassifiedCookie;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Aggregate counts for one classified batch.
///
/// `tracking_cookies + non_tracking_cookies` and
/// `first_party_cookies + third_party_cookies` both equal `total_cookies`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_cookies: usize,
    pub tracking_cookies: usize,
    pub non_tracking_cookies: usize,
    /// Percent of cookies flagged as tracking, rounded to one decimal.
    pub tracking_percentage: f64,
    /// Size of the batch's domain index, two-label reductions included.
    pub unique_domains: usize,
    pub third_party_cookies: usize,
    pub first_party_cookies: usize,
}

/// Fold the two classified groups into a [`Summary`].
pub fn summarize(
    tracking: &[ClassifiedCookie],
    non_tracking: &[ClassifiedCookie],
    unique_domains: usize,
) -> Summary {
    let total_cookies = tracking.len() + non_tracking.len();
    let third_party_cookies = tracking
        .iter()
        .chain(non_tracking)
        .filter(|c| c.classification.is_third_party)
        .count();

    Summary {
        total_cookies,
        tracking_cookies: tracking.len(),
        non_tracking_cookies: non_tracking.len(),
        tracking_percentage: percentage(tracking.len(), total_cookies),
        unique_domains,
        third_party_cookies,
        first_party_cookies: total_cookies - third_party_cookies,
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(part as f64 / total as f64 * 100.0)
}

/// Round to one decimal place, ties to even, judged on the exact binary value.
fn round_one_decimal(x: f64) -> f64 {
    let scaled = x * 10.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor == 0.5 {
        // Only a tie if the product was exact; the FMA residue says which way it erred.
        match x.mul_add(10.0, -scaled).partial_cmp(&0.0) {
            Some(Ordering::Greater) => floor + 1.0,
            Some(Ordering::Less) => floor,
            _ => scaled.round_ties_even(),
        }
    } else {
        scaled.round()
    };
    rounded / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classifier::Classification;
    use crate::cookies::cookie::Cookie;

    fn classified(tracking: bool, third_party: bool) -> ClassifiedCookie {
        ClassifiedCookie {
            cookie: Cookie::new("example.com", "c", "v", "/"),
            classification: Classification {
                is_tracking: tracking,
                is_third_party: third_party,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_empty_batch() {
        let summary = summarize(&[], &[], 0);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.tracking_percentage, 0.0);
    }

    #[test]
    fn test_counts_add_up() {
        let tracking = vec![classified(true, true), classified(true, false)];
        let non_tracking = vec![classified(false, false)];
        let summary = summarize(&tracking, &non_tracking, 2);

        assert_eq!(summary.total_cookies, 3);
        assert_eq!(summary.tracking_cookies, 2);
        assert_eq!(summary.non_tracking_cookies, 1);
        assert_eq!(summary.third_party_cookies, 1);
        assert_eq!(summary.first_party_cookies, 2);
        assert_eq!(summary.unique_domains, 2);
    }

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(1, 8), 12.5);
        assert_eq!(percentage(3, 3), 100.0);
    }

    #[test]
    fn test_percentage_ties_round_to_even() {
        assert_eq!(percentage(1, 16), 6.2);
        assert_eq!(percentage(3, 16), 18.8);
        assert_eq!(percentage(5, 16), 31.2);
        assert_eq!(percentage(1, 40), 2.5);
    }

    #[test]
    fn test_inexact_products_are_not_ties() {
        // 0.35 is stored just below the midpoint, 0.45 just above
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(0.35), 0.3);
        assert_eq!(round_one_decimal(0.45), 0.5);
    }
}
