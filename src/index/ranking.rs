//! Period ranking - precomputed `period id → canonical position` map
//!
//! Ordering the distinct period keys of N sages against P periods costs
//! O(N + P log P) with the map, instead of a linear scan per comparison.
//!
//! Keys that match no period sort after every matched key, ascending
//! lexicographic among themselves.

use crate::dataset::Period;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How periods are ordered in the index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodOrdering {
    /// Order of the `periods` array
    #[default]
    Declared,
    /// Ascending `start` year, ties keep declaration order
    Chronological,
}

impl FromStr for PeriodOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "declared" => Ok(PeriodOrdering::Declared),
            "chronological" => Ok(PeriodOrdering::Chronological),
            other => Err(format!(
                "unknown period ordering '{}' (expected declared or chronological)",
                other
            )),
        }
    }
}

impl fmt::Display for PeriodOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodOrdering::Declared => write!(f, "declared"),
            PeriodOrdering::Chronological => write!(f, "chronological"),
        }
    }
}

/// Canonical rank of every known period
#[derive(Debug, Clone, Default)]
pub struct PeriodRanking {
    ranks: HashMap<String, usize>,
}

impl PeriodRanking {
    pub fn new(periods: &[Period], ordering: PeriodOrdering) -> Self {
        let mut order: Vec<(usize, &Period)> = periods.iter().enumerate().collect();

        if ordering == PeriodOrdering::Chronological {
            order.sort_by_key(|(declared, period)| (period.start, *declared));
        }

        let mut ranks = HashMap::with_capacity(order.len());
        for (rank, (_, period)) in order.into_iter().enumerate() {
            // First occurrence wins for duplicate ids
            ranks.entry(period.id.clone()).or_insert(rank);
        }

        Self { ranks }
    }

    pub fn rank(&self, period_id: &str) -> Option<usize> {
        self.ranks.get(period_id).copied()
    }

    pub fn contains(&self, period_id: &str) -> bool {
        self.ranks.contains_key(period_id)
    }

    /// Compare two period keys by canonical rank
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.rank(a), self.rank(b)) {
            (Some(ra), Some(rb)) => ra.cmp(&rb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }

    /// Sort period keys in place
    pub fn sort(&self, keys: &mut [String]) {
        keys.sort_by(|a, b| self.compare(a, b));
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
