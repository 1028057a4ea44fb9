//! Dataset index structures
//!
//! The [`Index`] is the read-only view every renderer consumes:
//!
//! - **ordered_periods**: period keys in use, ordered by [`PeriodRanking`]
//! - **group_keys**: distinct cohort labels, code-point sorted
//! - **grouping**: `period → group → [Sage]`, leaves in input order
//! - **year_range**: temporal bounds across periods and sages
//!
//! # Architecture
//!
//! ```text
//! Dataset { periods, sages }
//!        ↓
//! DatasetIndexer (ordering + unresolved policy)
//!        ↓
//! Index ──► layout::Grid (bands, cells, labels)
//! ```
//!
//! An index is built once per load and never mutated afterwards.

mod error;
mod indexer;
mod label;
mod ranking;

pub use error::{IndexError, IndexResult, ValidationIssue};
pub use indexer::{build_index, DatasetIndexer, IndexerConfig, UnresolvedPolicy};
pub use label::{normalize_label, LabelStyle};
pub use ranking::{PeriodOrdering, PeriodRanking};

use crate::dataset::Sage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Inclusive span of years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A range covering a single year
    pub fn point(year: i32) -> Self {
        Self::new(year, year)
    }

    /// Widen the range to cover a year
    pub fn include(self, year: i32) -> Self {
        Self::new(self.min.min(year), self.max.max(year))
    }

    /// Smallest range covering both
    pub fn union(self, other: YearRange) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Number of years between the bounds
    pub fn span(&self) -> i64 {
        self.max as i64 - self.min as i64
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Derived orderings and groupings of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub ordered_periods: Vec<String>,
    pub group_keys: Vec<String>,
    pub grouping: BTreeMap<String, BTreeMap<String, Vec<Sage>>>,
    /// `None` when there are neither periods nor indexed sages
    pub year_range: Option<YearRange>,
    /// Sages whose period could not be resolved
    pub unresolved: Vec<Sage>,
    #[serde(skip)]
    pub(crate) period_names: HashMap<String, String>,
}

impl Index {
    /// Sages of one (period, group) cell, in input order
    pub fn sages_in(&self, period_id: &str, group_id: &str) -> &[Sage] {
        self.grouping
            .get(period_id)
            .and_then(|groups| groups.get(group_id))
            .map(|sages| sages.as_slice())
            .unwrap_or(&[])
    }

    /// Display name of a period, falling back to its id
    pub fn period_name<'a>(&'a self, period_id: &'a str) -> &'a str {
        self.period_names
            .get(period_id)
            .map(|name| name.as_str())
            .unwrap_or(period_id)
    }

    /// Year range, or the caller's default when the dataset is empty
    pub fn year_range_or(&self, default: YearRange) -> YearRange {
        self.year_range.unwrap_or(default)
    }

    /// Number of sages placed in the grouping
    pub fn sage_count(&self) -> usize {
        self.grouping
            .values()
            .flat_map(|groups| groups.values())
            .map(|sages| sages.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grouping.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            periods: self.ordered_periods.len(),
            groups: self.group_keys.len(),
            sages: self.sage_count(),
            populated_cells: self.grouping.values().map(|groups| groups.len()).sum(),
            unresolved: self.unresolved.len(),
        }
    }
}

/// Statistics about an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Periods with at least one sage
    pub periods: usize,
    /// Distinct group keys
    pub groups: usize,
    /// Sages placed in the grouping
    pub sages: usize,
    /// (period, group) cells holding at least one sage
    pub populated_cells: usize,
    /// Sages whose period could not be resolved
    pub unresolved: usize,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Periods: {}, Groups: {}, Sages: {}, Cells: {}, Unresolved: {}",
            self.periods, self.groups, self.sages, self.populated_cells, self.unresolved
        )
    }
}
