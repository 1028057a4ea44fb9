//! Dataset indexer
//!
//! Builds the derived [`Index`] from the flat period and sage records in a
//! single pass:
//!
//! ```text
//! sages ──┬─► grouping[periodId][groupId] += sage   (input order kept)
//!         ├─► group keys (sorted set)
//!         └─► sage year bounds
//! periods ──► PeriodRanking ──► ordered periods
//!         └─► period year bounds ──► year range
//! ```
//!
//! Sages referencing an unknown period are handled by [`UnresolvedPolicy`].

use crate::dataset::{Dataset, Period, Sage};
use crate::index::{
    Index, IndexError, IndexResult, PeriodOrdering, PeriodRanking, ValidationIssue, YearRange,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// What to do with a sage whose period does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Fail the build, listing every offending sage
    Reject,
    /// Keep the sage out of the index and report it in `Index::unresolved`
    #[default]
    Quarantine,
    /// Index the sage under its unmatched key and report it in `Index::unresolved`
    Tolerate,
}

impl FromStr for UnresolvedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(UnresolvedPolicy::Reject),
            "quarantine" => Ok(UnresolvedPolicy::Quarantine),
            "tolerate" => Ok(UnresolvedPolicy::Tolerate),
            other => Err(format!(
                "unknown unresolved policy '{}' (expected reject, quarantine or tolerate)",
                other
            )),
        }
    }
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedPolicy::Reject => write!(f, "reject"),
            UnresolvedPolicy::Quarantine => write!(f, "quarantine"),
            UnresolvedPolicy::Tolerate => write!(f, "tolerate"),
        }
    }
}

/// Configuration for the indexer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexerConfig {
    pub period_ordering: PeriodOrdering,
    pub unresolved_policy: UnresolvedPolicy,
}

/// Builds indexes from datasets
#[derive(Debug, Clone, Default)]
pub struct DatasetIndexer {
    config: IndexerConfig,
}

impl DatasetIndexer {
    pub fn new(config: IndexerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Index a loaded dataset
    pub fn index(&self, dataset: &Dataset) -> IndexResult<Index> {
        self.build(&dataset.periods, &dataset.sages)
    }

    /// Build an index from period and sage records
    pub fn build(&self, periods: &[Period], sages: &[Sage]) -> IndexResult<Index> {
        let mut issues = validate_periods(periods);
        let ranking = PeriodRanking::new(periods, self.config.period_ordering);

        let mut grouping: BTreeMap<String, BTreeMap<String, Vec<Sage>>> = BTreeMap::new();
        let mut group_keys = BTreeSet::new();
        let mut unresolved = Vec::new();
        let mut sage_years: Option<YearRange> = None;

        for (index, sage) in sages.iter().enumerate() {
            if !ranking.contains(&sage.period_id) {
                match self.config.unresolved_policy {
                    UnresolvedPolicy::Reject => {
                        issues.push(ValidationIssue::UnknownPeriod {
                            index,
                            sage: sage.name.clone(),
                            period_id: sage.period_id.clone(),
                        });
                        continue;
                    }
                    UnresolvedPolicy::Quarantine => {
                        unresolved.push(sage.clone());
                        continue;
                    }
                    UnresolvedPolicy::Tolerate => unresolved.push(sage.clone()),
                }
            }

            grouping
                .entry(sage.period_id.clone())
                .or_default()
                .entry(sage.group_id.clone())
                .or_default()
                .push(sage.clone());

            group_keys.insert(sage.group_id.clone());
            sage_years = Some(match sage_years {
                Some(range) => range.include(sage.year),
                None => YearRange::point(sage.year),
            });
        }

        if !issues.is_empty() {
            tracing::warn!(issues = issues.len(), "Dataset failed validation");
            return Err(IndexError::Validation(issues));
        }

        let mut ordered_periods: Vec<String> = grouping.keys().cloned().collect();
        ranking.sort(&mut ordered_periods);

        let year_range = match (period_years(periods), sage_years) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };

        if !unresolved.is_empty() {
            let missing: BTreeSet<&str> = unresolved.iter().map(|s| s.period_id.as_str()).collect();
            tracing::warn!(
                sages = unresolved.len(),
                policy = %self.config.unresolved_policy,
                periods = ?missing,
                "Sages reference unknown periods"
            );
        }

        let period_names: HashMap<String, String> = periods
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect();

        let index = Index {
            ordered_periods,
            group_keys: group_keys.into_iter().collect(),
            grouping,
            year_range,
            unresolved,
            period_names,
        };

        tracing::debug!(
            ordering = %self.config.period_ordering,
            stats = %index.stats(),
            "Built dataset index"
        );

        Ok(index)
    }
}

/// Build an index with the default configuration
pub fn build_index(periods: &[Period], sages: &[Sage]) -> IndexResult<Index> {
    DatasetIndexer::default().build(periods, sages)
}

fn validate_periods(periods: &[Period]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::with_capacity(periods.len());

    for period in periods {
        if !seen.insert(period.id.as_str()) {
            issues.push(ValidationIssue::DuplicatePeriod {
                id: period.id.clone(),
            });
        }
        if !period.is_well_formed() {
            issues.push(ValidationIssue::InvertedPeriod {
                id: period.id.clone(),
                start: period.start,
                end: period.end,
            });
        }
    }

    issues
}

fn period_years(periods: &[Period]) -> Option<YearRange> {
    let min = periods.iter().map(|p| p.start).min()?;
    let max = periods.iter().map(|p| p.end).max()?;
    Some(YearRange::new(min, max))
}
