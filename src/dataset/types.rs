//! Core data types for the sages dataset
//!
//! - `Period`: a named historical era with a start/end year range
//! - `Sage`: a historical figure attributed to one period and one group
//! - `Dataset`: one immutable snapshot of both collections

use serde::{Deserialize, Serialize};

/// A named historical era
///
/// Years are plain integers; negative values are BCE.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    /// Unique key referenced by `Sage::period_id`
    pub id: String,
    /// Display name
    pub name: String,
    /// First year of the era
    pub start: i32,
    /// Last year of the era
    pub end: i32,
}

impl Period {
    pub fn new(id: impl Into<String>, name: impl Into<String>, start: i32, end: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
        }
    }

    /// Check that the era does not end before it starts
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// Check whether a year falls inside this era (inclusive)
    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// A historical figure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sage {
    pub name: String,
    /// Foreign key into `Period::id`
    pub period_id: String,
    /// Cohort label within the period ("generation 3", "pair 2", ...)
    pub group_id: String,
    /// Approximate year
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Sage {
    pub fn new(
        name: impl Into<String>,
        period_id: impl Into<String>,
        group_id: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            name: name.into(),
            period_id: period_id.into(),
            group_id: group_id.into(),
            year,
            bio: None,
        }
    }

    /// Builder method: attach a biography
    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

/// The full input document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    pub periods: Vec<Period>,
    pub sages: Vec<Sage>,
}

impl Dataset {
    pub fn new(periods: Vec<Period>, sages: Vec<Sage>) -> Self {
        Self { periods, sages }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() && self.sages.is_empty()
    }

    /// Sages whose year lies outside their period's range
    ///
    /// Not an error: only reported so callers can log data-quality drift.
    pub fn out_of_range_sages(&self) -> Vec<&Sage> {
        self.sages
            .iter()
            .filter(|sage| {
                self.periods
                    .iter()
                    .find(|p| p.id == sage.period_id)
                    .map(|p| !p.contains(sage.year))
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sage_json_uses_camel_case() {
        let sage = Sage::new("Hillel", "zugot", "5", -30).bio("Elder");
        let json = serde_json::to_value(&sage).unwrap();

        assert_eq!(json["periodId"], "zugot");
        assert_eq!(json["groupId"], "5");
        assert_eq!(json["bio"], "Elder");
    }

    #[test]
    fn test_bio_is_optional() {
        let sage: Sage = serde_json::from_str(
            r#"{"name":"Shammai","periodId":"zugot","groupId":"5","year":-30}"#,
        )
        .unwrap();

        assert!(sage.bio.is_none());
        let json = serde_json::to_value(&sage).unwrap();
        assert!(json.get("bio").is_none());
    }

    #[test]
    fn test_period_contains() {
        let period = Period::new("zugot", "Zugot", -200, 10);

        assert!(period.is_well_formed());
        assert!(period.contains(-200));
        assert!(period.contains(10));
        assert!(!period.contains(11));
        assert!(!Period::new("x", "X", 5, 1).is_well_formed());
    }

    #[test]
    fn test_out_of_range_sages() {
        let dataset = Dataset::new(
            vec![Period::new("p1", "P1", -100, 0)],
            vec![
                Sage::new("inside", "p1", "1", -50),
                Sage::new("outside", "p1", "1", 20),
                Sage::new("orphan", "p9", "1", 500),
            ],
        );

        let drift = dataset.out_of_range_sages();
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].name, "outside");
    }
}
