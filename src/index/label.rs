//! Cell label normalization
//!
//! Periods of the paired-sages era label their cohorts "Pair N"; every other
//! period uses "Generation N". Labels that already carry the prefix pass
//! through unchanged, which makes normalization idempotent.

use serde::{Deserialize, Serialize};

/// Prefix rules for (period, group) labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStyle {
    /// Period ids whose groups are pairs rather than generations
    #[serde(default = "default_paired_periods")]
    pub paired_periods: Vec<String>,

    #[serde(default = "default_paired_prefix")]
    pub paired_prefix: String,

    #[serde(default = "default_generation_prefix")]
    pub generation_prefix: String,
}

fn default_paired_periods() -> Vec<String> {
    vec!["zugot".to_string()]
}

fn default_paired_prefix() -> String {
    "Pair".to_string()
}

fn default_generation_prefix() -> String {
    "Generation".to_string()
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            paired_periods: default_paired_periods(),
            paired_prefix: default_paired_prefix(),
            generation_prefix: default_generation_prefix(),
        }
    }
}

impl LabelStyle {
    pub fn is_paired(&self, period_id: &str) -> bool {
        self.paired_periods.iter().any(|p| p == period_id)
    }

    /// The prefix that applies to a period's groups
    pub fn prefix_for(&self, period_id: &str) -> &str {
        if self.is_paired(period_id) {
            &self.paired_prefix
        } else {
            &self.generation_prefix
        }
    }

    /// Display label for a (period, group) cell
    pub fn normalize(&self, period_id: &str, group_id: &str) -> String {
        let prefix = self.prefix_for(period_id);

        if group_id.starts_with(prefix) {
            group_id.to_string()
        } else {
            format!("{} {}", prefix, group_id)
        }
    }
}

/// Normalize a label with the default prefixes
pub fn normalize_label(period_id: &str, group_id: &str) -> String {
    LabelStyle::default().normalize(period_id, group_id)
}
