//! # Sages
//!
//! Period and sage dataset indexer. Loads a static dataset of historical
//! periods and the sages attributed to them, and derives the orderings,
//! groupings and bounds every chronology chart needs.
//!
//! ## Modules
//!
//! - [`dataset`]: Data model and loading from files or URLs
//! - [`index`]: The dataset indexer, period ranking and label normalization
//! - [`layout`]: Band scales and the period × group cell grid
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use sages::dataset::{Period, Sage};
//! use sages::index::{build_index, YearRange};
//!
//! let periods = vec![Period::new("zugot", "Zugot", -200, 10)];
//! let sages = vec![
//!     Sage::new("Hillel", "zugot", "5", -30),
//!     Sage::new("Shammai", "zugot", "5", -30),
//! ];
//!
//! let index = build_index(&periods, &sages).unwrap();
//!
//! assert_eq!(index.ordered_periods, vec!["zugot"]);
//! assert_eq!(index.sages_in("zugot", "5").len(), 2);
//! assert_eq!(index.year_range, Some(YearRange::new(-200, 10)));
//! ```

pub mod config;
pub mod dataset;
pub mod index;
pub mod layout;

// Re-export top-level types for convenience
pub use dataset::{
    load_source, Dataset, DataSource, DatasetError, DatasetResult, LoaderConfig, Period, Sage,
};

pub use index::{
    build_index, normalize_label, DatasetIndexer, Index, IndexError, IndexResult, IndexStats,
    IndexerConfig, LabelStyle, PeriodOrdering, UnresolvedPolicy, ValidationIssue, YearRange,
};

pub use layout::{BandScale, Cell, Grid, LayoutConfig};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};
