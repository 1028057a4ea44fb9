//! Dataset model and loading
//!
//! The input is a single document with two arrays:
//!
//! ```text
//! {
//!   "periods": [{ "id", "name", "start", "end" }],
//!   "sages":   [{ "name", "periodId", "groupId", "year", "bio"? }]
//! }
//! ```

mod error;
mod loader;
mod types;

pub use error::{Collection, DatasetError, DatasetResult, RecordIssue};
pub use loader::{load_source, DataSource, LoaderConfig};
pub use types::{Dataset, Period, Sage};
