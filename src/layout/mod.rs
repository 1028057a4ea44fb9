//! Chart layout
//!
//! Pure arithmetic over an [`Index`](crate::index::Index): band scales for
//! rows and columns, and the cell grid with per-cell line spacing. Nothing
//! here draws; renderers consume the numbers.

mod grid;
mod scale;

pub use grid::{Cell, CellLine, Grid, RowLabel};
pub use scale::BandScale;

use serde::{Deserialize, Serialize};

/// Space reserved around the plot area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 60.0,
            right: 60.0,
            bottom: 80.0,
            left: 150.0,
        }
    }
}

/// Layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,

    #[serde(default)]
    pub margin: Margin,

    /// Band padding, fraction of a step
    #[serde(default = "default_padding")]
    pub padding: f64,

    /// Space above the first name in a cell (holds the cell label)
    #[serde(default = "default_top_pad")]
    pub top_pad: f64,

    /// Space kept free below the last name
    #[serde(default = "default_bottom_slack")]
    pub bottom_slack: f64,

    #[serde(default = "default_min_line_height")]
    pub min_line_height: f64,

    /// Line height reported for cells without sages
    #[serde(default = "default_empty_line_height")]
    pub empty_line_height: f64,
}

fn default_width() -> f64 {
    1200.0
}

fn default_height() -> f64 {
    900.0
}

fn default_padding() -> f64 {
    0.2
}

fn default_top_pad() -> f64 {
    25.0
}

fn default_bottom_slack() -> f64 {
    5.0
}

fn default_min_line_height() -> f64 {
    10.0
}

fn default_empty_line_height() -> f64 {
    14.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            padding: default_padding(),
            top_pad: default_top_pad(),
            bottom_slack: default_bottom_slack(),
            min_line_height: default_min_line_height(),
            empty_line_height: default_empty_line_height(),
        }
    }
}

impl LayoutConfig {
    /// Vertical distance between names so that `count` of them fit a cell
    pub fn line_height(&self, cell_height: f64, count: usize) -> f64 {
        if count == 0 {
            return self.empty_line_height;
        }

        let available = cell_height - self.top_pad - self.bottom_slack;
        (available / count as f64).max(self.min_line_height)
    }
}
