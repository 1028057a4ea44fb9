//! Period × group cell grid
//!
//! Rows are the index's ordered periods, columns its group keys. Every
//! combination gets a cell, populated or not, so renderers can draw a full
//! matrix.

use crate::index::{Index, LabelStyle};
use crate::layout::{BandScale, LayoutConfig};
use serde::Serialize;

/// A sage name placed inside a cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellLine {
    pub name: String,
    /// Offset from the top of the cell
    pub offset: f64,
}

/// One (period, group) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub period_id: String,
    pub group_id: String,
    pub row: usize,
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Normalized group label
    pub label: String,
    pub line_height: f64,
    pub lines: Vec<CellLine>,
}

/// Row header for a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowLabel {
    pub period_id: String,
    pub name: String,
    /// Vertical center of the row
    pub y: f64,
}

/// Cell matrix computed from an index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub columns: BandScale,
    pub rows: BandScale,
    pub row_labels: Vec<RowLabel>,
    /// Row-major: all groups of the first period, then the next period
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn build(index: &Index, labels: &LabelStyle, config: &LayoutConfig) -> Self {
        let columns = BandScale::new(
            index.group_keys.len(),
            (config.margin.left, config.width - config.margin.right),
            config.padding,
        );
        let rows = BandScale::new(
            index.ordered_periods.len(),
            (config.margin.top, config.height - config.margin.bottom),
            config.padding,
        );

        let mut cells = Vec::with_capacity(columns.len() * rows.len());
        let mut row_labels = Vec::with_capacity(rows.len());

        for (row, period_id) in index.ordered_periods.iter().enumerate() {
            let y = rows.position(row).unwrap_or(config.margin.top);

            row_labels.push(RowLabel {
                period_id: period_id.clone(),
                name: index.period_name(period_id).to_string(),
                y: rows.center(row).unwrap_or(y),
            });

            for (column, group_id) in index.group_keys.iter().enumerate() {
                let members = index.sages_in(period_id, group_id);
                let line_height = config.line_height(rows.bandwidth(), members.len());

                cells.push(Cell {
                    period_id: period_id.clone(),
                    group_id: group_id.clone(),
                    row,
                    column,
                    x: columns.position(column).unwrap_or(config.margin.left),
                    y,
                    width: columns.bandwidth(),
                    height: rows.bandwidth(),
                    label: labels.normalize(period_id, group_id),
                    line_height,
                    lines: members
                        .iter()
                        .enumerate()
                        .map(|(i, sage)| CellLine {
                            name: sage.name.clone(),
                            offset: config.top_pad + (i + 1) as f64 * line_height,
                        })
                        .collect(),
                });
            }
        }

        tracing::debug!(
            rows = rows.len(),
            columns = columns.len(),
            cells = cells.len(),
            "Computed cell grid"
        );

        Self {
            columns,
            rows,
            row_labels,
            cells,
        }
    }

    /// Look up a cell by its keys
    pub fn cell(&self, period_id: &str, group_id: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|c| c.period_id == period_id && c.group_id == group_id)
    }

    /// Cells holding at least one sage
    pub fn populated(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| !c.lines.is_empty())
    }

    /// Pair every cell with a caller-supplied shade
    ///
    /// `palette` receives the period id and the column index; color tables
    /// live with the caller.
    pub fn shade<C, F>(&self, palette: F) -> Vec<(&Cell, C)>
    where
        F: Fn(&str, usize) -> C,
    {
        self.cells
            .iter()
            .map(|cell| (cell, palette(&cell.period_id, cell.column)))
            .collect()
    }
}
