//! Pre-computed track positions for a grid.
//!
//! Positions are computed once when the grid's row/column sizes are known,
//! enabling O(1) cumulative lookups and O(log n) offset-to-index hit tests.

use std::collections::{HashMap, HashSet};

use super::GridGeometry;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_WIDTH: f64 = 64.0;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// Prefix-sum layout over the grid's rows and columns.
///
/// Hidden tracks collapse to zero width/height but keep their index, so
/// cumulative lookups and guide indices stay stable across hide/show.
#[derive(Clone)]
pub struct GridLayout {
    /// `col_positions[i]` = x of column i's left edge; one extra final edge.
    col_positions: Vec<f64>,
    /// `row_positions[i]` = y of row i's top edge; one extra final edge.
    row_positions: Vec<f64>,
    num_rows: usize,
    num_cols: usize,
}

impl GridLayout {
    /// Build a layout from per-track size overrides.
    ///
    /// Tracks without an override take the default size; hidden tracks
    /// contribute zero.
    pub fn new(
        num_rows: usize,
        num_cols: usize,
        col_widths: &HashMap<usize, f64>,
        row_heights: &HashMap<usize, f64>,
        hidden_cols: &HashSet<usize>,
        hidden_rows: &HashSet<usize>,
    ) -> Self {
        let mut col_positions = Vec::with_capacity(num_cols + 1);
        let mut x = 0.0f64;
        for col in 0..num_cols {
            col_positions.push(x);
            if !hidden_cols.contains(&col) {
                x += col_widths.get(&col).copied().unwrap_or(DEFAULT_COLUMN_WIDTH);
            }
        }
        col_positions.push(x); // Final edge

        let mut row_positions = Vec::with_capacity(num_rows + 1);
        let mut y = 0.0f64;
        for row in 0..num_rows {
            row_positions.push(y);
            if !hidden_rows.contains(&row) {
                y += row_heights.get(&row).copied().unwrap_or(DEFAULT_ROW_HEIGHT);
            }
        }
        row_positions.push(y); // Final edge

        GridLayout {
            col_positions,
            row_positions,
            num_rows,
            num_cols,
        }
    }

    /// Uniform layout, handy for hosts with fixed-size tracks.
    pub fn uniform(num_rows: usize, num_cols: usize, row_height: f64, col_width: f64) -> Self {
        let col_positions = (0..=num_cols).map(|c| c as f64 * col_width).collect();
        let row_positions = (0..=num_rows).map(|r| r as f64 * row_height).collect();
        GridLayout {
            col_positions,
            row_positions,
            num_rows,
            num_cols,
        }
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Total width of all columns.
    pub fn total_width(&self) -> f64 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Total height of all rows.
    pub fn total_height(&self) -> f64 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    /// Find the column containing x (binary search); `None` on an empty grid.
    pub fn col_at_x(&self, x: f64) -> Option<usize> {
        Self::track_at(&self.col_positions, self.num_cols, x)
    }

    /// Find the row containing y (binary search); `None` on an empty grid.
    pub fn row_at_y(&self, y: f64) -> Option<usize> {
        Self::track_at(&self.row_positions, self.num_rows, y)
    }

    fn track_at(positions: &[f64], count: usize, offset: f64) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let index = match positions.binary_search_by(|pos| {
            pos.partial_cmp(&offset).unwrap_or(std::cmp::Ordering::Equal)
        }) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        Some(index.min(count - 1))
    }

    fn edge(positions: &[f64], index: usize) -> f64 {
        positions
            .get(index)
            .or(positions.last())
            .copied()
            .unwrap_or(0.0)
    }
}

impl GridGeometry for GridLayout {
    fn cumulative_width_before(&self, index: usize) -> f64 {
        Self::edge(&self.col_positions, index)
    }

    fn cumulative_width_at(&self, index: usize) -> f64 {
        Self::edge(&self.col_positions, index.saturating_add(1))
    }

    fn cumulative_height_before(&self, index: usize) -> f64 {
        Self::edge(&self.row_positions, index)
    }

    fn cumulative_height_at(&self, index: usize) -> f64 {
        Self::edge(&self.row_positions, index.saturating_add(1))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_layout() {
        let layout = GridLayout::new(
            11,
            6,
            &HashMap::new(),
            &HashMap::new(),
            &HashSet::new(),
            &HashSet::new(),
        );

        assert_eq!(layout.num_rows(), 11);
        assert_eq!(layout.num_cols(), 6);
        assert_eq!(layout.total_width(), DEFAULT_COLUMN_WIDTH * 6.0);
        assert_eq!(layout.total_height(), DEFAULT_ROW_HEIGHT * 11.0);
    }

    #[test]
    fn test_cumulative_lookups() {
        let layout = GridLayout::uniform(10, 10, 20.0, 50.0);

        assert_eq!(layout.cumulative_width_before(0), 0.0);
        assert_eq!(layout.cumulative_width_before(3), 150.0);
        assert_eq!(layout.cumulative_width_at(3), 200.0);
        assert_eq!(layout.cumulative_height_before(2), 40.0);
        assert_eq!(layout.cumulative_height_at(2), 60.0);
    }

    #[test]
    fn test_cumulative_clamps_past_end() {
        let layout = GridLayout::uniform(4, 4, 20.0, 50.0);
        assert_eq!(layout.cumulative_width_before(100), 200.0);
        assert_eq!(layout.cumulative_width_at(100), 200.0);
        assert_eq!(layout.cumulative_height_at(100), 80.0);
    }

    #[test]
    fn test_hidden_tracks_collapse() {
        let mut hidden_cols = HashSet::new();
        hidden_cols.insert(1);
        let layout = GridLayout::new(
            5,
            5,
            &HashMap::new(),
            &HashMap::new(),
            &hidden_cols,
            &HashSet::new(),
        );

        // Column 1 contributes nothing; later edges shift left by one width.
        assert_eq!(layout.cumulative_width_before(1), DEFAULT_COLUMN_WIDTH);
        assert_eq!(layout.cumulative_width_before(2), DEFAULT_COLUMN_WIDTH);
        assert_eq!(layout.total_width(), DEFAULT_COLUMN_WIDTH * 4.0);
    }

    #[test]
    fn test_size_overrides() {
        let mut col_widths = HashMap::new();
        col_widths.insert(0, 120.0);
        let layout = GridLayout::new(
            2,
            3,
            &col_widths,
            &HashMap::new(),
            &HashSet::new(),
            &HashSet::new(),
        );
        assert_eq!(layout.cumulative_width_before(1), 120.0);
        assert_eq!(layout.total_width(), 120.0 + DEFAULT_COLUMN_WIDTH * 2.0);
    }

    #[test]
    fn test_col_at_x() {
        let layout = GridLayout::uniform(10, 10, 20.0, 50.0);

        assert_eq!(layout.col_at_x(0.0), Some(0));
        assert_eq!(layout.col_at_x(49.0), Some(0));
        assert_eq!(layout.col_at_x(50.0), Some(1));
        assert_eq!(layout.col_at_x(125.0), Some(2));
        // Past the end clamps to the last column
        assert_eq!(layout.col_at_x(10_000.0), Some(9));
    }

    #[test]
    fn test_row_at_y() {
        let layout = GridLayout::uniform(10, 10, 20.0, 50.0);

        assert_eq!(layout.row_at_y(0.0), Some(0));
        assert_eq!(layout.row_at_y(10.0), Some(0));
        assert_eq!(layout.row_at_y(20.0), Some(1));
        assert_eq!(layout.row_at_y(50.0), Some(2));
    }

    #[test]
    fn test_empty_grid() {
        let layout = GridLayout::uniform(0, 0, 20.0, 50.0);
        assert_eq!(layout.col_at_x(5.0), None);
        assert_eq!(layout.total_width(), 0.0);
        assert_eq!(layout.cumulative_width_before(0), 0.0);
    }
}
