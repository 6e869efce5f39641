//! Grid geometry: cumulative track positions and offset lookups.

mod grid_layout;

pub use grid_layout::{GridLayout, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};

/// Read-only cumulative-size lookups over the grid's rows and columns.
///
/// This is the Geometry Service consumed by the resync pass and the reorder
/// guide adjuster. All lookups are O(1); indices past the last track clamp
/// to the total extent.
pub trait GridGeometry {
    /// Total width of columns `[0, index)`.
    fn cumulative_width_before(&self, index: usize) -> f64;
    /// Total width of columns `[0, index]`.
    fn cumulative_width_at(&self, index: usize) -> f64;
    /// Total height of rows `[0, index)`.
    fn cumulative_height_before(&self, index: usize) -> f64;
    /// Total height of rows `[0, index]`.
    fn cumulative_height_at(&self, index: usize) -> f64;
}
