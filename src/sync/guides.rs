//! Guide coordinate translation for resize and reorder gestures.
//!
//! Header collaborators compute guide positions in their own quadrant's
//! unscrolled, header-excluded content space. Consumers expect global grid
//! coordinates, so every guide is compensated for the quadrant's scroll
//! offset and perpendicular header thickness before being forwarded.

use crate::layout::GridGeometry;
use crate::quadrant::Quadrant;
use crate::sync::QuadrantSync;

/// Boundary index a dragged item is moving to.
///
/// The guide is drawn immediately before the destination slot; moving past
/// the original slot (right/down) shifts the boundary by the dragged run's
/// length.
pub fn reorder_boundary_index(old_index: usize, new_index: usize, length: usize) -> usize {
    if old_index < new_index {
        new_index + length
    } else {
        new_index
    }
}

impl<G: GridGeometry> QuadrantSync<G> {
    /// Translate vertical (column-boundary) guides from `quadrant`'s local
    /// content space into global grid space.
    pub fn adjust_vertical_guides(&self, quadrant: Quadrant, guides: &[f64]) -> Vec<f64> {
        let (scroll_left, _) = self.registry.scroll_offset(quadrant);
        let header_width = self.registry.row_header_width(quadrant);
        guides
            .iter()
            .map(|g| g - scroll_left + header_width)
            .collect()
    }

    /// Translate horizontal (row-boundary) guides from `quadrant`'s local
    /// content space into global grid space.
    pub fn adjust_horizontal_guides(&self, quadrant: Quadrant, guides: &[f64]) -> Vec<f64> {
        let (_, scroll_top) = self.registry.scroll_offset(quadrant);
        let header_height = self.registry.column_header_height(quadrant);
        guides
            .iter()
            .map(|g| g - scroll_top + header_height)
            .collect()
    }

    /// Column resize gesture frame from one quadrant's column header.
    ///
    /// One invocation per gesture frame; an absent guide list passes
    /// through untranslated.
    pub fn handle_column_resize_guide(&mut self, quadrant: Quadrant, guides: Option<&[f64]>) {
        let adjusted = guides.map(|g| self.adjust_vertical_guides(quadrant, g));
        if let Some(callback) = self.callbacks.on_column_resize_guide.as_mut() {
            callback(adjusted.as_deref());
        }
    }

    /// Row resize gesture frame from one quadrant's row header.
    pub fn handle_row_resize_guide(&mut self, quadrant: Quadrant, guides: Option<&[f64]>) {
        let adjusted = guides.map(|g| self.adjust_horizontal_guides(quadrant, g));
        if let Some(callback) = self.callbacks.on_row_resize_guide.as_mut() {
            callback(adjusted.as_deref());
        }
    }

    /// Column drag-reorder frame: `length` columns starting at `old_index`
    /// are hovering over `new_index`.
    ///
    /// The destination boundary's pixel offset comes from the geometry
    /// service; the coordinate space is TOP_LEFT's when the boundary falls
    /// inside the frozen extent, TOP's otherwise.
    pub fn handle_columns_reordering(&mut self, old_index: usize, new_index: usize, length: usize) {
        let guide_index = reorder_boundary_index(old_index, new_index, length);
        let offset = self.geometry.cumulative_width_before(guide_index);
        let quadrant = if guide_index <= self.config.frozen_columns {
            Quadrant::TopLeft
        } else {
            Quadrant::Top
        };
        let adjusted = self.adjust_vertical_guides(quadrant, &[offset]);
        if let Some(callback) = self.callbacks.on_columns_reordering.as_mut() {
            callback(Some(&adjusted));
        }
    }

    /// Row drag-reorder frame, symmetric with
    /// [`handle_columns_reordering`](Self::handle_columns_reordering):
    /// LEFT is the scrolling counterpart for rows.
    pub fn handle_rows_reordering(&mut self, old_index: usize, new_index: usize, length: usize) {
        let guide_index = reorder_boundary_index(old_index, new_index, length);
        let offset = self.geometry.cumulative_height_before(guide_index);
        let quadrant = if guide_index <= self.config.frozen_rows {
            Quadrant::TopLeft
        } else {
            Quadrant::Left
        };
        let adjusted = self.adjust_horizontal_guides(quadrant, &[offset]);
        if let Some(callback) = self.callbacks.on_rows_reordering.as_mut() {
            callback(Some(&adjusted));
        }
    }
}
