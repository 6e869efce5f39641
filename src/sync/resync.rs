//! The batched geometry resync pass.
//!
//! Keeps the four quadrants' boxes mutually consistent after anything that
//! can change content sizing: mount, post-scroll settle, programmatic
//! scrolls. The pass is a strict MEASURE -> COMPUTE -> APPLY pipeline:
//! every read happens before any write, so one pass costs at most two
//! layout recomputations (the deliberate natural-width reflow plus the
//! final batched writes) instead of one per interleaved read/write pair.
//!
//! Every run derives fresh truth from live measurements; nothing is
//! accumulated, so a coalesced or dropped trigger self-corrects on the
//! next firing.

use serde::Serialize;

use crate::config::GridConfig;
use crate::layout::GridGeometry;
use crate::quadrant::Quadrant;
use crate::surface::{
    horizontal_scrollbar_thickness, vertical_scrollbar_thickness, SurfaceRegistry,
};

/// Minimum frozen-extent size (px) when nothing is frozen, so the boundary
/// border of the headers stays visible.
pub const MIN_FROZEN_SIZE: f64 = 1.0;

/// Raw measurements taken during the MEASURE phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResyncMeasurements {
    /// Natural content width of MAIN's row header (0 if hidden or absent).
    pub row_header_width: f64,
    /// Height of MAIN's column header (0 if absent).
    pub column_header_height: f64,
    /// Cumulative width of the frozen columns (or the 1 px minimum).
    pub frozen_columns_width: f64,
    /// Cumulative height of the frozen rows (or the 1 px minimum).
    pub frozen_rows_height: f64,
    /// Thickness of MAIN's vertical scrollbar.
    pub vertical_scrollbar: f64,
    /// Thickness of MAIN's horizontal scrollbar.
    pub horizontal_scrollbar: f64,
}

/// Target geometry produced by the COMPUTE phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResyncGeometry {
    /// Row-header width shared by all four quadrants.
    pub row_header_width: f64,
    /// Menu corner width (flush with the row headers).
    pub menu_width: f64,
    /// Menu corner height (flush with the column headers).
    pub menu_height: f64,
    /// LEFT and TOP_LEFT container width.
    pub left_quadrant_width: f64,
    /// TOP and TOP_LEFT container height.
    pub top_quadrant_height: f64,
    /// Right inset on TOP, revealing MAIN's vertical scrollbar.
    pub top_right_inset: f64,
    /// Bottom inset on LEFT, revealing MAIN's horizontal scrollbar.
    pub left_bottom_inset: f64,
}

/// Snapshot of the last resync pass, serializable for host-side debugging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResyncReport {
    /// What the MEASURE phase read.
    pub measurements: ResyncMeasurements,
    /// What the APPLY phase wrote.
    pub geometry: ResyncGeometry,
}

/// MEASURE: batch every read the pass needs before any write happens.
///
/// Resetting the row header's width constraint forces one reflow when its
/// natural width is next read; that is the accepted cost of sizing to
/// content, isolated here so the rest of the pass stays read-only.
pub fn measure(
    registry: &SurfaceRegistry,
    geometry: &dyn GridGeometry,
    config: &GridConfig,
) -> ResyncMeasurements {
    let main = registry.quadrant(Quadrant::Main);

    let row_header_width = if config.show_row_header {
        match main.row_header() {
            Some(header) => {
                header.clear_width();
                header.offset_width()
            }
            None => 0.0,
        }
    } else {
        0.0
    };

    let column_header_height = main
        .column_header()
        .map(|h| h.offset_height())
        .unwrap_or(0.0);

    let frozen_columns_width = if config.frozen_columns > 0 {
        geometry.cumulative_width_at(config.frozen_columns - 1)
    } else {
        MIN_FROZEN_SIZE
    };
    let frozen_rows_height = if config.frozen_rows > 0 {
        geometry.cumulative_height_at(config.frozen_rows - 1)
    } else {
        MIN_FROZEN_SIZE
    };

    let (vertical_scrollbar, horizontal_scrollbar) = match main.scroll_surface() {
        Some(scroll) => (
            vertical_scrollbar_thickness(scroll.as_ref()),
            horizontal_scrollbar_thickness(scroll.as_ref()),
        ),
        None => (0.0, 0.0),
    };

    ResyncMeasurements {
        row_header_width,
        column_header_height,
        frozen_columns_width,
        frozen_rows_height,
        vertical_scrollbar,
        horizontal_scrollbar,
    }
}

/// COMPUTE: pure derivation of the target geometry from measurements.
pub fn compute(m: &ResyncMeasurements) -> ResyncGeometry {
    ResyncGeometry {
        row_header_width: m.row_header_width,
        menu_width: m.row_header_width,
        menu_height: m.column_header_height,
        left_quadrant_width: m.row_header_width + m.frozen_columns_width,
        top_quadrant_height: m.column_header_height + m.frozen_rows_height,
        top_right_inset: m.vertical_scrollbar,
        left_bottom_inset: m.horizontal_scrollbar,
    }
}

/// APPLY: write the computed geometry to every registered surface.
pub fn apply(registry: &SurfaceRegistry, geometry: &ResyncGeometry) {
    for quadrant in Quadrant::ALL {
        let set = registry.quadrant(quadrant);
        if let Some(header) = set.row_header() {
            header.set_width(geometry.row_header_width);
        }
        if let Some(menu) = set.menu() {
            menu.set_width(geometry.menu_width);
            menu.set_height(geometry.menu_height);
        }
    }

    for quadrant in [Quadrant::Left, Quadrant::TopLeft] {
        if let Some(container) = registry.quadrant(quadrant).container() {
            container.set_width(geometry.left_quadrant_width);
        }
    }
    for quadrant in [Quadrant::Top, Quadrant::TopLeft] {
        if let Some(container) = registry.quadrant(quadrant).container() {
            container.set_height(geometry.top_quadrant_height);
        }
    }

    if let Some(container) = registry.quadrant(Quadrant::Top).container() {
        container.set_right_inset(geometry.top_right_inset);
    }
    if let Some(container) = registry.quadrant(Quadrant::Left).container() {
        container.set_bottom_inset(geometry.left_bottom_inset);
    }
}
