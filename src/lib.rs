//! quadview - frozen-pane grid quadrant synchronization
//!
//! Keeps the four regions of a frozen-pane table (MAIN, TOP, LEFT,
//! TOP_LEFT) perceptually fused into one grid:
//! - Scroll mirroring: MAIN's native scroll offsets propagate to the
//!   frozen quadrants before the next paint
//! - Wheel routing: wheel gestures on any quadrant are intercepted and
//!   applied to all dependent quadrants in the same frame
//! - Guide translation: resize/reorder guide coordinates move between
//!   quadrant-local and global grid space
//! - Geometry resync: a batched measure-then-apply pass keeps headers,
//!   menu corner, and quadrant boxes consistent
//!
//! The engine is headless; browser integration lives behind
//! `target_arch = "wasm32"`.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { QuadView } from 'quadview';
//! await init();
//! const view = QuadView.newUniform(config, numRows, numCols, rowHeight, colWidth);
//! view.registerQuadrant('main', container, scrollSurface, rowHeader, columnHeader, menu);
//! view.mount();
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod quadrant;
pub mod surface;
pub mod sync;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use config::{GridConfig, DEFAULT_RESYNC_DELAY_MS};
pub use error::{QuadViewError, Result};
pub use layout::{GridGeometry, GridLayout};
pub use quadrant::{Quadrant, QuadrantMap};
pub use surface::{Surface, SurfaceRef, SurfaceRegistry, SurfaceRole, SurfaceSet};
pub use sync::{QuadrantSync, ResyncGeometry, ResyncMeasurements, ResyncReport, SettleOutcome};

#[cfg(target_arch = "wasm32")]
pub use dom::QuadView;

/// Get the library version
#[must_use]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen::prelude::wasm_bindgen)]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
