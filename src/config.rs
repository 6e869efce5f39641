//! Engine configuration.
//!
//! Supplied by the host at construction and updatable afterwards. All fields
//! are optional on the wire with the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{QuadViewError, Result};

/// Delay (ms) after scroll activity stops before a geometry resync runs.
pub const DEFAULT_RESYNC_DELAY_MS: f64 = 250.0;

/// Host-supplied configuration for the quadrant engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Disables horizontal scrolling entirely, wheel gestures included.
    pub horizontal_scroll_disabled: bool,
    /// Disables vertical scrolling entirely, wheel gestures included.
    pub vertical_scroll_disabled: bool,
    /// When false, row headers measure as zero-width everywhere.
    pub show_row_header: bool,
    /// Number of rows pinned into the TOP / TOP_LEFT quadrants.
    pub frozen_rows: usize,
    /// Number of columns pinned into the LEFT / TOP_LEFT quadrants.
    pub frozen_columns: usize,
    /// Quiescence delay before the debounced resync pass runs.
    pub resync_delay_ms: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            horizontal_scroll_disabled: false,
            vertical_scroll_disabled: false,
            show_row_header: true,
            frozen_rows: 0,
            frozen_columns: 0,
            resync_delay_ms: DEFAULT_RESYNC_DELAY_MS,
        }
    }
}

impl GridConfig {
    /// Parse a config from its JSON representation.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the delay is not a
    /// finite, non-negative number.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field-level invariants.
    ///
    /// # Errors
    /// Returns `QuadViewError::Config` when the resync delay is negative,
    /// NaN, or infinite.
    pub fn validate(&self) -> Result<()> {
        if !self.resync_delay_ms.is_finite() || self.resync_delay_ms < 0.0 {
            return Err(QuadViewError::Config(format!(
                "resync_delay_ms must be finite and non-negative, got {}",
                self.resync_delay_ms
            )));
        }
        Ok(())
    }
}
