//! Structured error types for quadview.
//!
//! The engine coordinates trusted, synchronously available surfaces, so the
//! error surface is small: construction-order violations propagate, absent
//! optional collaborators are not errors.

use crate::quadrant::Quadrant;
use crate::surface::SurfaceRole;

/// All errors that can occur while driving the quadrant engine.
#[derive(Debug, thiserror::Error)]
pub enum QuadViewError {
    /// A required surface was used before being registered.
    #[error("surface not mounted: {role} of {quadrant} quadrant")]
    NotMounted {
        /// Quadrant whose surface was missing.
        quadrant: Quadrant,
        /// Role of the missing surface.
        role: SurfaceRole,
    },

    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    Config(String),

    /// Config or metrics (de)serialization failure.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for host-side failures.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuadViewError>;

impl From<String> for QuadViewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for QuadViewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<QuadViewError> for wasm_bindgen::JsValue {
    fn from(e: QuadViewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
