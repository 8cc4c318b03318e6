//! Error types for the geometry crate.

use thiserror::Error;

/// Errors raised when constructing view geometry from external values.
///
/// Runtime operations (zoom, pan, mapping) never fail; only the values fed in
/// from configuration or the image loader are validated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// Zoom limits are not finite, not positive, or do not bracket 1.0
    #[error("Invalid zoom limits: min {min}, max {max} (expected 0 < min <= 1 <= max)")]
    InvalidZoomLimits {
        /// Configured minimum scale
        min: f64,
        /// Configured maximum scale
        max: f64,
    },

    /// Image dimensions contain a zero
    #[error("Image has empty dimensions {width}x{height}")]
    EmptyImage {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },

    /// Reference resolution contains a zero
    #[error("Reference resolution {width}x{height} is empty")]
    EmptyReference {
        /// Reference width
        width: u32,
        /// Reference height
        height: u32,
    },
}
