//! Centralized constants for the view geometry.

// =============================================================================
// Zoom
// =============================================================================

/// Default minimum user zoom when configuration does not provide one
pub const DEFAULT_MIN_ZOOM: f64 = 0.5;

/// Default maximum user zoom when configuration does not provide one
pub const DEFAULT_MAX_ZOOM: f64 = 5.0;

/// Scale change per wheel delta unit: `factor = 1 - delta_y * WHEEL_ZOOM_SENSITIVITY`
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.001;

// =============================================================================
// Reference space
// =============================================================================

/// Width of the reference resolution region rectangles are authored in
pub const REFERENCE_WIDTH: u32 = 1920;

/// Height of the reference resolution region rectangles are authored in
pub const REFERENCE_HEIGHT: u32 = 1080;

// =============================================================================
// Numerics
// =============================================================================

/// Determinants with a smaller magnitude are treated as singular
pub const SINGULAR_DETERMINANT: f64 = 1e-12;
