//! Global constants for the map viewer

use std::time::Duration;

// ============================================================================
// Regions
// ============================================================================

/// Minimum time between two region lookups during continuous pan/zoom
pub const REGION_POLL_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// Overlays
// ============================================================================

/// Opacity of the black pass drawn under active overlay layers
pub const OVERLAY_DIM_ALPHA: f32 = 0.5;

// ============================================================================
// Configuration
// ============================================================================

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILENAME: &str = "config.json";

/// Directory name under the platform config directory
pub const CONFIG_DIR_NAME: &str = "mapview";
