//! Configuration file support for the map viewer.
//!
//! The file mirrors the layout used by the map packs: a `Settings` block,
//! the map and overlay image files, the regions with their music and an
//! optional map scale for measurements. Every section is optional; missing
//! sections are logged and replaced by defaults when the file is resolved
//! into a [`ViewerConfig`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use mapview_geom::{ReferenceSize, ViewError, ZoomLimits};
use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILENAME, CONFIG_VERSION};
use crate::measurement::MapScale;
use crate::overlay::OverlayLayer;
use crate::region::Region;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration file as written on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    /// Version of the configuration file format
    #[serde(rename = "Version", default = "default_version")]
    pub version: u32,

    #[serde(rename = "Settings", skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,

    /// Map name to image file
    #[serde(rename = "Maps", skip_serializing_if = "Option::is_none")]
    pub maps: Option<BTreeMap<String, String>>,

    /// Overlay layer name to image file
    #[serde(rename = "Overlays", skip_serializing_if = "Option::is_none")]
    pub overlay_files: Option<BTreeMap<String, String>>,

    #[serde(rename = "Region Music", skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<Region>>,

    #[serde(rename = "Map Scale", skip_serializing_if = "Option::is_none")]
    pub map_scale: Option<MapScale>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// `Settings` section of the config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "Zoom", skip_serializing_if = "Option::is_none")]
    pub zoom: Option<ZoomSettings>,

    /// Which overlay layers may be shown at all
    #[serde(rename = "Overlays", skip_serializing_if = "Option::is_none")]
    pub overlays: Option<BTreeMap<String, bool>>,

    /// Resolution the region rectangles are authored in
    #[serde(rename = "Reference", skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceSettings>,

    #[serde(rename = "Log Level", default)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    #[serde(rename = "Min")]
    pub min: f64,
    #[serde(rename = "Max")]
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSettings {
    #[serde(rename = "Width")]
    pub width: u32,
    #[serde(rename = "Height")]
    pub height: u32,
}

/// Validated configuration with defaults filled in.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub zoom: ZoomLimits,
    pub reference: ReferenceSize,
    /// Valid regions in declaration order; invalid ones are dropped
    pub regions: Vec<Region>,
    /// Overlay layers the user may toggle
    pub available_overlays: BTreeSet<OverlayLayer>,
    pub overlay_files: BTreeMap<OverlayLayer, String>,
    /// Map name to image file, relative to the config file
    pub maps: BTreeMap<String, String>,
    /// `None` disables the measurement tool
    pub map_scale: Option<MapScale>,
    pub log_level: LogLevel,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomLimits::default(),
            reference: ReferenceSize::default(),
            regions: Vec::new(),
            available_overlays: OverlayLayer::ALL.into_iter().collect(),
            overlay_files: BTreeMap::new(),
            maps: BTreeMap::new(),
            map_scale: None,
            log_level: LogLevel::default(),
        }
    }
}

impl MapConfig {
    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join(CONFIG_DIR_NAME)
                    .join(CONFIG_FILENAME)
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Validate the file and fill in defaults for missing sections.
    pub fn resolve(&self) -> Result<ViewerConfig, ConfigError> {
        let mut resolved = ViewerConfig::default();

        match &self.settings {
            Some(settings) => {
                match settings.zoom {
                    Some(zoom) => resolved.zoom = ZoomLimits::new(zoom.min, zoom.max)?,
                    None => log::warn!("No zoom settings found, using defaults"),
                }
                if let Some(reference) = settings.reference {
                    resolved.reference = ReferenceSize::new(reference.width, reference.height)?;
                }
                if let Some(overlays) = &settings.overlays {
                    resolved.available_overlays = available_overlays(overlays);
                }
                resolved.log_level = settings.log_level;
            }
            None => log::warn!("No settings found, using defaults"),
        }

        match &self.maps {
            Some(maps) => resolved.maps = maps.clone(),
            None => log::warn!("No map files found in configuration"),
        }

        match &self.overlay_files {
            Some(files) => resolved.overlay_files = overlay_files(files),
            None => log::warn!("No overlay files found in configuration"),
        }

        match &self.regions {
            Some(regions) => resolved.regions = valid_regions(regions),
            None => log::warn!("No region music found in configuration"),
        }

        match &self.map_scale {
            Some(scale) if !scale.is_valid() => {
                return Err(ConfigError::InvalidMapScale {
                    distance_per_pixel: scale.distance_per_pixel,
                });
            }
            Some(scale) => resolved.map_scale = Some(scale.clone()),
            None => log::info!("No map scale configured, measurement is disabled"),
        }

        Ok(resolved)
    }
}

impl ViewerConfig {
    /// Parse and resolve in one step.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        MapConfig::from_json(json)?.resolve()
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        MapConfig::load_from_path(path)?.resolve()
    }

    /// Image file of the map to show, resolved against `config_dir`.
    ///
    /// Picks `name` when given, otherwise the first map by name.
    pub fn map_path(
        &self,
        name: Option<&str>,
        config_dir: &Path,
    ) -> Result<PathBuf, ConfigError> {
        let (name, file) = match name {
            Some(name) => self
                .maps
                .get_key_value(name)
                .ok_or_else(|| ConfigError::UnknownMap(name.to_string()))?,
            None => self.maps.iter().next().ok_or(ConfigError::NoMaps)?,
        };
        log::debug!("Showing map '{}' from {}", name, file);
        Ok(config_dir.join(file))
    }
}

/// A layer missing from an explicit `Overlays` settings block is disabled.
fn available_overlays(settings: &BTreeMap<String, bool>) -> BTreeSet<OverlayLayer> {
    for name in settings.keys() {
        if OverlayLayer::from_name(name).is_none() {
            log::warn!("Unknown overlay '{}' in settings, ignoring", name);
        }
    }
    OverlayLayer::ALL
        .into_iter()
        .filter(|layer| settings.get(layer.name()).copied().unwrap_or(false))
        .collect()
}

fn overlay_files(files: &BTreeMap<String, String>) -> BTreeMap<OverlayLayer, String> {
    files
        .iter()
        .filter_map(|(name, file)| match OverlayLayer::from_name(name) {
            Some(layer) => Some((layer, file.clone())),
            None => {
                log::warn!("Unknown overlay '{}' in overlay files, ignoring", name);
                None
            }
        })
        .collect()
}

fn valid_regions(regions: &[Region]) -> Vec<Region> {
    regions
        .iter()
        .filter(|region| {
            let valid = region.area.is_valid();
            if !valid {
                log::warn!(
                    "Region '{}' has an invalid area {:?}, dropping it",
                    region.name,
                    region.area
                );
            }
            valid
        })
        .cloned()
        .collect()
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Zoom or reference settings out of range
    #[error("Invalid view settings: {0}")]
    InvalidView(#[from] ViewError),

    /// The requested map is not in the `Maps` section
    #[error("No map named '{0}' in configuration")]
    UnknownMap(String),

    /// No map image given and the `Maps` section is empty
    #[error("No map files in configuration")]
    NoMaps,

    /// Map scale must be a positive, finite distance
    #[error("Invalid map scale: {distance_per_pixel} per pixel")]
    InvalidMapScale { distance_per_pixel: f64 },
}
