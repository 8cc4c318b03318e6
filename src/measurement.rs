//! Distance measurement on the map.
//!
//! Points are stored in natural-image space, so they stay pinned to the map
//! while it is panned and zoomed. They are projected back to the screen with
//! the current transform each time they are drawn.

use mapview_geom::{CoordinateMapper, NaturalPoint, ScreenPoint, ViewTransform};
use serde::{Deserialize, Serialize};

/// Real-world length of one natural-image pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapScale {
    #[serde(rename = "distancePerMapPixel")]
    pub distance_per_pixel: f64,
    #[serde(rename = "distanceUnit")]
    pub unit: String,
}

impl MapScale {
    pub fn new(distance_per_pixel: f64, unit: impl Into<String>) -> Self {
        Self {
            distance_per_pixel,
            unit: unit.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.distance_per_pixel.is_finite() && self.distance_per_pixel > 0.0
    }

    /// Real-world distance between two natural-image points.
    pub fn distance(&self, a: &NaturalPoint, b: &NaturalPoint) -> f64 {
        a.distance_to(b) * self.distance_per_pixel
    }
}

/// Polyline measurement tool.
#[derive(Debug, Clone)]
pub struct MeasurementTool {
    scale: MapScale,
    enabled: bool,
    points: Vec<NaturalPoint>,
}

impl MeasurementTool {
    /// A disabled tool measuring with `scale`.
    pub fn new(scale: MapScale) -> Self {
        Self {
            scale,
            enabled: false,
            points: Vec::new(),
        }
    }

    pub fn scale(&self) -> &MapScale {
        &self.scale
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the tool. Disabling drops all points.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::debug!("Measurement {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
        if !enabled {
            self.points.clear();
        }
    }

    pub fn points(&self) -> &[NaturalPoint] {
        &self.points
    }

    /// Place a point under the screen position `screen`.
    ///
    /// Does nothing when the tool is disabled or no transform is available
    /// yet. Returns true if a point was added.
    pub fn place(&mut self, screen: ScreenPoint, mapper: &CoordinateMapper) -> bool {
        if !self.enabled {
            return false;
        }
        match mapper.screen_to_natural(screen) {
            Some(natural) => {
                self.push(natural);
                true
            }
            None => {
                log::debug!("No map transform yet, measurement point at {:?} ignored", screen);
                false
            }
        }
    }

    /// Append a point already in natural-image space.
    pub fn push(&mut self, point: NaturalPoint) {
        log::trace!("Measurement point {:?}", point);
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Sum of all segment lengths between placed points.
    pub fn total_distance(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| self.scale.distance(&pair[0], &pair[1]))
            .sum()
    }

    /// Distance from the last placed point to `cursor`, 0 with no points.
    pub fn segment_distance(&self, cursor: &NaturalPoint) -> f64 {
        self.points
            .last()
            .map_or(0.0, |last| self.scale.distance(last, cursor))
    }

    /// Two-line text shown next to the cursor.
    pub fn readout(&self, cursor: Option<&NaturalPoint>) -> String {
        let segment = cursor.map_or(0.0, |c| self.segment_distance(c));
        format!(
            "Total: {:.1} {unit}\nCurrent: {:.1} {unit}",
            self.total_distance(),
            segment,
            unit = self.scale.unit
        )
    }

    /// Placed points projected with the transform of the frame being drawn.
    pub fn screen_path(&self, view: &ViewTransform) -> Vec<ScreenPoint> {
        self.points.iter().map(|p| view.to_screen(*p)).collect()
    }
}
