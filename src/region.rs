//! Named map regions and point lookup.
//!
//! Regions are axis-aligned rectangles in reference space, loaded once from
//! configuration. Lookup is a linear scan in declaration order: regions may
//! overlap, and the first one declared wins.

use mapview_geom::ReferencePoint;
use serde::{Deserialize, Serialize};

/// Inclusive range along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Rectangle of a region in reference space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionArea {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl RegionArea {
    pub fn new(x: AxisRange, y: AxisRange) -> Self {
        Self { x, y }
    }

    pub fn contains(&self, point: &ReferencePoint) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }
}

/// A named area of the map with contextual behaviour (ambient music).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    /// Audio file played while the region is active, relative to the region
    /// audio directory
    #[serde(rename = "sound path", default, skip_serializing_if = "Option::is_none")]
    pub sound_path: Option<String>,
    pub area: RegionArea,
}

impl Region {
    pub fn new(name: impl Into<String>, area: RegionArea) -> Self {
        Self {
            name: name.into(),
            sound_path: None,
            area,
        }
    }

    pub fn with_sound(mut self, path: impl Into<String>) -> Self {
        self.sound_path = Some(path.into());
        self
    }
}

/// Find the first region containing `point`.
///
/// Returns the region's index in `regions` alongside the region, so callers
/// can tell apart two regions that happen to share a name.
pub fn resolve<'a>(point: &ReferencePoint, regions: &'a [Region]) -> Option<(usize, &'a Region)> {
    regions
        .iter()
        .enumerate()
        .find(|(_, region)| region.area.contains(point))
}
