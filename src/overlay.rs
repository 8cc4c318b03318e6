//! Toggleable overlay layers drawn on top of the map.

use std::collections::BTreeSet;
use std::fmt;

use mapview_geom::{AffineTransform, ImageSize, ViewTransform};
use serde::{Deserialize, Serialize};

use crate::constants::OVERLAY_DIM_ALPHA;

/// One of the fixed overlay layers.
///
/// Declaration order is draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OverlayLayer {
    Settlements,
    Landmarks,
    #[serde(rename = "Land Routes")]
    LandRoutes,
    #[serde(rename = "Sea Routes")]
    SeaRoutes,
}

impl OverlayLayer {
    /// All layers in draw order.
    pub const ALL: [OverlayLayer; 4] = [
        OverlayLayer::Settlements,
        OverlayLayer::Landmarks,
        OverlayLayer::LandRoutes,
        OverlayLayer::SeaRoutes,
    ];

    /// Name used in the configuration file.
    pub fn name(&self) -> &'static str {
        match self {
            OverlayLayer::Settlements => "Settlements",
            OverlayLayer::Landmarks => "Landmarks",
            OverlayLayer::LandRoutes => "Land Routes",
            OverlayLayer::SeaRoutes => "Sea Routes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.name() == name)
    }

    fn index(self) -> usize {
        match self {
            OverlayLayer::Settlements => 0,
            OverlayLayer::Landmarks => 1,
            OverlayLayer::LandRoutes => 2,
            OverlayLayer::SeaRoutes => 3,
        }
    }
}

impl fmt::Display for OverlayLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Shown,
    Hidden,
    /// The layer is disabled by configuration and cannot be shown
    Unavailable,
}

/// A draw pass issued after the map itself, in the order returned by
/// [`OverlayState::passes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerPass {
    /// Clouds, rain and lightning
    WeatherEffects,
    /// Black fill under the overlays so they stand out
    OverlayDim,
    Overlay(OverlayLayer),
    /// Day/dusk/night tint
    DayNight,
    /// Full-screen weather tint
    WeatherFilter,
}

impl LayerPass {
    /// Opacity the pass is drawn with.
    pub fn alpha(&self) -> f32 {
        match self {
            LayerPass::OverlayDim => OVERLAY_DIM_ALPHA,
            _ => 1.0,
        }
    }
}

/// Visibility and native resolution of each overlay layer.
#[derive(Debug, Clone)]
pub struct OverlayState {
    available: [bool; 4],
    active: [bool; 4],
    native: [Option<ImageSize>; 4],
}

impl OverlayState {
    /// All layers available, none shown.
    pub fn new() -> Self {
        Self::with_available(&OverlayLayer::ALL.into_iter().collect())
    }

    /// Only the layers in `available` can ever be shown.
    pub fn with_available(available: &BTreeSet<OverlayLayer>) -> Self {
        let mut flags = [false; 4];
        for layer in available {
            flags[layer.index()] = true;
        }
        Self {
            available: flags,
            active: [false; 4],
            native: [None; 4],
        }
    }

    pub fn is_available(&self, layer: OverlayLayer) -> bool {
        self.available[layer.index()]
    }

    pub fn is_active(&self, layer: OverlayLayer) -> bool {
        self.active[layer.index()]
    }

    pub fn any_active(&self) -> bool {
        self.active.iter().any(|&active| active)
    }

    /// Flip a layer's visibility.
    pub fn toggle(&mut self, layer: OverlayLayer) -> ToggleOutcome {
        let i = layer.index();
        if !self.available[i] {
            log::debug!("Overlay '{}' is disabled in the configuration", layer);
            return ToggleOutcome::Unavailable;
        }
        self.active[i] = !self.active[i];
        log::info!(
            "Overlay '{}' {}",
            layer,
            if self.active[i] { "shown" } else { "hidden" }
        );
        if self.active[i] {
            ToggleOutcome::Shown
        } else {
            ToggleOutcome::Hidden
        }
    }

    /// Active layers in draw order.
    pub fn active_layers(&self) -> impl Iterator<Item = OverlayLayer> + '_ {
        OverlayLayer::ALL
            .into_iter()
            .filter(|layer| self.is_active(*layer))
    }

    /// Record the pixel size a layer image was authored at.
    pub fn set_native_size(&mut self, layer: OverlayLayer, size: ImageSize) {
        self.native[layer.index()] = Some(size);
    }

    /// Size a layer is authored at. Layers without a recorded size cover the
    /// screen, so they are taken to match it.
    pub fn native_size(&self, layer: OverlayLayer, view: &ViewTransform) -> Option<ImageSize> {
        self.native[layer.index()].or_else(|| ImageSize::try_from(view.screen_size()).ok())
    }

    /// Draw transform for an active layer.
    pub fn layer_transform(&self, layer: OverlayLayer, view: &ViewTransform) -> Option<AffineTransform> {
        self.native_size(layer, view)
            .map(|size| view.layer_transform(size))
    }

    /// Passes to draw after the map, in order.
    pub fn passes(&self) -> Vec<LayerPass> {
        let mut passes = vec![LayerPass::WeatherEffects];
        if self.any_active() {
            passes.push(LayerPass::OverlayDim);
        }
        passes.extend(self.active_layers().map(LayerPass::Overlay));
        passes.push(LayerPass::DayNight);
        passes.push(LayerPass::WeatherFilter);
        passes
    }
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new()
    }
}
