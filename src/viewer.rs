//! The map viewer controller.
//!
//! [`MapViewer`] owns all view state for one map: the viewport, the current
//! drag, the screen and image sizes, the coordinate mapper, region tracking,
//! measurement and overlays. Input events mutate it; the frame loop reads
//! the composed transform back out of it.

use mapview_geom::{
    CoordinateMapper, ImageSize, NaturalPoint, PanDrag, ReferencePoint, ReferenceSize,
    ScreenPoint, ScreenSize, ViewTransform, ViewportState, compose,
};
use web_time::Instant;

use crate::audio::AudioSink;
use crate::config::ViewerConfig;
use crate::input::{InputEvent, PointerButton};
use crate::measurement::MeasurementTool;
use crate::overlay::{OverlayState, ToggleOutcome};
use crate::region_tracker::{RegionPollThrottle, RegionState, RegionTracker};

/// Pointer drag state. Not part of the viewport itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging the map since the press recorded in the [`PanDrag`]
    Panning(PanDrag),
}

impl DragState {
    pub fn is_panning(&self) -> bool {
        matches!(self, DragState::Panning(_))
    }
}

/// Single controller for one map view.
pub struct MapViewer<A: AudioSink> {
    viewport: ViewportState,
    drag: DragState,
    screen: ScreenSize,
    image: Option<ImageSize>,
    reference: ReferenceSize,
    mapper: CoordinateMapper,
    regions: RegionTracker,
    region_poll: RegionPollThrottle,
    measurement: Option<MeasurementTool>,
    overlays: OverlayState,
    cursor: Option<ScreenPoint>,
    audio: A,
}

impl<A: AudioSink> MapViewer<A> {
    pub fn new(config: &ViewerConfig, screen: ScreenSize, audio: A) -> Self {
        Self {
            viewport: ViewportState::new(config.zoom),
            drag: DragState::Idle,
            screen,
            image: None,
            reference: config.reference,
            mapper: CoordinateMapper::new(),
            regions: RegionTracker::new(config.regions.clone()),
            region_poll: RegionPollThrottle::new(),
            measurement: config.map_scale.clone().map(MeasurementTool::new),
            overlays: OverlayState::with_available(&config.available_overlays),
            cursor: None,
            audio,
        }
    }

    /// Replace the region poll throttle (e.g. a shorter interval).
    pub fn with_region_poll(mut self, throttle: RegionPollThrottle) -> Self {
        self.region_poll = throttle;
        self
    }

    /// The map image finished loading.
    pub fn set_image(&mut self, image: ImageSize) {
        log::debug!("Map image ready: {}x{}", image.width(), image.height());
        self.image = Some(image);
        self.mapper.clear();
        self.refresh_transform();
        self.region_poll.mark_dirty();
    }

    pub fn is_ready(&self) -> bool {
        self.image.is_some() && self.mapper.current().is_some()
    }

    /// Recompose the transform from the current viewport, screen and image.
    ///
    /// Skipped while no image is loaded or the surface is empty. A degenerate
    /// result leaves the previous transform in effect.
    pub fn refresh_transform(&mut self) {
        let Some(image) = self.image else {
            return;
        };
        if self.screen.is_empty() {
            return;
        }
        let forward = compose(&self.viewport, self.screen, image);
        self.mapper.update(forward, self.screen, image);
    }

    /// The transform of the current frame, if an image is loaded.
    pub fn transform(&self) -> Option<&ViewTransform> {
        self.image.and(self.mapper.current())
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        self.image
    }

    pub fn overlays(&self) -> &OverlayState {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut OverlayState {
        &mut self.overlays
    }

    /// `None` when no map scale is configured.
    pub fn measurement(&self) -> Option<&MeasurementTool> {
        self.measurement.as_ref()
    }

    pub fn region_state(&self) -> RegionState {
        self.regions.state()
    }

    pub fn region_tracker(&self) -> &RegionTracker {
        &self.regions
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Last pointer position over the surface.
    pub fn cursor(&self) -> Option<ScreenPoint> {
        self.cursor
    }

    /// Reference-space point at the screen center.
    pub fn center_reference(&self) -> Option<ReferencePoint> {
        self.transform()?;
        self.mapper.screen_center_to_reference(self.reference)
    }

    /// Natural-image point under the cursor.
    pub fn cursor_natural(&self) -> Option<NaturalPoint> {
        self.transform()?;
        self.mapper.screen_to_natural(self.cursor?)
    }

    /// Apply one input event. Returns true if the view needs a redraw.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        log::trace!("Input {:?}", event);
        match *event {
            InputEvent::PointerDown { pos, button } => self.pointer_down(pos, button),
            InputEvent::PointerMove { pos } => {
                self.cursor = Some(pos);
                match self.drag {
                    DragState::Panning(drag) => {
                        self.viewport.pan(&drag, pos);
                        self.view_changed();
                        true
                    }
                    // The measurement readout follows the cursor
                    DragState::Idle => self.measurement.as_ref().is_some_and(|t| t.is_enabled()),
                }
            }
            InputEvent::PointerUp { pos } => {
                self.cursor = Some(pos);
                self.end_drag();
                false
            }
            InputEvent::PointerLeave => {
                self.cursor = None;
                self.end_drag();
                false
            }
            InputEvent::Wheel { delta_y, pos } => {
                self.cursor = Some(pos);
                let applied = self.viewport.zoom(delta_y, pos);
                if applied == 1.0 {
                    return false;
                }
                // Keep dragging from the re-anchored offset
                if self.drag.is_panning() {
                    self.drag = DragState::Panning(self.viewport.begin_pan(pos));
                }
                self.view_changed();
                true
            }
            InputEvent::Resize { width, height } => {
                self.resize(ScreenSize::new(width, height));
                true
            }
            InputEvent::ResetZoom => {
                self.reset_zoom();
                true
            }
            InputEvent::ToggleOverlay { layer } => {
                self.overlays.toggle(layer) != ToggleOutcome::Unavailable
            }
            InputEvent::SetMeasurement { enabled } => self.set_measurement(enabled),
        }
    }

    pub fn resize(&mut self, screen: ScreenSize) {
        log::debug!("Resize to {}x{}", screen.width, screen.height);
        if screen.is_empty() && !self.screen.is_empty() {
            log::debug!("Surface minimized, keeping the last transform");
        }
        self.screen = screen;
        self.view_changed();
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset();
        self.view_changed();
    }

    /// Enable or disable measuring. Returns false if no map scale is
    /// configured.
    pub fn set_measurement(&mut self, enabled: bool) -> bool {
        match &mut self.measurement {
            Some(tool) => {
                tool.set_enabled(enabled);
                true
            }
            None => {
                if enabled {
                    log::warn!("Measurement needs a map scale in the configuration");
                }
                false
            }
        }
    }

    /// Text for the measurement tooltip, while measuring.
    pub fn measurement_readout(&self) -> Option<String> {
        let tool = self.measurement.as_ref().filter(|t| t.is_enabled())?;
        Some(tool.readout(self.cursor_natural().as_ref()))
    }

    /// Resolve the region under the screen center if a poll is due.
    ///
    /// Returns true if the active region changed.
    pub fn poll_region(&mut self, now: Instant) -> bool {
        if !self.region_poll.should_poll(now) {
            return false;
        }
        // Stay dirty until there is something to look at
        let Some(center) = self.center_reference() else {
            return false;
        };
        self.region_poll.mark_polled(now);
        self.regions.update(&center, &mut self.audio)
    }

    fn pointer_down(&mut self, pos: ScreenPoint, button: PointerButton) -> bool {
        self.cursor = Some(pos);
        let mut redraw = false;

        if let Some(tool) = self.measurement.as_mut().filter(|t| t.is_enabled()) {
            match button {
                PointerButton::Primary => redraw = tool.place(pos, &self.mapper),
                PointerButton::Secondary => {
                    tool.clear();
                    redraw = true;
                }
                PointerButton::Middle => {}
            }
        }

        if button.pans() {
            self.drag = DragState::Panning(self.viewport.begin_pan(pos));
        }
        redraw
    }

    fn end_drag(&mut self) {
        if self.drag.is_panning() {
            log::trace!("Pan ended at offset {:?}", self.viewport.offset());
        }
        self.drag = DragState::Idle;
    }

    fn view_changed(&mut self) {
        self.refresh_transform();
        self.region_poll.mark_dirty();
    }
}
