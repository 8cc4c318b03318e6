//! Per-frame pipeline and the renderer contract.

use std::time::Duration;

use mapview_geom::{AffineTransform, ImageSize, ScreenPoint, ScreenSize, ViewTransform};
use web_time::Instant;

use crate::audio::AudioSink;
use crate::overlay::LayerPass;
use crate::viewer::MapViewer;

/// Drawing backend driven by the viewer.
///
/// The viewer only decides what is drawn and with which transform; pixels
/// are the surface's business.
pub trait DrawSurface {
    /// Full-screen background behind the map, drawn untransformed.
    fn draw_backdrop(&mut self, screen: ScreenSize);

    /// The map image, natural pixels mapped through `view.forward()`.
    fn draw_map(&mut self, view: &ViewTransform);

    /// A layer drawn over the map, in its own native pixels.
    fn draw_layer(&mut self, pass: LayerPass, transform: &AffineTransform);

    /// Measurement markers joined by a polyline, already in screen space.
    fn draw_measurement(&mut self, path: &[ScreenPoint]);
}

/// Draw one frame of `viewer` onto `surface`.
///
/// Only the backdrop is drawn while no image is loaded.
pub fn render<A: AudioSink>(viewer: &MapViewer<A>, surface: &mut dyn DrawSurface) {
    surface.draw_backdrop(viewer.screen_size());

    let Some(view) = viewer.transform() else {
        return;
    };
    surface.draw_map(view);

    // Effects without their own resolution are authored at screen size
    let screen_layer = ImageSize::try_from(view.screen_size())
        .map(|size| view.layer_transform(size))
        .unwrap_or(*view.forward());

    let overlays = viewer.overlays();
    for pass in overlays.passes() {
        let transform = match pass {
            LayerPass::Overlay(layer) => match overlays.layer_transform(layer, view) {
                Some(transform) => transform,
                None => continue,
            },
            _ => screen_layer,
        };
        log::trace!("Draw {:?}", pass);
        surface.draw_layer(pass, &transform);
    }

    if let Some(tool) = viewer.measurement().filter(|t| t.is_enabled()) {
        surface.draw_measurement(&tool.screen_path(view));
    }
}

/// Single-threaded frame scheduler.
///
/// Each [`tick`](FrameLoop::tick) runs the fixed pipeline: recompute the
/// transform, draw, then poll the region under the screen center. Once
/// stopped, ticks do nothing.
#[derive(Debug, Default)]
pub struct FrameLoop {
    last_frame: Option<Instant>,
    frames: u64,
    stopped: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame. Returns the time since the previous frame, or `None`
    /// once the loop is stopped.
    pub fn tick<A: AudioSink>(
        &mut self,
        viewer: &mut MapViewer<A>,
        surface: &mut dyn DrawSurface,
        now: Instant,
    ) -> Option<Duration> {
        if self.stopped {
            return None;
        }

        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);
        self.frames += 1;

        viewer.refresh_transform();
        render(viewer, surface);
        viewer.poll_region(now);

        Some(dt)
    }

    /// Stop requesting frames.
    pub fn stop(&mut self) {
        if !self.stopped {
            log::debug!("Frame loop stopped after {} frames", self.frames);
        }
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::config::ViewerConfig;
    use crate::input::{InputEvent, PointerButton};
    use crate::measurement::MapScale;
    use crate::overlay::OverlayLayer;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Backdrop,
        Map,
        Layer(LayerPass),
        Measurement(usize),
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
        layer_transforms: Vec<AffineTransform>,
    }

    impl DrawSurface for RecordingSurface {
        fn draw_backdrop(&mut self, _screen: ScreenSize) {
            self.calls.push(Call::Backdrop);
        }

        fn draw_map(&mut self, _view: &ViewTransform) {
            self.calls.push(Call::Map);
        }

        fn draw_layer(&mut self, pass: LayerPass, transform: &AffineTransform) {
            self.calls.push(Call::Layer(pass));
            self.layer_transforms.push(*transform);
        }

        fn draw_measurement(&mut self, path: &[ScreenPoint]) {
            self.calls.push(Call::Measurement(path.len()));
        }
    }

    fn viewer() -> MapViewer<RecordingSink> {
        let config = ViewerConfig {
            map_scale: Some(MapScale::new(1.0, "km")),
            ..ViewerConfig::default()
        };
        MapViewer::new(&config, ScreenSize::new(1000, 1000), RecordingSink::new())
    }

    #[test]
    fn test_backdrop_only_before_image() {
        let mut surface = RecordingSurface::default();
        render(&viewer(), &mut surface);
        assert_eq!(surface.calls, vec![Call::Backdrop]);
    }

    #[test]
    fn test_draw_order() {
        let mut viewer = viewer();
        viewer.set_image(ImageSize::new(2000, 1000).unwrap());
        viewer.handle(&InputEvent::ToggleOverlay {
            layer: OverlayLayer::Landmarks,
        });
        viewer.set_measurement(true);
        viewer.handle(&InputEvent::PointerDown {
            pos: ScreenPoint::new(500.0, 500.0),
            button: PointerButton::Primary,
        });

        let mut surface = RecordingSurface::default();
        render(&viewer, &mut surface);
        assert_eq!(
            surface.calls,
            vec![
                Call::Backdrop,
                Call::Map,
                Call::Layer(LayerPass::WeatherEffects),
                Call::Layer(LayerPass::OverlayDim),
                Call::Layer(LayerPass::Overlay(OverlayLayer::Landmarks)),
                Call::Layer(LayerPass::DayNight),
                Call::Layer(LayerPass::WeatherFilter),
                Call::Measurement(1),
            ]
        );
    }

    #[test]
    fn test_screen_layers_cover_the_map() {
        let mut viewer = viewer();
        viewer.set_image(ImageSize::new(2000, 1000).unwrap());
        let mut surface = RecordingSurface::default();
        render(&viewer, &mut surface);

        let view = viewer.transform().unwrap();
        let (x, y) = surface.layer_transforms[0].apply(1000.0, 1000.0);
        let (mx, my) = view.forward().apply(2000.0, 1000.0);
        assert!((x - mx).abs() < 1e-9 && (y - my).abs() < 1e-9);
    }

    #[test]
    fn test_minimized_frames_keep_transform_without_rejections() {
        let mut viewer = viewer();
        viewer.set_image(ImageSize::new(2000, 1000).unwrap());
        let before = *viewer.transform().unwrap();
        viewer.resize(ScreenSize::new(0, 0));

        let mut surface = RecordingSurface::default();
        let mut frames = FrameLoop::new();
        let start = Instant::now();
        for i in 0..60 {
            frames.tick(&mut viewer, &mut surface, start + Duration::from_millis(16 * i));
        }

        assert_eq!(viewer.mapper().rejected_count(), 0);
        assert_eq!(viewer.transform(), Some(&before));
        assert_eq!(frames.frame_count(), 60);
    }

    #[test]
    fn test_tick_reports_delta_and_stops() {
        let mut viewer = viewer();
        let mut surface = RecordingSurface::default();
        let mut frames = FrameLoop::new();
        let start = Instant::now();

        assert_eq!(frames.tick(&mut viewer, &mut surface, start), Some(Duration::ZERO));
        assert_eq!(
            frames.tick(&mut viewer, &mut surface, start + Duration::from_millis(16)),
            Some(Duration::from_millis(16))
        );

        frames.stop();
        assert!(frames.is_stopped());
        assert_eq!(frames.tick(&mut viewer, &mut surface, start + Duration::from_millis(32)), None);
        assert_eq!(frames.frame_count(), 2);
    }
}
