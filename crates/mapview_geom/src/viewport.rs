//! User pan/zoom state.

use crate::affine::AffineTransform;
use crate::constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, WHEEL_ZOOM_SENSITIVITY};
use crate::error::ViewError;
use crate::space::ScreenPoint;

/// Allowed range for the user zoom scale.
///
/// Always satisfies `0 < min <= 1 <= max`, so resetting to scale 1.0 never
/// leaves the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    min: f64,
    max: f64,
}

impl ZoomLimits {
    pub fn new(min: f64, max: f64) -> Result<Self, ViewError> {
        let valid = min.is_finite() && max.is_finite() && min > 0.0 && min <= 1.0 && max >= 1.0;
        if !valid {
            return Err(ViewError::InvalidZoomLimits { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }

    pub fn contains(&self, scale: f64) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Snapshot taken when a pan drag starts.
///
/// Lives for the duration of one drag; it is UI state and not part of the
/// viewport itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDrag {
    pointer_start: ScreenPoint,
    offset_start: (f64, f64),
}

impl PanDrag {
    pub fn pointer_start(&self) -> ScreenPoint {
        self.pointer_start
    }
}

/// Current user scale and pan offset.
///
/// The offset is expressed in screen pixels and applied on top of the
/// fit-to-screen placement of the map. `scale` always stays inside the
/// configured [`ZoomLimits`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    limits: ZoomLimits,
}

impl ViewportState {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            limits,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Replace the zoom limits, clamping the current scale into them.
    pub fn set_limits(&mut self, limits: ZoomLimits) {
        self.limits = limits;
        self.scale = limits.clamp(self.scale);
    }

    /// Zoom in response to a wheel event.
    ///
    /// `factor = 1 - delta_y * k`; the resulting scale is clamped to the zoom
    /// limits and the offset is re-anchored so the map point under `pointer`
    /// stays under it. Returns the factor actually applied (1.0 when nothing
    /// changed).
    pub fn zoom(&mut self, delta_y: f64, pointer: ScreenPoint) -> f64 {
        if !delta_y.is_finite() {
            log::warn!("Ignoring non-finite wheel delta {}", delta_y);
            return 1.0;
        }
        self.zoom_by(1.0 - delta_y * WHEEL_ZOOM_SENSITIVITY, pointer)
    }

    /// Multiply the scale by `factor` around `anchor`, clamped to the limits.
    ///
    /// The applied factor is always recomputed from the clamped scale, so the
    /// anchor stays fixed even when the requested zoom hits a limit.
    pub fn zoom_by(&mut self, factor: f64, anchor: ScreenPoint) -> f64 {
        if !factor.is_finite() || !anchor.is_finite() {
            log::warn!("Ignoring zoom by {} around {:?}", factor, anchor);
            return 1.0;
        }

        let new_scale = self.limits.clamp(self.scale * factor);
        let applied = new_scale / self.scale;

        self.offset_x = anchor.x - applied * (anchor.x - self.offset_x);
        self.offset_y = anchor.y - applied * (anchor.y - self.offset_y);
        self.scale = new_scale;

        log::trace!(
            "Zoom x{:.4} at {:?}: scale {:.4}, offset ({:.2}, {:.2})",
            applied,
            anchor,
            self.scale,
            self.offset_x,
            self.offset_y
        );
        applied
    }

    /// Record the pointer and current offset at the start of a drag.
    pub fn begin_pan(&self, pointer: ScreenPoint) -> PanDrag {
        PanDrag {
            pointer_start: pointer,
            offset_start: (self.offset_x, self.offset_y),
        }
    }

    /// Move the map so it follows the pointer since `drag` began.
    pub fn pan(&mut self, drag: &PanDrag, current: ScreenPoint) {
        if !current.is_finite() {
            log::warn!("Ignoring non-finite pan position {:?}", current);
            return;
        }
        self.offset_x = current.x - (drag.pointer_start.x - drag.offset_start.0);
        self.offset_y = current.y - (drag.pointer_start.y - drag.offset_start.1);
    }

    /// Back to scale 1 with no offset.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// The user pan/zoom transform, in screen pixels.
    pub fn user_transform(&self) -> AffineTransform {
        AffineTransform::translate_scale(self.offset_x, self.offset_y, self.scale)
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn limits() -> ZoomLimits {
        ZoomLimits::new(0.5, 5.0).unwrap()
    }

    #[test]
    fn test_zoom_limits_validation() {
        assert!(ZoomLimits::new(0.5, 5.0).is_ok());
        assert!(ZoomLimits::new(1.0, 1.0).is_ok());
        assert!(ZoomLimits::new(0.0, 5.0).is_err());
        assert!(ZoomLimits::new(-1.0, 5.0).is_err());
        assert!(ZoomLimits::new(1.5, 5.0).is_err(), "min above 1 breaks reset");
        assert!(ZoomLimits::new(0.5, 0.8).is_err(), "max below 1 breaks reset");
        assert!(ZoomLimits::new(f64::NAN, 5.0).is_err());
        assert!(ZoomLimits::new(0.5, f64::INFINITY).is_err());
    }

    #[test]
    fn test_zoom_in_factor_from_delta() {
        let mut vp = ViewportState::new(limits());
        let applied = vp.zoom(-100.0, ScreenPoint::new(0.0, 0.0));
        assert!(approx_eq(applied, 1.1));
        assert!(approx_eq(vp.scale(), 1.1));
    }

    #[test]
    fn test_zoom_reanchors_offset() {
        // scale 2, pointer (400, 300), zoom in with delta -100 -> factor 1.1
        let mut vp = ViewportState::new(limits());
        vp.zoom_by(2.0, ScreenPoint::new(0.0, 0.0));
        let drag = vp.begin_pan(ScreenPoint::new(0.0, 0.0));
        vp.pan(&drag, ScreenPoint::new(-120.0, 40.0));
        let (ox, oy) = vp.offset();

        vp.zoom(-100.0, ScreenPoint::new(400.0, 300.0));

        assert!(approx_eq(vp.scale(), 2.2));
        assert!(approx_eq(vp.offset().0, 400.0 - 1.1 * (400.0 - ox)));
        assert!(approx_eq(vp.offset().1, 300.0 - 1.1 * (300.0 - oy)));
    }

    #[test]
    fn test_zoom_clamps_to_max() {
        let mut vp = ViewportState::new(limits());
        for _ in 0..100 {
            vp.zoom(-500.0, ScreenPoint::new(10.0, 10.0));
        }
        assert_eq!(vp.scale(), 5.0);
    }

    #[test]
    fn test_zoom_clamps_to_min_even_for_huge_delta() {
        // A delta past 1/k would make the raw factor negative
        let mut vp = ViewportState::new(limits());
        let applied = vp.zoom(5000.0, ScreenPoint::new(100.0, 100.0));
        assert_eq!(vp.scale(), 0.5);
        assert!(approx_eq(applied, 0.5));
    }

    #[test]
    fn test_scale_invariant_holds_for_sampled_deltas() {
        let deltas = [-100000.0, -2500.0, -999.0, -120.0, -1.0, 0.0, 0.5, 53.0, 999.0, 1000.0, 4000.0];
        let pointers = [(0.0, 0.0), (512.0, 384.0), (-50.0, 2000.0)];
        for start_factor in [0.5, 0.8, 1.0, 2.5, 5.0] {
            for &delta in &deltas {
                for &(px, py) in &pointers {
                    let mut vp = ViewportState::new(limits());
                    vp.zoom_by(start_factor, ScreenPoint::new(0.0, 0.0));
                    vp.zoom(delta, ScreenPoint::new(px, py));
                    assert!(
                        vp.limits().contains(vp.scale()),
                        "scale {} escaped limits for delta {}",
                        vp.scale(),
                        delta
                    );
                }
            }
        }
    }

    #[test]
    fn test_zoom_ignores_non_finite_input() {
        let mut vp = ViewportState::new(limits());
        let before = vp;
        assert_eq!(vp.zoom(f64::NAN, ScreenPoint::new(1.0, 1.0)), 1.0);
        assert_eq!(vp.zoom(-10.0, ScreenPoint::new(f64::INFINITY, 1.0)), 1.0);
        assert_eq!(vp, before);
    }

    #[test]
    fn test_pan_follows_pointer() {
        let mut vp = ViewportState::new(limits());
        let drag = vp.begin_pan(ScreenPoint::new(100.0, 100.0));
        vp.pan(&drag, ScreenPoint::new(130.0, 80.0));
        assert_eq!(vp.offset(), (30.0, -20.0));

        // Continuing the same drag is relative to its start, not cumulative
        vp.pan(&drag, ScreenPoint::new(150.0, 100.0));
        assert_eq!(vp.offset(), (50.0, 0.0));

        // A new drag starts from the current offset
        let drag = vp.begin_pan(ScreenPoint::new(0.0, 0.0));
        vp.pan(&drag, ScreenPoint::new(10.0, 10.0));
        assert_eq!(vp.offset(), (60.0, 10.0));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut vp = ViewportState::new(limits());
        vp.zoom(-300.0, ScreenPoint::new(200.0, 100.0));
        vp.reset();
        let once = vp;
        vp.reset();
        assert_eq!(vp, once);
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_set_limits_clamps_current_scale() {
        let mut vp = ViewportState::new(limits());
        vp.zoom_by(4.0, ScreenPoint::new(0.0, 0.0));
        vp.set_limits(ZoomLimits::new(0.5, 2.0).unwrap());
        assert_eq!(vp.scale(), 2.0);
    }

    #[test]
    fn test_user_transform_is_translate_then_scale() {
        let mut vp = ViewportState::new(limits());
        vp.zoom_by(2.0, ScreenPoint::new(0.0, 0.0));
        let drag = vp.begin_pan(ScreenPoint::new(0.0, 0.0));
        vp.pan(&drag, ScreenPoint::new(10.0, 20.0));
        assert_eq!(vp.user_transform().apply(1.0, 1.0), (12.0, 22.0));
    }
}
