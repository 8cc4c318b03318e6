//! Conversions between screen, natural-image and reference space.

use crate::affine::AffineTransform;
use crate::compose::ViewTransform;
use crate::space::{
    ImageSize, NaturalPoint, Point, ReferencePoint, ReferenceSize, ScreenPoint, ScreenSize,
};

/// Map a screen point into natural-image space through the inverse of
/// `transform`.
///
/// Returns `None` when the transform is not invertible or the result is not
/// finite; callers keep their previous value instead of propagating NaN.
pub fn screen_to_natural(transform: &AffineTransform, point: ScreenPoint) -> Option<NaturalPoint> {
    let inverse = transform.inverse()?;
    let (x, y) = inverse.apply(point.x, point.y);
    let natural = Point::new(x, y);
    natural.is_finite().then_some(natural)
}

/// Rescale a natural-image point into the reference resolution.
///
/// `normalized = natural / natural_size * reference_size`, per axis. Region
/// rectangles stay valid whatever resolution the map image ships at.
pub fn natural_to_reference(
    point: NaturalPoint,
    natural: ImageSize,
    reference: ReferenceSize,
) -> ReferencePoint {
    Point::new(
        point.x / natural.width_f64() * f64::from(reference.width()),
        point.y / natural.height_f64() * f64::from(reference.height()),
    )
}

/// The reference-space point at the center of the screen.
///
/// This is the "what is the viewer looking at" query used for regions.
pub fn screen_center_to_reference(view: &ViewTransform, reference: ReferenceSize) -> ReferencePoint {
    let natural = view.to_natural(view.screen_size().center());
    natural_to_reference(natural, view.image_size(), reference)
}

/// Holds the last usable transform so mapping never yields NaN.
///
/// Every frame the viewer offers the freshly composed transform. Degenerate
/// candidates (singular, non-finite) are rejected and the previous transform
/// stays in effect. Only the first rejection of a run is logged as a warning.
#[derive(Debug, Clone, Default)]
pub struct CoordinateMapper {
    current: Option<ViewTransform>,
    rejected: u64,
    rejecting: bool,
}

impl CoordinateMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a newly composed transform. Returns true if it was accepted.
    pub fn update(
        &mut self,
        forward: AffineTransform,
        screen: ScreenSize,
        image: ImageSize,
    ) -> bool {
        match ViewTransform::new(forward, screen, image) {
            Some(view) => {
                self.current = Some(view);
                self.rejecting = false;
                true
            }
            None => {
                self.rejected += 1;
                if self.rejecting {
                    log::trace!("Degenerate view transform {:?}", forward.coefficients());
                } else {
                    log::warn!(
                        "Degenerate view transform {:?}, keeping last known good",
                        forward.coefficients()
                    );
                }
                self.rejecting = true;
                false
            }
        }
    }

    /// Forget the current transform (e.g. a different map is being loaded).
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The transform currently in effect, if one was ever accepted.
    pub fn current(&self) -> Option<&ViewTransform> {
        self.current.as_ref()
    }

    /// Number of candidates rejected since creation.
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    pub fn screen_to_natural(&self, point: ScreenPoint) -> Option<NaturalPoint> {
        let natural = self.current.as_ref()?.to_natural(point);
        natural.is_finite().then_some(natural)
    }

    pub fn natural_to_screen(&self, point: NaturalPoint) -> Option<ScreenPoint> {
        Some(self.current.as_ref()?.to_screen(point))
    }

    pub fn screen_center_to_reference(&self, reference: ReferenceSize) -> Option<ReferencePoint> {
        let view = self.current.as_ref()?;
        let point = screen_center_to_reference(view, reference);
        point.is_finite().then_some(point)
    }
}
