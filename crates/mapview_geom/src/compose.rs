//! Composition of the natural-image to screen transform.
//!
//! The map is first fitted into the screen (never upscaled, centered), then
//! the user pan/zoom is applied on top in screen pixels:
//!
//! ```text
//! composed = user * base_fit
//! ```

use crate::affine::AffineTransform;
use crate::space::{ImageSize, NaturalPoint, Point, ScreenPoint, ScreenSize};
use crate::viewport::ViewportState;

/// Scale that fits the image into the screen without upscaling.
pub fn fit_scale(screen: ScreenSize, image: ImageSize) -> f64 {
    let sx = f64::from(screen.width) / image.width_f64();
    let sy = f64::from(screen.height) / image.height_f64();
    sx.min(sy).min(1.0)
}

/// Fit-to-screen placement of the image: scale by [`fit_scale`] and center.
pub fn base_fit_transform(screen: ScreenSize, image: ImageSize) -> AffineTransform {
    let scale = fit_scale(screen, image);
    let dx = (f64::from(screen.width) - image.width_f64() * scale) / 2.0;
    let dy = (f64::from(screen.height) - image.height_f64() * scale) / 2.0;
    AffineTransform::translate_scale(dx, dy, scale)
}

/// Compose the full natural-image to screen transform.
///
/// Pure and deterministic in its three inputs. Callers only invoke it once
/// the image size is known; there is no transform for an image that has not
/// loaded.
pub fn compose(viewport: &ViewportState, screen: ScreenSize, image: ImageSize) -> AffineTransform {
    viewport.user_transform() * base_fit_transform(screen, image)
}

/// A point-in-time snapshot of the composed transform.
///
/// Bundles the forward transform with its inverse and the sizes it was
/// composed for, so a frame's consumers all read the same mapping. Only
/// invertible, finite transforms can be wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    forward: AffineTransform,
    inverse: AffineTransform,
    screen: ScreenSize,
    image: ImageSize,
}

impl ViewTransform {
    /// Wrap a forward transform, or `None` if it cannot be inverted.
    pub fn new(forward: AffineTransform, screen: ScreenSize, image: ImageSize) -> Option<Self> {
        let inverse = forward.inverse()?;
        Some(Self {
            forward,
            inverse,
            screen,
            image,
        })
    }

    /// Compose and wrap in one step.
    pub fn compose(viewport: &ViewportState, screen: ScreenSize, image: ImageSize) -> Option<Self> {
        Self::new(compose(viewport, screen, image), screen, image)
    }

    /// Natural image to screen.
    pub fn forward(&self) -> &AffineTransform {
        &self.forward
    }

    /// Screen to natural image.
    pub fn inverse(&self) -> &AffineTransform {
        &self.inverse
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    pub fn image_size(&self) -> ImageSize {
        self.image
    }

    pub fn to_screen(&self, point: NaturalPoint) -> ScreenPoint {
        let (x, y) = self.forward.apply(point.x, point.y);
        Point::new(x, y)
    }

    pub fn to_natural(&self, point: ScreenPoint) -> NaturalPoint {
        let (x, y) = self.inverse.apply(point.x, point.y);
        Point::new(x, y)
    }

    /// Transform for a layer authored at `layer` resolution that should cover
    /// the whole map.
    ///
    /// Layer pixels are first stretched onto natural-image pixels, then follow
    /// the map: `forward * scale(image / layer)`.
    pub fn layer_transform(&self, layer: ImageSize) -> AffineTransform {
        let remap = AffineTransform::scale_non_uniform(
            self.image.width_f64() / layer.width_f64(),
            self.image.height_f64() / layer.height_f64(),
        );
        self.forward * remap
    }
}
