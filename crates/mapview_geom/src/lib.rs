//! View geometry for the map viewer.
//!
//! This crate is the headless core behind panning and zooming a map image:
//! - [`ViewportState`]: user scale and pan offset with clamped zoom.
//! - [`compose`] / [`ViewTransform`]: the natural-image to screen transform,
//!   built as `user * base_fit`.
//! - [`CoordinateMapper`]: screen, natural-image and reference-space
//!   conversions with a last-known-good fallback for degenerate transforms.
//!
//! Points are tagged with their coordinate space ([`Screen`], [`Natural`],
//! [`Reference`]) so conversions are always explicit.
//!
//! # Example
//! ```
//! use mapview_geom::{ImageSize, ScreenPoint, ScreenSize, ViewTransform, ViewportState};
//!
//! let screen = ScreenSize::new(1000, 1000);
//! let image = ImageSize::new(2000, 1000).unwrap();
//! let viewport = ViewportState::default();
//!
//! let view = ViewTransform::compose(&viewport, screen, image).unwrap();
//! let natural = view.to_natural(ScreenPoint::new(500.0, 500.0));
//! assert!((natural.x - 1000.0).abs() < 1e-9);
//! assert!((natural.y - 500.0).abs() < 1e-9);
//! ```

mod affine;
mod compose;
pub mod constants;
mod error;
mod mapper;
mod space;
mod viewport;

pub use affine::AffineTransform;
pub use compose::{ViewTransform, base_fit_transform, compose, fit_scale};
pub use error::ViewError;
pub use mapper::{
    CoordinateMapper, natural_to_reference, screen_center_to_reference, screen_to_natural,
};
pub use space::{
    ImageSize, Natural, NaturalPoint, Point, Reference, ReferencePoint, ReferenceSize, Screen,
    ScreenPoint, ScreenSize, Space,
};
pub use viewport::{PanDrag, ViewportState, ZoomLimits};
