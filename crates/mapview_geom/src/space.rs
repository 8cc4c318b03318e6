//! Coordinate spaces and space-tagged geometry.
//!
//! The viewer juggles three coordinate systems:
//! - [`Screen`]: pixels of the drawing surface, origin top-left.
//! - [`Natural`]: pixels of the unscaled map image.
//! - [`Reference`]: the map stretched to a fixed reference resolution
//!   (1920x1080 by default), used by region definitions.
//!
//! A [`Point`] carries its space as a phantom type so a screen point can never
//! be handed to code that expects a natural-image point without going through
//! an explicit conversion.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Marker trait implemented by the coordinate space tags.
pub trait Space: Copy + Default + fmt::Debug + PartialEq {
    /// Short name used in debug output.
    const NAME: &'static str;
}

/// Pixels of the drawing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Screen;

/// Pixels of the unscaled source image.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Natural;

/// Fixed reference resolution used by region rectangles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reference;

impl Space for Screen {
    const NAME: &'static str = "screen";
}

impl Space for Natural {
    const NAME: &'static str = "natural";
}

impl Space for Reference {
    const NAME: &'static str = "reference";
}

/// A 2D point tagged with the space it lives in.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Point<S: Space> {
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: Space> Point<S> {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    /// The origin of this space.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance to another point in the same space.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns true if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl<S: Space> Default for Point<S> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<S: Space> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", S::NAME, self.x, self.y)
    }
}

impl<S: Space> From<(f64, f64)> for Point<S> {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

pub type ScreenPoint = Point<Screen>;
pub type NaturalPoint = Point<Natural>;
pub type ReferencePoint = Point<Reference>;

/// Size of the drawing surface in pixels.
///
/// Owned by the display, not by the viewer. May be zero while a window is
/// minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Center of the surface in screen space.
    pub fn center(&self) -> ScreenPoint {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Pixel dimensions of an image, guaranteed non-zero.
///
/// Used for the natural size of the map and for the native resolution of
/// overlay layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct ImageSize {
    width: u32,
    height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Result<Self, ViewError> {
        if width == 0 || height == 0 {
            return Err(ViewError::EmptyImage { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }
}

impl TryFrom<(u32, u32)> for ImageSize {
    type Error = ViewError;

    fn try_from((width, height): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(width, height)
    }
}

impl From<ImageSize> for (u32, u32) {
    fn from(size: ImageSize) -> Self {
        (size.width, size.height)
    }
}

impl TryFrom<ScreenSize> for ImageSize {
    type Error = ViewError;

    fn try_from(size: ScreenSize) -> Result<Self, Self::Error> {
        Self::new(size.width, size.height)
    }
}

/// The fixed resolution region rectangles are authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSize {
    width: u32,
    height: u32,
}

impl ReferenceSize {
    pub fn new(width: u32, height: u32) -> Result<Self, ViewError> {
        if width == 0 || height == 0 {
            return Err(ViewError::EmptyReference { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for ReferenceSize {
    fn default() -> Self {
        Self {
            width: crate::constants::REFERENCE_WIDTH,
            height: crate::constants::REFERENCE_HEIGHT,
        }
    }
}
