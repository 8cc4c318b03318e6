//! Mapview - interactive fantasy map viewer core
//!
//! Pan and zoom over a map image, with region-triggered music, toggleable
//! overlay layers and distance measurement. Geometry lives in the
//! `mapview_geom` crate; this crate wires it to configuration, input,
//! drawing and audio.

pub mod audio;
pub mod config;
pub mod constants;
pub mod frame;
pub mod input;
pub mod map_image;
pub mod measurement;
pub mod overlay;
pub mod region;
pub mod region_tracker;
pub mod viewer;

#[cfg(test)]
mod tests;

pub use mapview_geom::{
    AffineTransform, CoordinateMapper, ImageSize, NaturalPoint, PanDrag, Point, ReferencePoint,
    ReferenceSize, ScreenPoint, ScreenSize, ViewError, ViewTransform, ViewportState, ZoomLimits,
};

pub use audio::{AudioSink, RecordingSink, RegionEvent};
pub use config::{ConfigError, LogLevel, MapConfig, ViewerConfig};
pub use frame::{DrawSurface, FrameLoop, render};
pub use input::{InputEvent, PointerButton};
pub use map_image::{MapImage, MapImageError};
pub use measurement::{MapScale, MeasurementTool};
pub use overlay::{LayerPass, OverlayLayer, OverlayState, ToggleOutcome};
pub use region::{AxisRange, Region, RegionArea, resolve};
pub use region_tracker::{RegionPollThrottle, RegionState, RegionTracker};
pub use viewer::{DragState, MapViewer};
