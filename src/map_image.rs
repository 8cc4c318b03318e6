//! Probing the natural size of map and overlay images.
//!
//! Only the image header is read; decoding pixels is the renderer's job.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use mapview_geom::{ImageSize, ViewError};

/// Errors raised while probing an image.
#[derive(Debug, thiserror::Error)]
pub enum MapImageError {
    #[error("Failed to read image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to read image header: {0}")]
    Header(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Empty(#[from] ViewError),
}

/// A map image whose natural dimensions are known.
#[derive(Debug, Clone, PartialEq)]
pub struct MapImage {
    pub path: PathBuf,
    pub size: ImageSize,
}

impl MapImage {
    /// Read the natural size of the image at `path`.
    pub fn probe(path: impl AsRef<Path>) -> Result<Self, MapImageError> {
        let path = path.as_ref();
        let (width, height) =
            image::image_dimensions(path).map_err(|source| MapImageError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        let size = ImageSize::new(width, height)?;
        log::info!("Map image {:?} is {}x{}", path, width, height);
        Ok(Self {
            path: path.to_path_buf(),
            size,
        })
    }

    /// Natural size of an encoded image held in memory.
    pub fn probe_bytes(bytes: &[u8]) -> Result<ImageSize, MapImageError> {
        let (width, height) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(ImageSize::new(width, height)?)
    }
}
