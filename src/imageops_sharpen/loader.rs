use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageError, ImageReader, Limits, Rgba};
use tracing::{debug, info, instrument};

use crate::error::Error;
use crate::utils::limit_size;
use crate::Image;

/// An encoded image handed over by the host, plus the name it was picked under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    name: String,
    bytes: Vec<u8>,
}

impl ImageResource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A decoded, possibly downscaled pixel buffer.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub buffer: Image<Rgba<u8>>,
    /// `buffer.width() / original_width`; `1.0` when no scaling happened.
    pub scale: f64,
    pub original_width: u32,
    pub original_height: u32,
}

/// Decodes encoded bytes into RGBA pixel buffers.
///
/// The decoder works on a borrowed cursor, so nothing outlives a call to
/// [`Loader::load`] whether it succeeds or fails.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    limits: Limits,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds decoder dimensions and allocations.
    ///
    /// Exceeding a limit is reported as [`Error::RenderContext`].
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Decodes `bytes` and scales the result so its longer side is at most `max_dim`.
    ///
    /// Never upscales. Output sides are `round(side * scale)` with
    /// `scale = min(1, max_dim / max(width, height))`.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidOptions` - `max_dim` is zero
    /// * `Error::Decode` - the bytes are not a supported image
    /// * `Error::EmptyImage` - the image has no pixels
    /// * `Error::RenderContext` - a decoder dimension or allocation limit was hit
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load(&self, bytes: &[u8], max_dim: u32) -> Result<LoadedImage, Error> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|err| Error::Decode(ImageError::IoError(err)))?;
        reader.limits(self.limits.clone());
        let decoded = reader.decode().map_err(Error::from_decoder)?;

        let (original_width, original_height) = (decoded.width(), decoded.height());
        if original_width == 0 || original_height == 0 {
            return Err(Error::EmptyImage);
        }

        let (width, height, _) = limit_size(original_width, original_height, max_dim)?;

        let rgba = decoded.into_rgba8();
        let buffer = if (width, height) == (original_width, original_height) {
            rgba
        } else {
            debug!(width, height, "downscaling to working size");
            imageops::resize(&rgba, width, height, FilterType::Triangle)
        };

        let scale = f64::from(width) / f64::from(original_width);
        info!(
            original_width,
            original_height, width, height, scale, "image loaded"
        );

        Ok(LoadedImage {
            buffer,
            scale,
            original_width,
            original_height,
        })
    }
}

/// Decodes with default limits; see [`Loader::load`].
pub fn load_pixel_buffer(bytes: &[u8], max_dim: u32) -> Result<LoadedImage, Error> {
    Loader::new().load(bytes, max_dim)
}
