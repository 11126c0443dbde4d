use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba};
use tracing::{debug, instrument};

use crate::error::Error;
use crate::imageops_sharpen::loader::{ImageResource, Loader};
use crate::imageops_sharpen::options::SharpenOptions;
use crate::imageops_sharpen::unsharp_mask::UnsharpMask;
use crate::Image;

/// Before/after pair for one processed image.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Downscale factor applied by the loader.
    pub scale: f64,
    /// Original pixels at working size.
    pub before: Image<Rgba<u8>>,
    /// Sharpened pixels.
    pub after: Image<Rgba<u8>>,
}

impl ProcessResult {
    /// PNG encoding of [`ProcessResult::before`].
    pub fn encode_before_png(&self) -> Result<Vec<u8>, Error> {
        encode_png(&self.before)
    }

    /// PNG encoding of [`ProcessResult::after`].
    pub fn encode_after_png(&self) -> Result<Vec<u8>, Error> {
        encode_png(&self.after)
    }

    /// File name for the sharpened download: `<stem>_enhanced.png`.
    pub fn download_name(&self) -> String {
        download_name(&self.name)
    }
}

/// Runs the full pipeline on one resource.
///
/// Options are validated before decoding, so an invalid configuration
/// never touches the image. The first failing stage ends the run.
pub fn process_image(
    resource: &ImageResource,
    options: &SharpenOptions,
    max_dim: u32,
) -> Result<ProcessResult, Error> {
    process_with_loader(&Loader::new(), resource, options, max_dim)
}

#[instrument(skip_all, fields(name = resource.name(), max_dim = max_dim))]
pub(crate) fn process_with_loader(
    loader: &Loader,
    resource: &ImageResource,
    options: &SharpenOptions,
    max_dim: u32,
) -> Result<ProcessResult, Error> {
    options.validate()?;

    let loaded = loader.load(resource.bytes(), max_dim)?;
    let after = loaded.buffer.unsharp_mask(options)?;
    debug!("sharpening finished");

    let (width, height) = loaded.buffer.dimensions();
    Ok(ProcessResult {
        name: resource.name().to_owned(),
        width,
        height,
        scale: loaded.scale,
        before: loaded.buffer,
        after,
    })
}

/// Encodes an RGBA buffer as PNG bytes.
pub fn encode_png(image: &Image<Rgba<u8>>) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(Error::Encode)?;
    Ok(bytes)
}

fn download_name(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    format!("{stem}_enhanced.png")
}
