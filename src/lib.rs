//! Edge-aware unsharp-mask sharpening for RGBA pixel buffers.
//!
//! The pipeline decodes an encoded image, scales it down to a working size,
//! blurs a copy with a separable box blur, weights the extracted detail by
//! Sobel edge magnitude, and composites the result. Batches run one image at
//! a time and record each failure without aborting the rest.

mod error;
mod imageops_sharpen;
#[cfg(test)]
mod test_utils;
mod utils;

use image::{ImageBuffer, Pixel};

pub use error::{Error, OptionsError};
pub use imageops_sharpen::batch::{
    process_batch, BatchItem, BatchIter, BatchProcessor, BatchReport, CancellationToken,
    MAX_BATCH_SIZE,
};
pub use imageops_sharpen::box_blur::{BoxBlur, GAUSSIAN_PASSES};
pub use imageops_sharpen::edge_magnitude::{
    luminance, sampled_max, EdgeMagnitude, EdgeMap, EDGE_NORMALIZATION_SAMPLES,
};
pub use imageops_sharpen::loader::{load_pixel_buffer, ImageResource, LoadedImage, Loader};
pub use imageops_sharpen::options::{
    EdgeLevel, Mode, Overrides, SharpenOptions, DEFAULT_MAX_DIMENSION, MAX_RADIUS,
};
pub use imageops_sharpen::process::{encode_png, process_image, ProcessResult};
pub use imageops_sharpen::unsharp_mask::{UnsharpMask, DENOISE_PASSES, DENOISE_RADIUS};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;

/// RGBA8 pixel grid processed by every stage.
pub type PixelBuffer = Image<image::Rgba<u8>>;
