use image::Rgba;
use tracing::debug;

use crate::error::OptionsError;
use crate::imageops_sharpen::box_blur::{BoxBlur, GAUSSIAN_PASSES};
use crate::imageops_sharpen::edge_magnitude::{
    sampled_max, EdgeMagnitude, EDGE_NORMALIZATION_SAMPLES,
};
use crate::imageops_sharpen::options::SharpenOptions;
use crate::utils::clamp_f32_to_channel;
use crate::Image;

/// Radius of the light pre-blur applied when `denoise` is set.
pub const DENOISE_RADIUS: u32 = 1;
/// Pass count of the denoise pre-blur.
pub const DENOISE_PASSES: u32 = 1;

/// Edge-adaptive unsharp masking
///
/// Isolates high-frequency detail as `original - blurred` and reinjects a
/// `strength` fraction of it. When `edge_enhance > 0`, the detail is further
/// scaled by `1 + edge_enhance * edge / max_edge`, so strong gradients get
/// more boost than flat regions.
pub trait UnsharpMask {
    /// Produces the sharpened image
    ///
    /// # Arguments
    ///
    /// * `options` - Sharpening parameters, validated before any pixel is processed
    ///
    /// # Returns
    ///
    /// A new image of identical dimensions. Alpha is copied unchanged.
    ///
    /// # Errors
    ///
    /// * `OptionsError` - any field of `options` is outside its range
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_sharpen::{Image, SharpenOptions, UnsharpMask};
    /// use image::Rgba;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image: Image<Rgba<u8>> = Image::new(64, 64);
    /// let options = SharpenOptions::new(0.5, 2, 0.25, true);
    /// let sharpened = image.unsharp_mask(&options)?;
    /// # Ok(())
    /// # }
    /// ```
    fn unsharp_mask(&self, options: &SharpenOptions) -> Result<Self, OptionsError>
    where
        Self: Sized;
}

impl UnsharpMask for Image<Rgba<u8>> {
    fn unsharp_mask(&self, options: &SharpenOptions) -> Result<Self, OptionsError> {
        options.validate()?;

        if options.strength == 0.0 {
            return Ok(self.clone());
        }

        let mask_source = if options.denoise {
            self.box_blur(DENOISE_RADIUS, DENOISE_PASSES)
        } else {
            self.clone()
        };
        let blurred = mask_source.box_blur(options.radius.max(1), GAUSSIAN_PASSES);

        // Edges come from the original, never the denoised copy
        let edge_weights = (options.edge_enhance > 0.0).then(|| {
            let edges = self.edge_magnitude();
            let max_edge = sampled_max(&edges, EDGE_NORMALIZATION_SAMPLES);
            debug!(max_edge, "edge normalisation estimated");
            (edges, max_edge)
        });

        let mut output = self.clone();
        for (index, ((out, original), blur)) in output
            .pixels_mut()
            .zip(self.pixels())
            .zip(blurred.pixels())
            .enumerate()
        {
            let edge_factor = edge_weights.as_ref().map_or(1.0, |(edges, max_edge)| {
                1.0 + options.edge_enhance * (edges.as_raw()[index] / max_edge)
            });
            let gain = options.strength * edge_factor;

            for channel in 0..3 {
                let value = f32::from(original[channel]);
                let detail = value - f32::from(blur[channel]);
                out[channel] = clamp_f32_to_channel(value + gain * detail);
            }
        }

        Ok(output)
    }
}
