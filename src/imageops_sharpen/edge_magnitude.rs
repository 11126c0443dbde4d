use crate::Image;
use image::{Luma, Rgba};
use itertools::iproduct;

/// Per-pixel gradient magnitude, one `f32` per pixel.
pub type EdgeMap = Image<Luma<f32>>;

/// Number of evenly spaced samples used to estimate the edge normalisation constant.
pub const EDGE_NORMALIZATION_SAMPLES: usize = 1024;

const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
const SOBEL_Y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

/// BT.601 luma of an RGBA pixel; alpha is ignored.
#[inline]
pub fn luminance(pixel: &Rgba<u8>) -> f32 {
    let [r, g, b, _] = pixel.0;
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

/// Sobel edge magnitude over luminance.
pub trait EdgeMagnitude {
    /// Computes `hypot(Gx, Gy)` for every interior pixel.
    ///
    /// The outermost rows and columns are left at zero; the 3x3 window is
    /// never evaluated out of bounds. Images narrower or shorter than three
    /// pixels therefore produce an all-zero map. No normalisation is applied.
    fn edge_magnitude(&self) -> EdgeMap;
}

impl EdgeMagnitude for Image<Rgba<u8>> {
    fn edge_magnitude(&self) -> EdgeMap {
        let (width, height) = self.dimensions();
        let mut magnitude: EdgeMap = Image::new(width, height);
        if width < 3 || height < 3 {
            return magnitude;
        }

        let luma: Vec<f32> = self.pixels().map(luminance).collect();
        let w = width as usize;

        for (y, x) in iproduct!(1..height - 1, 1..width - 1) {
            let (cx, cy) = (x as usize, y as usize);
            let mut gx = 0.0f32;
            let mut gy = 0.0f32;
            for (k, (j, i)) in iproduct!(0..3, 0..3).enumerate() {
                let sample = luma[(cy + j - 1) * w + (cx + i - 1)];
                gx += sample * SOBEL_X[k];
                gy += sample * SOBEL_Y[k];
            }
            magnitude.put_pixel(x, y, Luma([gx.hypot(gy)]));
        }

        magnitude
    }
}

/// Estimates the largest edge magnitude from at most `samples` evenly spaced pixels.
///
/// The stride is `len / samples + 1`, so a narrow peak that falls between
/// two samples can be missed; the estimate never exceeds the true maximum.
/// The result is floored at `1.0` so it is always safe to divide by.
pub fn sampled_max(edges: &EdgeMap, samples: usize) -> f32 {
    let data = edges.as_raw();
    let stride = data.len() / samples.max(1) + 1;
    data.iter().step_by(stride).copied().fold(1.0f32, f32::max)
}
