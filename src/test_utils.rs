//! Test utilities for imageops-sharpen
//!
//! This module provides common image builders for testing the sharpening stages.
//! It is only compiled when running tests.

use image::Rgba;

use crate::Image;

/// Creates an RGBA image where every pixel has the same value.
pub fn create_uniform_rgba_image(width: u32, height: u32, pixel: Rgba<u8>) -> Image<Rgba<u8>> {
    Image::from_pixel(width, height, pixel)
}

/// Creates an opaque RGBA image with smooth horizontal and vertical ramps.
///
/// - red grows with `x`
/// - green grows with `y`
/// - blue grows with `x + y`
pub fn create_gradient_rgba_image(width: u32, height: u32) -> Image<Rgba<u8>> {
    let w = width.max(1);
    let h = height.max(1);
    Image::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / w) as u8,
            (y * 255 / h) as u8,
            ((x + y) * 255 / (w + h)) as u8,
            255,
        ])
    })
}

/// Creates a one-pixel checkerboard alternating between a bright and a dark colour.
///
/// - `(x + y)` even: [200, 150, 100, 255]
/// - `(x + y)` odd: [60, 90, 120, 255]
pub fn create_checkerboard_rgba_image(width: u32, height: u32) -> Image<Rgba<u8>> {
    Image::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([200, 150, 100, 255])
        } else {
            Rgba([60, 90, 120, 255])
        }
    })
}

/// Encodes an image as PNG bytes, panicking on failure.
pub fn encode_png(image: &Image<Rgba<u8>>) -> Vec<u8> {
    crate::encode_png(image).expect("PNG encoding of a test image should succeed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_gradient_rgba_image_ramps() {
        let image = create_gradient_rgba_image(10, 10);
        assert_eq!(image.dimensions(), (10, 10));
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert!(image.get_pixel(9, 0)[0] > image.get_pixel(1, 0)[0]);
        assert!(image.get_pixel(0, 9)[1] > image.get_pixel(0, 1)[1]);
    }

    #[test]
    fn create_checkerboard_rgba_image_alternates() {
        let image = create_checkerboard_rgba_image(3, 3);
        assert_eq!(image.get_pixel(0, 0), &Rgba([200, 150, 100, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([60, 90, 120, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgba([200, 150, 100, 255]));
    }

    #[test]
    fn encode_png_produces_png_signature() {
        let bytes = encode_png(&create_uniform_rgba_image(2, 2, Rgba([1, 2, 3, 4])));
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }
}
