//! Internal utility functions for imageops-sharpen.
//!
//! Numeric helpers shared by the blur, edge and compositing stages.

use imageproc::definitions::Clamp;

use crate::error::OptionsError;

/// Rounds a floating-point channel value and clamps it to `0..=255`.
///
/// Halfway values round to the nearest even integer, matching a
/// clamped byte-array store.
///
/// # Arguments
///
/// * `value` - The floating-point value to convert
///
/// # Returns
///
/// The nearest representable 8-bit channel value
#[inline]
pub fn clamp_f32_to_channel(value: f32) -> u8 {
    <u8 as Clamp<f32>>::clamp(value.round_ties_even())
}

/// Computes the dimensions of an image scaled so its longer side fits `max_dim`.
///
/// Only ever scales down: when both sides already fit, the original size
/// and a scale of `1.0` are returned. Each side is rounded to the nearest
/// pixel and never drops below one.
///
/// # Arguments
///
/// * `width` - The original width
/// * `height` - The original height
/// * `max_dim` - The bound for the longer side
///
/// # Returns
///
/// `(new_width, new_height, scale)`, or an error if `max_dim` is zero
pub fn limit_size(width: u32, height: u32, max_dim: u32) -> Result<(u32, u32, f64), OptionsError> {
    if max_dim == 0 {
        return Err(OptionsError::ZeroMaxDimension);
    }

    let longer = width.max(height);
    if longer <= max_dim {
        return Ok((width, height, 1.0));
    }

    let scale = f64::from(max_dim) / f64::from(longer);
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max_dim);
    Ok((scaled(width), scaled(height), scale))
}
