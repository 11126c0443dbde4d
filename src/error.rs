use std::time::Duration;

use thiserror::Error;

/// Error type for sharpening options validation
///
/// Returned when a [`SharpenOptions`](crate::SharpenOptions) field or a
/// processing bound is outside its documented range. No pixel is touched
/// when validation fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    /// Strength must be a finite fraction in `[0, 1]`
    #[error("Strength {0} is out of range, expected a value in [0, 1]")]
    StrengthOutOfRange(f32),

    /// Edge enhancement must be finite and non-negative
    #[error("Edge enhancement {0} is out of range, expected a finite value >= 0")]
    EdgeEnhanceOutOfRange(f32),

    /// Blur radius exceeds the supported maximum
    #[error("Radius ({radius}) must be less than or equal to {max}")]
    RadiusTooLarge { radius: u32, max: u32 },

    /// The maximum working dimension must be at least one pixel
    #[error("Maximum dimension must be greater than zero")]
    ZeroMaxDimension,
}

/// Error type for the sharpening pipeline
///
/// Every per-image failure is reported through this type. Inside a batch
/// each failure is recorded for its own slot and never aborts the siblings.
#[derive(Debug, Error)]
pub enum Error {
    /// The resource could not be interpreted as an image
    ///
    /// Corrupt data, an unsupported or unrecognised format, or an I/O
    /// failure while reading the encoded bytes.
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The decoded image has no pixels
    #[error("Decoded image has zero width or height")]
    EmptyImage,

    /// A pixel surface could not be acquired
    ///
    /// Raised when the decoder hits its configured dimension or allocation
    /// limits.
    #[error("Pixel surface unavailable: {0}")]
    RenderContext(String),

    /// The supplied options are outside their documented range
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    /// Encoding a result buffer for export failed
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The image took longer than the per-item budget
    #[error("Processing took {elapsed:?}, exceeding the budget of {budget:?}")]
    TimeBudgetExceeded { elapsed: Duration, budget: Duration },
}

impl Error {
    /// Maps a decoder error onto the pipeline taxonomy.
    ///
    /// Limit violations mean the host could not provide a surface large
    /// enough, everything else is treated as undecodable input.
    pub(crate) fn from_decoder(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Limits(limit) => Self::RenderContext(limit.to_string()),
            other => Self::Decode(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::error::{LimitError, LimitErrorKind};

    #[test]
    fn limit_errors_map_to_render_context() {
        let err = image::ImageError::Limits(LimitError::from_kind(LimitErrorKind::InsufficientMemory));
        assert!(matches!(Error::from_decoder(err), Error::RenderContext(_)));
    }

    #[test]
    fn io_errors_map_to_decode() {
        let err = image::ImageError::IoError(std::io::Error::other("truncated"));
        assert!(matches!(Error::from_decoder(err), Error::Decode(_)));
    }

    #[test]
    fn options_error_converts_into_invalid_options() {
        let err: Error = OptionsError::StrengthOutOfRange(1.5).into();
        assert!(matches!(
            err,
            Error::InvalidOptions(OptionsError::StrengthOutOfRange(_))
        ));
        assert!(err.to_string().contains("1.5"));
    }
}
