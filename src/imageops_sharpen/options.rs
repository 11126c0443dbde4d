use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Largest blur radius accepted by [`SharpenOptions::validate`].
pub const MAX_RADIUS: u32 = 256;

/// Maximum working dimension used when the caller does not pick a mode.
pub const DEFAULT_MAX_DIMENSION: u32 = 2000;

/// Parameters of a single unsharp-mask pass.
///
/// Every field must be supplied by the caller; presets live on [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharpenOptions {
    /// Fraction of high-frequency detail reinjected, `0.0..=1.0`.
    pub strength: f32,
    /// Half-width of the mask blur kernel in pixels.
    pub radius: u32,
    /// Multiplier of the edge-weighted detail boost, `>= 0`.
    pub edge_enhance: f32,
    /// Apply a light pre-blur before computing the mask.
    pub denoise: bool,
}

impl SharpenOptions {
    pub const fn new(strength: f32, radius: u32, edge_enhance: f32, denoise: bool) -> Self {
        Self {
            strength,
            radius,
            edge_enhance,
            denoise,
        }
    }

    /// Checks every field against its documented range.
    ///
    /// # Errors
    ///
    /// * `OptionsError::StrengthOutOfRange` - strength is NaN or outside `[0, 1]`
    /// * `OptionsError::EdgeEnhanceOutOfRange` - edge enhancement is NaN, infinite or negative
    /// * `OptionsError::RadiusTooLarge` - radius exceeds [`MAX_RADIUS`]
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(OptionsError::StrengthOutOfRange(self.strength));
        }
        if !self.edge_enhance.is_finite() || self.edge_enhance < 0.0 {
            return Err(OptionsError::EdgeEnhanceOutOfRange(self.edge_enhance));
        }
        if self.radius > MAX_RADIUS {
            return Err(OptionsError::RadiusTooLarge {
                radius: self.radius,
                max: MAX_RADIUS,
            });
        }
        Ok(())
    }
}

/// Processing mode trading latency for quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Fast,
    Quality,
    Pro,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::Fast, Self::Quality, Self::Pro];

    /// Baseline options for this mode.
    pub const fn preset(self) -> SharpenOptions {
        match self {
            Self::Fast => SharpenOptions::new(0.35, 1, 0.15, false),
            Self::Quality => SharpenOptions::new(0.5, 2, 0.25, true),
            Self::Pro => SharpenOptions::new(0.65, 3, 0.35, true),
        }
    }

    /// Longest side, in pixels, an image is scaled down to before processing.
    pub const fn max_dimension(self) -> u32 {
        match self {
            Self::Fast => 1600,
            Self::Quality => 2000,
            Self::Pro => 2400,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Quality => "quality",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown mode `{s}`, expected fast, quality or pro"))
    }
}

/// Coarse edge enhancement selector exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeLevel {
    Off,
    Light,
    Medium,
    Strong,
}

impl EdgeLevel {
    pub const fn edge_enhance(self) -> f32 {
        match self {
            Self::Off => 0.0,
            Self::Light => 0.15,
            Self::Medium => 0.25,
            Self::Strong => 0.35,
        }
    }

    /// Level for a numeric selector index (0 = off ... 3 = strong).
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Off),
            1 => Some(Self::Light),
            2 => Some(Self::Medium),
            3 => Some(Self::Strong),
            _ => None,
        }
    }
}

/// Per-session values that take precedence over a [`Mode`] preset.
///
/// The radius is never overridable; it always comes from the preset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overrides {
    pub strength: Option<f32>,
    pub edge_level: Option<EdgeLevel>,
    pub denoise: Option<bool>,
}

impl Overrides {
    /// Strength given as a slider percentage, clamped to `0..=100`.
    #[must_use]
    pub fn strength_percent(mut self, percent: u8) -> Self {
        self.strength = Some(f32::from(percent.min(100)) / 100.0);
        self
    }

    #[must_use]
    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = Some(strength);
        self
    }

    #[must_use]
    pub fn edge_level(mut self, level: EdgeLevel) -> Self {
        self.edge_level = Some(level);
        self
    }

    #[must_use]
    pub fn denoise(mut self, denoise: bool) -> Self {
        self.denoise = Some(denoise);
        self
    }

    /// Merges these overrides onto the preset of `mode` and validates the result.
    pub fn resolve(&self, mode: Mode) -> Result<SharpenOptions, OptionsError> {
        let base = mode.preset();
        let options = SharpenOptions {
            strength: self.strength.unwrap_or(base.strength),
            radius: base.radius,
            edge_enhance: self
                .edge_level
                .map_or(base.edge_enhance, EdgeLevel::edge_enhance),
            denoise: self.denoise.unwrap_or(base.denoise),
        };
        options.validate()?;
        Ok(options)
    }
}
