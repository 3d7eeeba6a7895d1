//! Color values and hex encoding

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Channel order used when encoding a color as hex
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorHexFormat {
    /// `#AARRGGBB`
    #[default]
    Argb,
    /// `#RRGGBBAA`
    Rgba,
}

/// Color space declared by a DTCG color value
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum ColorSpace {
    Srgb,
    SrgbLinear,
    Hsl,
    Hwb,
    Lab,
    Lch,
    Oklab,
    Oklch,
    DisplayP3,
    A98Rgb,
    ProphotoRgb,
    Rec2020,
    XyzD65,
    XyzD50,
    Other(String),
}

impl ColorSpace {
    pub fn from_name(name: &str) -> Self {
        match name {
            "srgb" => Self::Srgb,
            "srgb-linear" => Self::SrgbLinear,
            "hsl" => Self::Hsl,
            "hwb" => Self::Hwb,
            "lab" => Self::Lab,
            "lch" => Self::Lch,
            "oklab" => Self::Oklab,
            "oklch" => Self::Oklch,
            "display-p3" => Self::DisplayP3,
            "a98-rgb" => Self::A98Rgb,
            "prophoto-rgb" => Self::ProphotoRgb,
            "rec2020" => Self::Rec2020,
            "xyz-d65" | "xyz" => Self::XyzD65,
            "xyz-d50" => Self::XyzD50,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Srgb => "srgb",
            Self::SrgbLinear => "srgb-linear",
            Self::Hsl => "hsl",
            Self::Hwb => "hwb",
            Self::Lab => "lab",
            Self::Lch => "lch",
            Self::Oklab => "oklab",
            Self::Oklch => "oklch",
            Self::DisplayP3 => "display-p3",
            Self::A98Rgb => "a98-rgb",
            Self::ProphotoRgb => "prophoto-rgb",
            Self::Rec2020 => "rec2020",
            Self::XyzD65 => "xyz-d65",
            Self::XyzD50 => "xyz-d50",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One channel of a color; DTCG allows the `none` keyword
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorComponent {
    Number(f64),
    None,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("color space `{0}` cannot be encoded as hex")]
    UnsupportedColorSpace(ColorSpace),

    #[error("invalid color components {0:?}")]
    InvalidColorComponents(Vec<ColorComponent>),

    #[error("alpha {0} is outside 0..=1")]
    InvalidAlpha(f64),

    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorValue {
    pub color_space: ColorSpace,
    pub components: Vec<ColorComponent>,
    pub alpha: f64,
    /// Optional fallback hex as written in the source document
    pub hex: Option<String>,
}

impl ColorValue {
    /// An opaque sRGB color from 0..=1 channels
    pub fn srgb(red: f64, green: f64, blue: f64) -> Self {
        Self {
            color_space: ColorSpace::Srgb,
            components: vec![
                ColorComponent::Number(red),
                ColorComponent::Number(green),
                ColorComponent::Number(blue),
            ],
            alpha: 1.0,
            hex: None,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (CSS channel order).
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(input.to_string());
        let digits = input.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |index: usize| -> Result<f64, ColorError> {
            u8::from_str_radix(&expanded[index * 2..index * 2 + 2], 16)
                .map(|byte| f64::from(byte) / 255.0)
                .map_err(|_| invalid())
        };

        let alpha = if expanded.len() == 8 { channel(3)? } else { 1.0 };
        Ok(Self {
            hex: Some(format!("#{}", digits.to_ascii_uppercase())),
            ..Self::srgb(channel(0)?, channel(1)?, channel(2)?).with_alpha(alpha)
        })
    }

    /// Encode as an uppercase hex string.
    ///
    /// With `skip_full_opacity_alpha` an opaque color is written as `#RRGGBB`
    /// regardless of `format`.
    pub fn hex(
        &self,
        format: ColorHexFormat,
        skip_full_opacity_alpha: bool,
    ) -> Result<String, ColorError> {
        if self.color_space != ColorSpace::Srgb {
            return Err(ColorError::UnsupportedColorSpace(self.color_space.clone()));
        }

        let channels = self
            .components
            .iter()
            .map(|component| match component {
                ColorComponent::Number(value) if value.is_finite() && (0.0..=1.0).contains(value) => {
                    Some(to_byte(*value))
                }
                _ => None,
            })
            .collect::<Option<Vec<u8>>>()
            .filter(|channels| channels.len() == 3)
            .ok_or_else(|| ColorError::InvalidColorComponents(self.components.clone()))?;

        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(ColorError::InvalidAlpha(self.alpha));
        }

        let alpha = to_byte(self.alpha);
        let rgb = format!("{:02X}{:02X}{:02X}", channels[0], channels[1], channels[2]);
        if skip_full_opacity_alpha && alpha == u8::MAX {
            return Ok(format!("#{rgb}"));
        }

        Ok(match format {
            ColorHexFormat::Argb => format!("#{alpha:02X}{rgb}"),
            ColorHexFormat::Rgba => format!("#{rgb}{alpha:02X}"),
        })
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round() as u8
}
