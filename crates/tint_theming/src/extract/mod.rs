//! Per-type extractors
//!
//! Each supported value type has one extractor that turns the value into a
//! representation and files it into the cache category it owns. Dispatch is a
//! closed enum resolved from the value's type tag; types without an extractor
//! are reported by the converter as unsupported.

mod color;
mod dimension;
mod file;
mod font_family;
mod gradient;
mod typography;

pub use file::{classify, FileKind};

use std::path::PathBuf;

use thiserror::Error;
use tint_tokens::{ColorError, DimensionExpression, TokenType, TypedValue};

use crate::config::ConverterConfiguration;
use crate::declaration::{ColorRepresentation, DeclarationCaches};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("dimension expression `{0}` was never evaluated")]
    UnresolvedExpression(DimensionExpression),

    #[error("font family lists no fonts")]
    FontsEmpty,

    #[error("value still contains unresolved references")]
    UnresolvedReferences,

    #[error("value still contains unevaluated expressions")]
    UnresolvedExpressions,

    #[error("font size must be in px, found {0}")]
    InvalidFontSizeUnit(&'static str),

    #[error("cannot determine the content type of {}", .0.display())]
    UnknownFileType(PathBuf),

    #[error("{} has unsupported content type {mime}", .path.display())]
    UnsupportedFileType { path: PathBuf, mime: &'static str },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Fatal errors abort the conversion whatever the unsupported-token strategy is.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExtractError::Io { .. })
    }
}

/// The extractor bound to a value type
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ExtractorKind {
    Color,
    Dimension,
    FontFamily,
    Typography,
    Gradient,
    File,
}

impl ExtractorKind {
    /// The extractor registered for `value`'s type, if any
    pub fn for_value(value: &TypedValue) -> Option<Self> {
        Self::for_type(value.token_type())
    }

    pub fn for_type(token_type: TokenType) -> Option<Self> {
        Some(match token_type {
            TokenType::Color => Self::Color,
            TokenType::Dimension => Self::Dimension,
            TokenType::FontFamily => Self::FontFamily,
            TokenType::Typography => Self::Typography,
            TokenType::Gradient => Self::Gradient,
            TokenType::File => Self::File,
            TokenType::FontWeight
            | TokenType::Number
            | TokenType::Duration
            | TokenType::CubicBezier
            | TokenType::Shadow
            | TokenType::StrokeStyle
            | TokenType::Border
            | TokenType::Transition => return None,
        })
    }

    pub fn token_type(self) -> TokenType {
        match self {
            Self::Color => TokenType::Color,
            Self::Dimension => TokenType::Dimension,
            Self::FontFamily => TokenType::FontFamily,
            Self::Typography => TokenType::Typography,
            Self::Gradient => TokenType::Gradient,
            Self::File => TokenType::File,
        }
    }

    /// Extract `value` and store the result under `key`.
    pub async fn extract(
        self,
        value: TypedValue,
        key: &str,
        configuration: &ConverterConfiguration,
        caches: &mut DeclarationCaches,
    ) -> Result<(), ExtractError> {
        let key = key.to_string();
        match (self, value) {
            (Self::Color, TypedValue::Color(color)) => {
                let hex = color::extract(&color, configuration.color_hex_format)?;
                caches.colors.insert(key, ColorRepresentation::Hex(hex));
            }
            (Self::Dimension, TypedValue::Dimension(dimension)) => {
                caches.metrics.insert(key, dimension::extract(dimension)?);
            }
            (Self::FontFamily, TypedValue::FontFamily(family)) => {
                caches.fonts.insert(key, font_family::extract(&family)?);
            }
            (Self::Typography, TypedValue::Typography(typography)) => {
                let representation =
                    typography::extract(typography, configuration.font_weight_mapping.as_ref())?;
                caches.typography.insert(key, representation);
            }
            (Self::Gradient, TypedValue::Gradient(stops)) => {
                let gradient = gradient::extract(stops, configuration.color_hex_format)?;
                caches.gradients.insert(key, gradient);
            }
            (Self::File, TypedValue::File(file)) => file::extract(&file, key, caches).await?,
            (kind, other) => {
                return Err(ExtractError::TypeMismatch {
                    expected: kind.token_type().as_str(),
                    found: other.token_type().as_str(),
                })
            }
        }
        Ok(())
    }
}
