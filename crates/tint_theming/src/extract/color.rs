use tint_tokens::{ColorHexFormat, ColorValue};

use super::ExtractError;

/// Hex-encode with full opacity left out, so opaque colors read `#RRGGBB`.
pub(crate) fn extract(color: &ColorValue, format: ColorHexFormat) -> Result<String, ExtractError> {
    Ok(color.hex(format, true)?)
}
