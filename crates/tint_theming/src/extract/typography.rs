use tint_tokens::{CompositeValue, DimensionUnit, DimensionValue, TypographyValue};

use super::ExtractError;
use crate::config::FontWeightMapping;
use crate::declaration::{FontInformation, TypographyRepresentation};

pub(crate) fn extract(
    typography: TypographyValue,
    weight_mapping: Option<&FontWeightMapping>,
) -> Result<TypographyRepresentation, ExtractError> {
    let (family, weight, size) = match (
        typography.font_family,
        typography.font_weight,
        typography.font_size,
    ) {
        (CompositeValue::Value(family), CompositeValue::Value(weight), CompositeValue::Value(size)) => {
            (family, weight, size)
        }
        _ => return Err(ExtractError::UnresolvedReferences),
    };

    let mut font_name = family.primary().ok_or(ExtractError::FontsEmpty)?.to_string();

    let size = match size {
        DimensionValue::Constant(constant) => constant,
        DimensionValue::Expression(_) => return Err(ExtractError::UnresolvedExpressions),
    };
    if size.unit != DimensionUnit::Px {
        return Err(ExtractError::InvalidFontSizeUnit(size.unit.as_str()));
    }

    let suffix = weight_mapping
        .and_then(|mapping| mapping.get(&weight.raw_value()))
        .map(|suffix| suffix.trim())
        .filter(|suffix| !suffix.is_empty());
    if let Some(suffix) = suffix {
        font_name.push('-');
        font_name.push_str(suffix);
    }

    Ok(TypographyRepresentation {
        font: FontInformation::named(font_name),
        font_size: size.value,
    })
}
