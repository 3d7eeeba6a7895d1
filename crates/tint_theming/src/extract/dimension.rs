use tint_tokens::DimensionValue;

use super::ExtractError;

/// Metrics carry the bare number; units were normalized by the processing pipeline.
pub(crate) fn extract(dimension: DimensionValue) -> Result<f64, ExtractError> {
    match dimension {
        DimensionValue::Constant(constant) => Ok(constant.value),
        DimensionValue::Expression(expression) => Err(ExtractError::UnresolvedExpression(expression)),
    }
}
