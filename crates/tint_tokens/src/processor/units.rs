//! Dimension unit normalization

use async_trait::async_trait;

use super::{map_values, ProcessError, TokenProcessor};
use crate::token::{CompositeValue, Token};
use crate::value::{DimensionConstant, DimensionUnit, DimensionValue, TypedValue};

/// Converts between `px` and `rem` with a fixed base
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimensionValueConverter {
    /// Pixels per `rem`
    pub rem_base: f64,
}

impl DimensionValueConverter {
    pub const DEFAULT_REM_BASE: f64 = 16.0;

    pub fn new(rem_base: f64) -> Self {
        Self { rem_base }
    }

    pub fn convert(&self, constant: DimensionConstant, target: DimensionUnit) -> DimensionConstant {
        let value = match (constant.unit, target) {
            (from, to) if from == to => constant.value,
            (DimensionUnit::Rem, DimensionUnit::Px) => constant.value * self.rem_base,
            (DimensionUnit::Px, DimensionUnit::Rem) => constant.value / self.rem_base,
            _ => constant.value,
        };
        DimensionConstant::new(value, target)
    }
}

impl Default for DimensionValueConverter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REM_BASE)
    }
}

/// Rewrites every dimension constant in the tree to one unit.
///
/// Expressions are left alone; run the arithmetic evaluator first.
#[derive(Clone, Copy, Debug)]
pub struct DimensionConversionProcessor {
    converter: DimensionValueConverter,
    target_unit: DimensionUnit,
}

impl DimensionConversionProcessor {
    pub fn new(converter: DimensionValueConverter, target_unit: DimensionUnit) -> Self {
        Self {
            converter,
            target_unit,
        }
    }

    fn convert(&self, dimension: DimensionValue) -> DimensionValue {
        match dimension {
            DimensionValue::Constant(constant) => {
                DimensionValue::Constant(self.converter.convert(constant, self.target_unit))
            }
            expression => expression,
        }
    }
}

impl Default for DimensionConversionProcessor {
    fn default() -> Self {
        Self::new(DimensionValueConverter::default(), DimensionUnit::Px)
    }
}

#[async_trait]
impl TokenProcessor for DimensionConversionProcessor {
    async fn process(&self, token: Token) -> Result<Token, ProcessError> {
        let base = self.converter.rem_base;
        if !base.is_finite() || base <= 0.0 {
            return Err(ProcessError::InvalidRemBase(base));
        }

        map_values(token, &mut |value| {
            Ok(match value {
                TypedValue::Dimension(dimension) => TypedValue::Dimension(self.convert(dimension)),
                TypedValue::Typography(mut typography) => {
                    if let CompositeValue::Value(size) = typography.font_size {
                        typography.font_size = CompositeValue::Value(self.convert(size));
                    }
                    TypedValue::Typography(typography)
                }
                other => other,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_tokens, DecodingContext};
    use crate::value::TypographyValue;

    fn constant(token: &Token, key: &str) -> DimensionConstant {
        match &token.as_group().unwrap()[key] {
            Token::Value(TypedValue::Dimension(DimensionValue::Constant(constant))) => *constant,
            other => panic!("expected constant, got {other:?}"),
        }
    }

    #[test]
    fn test_converter() {
        let converter = DimensionValueConverter::default();
        assert_eq!(
            converter.convert(DimensionConstant::rem(1.5), DimensionUnit::Px),
            DimensionConstant::px(24.0)
        );
        assert_eq!(
            converter.convert(DimensionConstant::px(8.0), DimensionUnit::Rem),
            DimensionConstant::rem(0.5)
        );
        assert_eq!(
            converter.convert(DimensionConstant::px(8.0), DimensionUnit::Px),
            DimensionConstant::px(8.0)
        );
    }

    #[tokio::test]
    async fn test_converts_tree_to_pixels() {
        let token = decode_tokens(
            r#"{
                "small": {"$type": "dimension", "$value": "0.5rem"},
                "large": {"$type": "dimension", "$value": "20px"},
                "body": {"$type": "typography", "$value": {
                    "fontFamily": "Inter", "fontWeight": 400, "fontSize": "1rem"
                }}
            }"#,
            &DecodingContext::default(),
        )
        .unwrap();

        let processor = DimensionConversionProcessor::new(DimensionValueConverter::new(10.0), DimensionUnit::Px);
        let converted = processor.process(token).await.unwrap();
        assert_eq!(constant(&converted, "small"), DimensionConstant::px(5.0));
        assert_eq!(constant(&converted, "large"), DimensionConstant::px(20.0));

        let Token::Value(TypedValue::Typography(TypographyValue { font_size, .. })) =
            &converted.as_group().unwrap()["body"]
        else {
            panic!("expected typography");
        };
        assert_eq!(
            font_size,
            &CompositeValue::Value(DimensionValue::Constant(DimensionConstant::px(10.0)))
        );

        let again = processor.process(converted.clone()).await.unwrap();
        assert_eq!(again, converted);
    }

    #[tokio::test]
    async fn test_rejects_invalid_rem_base() {
        for base in [0.0, -4.0, f64::NAN] {
            let processor =
                DimensionConversionProcessor::new(DimensionValueConverter::new(base), DimensionUnit::Px);
            let error = processor.process(Token::Group(Default::default())).await.unwrap_err();
            assert!(matches!(error, ProcessError::InvalidRemBase(_)));
        }
    }
}
