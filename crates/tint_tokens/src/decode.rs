//! DTCG JSON decoding
//!
//! Objects carrying `$value` are tokens, every other object is a group. `$type`
//! declared on a group applies to all descendants that do not declare their own.

use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::token::{CompositeValue, Token, TokenGroup, TokenPath};
use crate::value::{
    ColorComponent, ColorSpace, ColorValue, DimensionConstant, DimensionUnit, DimensionValue,
    DurationUnit, DurationValue, FileValue, FontFamilyValue, FontWeightValue, GradientStop,
    TokenType, TypedValue, TypographyValue,
};

/// Auxiliary information the decoder needs besides the document itself
#[derive(Clone, Debug, Default)]
pub struct DecodingContext {
    /// Directory relative `file` token paths are resolved against
    pub base_path: Option<PathBuf>,
}

impl DecodingContext {
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid token JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {token_type} value at {path}: {reason}")]
    InvalidValue {
        path: TokenPath,
        token_type: &'static str,
        reason: String,
    },
}

/// Decode a UTF-8 JSON document into a token tree.
pub fn decode_tokens(input: &str, context: &DecodingContext) -> Result<Token, DecodeError> {
    let json: Value = serde_json::from_str(input)?;
    decode_value(&json, context)
}

/// Decode an already parsed JSON value into a token tree.
pub fn decode_value(json: &Value, context: &DecodingContext) -> Result<Token, DecodeError> {
    Decoder { context }.node(json, &TokenPath::default(), None)
}

struct Decoder<'a> {
    context: &'a DecodingContext,
}

impl Decoder<'_> {
    fn node(
        &self,
        json: &Value,
        path: &TokenPath,
        inherited_type: Option<&str>,
    ) -> Result<Token, DecodeError> {
        match json {
            Value::Object(object) => {
                let declared_type = object.get("$type").and_then(Value::as_str);
                let token_type = declared_type.or(inherited_type);
                match object.get("$value") {
                    Some(value) => self.token(value, path, token_type),
                    None => self.group(object, path, token_type),
                }
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| self.node(item, &path.child(index.to_string()), inherited_type))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::Array),
            _ => Ok(Token::Unknown),
        }
    }

    fn group(
        &self,
        object: &Map<String, Value>,
        path: &TokenPath,
        inherited_type: Option<&str>,
    ) -> Result<Token, DecodeError> {
        let mut group = TokenGroup::with_capacity(object.len());
        for (key, child) in object {
            if key.starts_with('$') {
                continue;
            }
            let token = self.node(child, &path.child(key.as_str()), inherited_type)?;
            group.insert(key.clone(), token);
        }
        Ok(Token::Group(group))
    }

    fn token(
        &self,
        value: &Value,
        path: &TokenPath,
        type_name: Option<&str>,
    ) -> Result<Token, DecodeError> {
        if let Some(reference) = value.as_str().and_then(TokenPath::parse_reference) {
            return Ok(Token::Alias(reference));
        }

        let Some(token_type) = type_name.and_then(TokenType::from_name) else {
            tracing::debug!(
                "token at {} has unrecognised type {:?}",
                path,
                type_name.unwrap_or("<none>")
            );
            return Ok(Token::Unknown);
        };

        self.typed_value(value, token_type)
            .map(Token::Value)
            .map_err(|reason| DecodeError::InvalidValue {
                path: path.clone(),
                token_type: token_type.as_str(),
                reason,
            })
    }

    fn typed_value(&self, value: &Value, token_type: TokenType) -> Result<TypedValue, String> {
        Ok(match token_type {
            TokenType::Color => TypedValue::Color(color(value)?),
            TokenType::Dimension => TypedValue::Dimension(dimension(value)?),
            TokenType::FontFamily => TypedValue::FontFamily(font_family(value)?),
            TokenType::FontWeight => TypedValue::FontWeight(font_weight(value)?),
            TokenType::Number => TypedValue::Number(number(value)?),
            TokenType::Typography => TypedValue::Typography(typography(value)?),
            TokenType::Gradient => TypedValue::Gradient(gradient(value)?),
            TokenType::File => TypedValue::File(self.file(value)?),
            TokenType::Duration => TypedValue::Duration(duration(value)?),
            TokenType::CubicBezier => TypedValue::CubicBezier(cubic_bezier(value)?),
            TokenType::Shadow => TypedValue::Shadow(value.clone()),
            TokenType::StrokeStyle => TypedValue::StrokeStyle(value.clone()),
            TokenType::Border => TypedValue::Border(value.clone()),
            TokenType::Transition => TypedValue::Transition(value.clone()),
        })
    }

    fn file(&self, value: &Value) -> Result<FileValue, String> {
        let location = value.as_str().ok_or("expected a file path string")?;
        let location = PathBuf::from(location);
        let path = match &self.context.base_path {
            Some(base) if location.is_relative() => base.join(location),
            _ => location,
        };
        Ok(FileValue { path })
    }
}

fn composite<T>(
    value: &Value,
    decode: impl FnOnce(&Value) -> Result<T, String>,
) -> Result<CompositeValue<T>, String> {
    match value.as_str().and_then(TokenPath::parse_reference) {
        Some(reference) => Ok(CompositeValue::Alias(reference)),
        None => decode(value).map(CompositeValue::Value),
    }
}

fn number(value: &Value) -> Result<f64, String> {
    value.as_f64().ok_or_else(|| format!("expected a number, found {value}"))
}

fn color(value: &Value) -> Result<ColorValue, String> {
    match value {
        Value::String(hex) => ColorValue::from_hex(hex).map_err(|e| e.to_string()),
        Value::Object(object) => {
            let color_space = object
                .get("colorSpace")
                .and_then(Value::as_str)
                .ok_or("missing `colorSpace`")?;
            let components = object
                .get("components")
                .and_then(Value::as_array)
                .ok_or("missing `components`")?
                .iter()
                .map(|component| match component {
                    Value::String(keyword) if keyword == "none" => Ok(ColorComponent::None),
                    other => number(other).map(ColorComponent::Number),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let alpha = match object.get("alpha") {
                Some(alpha) => number(alpha)?,
                None => 1.0,
            };
            let hex = object.get("hex").and_then(Value::as_str).map(str::to_string);
            Ok(ColorValue {
                color_space: ColorSpace::from_name(color_space),
                components,
                alpha,
                hex,
            })
        }
        other => Err(format!("expected a hex string or color object, found {other}")),
    }
}

fn dimension(value: &Value) -> Result<DimensionValue, String> {
    match value {
        Value::String(text) => DimensionValue::parse(text).map_err(|e| e.to_string()),
        Value::Number(_) => Ok(DimensionValue::Constant(DimensionConstant::px(number(value)?))),
        Value::Object(object) => {
            let amount = number(object.get("value").ok_or("missing `value`")?)?;
            let unit = object
                .get("unit")
                .and_then(Value::as_str)
                .ok_or("missing `unit`")?;
            let unit = DimensionUnit::from_name(unit).ok_or_else(|| format!("unknown unit `{unit}`"))?;
            Ok(DimensionValue::Constant(DimensionConstant::new(amount, unit)))
        }
        other => Err(format!("expected a dimension, found {other}")),
    }
}

fn font_family(value: &Value) -> Result<FontFamilyValue, String> {
    match value {
        Value::String(name) => Ok(FontFamilyValue::new([name.as_str()])),
        Value::Array(names) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("expected a font name, found {name}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|names| FontFamilyValue { names }),
        other => Err(format!("expected a font name or list of names, found {other}")),
    }
}

fn font_weight(value: &Value) -> Result<FontWeightValue, String> {
    match value {
        Value::String(name) => {
            FontWeightValue::from_name(name).ok_or_else(|| format!("unknown font weight `{name}`"))
        }
        Value::Number(_) => {
            let weight = number(value)?;
            FontWeightValue::from_number(weight)
                .ok_or_else(|| format!("font weight {weight} is outside 1..=1000"))
        }
        other => Err(format!("expected a font weight, found {other}")),
    }
}

fn typography(value: &Value) -> Result<TypographyValue, String> {
    let object = value.as_object().ok_or("expected a typography object")?;
    let field = |name: &str| object.get(name).ok_or_else(|| format!("missing `{name}`"));
    Ok(TypographyValue {
        font_family: composite(field("fontFamily")?, font_family)?,
        font_weight: composite(field("fontWeight")?, font_weight)?,
        font_size: composite(field("fontSize")?, dimension)?,
    })
}

fn gradient(value: &Value) -> Result<Vec<GradientStop>, String> {
    value
        .as_array()
        .ok_or("expected a list of gradient stops")?
        .iter()
        .map(|stop| -> Result<GradientStop, String> {
            let stop = stop.as_object().ok_or("expected a gradient stop object")?;
            let color_value = stop.get("color").ok_or("missing stop `color`")?;
            let position = stop.get("position").ok_or("missing stop `position`")?;
            Ok(GradientStop {
                color: composite(color_value, color)?,
                position: composite(position, number)?,
            })
        })
        .collect()
}

fn duration(value: &Value) -> Result<DurationValue, String> {
    let (amount, unit) = match value {
        Value::Object(object) => (
            number(object.get("value").ok_or("missing `value`")?)?,
            object
                .get("unit")
                .and_then(Value::as_str)
                .ok_or("missing `unit`")?
                .to_string(),
        ),
        Value::String(text) => {
            let split = text
                .find(|c: char| c.is_ascii_alphabetic())
                .ok_or_else(|| format!("missing unit in `{text}`"))?;
            let amount = text[..split]
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid duration `{text}`"))?;
            (amount, text[split..].to_string())
        }
        other => return Err(format!("expected a duration, found {other}")),
    };
    let unit = match unit.as_str() {
        "ms" => DurationUnit::Milliseconds,
        "s" => DurationUnit::Seconds,
        other => return Err(format!("unknown duration unit `{other}`")),
    };
    Ok(DurationValue {
        value: amount,
        unit,
    })
}

fn cubic_bezier(value: &Value) -> Result<[f64; 4], String> {
    let points = value
        .as_array()
        .filter(|points| points.len() == 4)
        .ok_or("expected four control point coordinates")?;
    let mut curve = [0.0; 4];
    for (slot, point) in curve.iter_mut().zip(points) {
        *slot = number(point)?;
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(input: &str) -> Token {
        decode_tokens(input, &DecodingContext::default()).unwrap()
    }

    #[test]
    fn test_decode_single_color() {
        let token = decode(r##"{"red": {"$type": "color", "$value": "#FF0000"}}"##);
        let group = token.as_group().unwrap();
        assert_eq!(
            group["red"],
            Token::Value(TypedValue::Color(ColorValue::from_hex("#FF0000").unwrap()))
        );
    }

    #[test]
    fn test_group_type_is_inherited_and_order_kept() {
        let token = decode(
            r#"{
                "spacing": {
                    "$type": "dimension",
                    "small": {"$value": "4px"},
                    "large": {"$value": {"value": 2, "unit": "rem"}},
                    "medium": {"$value": "{spacing.small} * 2"}
                }
            }"#,
        );
        let spacing = token.lookup(&TokenPath::new(["spacing"])).unwrap();
        let keys: Vec<&str> = spacing.as_group().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["small", "large", "medium"]);
        assert_eq!(
            spacing.as_group().unwrap()["large"],
            Token::Value(TypedValue::Dimension(DimensionValue::Constant(
                DimensionConstant::rem(2.0)
            )))
        );
        assert!(matches!(
            spacing.as_group().unwrap()["medium"],
            Token::Value(TypedValue::Dimension(DimensionValue::Expression(_)))
        ));
    }

    #[test]
    fn test_reference_value_decodes_to_alias() {
        let token = decode(r#"{"primary": {"$type": "color", "$value": "{colors.red}"}}"#);
        assert_eq!(
            token.as_group().unwrap()["primary"],
            Token::Alias(TokenPath::new(["colors", "red"]))
        );
    }

    #[test]
    fn test_untyped_value_is_unknown() {
        let token = decode(r#"{"mystery": {"$value": 42}, "exotic": {"$type": "sparkle", "$value": 1}}"#);
        let group = token.as_group().unwrap();
        assert_eq!(group["mystery"], Token::Unknown);
        assert_eq!(group["exotic"], Token::Unknown);
    }

    #[test]
    fn test_top_level_array() {
        assert_eq!(decode("[]"), Token::Array(Vec::new()));
    }

    #[test]
    fn test_typography_with_references() {
        let token = decode(
            r#"{"body": {"$type": "typography", "$value": {
                "fontFamily": ["Inter", "Helvetica"],
                "fontWeight": "{weights.bold}",
                "fontSize": "1rem"
            }}}"#,
        );
        let Token::Value(TypedValue::Typography(typography)) = &token.as_group().unwrap()["body"]
        else {
            panic!("expected typography");
        };
        assert_eq!(
            typography.font_family,
            CompositeValue::Value(FontFamilyValue::new(["Inter", "Helvetica"]))
        );
        assert_eq!(
            typography.font_weight,
            CompositeValue::Alias(TokenPath::new(["weights", "bold"]))
        );
        assert_eq!(
            typography.font_size,
            CompositeValue::Value(DimensionValue::Constant(DimensionConstant::rem(1.0)))
        );
    }

    #[test]
    fn test_file_path_uses_base_path() {
        let context = DecodingContext::with_base_path("/assets");
        let token = decode_tokens(
            r#"{"logo": {"$type": "file", "$value": "images/logo.png"}}"#,
            &context,
        )
        .unwrap();
        assert_eq!(
            token.as_group().unwrap()["logo"],
            Token::Value(TypedValue::File(FileValue::new("/assets/images/logo.png")))
        );
    }

    #[test]
    fn test_unsupported_kinds_still_decode() {
        let token = decode(
            r##"{
                "fast": {"$type": "duration", "$value": "150ms"},
                "ease": {"$type": "cubicBezier", "$value": [0.4, 0, 0.2, 1]},
                "card": {"$type": "shadow", "$value": {"color": "#000000"}}
            }"##,
        );
        let group = token.as_group().unwrap();
        assert_eq!(
            group["fast"],
            Token::Value(TypedValue::Duration(DurationValue {
                value: 150.0,
                unit: DurationUnit::Milliseconds
            }))
        );
        assert_eq!(
            group["ease"],
            Token::Value(TypedValue::CubicBezier([0.4, 0.0, 0.2, 1.0]))
        );
        assert!(matches!(group["card"], Token::Value(TypedValue::Shadow(_))));
    }

    #[test]
    fn test_invalid_value_names_path() {
        let error = decode_tokens(
            r#"{"colors": {"bad": {"$type": "color", "$value": 12}}}"#,
            &DecodingContext::default(),
        )
        .unwrap_err();
        match error {
            DecodeError::InvalidValue {
                path, token_type, ..
            } => {
                assert_eq!(path, TokenPath::new(["colors", "bad"]));
                assert_eq!(token_type, "color");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
