//! Typed token values
//!
//! Every `$type` the decoder understands maps onto one [`TypedValue`] variant.
//! Only a subset is convertible into theming representations; the rest are kept
//! so that the converter can name them when it reports unsupported entries.

mod color;
mod dimension;

pub use color::{ColorComponent, ColorError, ColorHexFormat, ColorSpace, ColorValue};
pub use dimension::{
    DimensionConstant, DimensionExpression, DimensionUnit, DimensionValue, ExpressionElement,
    ExpressionParseError, Operator,
};

use std::path::PathBuf;

use crate::token::CompositeValue;

/// The DTCG type tag of a value
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    FontWeight,
    Number,
    Typography,
    Gradient,
    File,
    Duration,
    CubicBezier,
    Shadow,
    StrokeStyle,
    Border,
    Transition,
}

impl TokenType {
    /// Parse a `$type` string
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "color" => Self::Color,
            "dimension" => Self::Dimension,
            "fontFamily" => Self::FontFamily,
            "fontWeight" => Self::FontWeight,
            "number" => Self::Number,
            "typography" => Self::Typography,
            "gradient" => Self::Gradient,
            "file" => Self::File,
            "duration" => Self::Duration,
            "cubicBezier" => Self::CubicBezier,
            "shadow" => Self::Shadow,
            "strokeStyle" => Self::StrokeStyle,
            "border" => Self::Border,
            "transition" => Self::Transition,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Dimension => "dimension",
            Self::FontFamily => "fontFamily",
            Self::FontWeight => "fontWeight",
            Self::Number => "number",
            Self::Typography => "typography",
            Self::Gradient => "gradient",
            Self::File => "file",
            Self::Duration => "duration",
            Self::CubicBezier => "cubicBezier",
            Self::Shadow => "shadow",
            Self::StrokeStyle => "strokeStyle",
            Self::Border => "border",
            Self::Transition => "transition",
        }
    }
}

/// A resolved or partially resolved token value
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Color(ColorValue),
    Dimension(DimensionValue),
    FontFamily(FontFamilyValue),
    FontWeight(FontWeightValue),
    Number(f64),
    Typography(TypographyValue),
    Gradient(GradientValue),
    File(FileValue),
    Duration(DurationValue),
    CubicBezier([f64; 4]),
    // Composite kinds below are carried without schema validation.
    Shadow(serde_json::Value),
    StrokeStyle(serde_json::Value),
    Border(serde_json::Value),
    Transition(serde_json::Value),
}

impl TypedValue {
    pub fn token_type(&self) -> TokenType {
        match self {
            TypedValue::Color(_) => TokenType::Color,
            TypedValue::Dimension(_) => TokenType::Dimension,
            TypedValue::FontFamily(_) => TokenType::FontFamily,
            TypedValue::FontWeight(_) => TokenType::FontWeight,
            TypedValue::Number(_) => TokenType::Number,
            TypedValue::Typography(_) => TokenType::Typography,
            TypedValue::Gradient(_) => TokenType::Gradient,
            TypedValue::File(_) => TokenType::File,
            TypedValue::Duration(_) => TokenType::Duration,
            TypedValue::CubicBezier(_) => TokenType::CubicBezier,
            TypedValue::Shadow(_) => TokenType::Shadow,
            TypedValue::StrokeStyle(_) => TokenType::StrokeStyle,
            TypedValue::Border(_) => TokenType::Border,
            TypedValue::Transition(_) => TokenType::Transition,
        }
    }
}

/// Ordered list of font names, primary first
#[derive(Clone, Debug, PartialEq)]
pub struct FontFamilyValue {
    pub names: Vec<String>,
}

impl FontFamilyValue {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn primary(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }
}

/// Numeric font weight in `1..=1000`
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct FontWeightValue(pub u16);

impl FontWeightValue {
    /// Resolve a DTCG weight alias such as `"semi-bold"`
    pub fn from_name(name: &str) -> Option<Self> {
        let weight = match name {
            "thin" | "hairline" => 100,
            "extra-light" | "ultra-light" => 200,
            "light" => 300,
            "normal" | "regular" | "book" => 400,
            "medium" => 500,
            "semi-bold" | "demi-bold" => 600,
            "bold" => 700,
            "extra-bold" | "ultra-bold" => 800,
            "black" | "heavy" => 900,
            "extra-black" | "ultra-black" => 950,
            _ => return None,
        };
        Some(Self(weight))
    }

    pub fn from_number(weight: f64) -> Option<Self> {
        if weight.fract() == 0.0 && (1.0..=1000.0).contains(&weight) {
            Some(Self(weight as u16))
        } else {
            None
        }
    }

    pub fn raw_value(self) -> u16 {
        self.0
    }
}

/// Composite typography value
#[derive(Clone, Debug, PartialEq)]
pub struct TypographyValue {
    pub font_family: CompositeValue<FontFamilyValue>,
    pub font_weight: CompositeValue<FontWeightValue>,
    pub font_size: CompositeValue<DimensionValue>,
}

/// One color stop of a gradient
#[derive(Clone, Debug, PartialEq)]
pub struct GradientStop {
    pub color: CompositeValue<ColorValue>,
    pub position: CompositeValue<f64>,
}

/// Gradient stops in document order (not sorted by position)
pub type GradientValue = Vec<GradientStop>;

/// Location of an asset referenced by a `file` token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileValue {
    pub path: PathBuf,
}

impl FileValue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DurationUnit {
    Milliseconds,
    Seconds,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurationValue {
    pub value: f64,
    pub unit: DurationUnit,
}
