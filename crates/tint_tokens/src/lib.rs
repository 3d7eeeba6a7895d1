//! Tint Tokens
//!
//! The design token model shared by the Tint crates: a DTCG-style tree of
//! groups, typed values and aliases, a JSON decoder for it, and a set of
//! tree-rewriting processors.
//!
//! # Overview
//!
//! - **Model**: [`Token`] nodes carrying [`TypedValue`] leaves
//! - **Decoding**: [`decode_tokens`] turns a `.tokens.json` document into a tree
//! - **Processing**: [`TokenProcessor`] passes chained with [`CombineProcessor`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tint_tokens::{decode_tokens, processor, DecodingContext, TokenProcessor};
//!
//! let tree = decode_tokens(json, &DecodingContext::default())?;
//! let pipeline = processor::default_conversion_processor(&Default::default(), &Default::default());
//! let flat = pipeline.process(tree).await?;
//! ```
//!
//! # Processors
//!
//! - [`AliasResolver`](processor::AliasResolver): replaces `{path}` references
//! - [`ArithmeticEvaluator`](processor::ArithmeticEvaluator): reduces dimension expressions
//! - [`FlattenProcessor`](processor::FlattenProcessor): collapses nested groups
//! - [`DimensionConversionProcessor`](processor::DimensionConversionProcessor): normalizes units
//! - [`SkipKeysProcessor`](processor::SkipKeysProcessor): drops top-level token sets

pub mod decode;
pub mod processor;
pub mod token;
pub mod value;

pub use decode::{decode_tokens, decode_value, DecodeError, DecodingContext};
pub use processor::{CombineProcessor, ProcessError, ProcessingOptions, TokenProcessor};
pub use token::{CompositeValue, Token, TokenGroup, TokenPath};
pub use value::{
    ColorComponent, ColorError, ColorHexFormat, ColorSpace, ColorValue, DimensionConstant,
    DimensionExpression, DimensionUnit, DimensionValue, FileValue, FontFamilyValue,
    FontWeightValue, GradientStop, GradientValue, TokenType, TypedValue, TypographyValue,
};
