//! Tint Theming
//!
//! Turns a processed design token tree into a theming declaration: one ordered
//! lookup table per category (colors, metrics, fonts, typography, gradients,
//! images, animations) ready to be handed to a theming engine as JSON.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tint_theming::{parse_design_tokens, ParseOptions};
//!
//! let declaration = parse_design_tokens(
//!     r#"{"red": {"$type": "color", "$value": "#FF0000"}}"#,
//!     &ParseOptions::default(),
//! )
//! .await?;
//! assert_eq!(declaration.to_json()?, r#"{"colors":{"red":"#FF0000"}}"#);
//! ```
//!
//! # Conversion
//!
//! [`Converter`] dispatches every top-level entry to the extractor bound to its
//! type (see [`extract`]). What happens to entries it cannot convert is decided
//! by [`ConverterConfiguration`].

pub mod config;
pub mod converter;
pub mod declaration;
pub mod extract;
pub mod parser;

pub use config::{
    ConverterConfiguration, FontWeightMapping, MalformedGroupHandling, UnsupportedTokenStrategy,
};
pub use converter::{CancellationFlag, ConvertError, Converter};
pub use declaration::{
    AnimationRepresentation, ColorRepresentation, Declaration, DeclarationCaches, DynamicColor,
    FontInformation, GradientRepresentation, LinearGradient, TypographyRepresentation, UnitPoint,
};
pub use extract::{ExtractError, ExtractorKind};
pub use parser::{parse_design_tokens, parse_design_tokens_with, ParseError, ParseOptions};
