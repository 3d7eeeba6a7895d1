//! Token tree → theming declaration
//!
//! The converter expects a tree that already went through the processing
//! pipeline: aliases resolved, expressions evaluated, hierarchy flattened. It
//! visits each top-level entry once, in order:
//!
//! - a value is handed to the extractor registered for its type
//! - a group must be a light/dark color pair and becomes one dynamic color
//! - anything else is unsupported
//!
//! Unsupported entries and extractor failures are skipped or fatal depending on
//! [`UnsupportedTokenStrategy`]. Invalid roots, file I/O errors and cancellation
//! always abort.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tint_tokens::{Token, TokenGroup, TypedValue};

use crate::config::{ConverterConfiguration, MalformedGroupHandling, UnsupportedTokenStrategy};
use crate::declaration::{ColorRepresentation, Declaration, DeclarationCaches, DynamicColor};
use crate::extract::{ExtractError, ExtractorKind};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid root token, expected a group")]
    InvalidRootToken,

    #[error("unsupported {} token with key `{key}`", .token.kind())]
    UnsupportedToken { key: String, token: Box<Token> },

    #[error("malformed dynamic colors group with key `{key}`")]
    MalformedDynamicColorsGroup { key: String, group: TokenGroup },

    #[error("failed to extract `{key}`: {source}")]
    Extraction {
        key: String,
        #[source]
        source: ExtractError,
    },

    #[error("conversion cancelled")]
    Cancelled,
}

impl ConvertError {
    /// The top-level key the error is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            ConvertError::UnsupportedToken { key, .. }
            | ConvertError::MalformedDynamicColorsGroup { key, .. }
            | ConvertError::Extraction { key, .. } => Some(key),
            ConvertError::InvalidRootToken | ConvertError::Cancelled => None,
        }
    }
}

/// Cooperative cancellation shared between the caller and a running conversion
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Converter {
    configuration: ConverterConfiguration,
}

impl Converter {
    pub fn new(configuration: ConverterConfiguration) -> Self {
        Self { configuration }
    }

    pub fn configuration(&self) -> &ConverterConfiguration {
        &self.configuration
    }

    pub async fn convert(&self, token: Token) -> Result<Declaration, ConvertError> {
        self.convert_with_cancellation(token, &CancellationFlag::default())
            .await
    }

    /// Convert, checking `cancellation` before each top-level entry.
    pub async fn convert_with_cancellation(
        &self,
        token: Token,
        cancellation: &CancellationFlag,
    ) -> Result<Declaration, ConvertError> {
        let root = match token {
            Token::Group(root) => root,
            _ => return Err(ConvertError::InvalidRootToken),
        };

        let mut caches = DeclarationCaches::default();
        for (key, token) in root {
            if cancellation.is_cancelled() {
                return Err(ConvertError::Cancelled);
            }

            if let Err(error) = self.extract(&key, token, &mut caches).await {
                if !self.can_skip(&error) {
                    return Err(error);
                }
                tracing::debug!(key = %key, error = %error, "skipping token");
            }
        }

        Ok(caches.into_declaration())
    }

    fn can_skip(&self, error: &ConvertError) -> bool {
        let skipping =
            self.configuration.unsupported_token_handling_strategy == UnsupportedTokenStrategy::Skip;
        match error {
            ConvertError::UnsupportedToken { .. } => skipping,
            ConvertError::Extraction { source, .. } => skipping && !source.is_fatal(),
            ConvertError::MalformedDynamicColorsGroup { .. } => {
                self.configuration.malformed_dynamic_colors_group == MalformedGroupHandling::Skip
            }
            ConvertError::InvalidRootToken | ConvertError::Cancelled => false,
        }
    }

    async fn extract(
        &self,
        key: &str,
        token: Token,
        caches: &mut DeclarationCaches,
    ) -> Result<(), ConvertError> {
        let value = match token {
            Token::Value(value) => value,
            Token::Group(group) => return self.extract_dynamic_color(key, group, caches),
            other => {
                return Err(ConvertError::UnsupportedToken {
                    key: key.to_string(),
                    token: Box::new(other),
                })
            }
        };

        let Some(kind) = ExtractorKind::for_value(&value) else {
            return Err(ConvertError::UnsupportedToken {
                key: key.to_string(),
                token: Box::new(Token::Value(value)),
            });
        };

        kind.extract(value, key, &self.configuration, caches)
            .await
            .map_err(|source| ConvertError::Extraction {
                key: key.to_string(),
                source,
            })
    }

    fn extract_dynamic_color(
        &self,
        key: &str,
        group: TokenGroup,
        caches: &mut DeclarationCaches,
    ) -> Result<(), ConvertError> {
        let keys = &self.configuration.dynamic_color_keys;
        let (light, dark) = match (group.get(&keys.light), group.get(&keys.dark)) {
            (
                Some(Token::Value(TypedValue::Color(light))),
                Some(Token::Value(TypedValue::Color(dark))),
            ) if group.len() == 2 => (light, dark),
            _ => {
                return Err(ConvertError::MalformedDynamicColorsGroup {
                    key: key.to_string(),
                    group,
                })
            }
        };

        let format = self.configuration.color_hex_format;
        let hex = |color: &tint_tokens::ColorValue| {
            color.hex(format, true).map_err(|error| ConvertError::Extraction {
                key: key.to_string(),
                source: error.into(),
            })
        };
        let dynamic = DynamicColor {
            light: hex(light)?,
            dark: hex(dark)?,
        };

        caches
            .colors
            .insert(key.to_string(), ColorRepresentation::Dynamic(dynamic));
        Ok(())
    }
}
