//! Tree-rewriting processors
//!
//! Each processor takes a whole token tree and returns a rewritten one. They are
//! independent passes and can be chained in any order with [`CombineProcessor`];
//! none of them assumes it runs last, and re-running a pass on its own output
//! leaves the tree unchanged.
//!
//! The default chain used for theming conversion is
//! `resolve_aliases → arithmetic_evaluation → flatten (dynamic colors) → dimension_conversion(px)`,
//! see [`default_conversion_processor`].

mod alias;
mod evaluate;
mod flatten;
mod skip;
mod units;

pub use alias::AliasResolver;
pub use evaluate::{evaluate_expression, ArithmeticEvaluator, EvaluationError};
pub use flatten::{DynamicColorKeys, FlattenProcessor, FlatteningDepth, PathConversion};
pub use skip::SkipKeysProcessor;
pub use units::{DimensionConversionProcessor, DimensionValueConverter};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::{Token, TokenPath};
use crate::value::{DimensionUnit, TypedValue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    #[error("alias {path} does not resolve to a value or group")]
    UnresolvedAlias { path: TokenPath },

    #[error("alias {path} is part of a reference cycle")]
    CyclicAlias { path: TokenPath },

    #[error("alias {path} resolves to {found}, expected {expected}")]
    AliasTypeMismatch {
        path: TokenPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot evaluate `{expression}`: {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: EvaluationError,
    },

    #[error("rem base must be a positive number, got {0}")]
    InvalidRemBase(f64),
}

/// A single pass over a token tree
#[async_trait]
pub trait TokenProcessor: Send + Sync {
    async fn process(&self, token: Token) -> Result<Token, ProcessError>;
}

#[async_trait]
impl<P: TokenProcessor + ?Sized> TokenProcessor for Box<P> {
    async fn process(&self, token: Token) -> Result<Token, ProcessError> {
        (**self).process(token).await
    }
}

/// Runs processors in order, threading the tree through each
#[derive(Default)]
pub struct CombineProcessor {
    processors: Vec<Box<dyn TokenProcessor>>,
}

impl CombineProcessor {
    pub fn new(processors: Vec<Box<dyn TokenProcessor>>) -> Self {
        Self { processors }
    }

    /// Append a processor to the end of the chain
    pub fn then(mut self, processor: impl TokenProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Insert a processor at the start of the chain
    pub fn prepend(mut self, processor: impl TokenProcessor + 'static) -> Self {
        self.processors.insert(0, Box::new(processor));
        self
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl std::fmt::Debug for CombineProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombineProcessor")
            .field("processors", &self.processors.len())
            .finish()
    }
}

#[async_trait]
impl TokenProcessor for CombineProcessor {
    async fn process(&self, mut token: Token) -> Result<Token, ProcessError> {
        for processor in &self.processors {
            token = processor.process(token).await?;
        }
        Ok(token)
    }
}

/// Options controlling the default processing pipeline
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProcessingOptions {
    /// Top-level token sets dropped before any other pass
    pub skip_token_sets: Vec<String>,
    /// Pixel value of `1rem`
    pub rem_base: f64,
    pub path_conversion: PathConversion,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            skip_token_sets: Vec::new(),
            rem_base: DimensionValueConverter::DEFAULT_REM_BASE,
            path_conversion: PathConversion::default(),
        }
    }
}

pub fn resolve_aliases() -> AliasResolver {
    AliasResolver
}

pub fn arithmetic_evaluation() -> ArithmeticEvaluator {
    ArithmeticEvaluator
}

pub fn skip_keys<I, S>(keys: I) -> SkipKeysProcessor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SkipKeysProcessor::new(keys)
}

pub fn flatten_with_dynamic_colors(
    path_conversion: PathConversion,
    keys: DynamicColorKeys,
) -> FlattenProcessor {
    FlattenProcessor::with_dynamic_colors(path_conversion, keys)
}

pub fn dimension_conversion(
    converter: DimensionValueConverter,
    target_unit: DimensionUnit,
) -> DimensionConversionProcessor {
    DimensionConversionProcessor::new(converter, target_unit)
}

/// The standard chain: resolve aliases, evaluate expressions, flatten while
/// keeping dynamic color groups, then convert every dimension to pixels.
///
/// A non-empty `skip_token_sets` puts a key skipper in front of the chain.
pub fn default_conversion_processor(
    options: &ProcessingOptions,
    dynamic_color_keys: &DynamicColorKeys,
) -> CombineProcessor {
    let pipeline = CombineProcessor::default()
        .then(resolve_aliases())
        .then(arithmetic_evaluation())
        .then(flatten_with_dynamic_colors(
            options.path_conversion.clone(),
            dynamic_color_keys.clone(),
        ))
        .then(dimension_conversion(
            DimensionValueConverter::new(options.rem_base),
            DimensionUnit::Px,
        ));

    if options.skip_token_sets.is_empty() {
        pipeline
    } else {
        pipeline.prepend(skip_keys(options.skip_token_sets.iter().cloned()))
    }
}

/// Rewrite every typed value in the tree, leaving structure untouched.
pub(crate) fn map_values<F>(token: Token, transform: &mut F) -> Result<Token, ProcessError>
where
    F: FnMut(TypedValue) -> Result<TypedValue, ProcessError>,
{
    Ok(match token {
        Token::Value(value) => Token::Value(transform(value)?),
        Token::Group(group) => Token::Group(
            group
                .into_iter()
                .map(|(key, child)| -> Result<(String, Token), ProcessError> {
                    Ok((key, map_values(child, &mut *transform)?))
                })
                .collect::<Result<_, _>>()?,
        ),
        Token::Array(items) => Token::Array(
            items
                .into_iter()
                .map(|item| map_values(item, &mut *transform))
                .collect::<Result<_, _>>()?,
        ),
        other => other,
    })
}
