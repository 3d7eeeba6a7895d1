//! One-call entry point: JSON text → theming declaration

use thiserror::Error;
use tint_tokens::processor::default_conversion_processor;
use tint_tokens::{
    decode_tokens, DecodeError, DecodingContext, ProcessError, ProcessingOptions, TokenProcessor,
};

use crate::config::ConverterConfiguration;
use crate::converter::{ConvertError, Converter};
use crate::declaration::Declaration;

/// Everything a parse needs besides the input text
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    pub decoding: DecodingContext,
    pub processing: ProcessingOptions,
    pub converter: ConverterConfiguration,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Decode, run the default processing pipeline, and convert.
pub async fn parse_design_tokens(
    input: &str,
    options: &ParseOptions,
) -> Result<Declaration, ParseError> {
    let pipeline = default_conversion_processor(
        &options.processing,
        &options.converter.dynamic_color_keys,
    );
    parse_design_tokens_with(input, options, &pipeline).await
}

/// Like [`parse_design_tokens`] with a caller supplied processing pipeline.
pub async fn parse_design_tokens_with(
    input: &str,
    options: &ParseOptions,
    processor: &dyn TokenProcessor,
) -> Result<Declaration, ParseError> {
    let result = parse(input, options, processor).await;
    if let Err(error) = &result {
        tracing::error!(error = %error, "failed to parse design tokens");
    }
    result
}

async fn parse(
    input: &str,
    options: &ParseOptions,
    processor: &dyn TokenProcessor,
) -> Result<Declaration, ParseError> {
    let tree = decode_tokens(input, &options.decoding)?;
    let processed = processor.process(tree).await?;
    let declaration = Converter::new(options.converter.clone())
        .convert(processed)
        .await?;
    Ok(declaration)
}
