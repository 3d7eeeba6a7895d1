use std::fs;

use pretty_assertions::assert_eq;
use tint_theming::{
    parse_design_tokens, AnimationRepresentation, ConvertError, ConverterConfiguration,
    ExtractError, FontInformation, ParseError, ParseOptions, UnsupportedTokenStrategy,
};
use tint_tokens::DecodingContext;

const TOKENS: &str = r#"{
    "assets": {
        "$type": "file",
        "logo": {"$value": "logo.png"},
        "display": {"$value": "fonts/Display-Black.ttf"},
        "loader": {"$value": "loader.lottie"}
    }
}"#;

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("fonts")).unwrap();
    fs::write(dir.path().join("logo.png"), b"png").unwrap();
    fs::write(dir.path().join("fonts/Display-Black.ttf"), b"ttf").unwrap();
    fs::write(dir.path().join("loader.lottie"), b"{}").unwrap();
    dir
}

fn options(dir: &tempfile::TempDir, strategy: UnsupportedTokenStrategy) -> ParseOptions {
    ParseOptions {
        decoding: DecodingContext::with_base_path(dir.path()),
        converter: ConverterConfiguration::default().with_strategy(strategy),
        ..ParseOptions::default()
    }
}

#[tokio::test]
async fn files_are_embedded_by_content_type() {
    let dir = fixture();
    let declaration = parse_design_tokens(TOKENS, &options(&dir, UnsupportedTokenStrategy::Fail))
        .await
        .unwrap();

    let images = declaration.images.unwrap();
    assert_eq!(images["assetsLogo"], "image/png:base64:cG5n");

    let fonts = declaration.fonts.unwrap();
    assert_eq!(
        fonts["assetsDisplay"],
        FontInformation {
            post_script_name: "Display-Black".into(),
            source: Some("data:font/ttf;base64,dHRm".into()),
        }
    );

    let animations = declaration.animations.unwrap();
    assert_eq!(
        animations["assetsLoader"],
        AnimationRepresentation::Lottie("e30=".into())
    );
}

#[tokio::test]
async fn unsupported_file_types_follow_strategy() {
    let dir = fixture();
    fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
    let input = r#"{"notes": {"$type": "file", "$value": "notes.txt"}}"#;

    let error = parse_design_tokens(input, &options(&dir, UnsupportedTokenStrategy::Fail))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ParseError::Convert(ConvertError::Extraction {
            source: ExtractError::UnsupportedFileType {
                mime: "text/plain",
                ..
            },
            ..
        })
    ));

    let declaration = parse_design_tokens(input, &options(&dir, UnsupportedTokenStrategy::Skip))
        .await
        .unwrap();
    assert!(declaration.is_empty());
}

#[tokio::test]
async fn missing_file_fails_even_when_skipping() {
    let dir = fixture();
    let input = r#"{"hero": {"$type": "file", "$value": "missing.png"}}"#;

    let error = parse_design_tokens(input, &options(&dir, UnsupportedTokenStrategy::Skip))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ParseError::Convert(ConvertError::Extraction {
            source: ExtractError::Io { .. },
            ..
        })
    ));
}
