//! Converter configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tint_tokens::processor::DynamicColorKeys;
use tint_tokens::ColorHexFormat;

/// Font weight (`1..=1000`) to PostScript name suffix, e.g. `700 → "Bold"`
pub type FontWeightMapping = BTreeMap<u16, String>;

/// What happens to an entry no extractor can handle
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedTokenStrategy {
    /// Log the entry and leave it out of the declaration
    #[default]
    Skip,
    /// Abort the whole conversion
    Fail,
}

/// What happens to a nested group that is not a light/dark color pair
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedGroupHandling {
    /// Always an error, whatever the unsupported-token strategy says
    #[default]
    Fail,
    /// Dropped silently (logged at debug level)
    Skip,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterConfiguration {
    pub color_hex_format: ColorHexFormat,
    pub dynamic_color_keys: DynamicColorKeys,
    pub unsupported_token_handling_strategy: UnsupportedTokenStrategy,
    pub malformed_dynamic_colors_group: MalformedGroupHandling,
    #[serde(deserialize_with = "deserialize_weight_mapping")]
    pub font_weight_mapping: Option<FontWeightMapping>,
}

impl ConverterConfiguration {
    pub fn with_strategy(mut self, strategy: UnsupportedTokenStrategy) -> Self {
        self.unsupported_token_handling_strategy = strategy;
        self
    }

    pub fn with_color_hex_format(mut self, format: ColorHexFormat) -> Self {
        self.color_hex_format = format;
        self
    }

    pub fn with_font_weight_mapping(mut self, mapping: FontWeightMapping) -> Self {
        self.font_weight_mapping = Some(mapping);
        self
    }
}

// Map keys arrive as strings from both JSON and TOML.
fn deserialize_weight_mapping<'de, D>(deserializer: D) -> Result<Option<FontWeightMapping>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: Option<BTreeMap<String, String>> = Option::deserialize(deserializer)?;
    raw.map(|mapping| {
        mapping
            .into_iter()
            .map(|(weight, suffix)| {
                weight
                    .trim()
                    .parse::<u16>()
                    .map(|weight| (weight, suffix))
                    .map_err(|_| D::Error::custom(format!("invalid font weight `{weight}`")))
            })
            .collect::<Result<FontWeightMapping, D::Error>>()
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfiguration::default();
        assert_eq!(config.color_hex_format, ColorHexFormat::Argb);
        assert_eq!(
            config.unsupported_token_handling_strategy,
            UnsupportedTokenStrategy::Skip
        );
        assert_eq!(config.malformed_dynamic_colors_group, MalformedGroupHandling::Fail);
        assert_eq!(config.dynamic_color_keys.light, "light");
        assert!(config.font_weight_mapping.is_none());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: ConverterConfiguration = serde_json::from_str(
            r#"{
                "color_hex_format": "rgba",
                "unsupported_token_handling_strategy": "fail",
                "font_weight_mapping": {"400": "Regular", "700": " Bold "}
            }"#,
        )
        .unwrap();

        assert_eq!(config.color_hex_format, ColorHexFormat::Rgba);
        assert_eq!(
            config.unsupported_token_handling_strategy,
            UnsupportedTokenStrategy::Fail
        );
        let mapping = config.font_weight_mapping.unwrap();
        assert_eq!(mapping[&700], " Bold ");
        assert_eq!(config.dynamic_color_keys, DynamicColorKeys::default());
    }

    #[test]
    fn test_rejects_non_numeric_weight() {
        let result: Result<ConverterConfiguration, _> =
            serde_json::from_str(r#"{"font_weight_mapping": {"bold": "Bold"}}"#);
        assert!(result.is_err());
    }
}
