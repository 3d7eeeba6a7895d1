//! Hierarchy flattening
//!
//! Nested groups collapse into one level keyed by the converted path of each
//! leaf. A [`FlatteningDepth::LimitWhere`] predicate stops the descent and keeps
//! the matching group intact under its own flattened key, which is how dynamic
//! light/dark color pairs survive flattening.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ProcessError, TokenProcessor};
use crate::token::{Token, TokenGroup};
use crate::value::TypedValue;

/// Keys that mark the two halves of a dynamic color group
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DynamicColorKeys {
    pub light: String,
    pub dark: String,
}

impl Default for DynamicColorKeys {
    fn default() -> Self {
        Self {
            light: "light".to_string(),
            dark: "dark".to_string(),
        }
    }
}

impl DynamicColorKeys {
    /// True when `group` holds exactly the light and dark keys, each a color value.
    pub fn matches(&self, group: &TokenGroup) -> bool {
        let is_color = |key: &str| {
            matches!(group.get(key), Some(Token::Value(TypedValue::Color(_))))
        };
        group.len() == 2 && is_color(&self.light) && is_color(&self.dark)
    }
}

/// How a path of group keys becomes a single flattened key
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PathConversion {
    /// `["brand", "primary-dark"]` becomes `brandPrimaryDark`
    #[default]
    CamelCase,
    /// Segments joined verbatim with `separator`
    Joined { separator: String },
}

impl PathConversion {
    pub fn convert(&self, segments: &[String]) -> String {
        match self {
            PathConversion::Joined { separator } => segments.join(separator),
            PathConversion::CamelCase => {
                let mut key = String::new();
                for segment in segments {
                    let mut words = segment
                        .split(|c: char| !c.is_alphanumeric())
                        .filter(|word| !word.is_empty())
                        .peekable();
                    // Segments with no alphanumeric word are kept as written
                    if words.peek().is_none() {
                        key.push_str(segment);
                        continue;
                    }
                    for word in words {
                        let mut chars = word.chars();
                        if let Some(first) = chars.next() {
                            if key.is_empty() {
                                key.extend(first.to_lowercase());
                            } else {
                                key.extend(first.to_uppercase());
                            }
                            key.push_str(chars.as_str());
                        }
                    }
                }
                key
            }
        }
    }
}

/// Where the flattener stops descending
#[derive(Clone, Default)]
pub enum FlatteningDepth {
    #[default]
    Unlimited,
    /// Groups for which the predicate holds are kept whole
    LimitWhere(Arc<dyn Fn(&TokenGroup) -> bool + Send + Sync>),
}

impl FlatteningDepth {
    fn keeps(&self, group: &TokenGroup) -> bool {
        match self {
            FlatteningDepth::Unlimited => false,
            FlatteningDepth::LimitWhere(predicate) => predicate(group),
        }
    }
}

impl fmt::Debug for FlatteningDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlatteningDepth::Unlimited => f.write_str("Unlimited"),
            FlatteningDepth::LimitWhere(_) => f.write_str("LimitWhere(..)"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FlattenProcessor {
    path_conversion: PathConversion,
    depth: FlatteningDepth,
}

impl FlattenProcessor {
    pub fn new(path_conversion: PathConversion, depth: FlatteningDepth) -> Self {
        Self {
            path_conversion,
            depth,
        }
    }

    /// Flatten everything except groups shaped like a dynamic color.
    pub fn with_dynamic_colors(path_conversion: PathConversion, keys: DynamicColorKeys) -> Self {
        Self::new(
            path_conversion,
            FlatteningDepth::LimitWhere(Arc::new(move |group: &TokenGroup| keys.matches(group))),
        )
    }

    fn walk(&self, path: &mut Vec<String>, token: Token, out: &mut TokenGroup) {
        match token {
            Token::Group(group) if !self.depth.keeps(&group) => {
                for (key, child) in group {
                    path.push(key);
                    self.walk(path, child, out);
                    path.pop();
                }
            }
            leaf => {
                let key = self.path_conversion.convert(path);
                if let Some(previous) = out.insert(key.clone(), leaf) {
                    tracing::warn!(
                        key = %key,
                        replaced = previous.kind(),
                        "flattened key collision, keeping the later token"
                    );
                }
            }
        }
    }
}

#[async_trait]
impl TokenProcessor for FlattenProcessor {
    async fn process(&self, token: Token) -> Result<Token, ProcessError> {
        let root = match token {
            Token::Group(root) => root,
            other => return Ok(other),
        };

        let mut flattened = TokenGroup::with_capacity(root.len());
        let mut path = Vec::new();
        for (key, child) in root {
            path.push(key);
            self.walk(&mut path, child, &mut flattened);
            path.pop();
        }
        Ok(Token::Group(flattened))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_tokens, DecodingContext};
    use pretty_assertions::assert_eq;

    fn decode(input: &str) -> Token {
        decode_tokens(input, &DecodingContext::default()).unwrap()
    }

    fn keys(token: &Token) -> Vec<&str> {
        token.as_group().unwrap().keys().map(String::as_str).collect()
    }

    #[test]
    fn test_camel_case_conversion() {
        let convert = |segments: &[&str]| {
            let segments: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
            PathConversion::CamelCase.convert(&segments)
        };
        assert_eq!(convert(&["brand", "primary-dark"]), "brandPrimaryDark");
        assert_eq!(convert(&["Spacing", "x_large"]), "spacingXLarge");
        assert_eq!(convert(&["spacingBase"]), "spacingBase");
        assert_eq!(convert(&["colors", "-"]), "colors-");
        assert_eq!(convert(&["colors", "_"]), "colors_");
        assert_ne!(convert(&["-"]), convert(&["_"]));

        let joined = PathConversion::Joined {
            separator: ".".into(),
        };
        assert_eq!(joined.convert(&["a".into(), "b".into()]), "a.b");
    }

    #[tokio::test]
    async fn test_flatten_unlimited() {
        let token = decode(
            r##"{
                "colors": {
                    "$type": "color",
                    "brand": {"primary": {"$value": "#FF0000"}},
                    "surface": {"light": {"$value": "#FFFFFF"}, "dark": {"$value": "#000000"}}
                },
                "empty": {}
            }"##,
        );
        let flat = FlattenProcessor::default().process(token).await.unwrap();
        assert_eq!(
            keys(&flat),
            vec!["colorsBrandPrimary", "colorsSurfaceLight", "colorsSurfaceDark"]
        );
    }

    #[tokio::test]
    async fn test_punctuation_keys_stay_distinct() {
        let token = decode(
            r##"{
                "$type": "color",
                "a": {"b": {"$value": "#00FF00"}},
                "-": {"$value": "#111111"},
                "_": {"$value": "#222222"}
            }"##,
        );
        let flat = FlattenProcessor::default().process(token).await.unwrap();
        assert_eq!(keys(&flat), vec!["aB", "-", "_"]);
    }

    #[tokio::test]
    async fn test_dynamic_color_groups_are_kept() {
        let token = decode(
            r##"{
                "surface": {
                    "$type": "color",
                    "light": {"$value": "#FFFFFF"},
                    "dark": {"$value": "#000000"}
                },
                "almost": {
                    "$type": "color",
                    "light": {"$value": "#FFFFFF"},
                    "dark": {"$value": "#000000"},
                    "contrast": {"$value": "#FF0000"}
                }
            }"##,
        );
        let flat =
            FlattenProcessor::with_dynamic_colors(PathConversion::default(), DynamicColorKeys::default())
                .process(token)
                .await
                .unwrap();

        assert_eq!(
            keys(&flat),
            vec!["surface", "almostLight", "almostDark", "almostContrast"]
        );
        let surface = flat.as_group().unwrap()["surface"].as_group().unwrap();
        assert!(DynamicColorKeys::default().matches(surface));
    }

    #[tokio::test]
    async fn test_custom_dynamic_keys() {
        let token = decode(
            r##"{"bg": {"$type": "color", "day": {"$value": "#FFFFFF"}, "night": {"$value": "#000000"}}}"##,
        );
        let keys_config = DynamicColorKeys {
            light: "day".into(),
            dark: "night".into(),
        };
        let flat = FlattenProcessor::with_dynamic_colors(PathConversion::default(), keys_config)
            .process(token)
            .await
            .unwrap();
        assert_eq!(keys(&flat), vec!["bg"]);
    }

    #[tokio::test]
    async fn test_collision_keeps_first_position_and_last_value() {
        let token = decode(
            r#"{
                "a": {"b": {"$type": "number", "$value": 1}},
                "other": {"$type": "number", "$value": 3},
                "aB": {"$type": "number", "$value": 2}
            }"#,
        );
        let flat = FlattenProcessor::default().process(token).await.unwrap();
        assert_eq!(keys(&flat), vec!["aB", "other"]);
        assert_eq!(
            flat.as_group().unwrap()["aB"],
            Token::Value(TypedValue::Number(2.0))
        );
    }

    #[tokio::test]
    async fn test_non_group_root_is_unchanged() {
        let token = Token::Value(TypedValue::Number(1.0));
        let processed = FlattenProcessor::default().process(token.clone()).await.unwrap();
        assert_eq!(processed, token);
    }
}
