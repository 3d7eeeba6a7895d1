//! Theming declaration and its per-category caches
//!
//! A [`DeclarationCaches`] is filled entry by entry during one conversion and
//! then frozen into a [`Declaration`]. Only categories with at least one entry
//! survive into the declaration, so empty categories never reach the JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key → representation, in conversion order
pub type Cache<T> = IndexMap<String, T>;

/// A color as the theming engine reads it
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColorRepresentation {
    Hex(String),
    Dynamic(DynamicColor),
}

/// A color that follows the light/dark appearance
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DynamicColor {
    pub light: String,
    pub dark: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontInformation {
    pub post_script_name: String,
    /// `data:<mime>;base64,<payload>` when the font ships with the theme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FontInformation {
    pub fn named(post_script_name: impl Into<String>) -> Self {
        Self {
            post_script_name: post_script_name.into(),
            source: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyRepresentation {
    pub font: FontInformation,
    /// Point size in pixels
    pub font_size: f64,
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitPoint {
    Top,
    Bottom,
    Leading,
    Trailing,
    Center,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearGradient {
    /// Hex colors, ordered by stop position
    pub colors: Vec<String>,
    pub start_point: UnitPoint,
    pub end_point: UnitPoint,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GradientRepresentation {
    Linear(LinearGradient),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationRepresentation {
    /// Base64-encoded Lottie document
    Lottie(String),
}

/// Mutable per-conversion storage, one ordered map per category
#[derive(Clone, Debug, Default)]
pub struct DeclarationCaches {
    /// `"<mime>:base64:<payload>"` strings
    pub images: Cache<String>,
    pub colors: Cache<ColorRepresentation>,
    pub metrics: Cache<f64>,
    pub fonts: Cache<FontInformation>,
    pub typography: Cache<TypographyRepresentation>,
    pub gradients: Cache<GradientRepresentation>,
    pub animations: Cache<AnimationRepresentation>,

    // Categories the declaration format knows about but tokens never fill.
    pub interactive_colors: Cache<serde_json::Value>,
    pub button_styles: Cache<serde_json::Value>,
    pub shape_styles: Cache<serde_json::Value>,
    pub segment_control_styles: Cache<serde_json::Value>,
    pub slider_styles: Cache<serde_json::Value>,
    pub toggle_styles: Cache<serde_json::Value>,
}

impl DeclarationCaches {
    pub fn into_declaration(self) -> Declaration {
        Declaration {
            images: non_empty(self.images),
            colors: non_empty(self.colors),
            metrics: non_empty(self.metrics),
            fonts: non_empty(self.fonts),
            typography: non_empty(self.typography),
            interactive_colors: non_empty(self.interactive_colors),
            button_styles: non_empty(self.button_styles),
            shape_styles: non_empty(self.shape_styles),
            gradients: non_empty(self.gradients),
            segment_control_styles: non_empty(self.segment_control_styles),
            slider_styles: non_empty(self.slider_styles),
            toggle_styles: non_empty(self.toggle_styles),
            animations: non_empty(self.animations),
        }
    }
}

fn non_empty<T>(cache: Cache<T>) -> Option<Cache<T>> {
    (!cache.is_empty()).then_some(cache)
}

/// The finished theming declaration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Cache<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Cache<ColorRepresentation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Cache<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Cache<FontInformation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<Cache<TypographyRepresentation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive_colors: Option<Cache<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_styles: Option<Cache<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_styles: Option<Cache<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradients: Option<Cache<GradientRepresentation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_control_styles: Option<Cache<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider_styles: Option<Cache<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_styles: Option<Cache<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<Cache<AnimationRepresentation>>,
}

impl Declaration {
    /// True when no category holds an entry
    pub fn is_empty(&self) -> bool {
        *self == Declaration::default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_categories_are_omitted() {
        let declaration = DeclarationCaches::default().into_declaration();
        assert!(declaration.is_empty());
        assert_eq!(declaration.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_representation_encoding() {
        let mut caches = DeclarationCaches::default();
        caches
            .colors
            .insert("red".into(), ColorRepresentation::Hex("#FF0000".into()));
        caches.colors.insert(
            "surface".into(),
            ColorRepresentation::Dynamic(DynamicColor {
                light: "#FFFFFF".into(),
                dark: "#000000".into(),
            }),
        );
        caches.metrics.insert("gap".into(), 8.0);
        caches.typography.insert(
            "body".into(),
            TypographyRepresentation {
                font: FontInformation::named("Inter-Bold"),
                font_size: 16.0,
            },
        );
        caches.gradients.insert(
            "fade".into(),
            GradientRepresentation::Linear(LinearGradient {
                colors: vec!["#000000".into(), "#FFFFFF".into()],
                start_point: UnitPoint::Leading,
                end_point: UnitPoint::Trailing,
            }),
        );
        caches
            .animations
            .insert("spinner".into(), AnimationRepresentation::Lottie("e30=".into()));

        let encoded: serde_json::Value =
            serde_json::from_str(&caches.into_declaration().to_json().unwrap()).unwrap();
        assert_eq!(
            encoded,
            json!({
                "colors": {
                    "red": "#FF0000",
                    "surface": {"light": "#FFFFFF", "dark": "#000000"}
                },
                "metrics": {"gap": 8.0},
                "typography": {"body": {"font": {"postScriptName": "Inter-Bold"}, "fontSize": 16.0}},
                "gradients": {"fade": {
                    "type": "linear",
                    "colors": ["#000000", "#FFFFFF"],
                    "startPoint": "leading",
                    "endPoint": "trailing"
                }},
                "animations": {"spinner": {"lottie": "e30="}}
            })
        );
    }

    #[test]
    fn test_category_order_follows_declaration_layout() {
        let mut caches = DeclarationCaches::default();
        caches.animations.insert("a".into(), AnimationRepresentation::Lottie(String::new()));
        caches.images.insert("i".into(), "image/png:base64:".into());
        caches.colors.insert("c".into(), ColorRepresentation::Hex("#000000".into()));

        let json = caches.into_declaration().to_json().unwrap();
        let images = json.find("\"images\"").unwrap();
        let colors = json.find("\"colors\"").unwrap();
        let animations = json.find("\"animations\"").unwrap();
        assert!(images < colors && colors < animations);
    }
}
