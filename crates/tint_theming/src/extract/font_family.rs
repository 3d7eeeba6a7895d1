use tint_tokens::FontFamilyValue;

use super::ExtractError;
use crate::declaration::FontInformation;

/// Only the primary font is kept. Fallbacks are left to the platform.
pub(crate) fn extract(family: &FontFamilyValue) -> Result<FontInformation, ExtractError> {
    family
        .primary()
        .map(FontInformation::named)
        .ok_or(ExtractError::FontsEmpty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_font_wins() {
        let font = extract(&FontFamilyValue::new(["Inter", "Helvetica", "sans-serif"])).unwrap();
        assert_eq!(font, FontInformation::named("Inter"));
    }

    #[test]
    fn test_empty_family() {
        let empty = FontFamilyValue::new(Vec::<String>::new());
        assert!(matches!(extract(&empty), Err(ExtractError::FontsEmpty)));
    }
}
