//! Derived per-record fields and their column names

use commentprep_filters::LanguageTag;
use serde::Serialize;
use serde_json::{Map, Value};

pub const CLEANED_TEXT: &str = "cleaned_text";
pub const MASKED_TEXT: &str = "masked_text";
pub const MENTIONED_PRODUCTS: &str = "mentioned_products";
pub const LANGUAGE: &str = "language";
pub const IS_TARGET_LANGUAGE: &str = "is_target_language";

/// Derived columns in output order
pub const DERIVED_COLUMNS: [&str; 5] = [
    CLEANED_TEXT,
    MASKED_TEXT,
    MENTIONED_PRODUCTS,
    LANGUAGE,
    IS_TARGET_LANGUAGE,
];

/// Fields computed from one record's raw text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFields {
    pub cleaned_text: String,
    pub masked_text: String,
    pub mentioned_products: Vec<String>,
    pub language: LanguageTag,
    pub is_target_language: bool,
}

impl DerivedFields {
    /// Write the derived fields into a record object
    ///
    /// New keys go after the existing ones in [`DERIVED_COLUMNS`] order; a key
    /// that already exists is overwritten in place.
    pub fn apply(&self, map: &mut Map<String, Value>) {
        map.insert(
            CLEANED_TEXT.to_string(),
            Value::String(self.cleaned_text.clone()),
        );
        map.insert(
            MASKED_TEXT.to_string(),
            Value::String(self.masked_text.clone()),
        );
        map.insert(
            MENTIONED_PRODUCTS.to_string(),
            Value::Array(
                self.mentioned_products
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
        map.insert(
            LANGUAGE.to_string(),
            Value::String(self.language.as_str().to_string()),
        );
        map.insert(
            IS_TARGET_LANGUAGE.to_string(),
            Value::Bool(self.is_target_language),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DerivedFields {
        DerivedFields {
            cleaned_text: "photoshop rocks".to_string(),
            masked_text: "[product] rocks".to_string(),
            mentioned_products: vec!["photoshop".to_string()],
            language: LanguageTag::Code("en"),
            is_target_language: true,
        }
    }

    #[test]
    fn test_apply_appends_in_order() {
        let mut map = json!({"id": 7, "text": "Photoshop rocks"})
            .as_object()
            .cloned()
            .unwrap();
        sample().apply(&mut map);

        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys[..2], ["id", "text"]);
        assert_eq!(keys[2..], DERIVED_COLUMNS);
        assert_eq!(map["mentioned_products"], json!(["photoshop"]));
        assert_eq!(map["is_target_language"], json!(true));
    }

    #[test]
    fn test_apply_overwrites_existing_column() {
        let mut map = json!({"language": "stale", "text": "x"})
            .as_object()
            .cloned()
            .unwrap();
        sample().apply(&mut map);

        assert_eq!(map["language"], "en");
        assert_eq!(map.keys().next().map(String::as_str), Some("language"));
    }

    #[test]
    fn test_serializes_as_json_object() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["language"], "en");
        assert_eq!(value["mentioned_products"], json!(["photoshop"]));
    }
}
