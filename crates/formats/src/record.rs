//! Record data structure for unified dataset representation

use serde_json::Value;
use std::borrow::Cow;

/// A single row from a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The JSON object for this row, keys in input order
    pub data: Value,
    /// Source line number (1-based)
    pub source_line: usize,
}

impl Record {
    /// Create a new record
    pub fn new(data: Value, source_line: usize) -> Self {
        Self { data, source_line }
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Get a field coerced to text
    ///
    /// Missing fields and nulls give `None`. Strings are borrowed; numbers,
    /// booleans and nested values are rendered as JSON text.
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.data.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_creation() {
        let data = json!({"text": "hello", "id": 1});
        let record = Record::new(data.clone(), 1);
        assert_eq!(record.data, data);
        assert_eq!(record.source_line, 1);
        assert_eq!(record.get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_text_coercion() {
        let record = Record::new(
            json!({"text": "hello", "n": 42, "flag": true, "empty": null, "list": ["a"]}),
            1,
        );

        assert_eq!(record.text("text").as_deref(), Some("hello"));
        assert_eq!(record.text("n").as_deref(), Some("42"));
        assert_eq!(record.text("flag").as_deref(), Some("true"));
        assert_eq!(record.text("list").as_deref(), Some(r#"["a"]"#));
        assert_eq!(record.text("empty"), None);
        assert_eq!(record.text("missing"), None);
    }
}
