use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an upstream record.
///
/// The upstream API stores most ids as strings (`"_id": "65f..."`) but some
/// endpoints hand back numeric ids. Both shapes deserialize into this type
/// and compare through [`RecordId::as_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl RecordId {
    /// Canonical string form used for set membership.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(s) => f.write_str(s),
            RecordId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_string_and_numeric_ids() {
        let text: RecordId = serde_json::from_value(json!("abc")).unwrap();
        let number: RecordId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(text, RecordId::Text("abc".into()));
        assert_eq!(number, RecordId::Number(42));
    }

    #[test]
    fn numeric_and_text_share_a_key() {
        assert_eq!(RecordId::Number(7).as_key(), RecordId::from("7").as_key());
    }
}
