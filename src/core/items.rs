//! Response payload and tolerant item decoding.
//!
//! The backend does not guarantee a uniform item shape, so every field is
//! read through a fallback chain (`question`/`front`, `answer`/`back`,
//! `correct_answer`/`answer`).  A field falls through when it is missing
//! or falsy: `null`, `""`, `0` or `false`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque identifier the backend assigns to a saved generation.
///
/// Usually an integer; `null` when the backend failed to save it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationId(pub Value);

impl GenerationId {
    /// `true` when the backend did not save the generation.
    pub fn is_unsaved(&self) -> bool {
        self.0.is_null()
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Body of a `/api/generate` reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub generation_id: GenerationId,
    #[serde(default)]
    pub error: Option<String>,
}

/// One flashcard, after fallbacks have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardItem {
    pub front: String,
    pub back: String,
}

impl FlashcardItem {
    /// Decode the item at 1-based `position`.
    pub fn from_value(item: &Value, position: usize) -> Self {
        let obj = item.as_object();
        Self {
            front: text_field(obj, &["question", "front"])
                .unwrap_or_else(|| format!("Question {position}")),
            back: text_field(obj, &["answer", "back"]).unwrap_or_default(),
        }
    }

    pub fn decode_all(items: &[Value]) -> Vec<Self> {
        items
            .iter()
            .enumerate()
            .map(|(idx, v)| Self::from_value(v, idx + 1))
            .collect()
    }
}

/// One multiple-choice question, after fallbacks have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqItem {
    pub question: String,
    pub options: Vec<String>,
    /// `None` when the item names no correct answer.
    pub correct_answer: Option<String>,
}

impl McqItem {
    pub fn from_value(item: &Value) -> Self {
        let obj = item.as_object();
        let options = obj
            .and_then(|o| o.get("options"))
            .and_then(Value::as_array)
            .map(|opts| opts.iter().map(option_text).collect())
            .unwrap_or_default();
        Self {
            question: text_field(obj, &["question"]).unwrap_or_default(),
            options,
            correct_answer: text_field(obj, &["correct_answer", "answer"]),
        }
    }

    pub fn decode_all(items: &[Value]) -> Vec<Self> {
        items.iter().map(Self::from_value).collect()
    }
}

/// First truthy scalar among `keys`.
fn text_field(obj: Option<&Map<String, Value>>, keys: &[&str]) -> Option<String> {
    let obj = obj?;
    keys.iter().filter_map(|k| obj.get(*k)).find_map(truthy_text)
}

/// Non-empty strings as-is, non-zero numbers and `true` as their JSON text.
/// Falsy scalars and containers are absent.
fn truthy_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".into()),
        _ => None,
    }
}

/// Every option keeps its row; falsy ones show as blank, containers as JSON.
fn option_text(v: &Value) -> String {
    match v {
        Value::Array(_) | Value::Object(_) => v.to_string(),
        other => truthy_text(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flashcard_fallback_chain() {
        let items = vec![
            json!({"question": "Q1", "answer": "A1"}),
            json!({"front": "F2", "back": "B2"}),
            json!({"question": "", "front": "F3", "answer": null, "back": "B3"}),
            json!({}),
            json!("not an object"),
        ];
        let cards = FlashcardItem::decode_all(&items);
        assert_eq!(cards[0], FlashcardItem { front: "Q1".into(), back: "A1".into() });
        assert_eq!(cards[1], FlashcardItem { front: "F2".into(), back: "B2".into() });
        assert_eq!(cards[2], FlashcardItem { front: "F3".into(), back: "B3".into() });
        assert_eq!(cards[3], FlashcardItem { front: "Question 4".into(), back: String::new() });
        assert_eq!(cards[4].front, "Question 5");
    }

    #[test]
    fn falsy_scalars_fall_through() {
        let card = FlashcardItem::from_value(
            &json!({"question": 0, "front": "F", "answer": false, "back": 7}),
            1,
        );
        assert_eq!(card, FlashcardItem { front: "F".into(), back: "7".into() });

        let q = McqItem::from_value(&json!({
            "question": "Pick",
            "options": [0, false, "", null, true, 2.5],
            "correct_answer": 0,
            "answer": "2.5",
        }));
        assert_eq!(q.options, vec!["", "", "", "", "true", "2.5"]);
        assert_eq!(q.correct_answer.as_deref(), Some("2.5"));
    }

    #[test]
    fn mcq_prefers_correct_answer_field() {
        let q = McqItem::from_value(&json!({
            "question": "Capital of France?",
            "options": ["Paris", "London", 3, null],
            "correct_answer": "Paris",
            "answer": "London",
        }));
        assert_eq!(q.options, vec!["Paris", "London", "3", ""]);
        assert_eq!(q.correct_answer.as_deref(), Some("Paris"));

        let q = McqItem::from_value(&json!({"question": "x", "options": [], "answer": "B"}));
        assert_eq!(q.correct_answer.as_deref(), Some("B"));

        let q = McqItem::from_value(&json!({"question": "x"}));
        assert!(q.options.is_empty());
        assert_eq!(q.correct_answer, None);
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let r: GenerationResponse = serde_json::from_str(r#"{"error":"rate limited"}"#).unwrap();
        assert!(r.items.is_empty());
        assert!(r.generation_id.is_unsaved());
        assert_eq!(r.error.as_deref(), Some("rate limited"));

        let r: GenerationResponse =
            serde_json::from_str(r#"{"items":[{"question":"Q"}],"generation_id":17}"#).unwrap();
        assert_eq!(r.items.len(), 1);
        assert_eq!(r.generation_id.to_string(), "17");
        assert!(r.error.is_none());
    }
}
