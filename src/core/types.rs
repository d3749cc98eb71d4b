//! Core type definitions shared by the classifier boundary and the reconciler
//!
//! The same `IntentResult` shape is used on both sides: as the classifier's
//! untrusted guess and as the authoritative reply after reconciliation.
//! Deserialization is deliberately forgiving. A field with the wrong JSON
//! type is treated as absent instead of rejecting the whole record.

use crate::math::format::parse_grouped;
use crate::math::number::Number;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Classified purpose of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Count up to a number
    Count,
    /// Solve one arithmetic problem
    Calculate,
    /// Anything that is not math
    #[default]
    SmallTalk,
}

impl Intent {
    /// Case-insensitive label match; unknown labels are small talk
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "COUNT" => Intent::Count,
            "CALCULATE" => Intent::Calculate,
            _ => Intent::SmallTalk,
        }
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Intent::from_label).unwrap_or_default())
    }
}

/// Structured record exchanged with the classifier and the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentResult {
    /// What is shown and spoken
    #[serde(rename = "text", deserialize_with = "lenient")]
    pub display_text: String,
    /// Short summary for the screen, may be empty
    #[serde(rename = "screen", deserialize_with = "lenient")]
    pub screen_summary: String,
    #[serde(deserialize_with = "lenient")]
    pub visual_aid: Option<String>,
    #[serde(rename = "_math_logic", deserialize_with = "lenient")]
    pub math_logic: MathLogic,
    /// The utterance this reply answers; attached by the pipeline
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub user_text: Option<String>,
}

/// Math fields of an `IntentResult`
///
/// Only `intent`, `expression`, `spoken_problem`, `target_number` and `unit`
/// are read from the classifier, and only as hints. Everything else is
/// recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathLogic {
    #[serde(deserialize_with = "lenient")]
    pub intent: Intent,
    #[serde(deserialize_with = "lenient_target")]
    pub target_number: Option<Number>,
    #[serde(deserialize_with = "lenient")]
    pub is_impossible: bool,
    #[serde(deserialize_with = "lenient")]
    pub step_size: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub sequence: Vec<Number>,
    #[serde(deserialize_with = "lenient")]
    pub time_estimate_seconds: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub time_estimate_text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub visual_aid: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub expression: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub spoken_problem: Option<String>,
}

impl IntentResult {
    /// Plain conversational reply with no math attached
    pub fn small_talk(text: impl Into<String>) -> Self {
        Self {
            display_text: text.into(),
            ..Self::default()
        }
    }

    pub fn intent(&self) -> Intent {
        self.math_logic.intent
    }
}

/// Deserialize a field, falling back to its default on any type mismatch
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Accept a JSON number or a numeric string such as `"1,000"` or `"47.5"`
fn lenient_target<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let target = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Number::Int)
            .or_else(|| n.as_f64().map(Number::Real)),
        serde_json::Value::String(s) => parse_grouped(&s)
            .map(Number::Int)
            .or_else(|| s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).map(Number::Real)),
        _ => None,
    };
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_labels() {
        assert_eq!(Intent::from_label("COUNT"), Intent::Count);
        assert_eq!(Intent::from_label("calculate"), Intent::Calculate);
        assert_eq!(Intent::from_label(" Small_Talk "), Intent::SmallTalk);
        assert_eq!(Intent::from_label("DANCE"), Intent::SmallTalk);
    }

    #[test]
    fn test_intent_serialization() {
        assert_eq!(serde_json::to_string(&Intent::SmallTalk).unwrap(), "\"SMALL_TALK\"");
        assert_eq!(serde_json::to_string(&Intent::Count).unwrap(), "\"COUNT\"");
    }

    #[test]
    fn test_full_reply_deserialization() {
        let json = r#"{
            "text": "Let's count!",
            "screen": "",
            "visual_aid": "🍭",
            "_math_logic": {
                "intent": "COUNT",
                "target_number": 47,
                "is_impossible": false,
                "unit": "popsicle",
                "sequence": [],
                "expression": null
            }
        }"#;
        let result: IntentResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.display_text, "Let's count!");
        assert_eq!(result.visual_aid.as_deref(), Some("🍭"));
        assert_eq!(result.intent(), Intent::Count);
        assert_eq!(result.math_logic.target_number, Some(Number::Int(47)));
        assert_eq!(result.math_logic.unit.as_deref(), Some("popsicle"));
        assert_eq!(result.math_logic.step_size, None);
    }

    #[test]
    fn test_missing_fields_are_defaulted() {
        let result: IntentResult = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(result.intent(), Intent::SmallTalk);
        assert!(result.math_logic.sequence.is_empty());
        assert!(!result.math_logic.is_impossible);
        assert_eq!(result.screen_summary, "");
    }

    #[test]
    fn test_wrong_types_are_ignored() {
        let json = r#"{
            "text": null,
            "screen": 12,
            "_math_logic": {
                "intent": 3,
                "sequence": ["one", "two"],
                "step_size": "big",
                "is_impossible": "nope",
                "time_estimate_seconds": -1.5
            }
        }"#;
        let result: IntentResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.display_text, "");
        assert_eq!(result.screen_summary, "");
        assert_eq!(result.intent(), Intent::SmallTalk);
        assert!(result.math_logic.sequence.is_empty());
        assert_eq!(result.math_logic.step_size, None);
        assert_eq!(result.math_logic.time_estimate_seconds, None);
    }

    #[test]
    fn test_math_logic_not_an_object() {
        let result: IntentResult =
            serde_json::from_str(r#"{"text": "hi", "_math_logic": "COUNT"}"#).unwrap();
        assert_eq!(result.math_logic, MathLogic::default());
    }

    #[test]
    fn test_target_number_forms() {
        let parse = |raw: &str| -> Option<Number> {
            let json = format!(r#"{{"_math_logic": {{"target_number": {}}}}}"#, raw);
            serde_json::from_str::<IntentResult>(&json)
                .unwrap()
                .math_logic
                .target_number
        };
        assert_eq!(parse("100"), Some(Number::Int(100)));
        assert_eq!(parse("\"1,000,000\""), Some(Number::Int(1_000_000)));
        assert_eq!(parse("\"47.5\""), Some(Number::Real(47.5)));
        assert_eq!(parse("2.5"), Some(Number::Real(2.5)));
        assert_eq!(parse("\"a zillion\""), None);
        assert_eq!(parse("null"), None);
        assert_eq!(parse("[1]"), None);
    }

    #[test]
    fn test_user_text_only_serialized_when_present() {
        let mut result = IntentResult::small_talk("hello");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("user_text").is_none());
        assert_eq!(json["_math_logic"]["intent"], "SMALL_TALK");

        result.user_text = Some("hi bot".into());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["user_text"], "hi bot");
    }
}
