//! Parse raw classifier replies into structured intents
//!
//! The classifier is asked for JSON but nothing guarantees it. A reply
//! that cannot be read as an `IntentResult` degrades to small talk that
//! repeats the raw text, so a request never fails because of a bad reply.

use crate::core::error::{BotError, Result};
use crate::core::types::IntentResult;

/// Parse a classifier reply, degrading to small talk when it is not JSON
pub fn parse_reply(raw: &str) -> IntentResult {
    match try_parse_reply(raw) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Classifier reply was not usable JSON: {}", e);
            IntentResult::small_talk(raw)
        }
    }
}

/// Strict variant of `parse_reply`
pub fn try_parse_reply(raw: &str) -> Result<IntentResult> {
    let json_str = extract_json(raw)?;
    Ok(serde_json::from_str(json_str)?)
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| BotError::LlmError("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| BotError::LlmError("No closing brace found in response".into()))?;
    Ok(&response[start..=end])
}
