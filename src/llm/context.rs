//! Instructions and reference data handed to the classifier
//!
//! Loaded once at startup into an immutable `BrainContext` and passed
//! explicitly to whoever builds classifier requests. The math-delegation
//! rules are always appended so the classifier only parses and never
//! answers.

use crate::core::config::BrainConfig;
use serde_json::{Map, Value};
use std::path::Path;

/// Persona used when no prompt file is present
const DEFAULT_PROMPT: &str = "You are Number Bot, a friendly math and counting buddy for a 5-year-old.\n\
You respond ONLY with JSON containing keys: text, screen, visual_aid, _math_logic.\n";

/// Rules appended to every prompt; they override anything earlier
pub const MATH_RULES: &str = r#"
IMPORTANT MATH DELEGATION RULES (OVERRIDE ANY EARLIER INSTRUCTIONS):

1) You NEVER compute answers or step-by-step math yourself. You only PARSE.
2) Always return a JSON object with:
   - text: what you say on screen (kid-friendly, short),
   - screen: a short summary for display (may be empty, backend will override for math),
   - visual_aid: optional emojis or simple visuals (or null),
   - _math_logic: an object with:
       intent: one of "COUNT", "CALCULATE", or "SMALL_TALK",
       target_number: number or null,
       is_impossible: boolean,
       step_size: number or null,
       unit: string or null,
       sequence: array of numbers (backend will override for math),
       time_estimate_seconds: number or null,
       time_estimate_text: string or null,
       visual_aid: string or null,
       expression: string or null (used for CALCULATE),
       spoken_problem: string or null (human-readable problem).

3) For intent = "CALCULATE":
   - Identify a single arithmetic problem in the child's utterance.
   - Put a machine-friendly expression in _math_logic.expression.
     Examples:
       "900 plus 500 divided by 2" -> "900 + 500 / 2"
       "12 times 3 minus 4" -> "12 * 3 - 4"
   - Use only numbers, +, -, *, /, parentheses, and spaces. NO words.
   - Set _math_logic.spoken_problem to a nice human phrase like
     "nine hundred plus five hundred divided by two".
   - DO NOT compute or state the final numeric answer in text or screen.
   - Backend will compute the numeric result and overwrite screen and text.

4) For intent = "COUNT":
   - Identify what the child wants to count to.
   - Set _math_logic.target_number to that integer (if any).
   - If the number is too big to write down, leave target_number null,
     explain in text that it's too big to count, and set is_impossible = true.
   - DO NOT fill step_size, sequence, or time_estimate_* yourself.
   - Do NOT say how long counting would take.

5) For intent = "SMALL_TALK":
   - When it's not really a math/counting request, set intent = "SMALL_TALK"
     and leave numeric fields null or empty.
   - Just respond in a kind, encouraging way.

6) Always return VALID JSON. No markdown. No extra commentary.
"#;

/// Immutable classifier context
#[derive(Debug, Clone)]
pub struct BrainContext {
    /// Persona prompt followed by the math rules
    pub prompt: String,
    /// The `reference_data` object from the knowledge file
    pub reference_data: Map<String, Value>,
}

impl BrainContext {
    /// Build a context from explicit parts
    pub fn new(base_prompt: &str, reference_data: Map<String, Value>) -> Self {
        Self {
            prompt: format!("{}\n{}", base_prompt, MATH_RULES),
            reference_data,
        }
    }

    /// Load prompt and knowledge files, tolerating missing or broken files
    pub fn load(config: &BrainConfig) -> Self {
        let base_prompt = match std::fs::read_to_string(&config.prompt_path) {
            Ok(text) => text,
            Err(_) => {
                tracing::debug!("No prompt at {:?}, using built-in prompt", config.prompt_path);
                DEFAULT_PROMPT.to_string()
            }
        };

        Self::new(&base_prompt, load_reference_data(&config.knowledge_path))
    }

    /// Context with the built-in prompt and no reference data
    pub fn builtin() -> Self {
        Self::new(DEFAULT_PROMPT, Map::new())
    }

    /// System messages in send order: instructions, then reference data
    pub fn system_messages(&self) -> Vec<String> {
        let mut messages = vec![self.prompt.clone()];
        if !self.reference_data.is_empty() {
            let mut wrapper = Map::new();
            wrapper.insert(
                "reference_data".into(),
                Value::Object(self.reference_data.clone()),
            );
            messages.push(Value::Object(wrapper).to_string());
        }
        messages
    }
}

fn load_reference_data(path: &Path) -> Map<String, Value> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Map::new();
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(mut knowledge)) => match knowledge.remove("reference_data") {
            Some(Value::Object(data)) => data,
            _ => Map::new(),
        },
        Ok(_) => Map::new(),
        Err(e) => {
            tracing::warn!("Ignoring invalid knowledge file {:?}: {}", path, e);
            Map::new()
        }
    }
}
