//! Reconciliation - overrides the classifier's guess with computed values
//!
//! The classifier decides *what* was asked; this module decides every
//! number in the answer. Failures are recovered here and turned into a
//! well-formed reply, so `reconcile` never fails.

use crate::core::config::EvaluatorConfig;
use crate::core::types::{Intent, IntentResult, MathLogic};
use crate::math::count;
use crate::math::expression::{EvalError, Evaluator};
use crate::math::format::format_answer;
use crate::math::number::Number;
use crate::math::time;
use crate::reconcile::narration;
use thiserror::Error;

/// Why a Count target was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TargetError {
    #[error("Count target is missing or not a whole number")]
    NonNumericTarget,

    #[error("Count target {0} is not positive")]
    NonPositiveTarget(i64),
}

/// Turns an untrusted `IntentResult` into an authoritative one
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseReconciler {
    evaluator: Evaluator,
}

impl ResponseReconciler {
    pub fn new(limits: EvaluatorConfig) -> Self {
        Self {
            evaluator: Evaluator::new(limits),
        }
    }

    /// Reconcile a classifier result against deterministic computation
    ///
    /// # Arguments
    /// * `result` - The classifier's structured guess
    /// * `raw_user_text` - The original utterance, used when no spoken problem was given
    pub fn reconcile(&self, mut result: IntentResult, raw_user_text: &str) -> IntentResult {
        tracing::debug!(intent = ?result.intent(), "Reconciling classifier result");

        match result.intent() {
            Intent::Calculate => self.reconcile_calculate(&mut result, raw_user_text),
            Intent::Count => reconcile_count(&mut result),
            Intent::SmallTalk => reconcile_small_talk(&mut result.math_logic),
        }

        result
    }

    fn reconcile_calculate(&self, result: &mut IntentResult, raw_user_text: &str) {
        clear_count_fields(&mut result.math_logic);

        let expression = result
            .math_logic
            .expression
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        let spoken_problem = result
            .math_logic
            .spoken_problem
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| raw_user_text.trim())
            .to_string();

        match self.solve(&expression) {
            Ok(answer) => {
                let screen = format_answer(answer);
                let logic = &mut result.math_logic;
                logic.target_number = Some(answer);
                logic.sequence = vec![answer];
                logic.is_impossible = false;

                result.display_text = narration::answer_line(&spoken_problem, &screen);
                result.screen_summary = screen;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Falling back to math apology");
                let logic = &mut result.math_logic;
                logic.target_number = None;
                logic.sequence.clear();
                logic.is_impossible = true;

                result.screen_summary = narration::MATH_APOLOGY_SCREEN.to_string();
                result.display_text = narration::MATH_APOLOGY_TEXT.to_string();
            }
        }
    }

    /// Evaluate and normalize (whole-valued reals become integers)
    fn solve(&self, expression: &str) -> Result<Number, EvalError> {
        let parsed = self.evaluator.parse(expression)?;
        let answer = parsed.evaluate()?.normalize();
        tracing::debug!(expression = %parsed, %answer, "Evaluated expression");
        Ok(answer)
    }
}

/// Validate the classifier's Count target as a positive integer
///
/// Fractional and out-of-range values count as non-numeric.
pub fn validate_target(target: Option<Number>) -> Result<i64, TargetError> {
    let n = target
        .and_then(Number::as_exact_i64)
        .ok_or(TargetError::NonNumericTarget)?;
    if n <= 0 {
        return Err(TargetError::NonPositiveTarget(n));
    }
    Ok(n)
}

fn reconcile_count(result: &mut IntentResult) {
    let n = match validate_target(result.math_logic.target_number) {
        Ok(n) => n,
        Err(err) => {
            // No narration: the classifier's own text stays as-is
            tracing::debug!(error = %err, "Count target rejected");
            let logic = &mut result.math_logic;
            clear_count_fields(logic);
            logic.target_number = None;
            logic.sequence.clear();
            logic.is_impossible = true;
            result.screen_summary.clear();
            return;
        }
    };

    let plan = count::plan(n);
    let estimate = time::estimate(n);
    let jumps = narration::jump_list(n, &plan.sequence);

    result.display_text = narration::count_narration(
        n,
        result.math_logic.unit.as_deref(),
        &jumps,
        &estimate.human_text,
    );
    result.screen_summary = jumps;

    let logic = &mut result.math_logic;
    logic.target_number = Some(Number::Int(n));
    logic.step_size = Some(plan.step_size);
    logic.sequence = plan.sequence.into_iter().map(Number::Int).collect();
    logic.is_impossible = plan.is_impossible;
    logic.time_estimate_seconds = Some(estimate.seconds);
    logic.time_estimate_text = Some(estimate.human_text);
}

fn reconcile_small_talk(logic: &mut MathLogic) {
    clear_count_fields(logic);
    logic.target_number = None;
    logic.sequence.clear();
    logic.is_impossible = false;
}

fn clear_count_fields(logic: &mut MathLogic) {
    logic.step_size = None;
    logic.time_estimate_seconds = None;
    logic.time_estimate_text = None;
}
