//! Reconciliation pipeline
//!
//! Untrusted classifier output in, authoritative reply out:
//! IntentResult -> ResponseReconciler -> {evaluator | planner + estimator} -> IntentResult

pub mod narration;
pub mod reconciler;

pub use reconciler::{validate_target, ResponseReconciler, TargetError};
