//! Deterministic math: safe expression evaluation, counting plans, time estimates
//!
//! Everything here is pure and synchronous. These are the only sources of
//! numbers that reach the user.

pub mod count;
pub mod expression;
pub mod format;
pub mod number;
pub mod time;

pub use count::{plan, CountPlan};
pub use expression::{evaluate, BinaryOp, EvalError, Evaluator, Expr, UnaryOp};
pub use format::{format_answer, group_thousands, parse_grouped};
pub use number::Number;
pub use time::{estimate, TimeEstimate};
