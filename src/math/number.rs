//! Numeric values produced by the math brain
//!
//! Integer arithmetic stays integral; anything that goes through true
//! division becomes a real. Serialized as a bare JSON number either way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer or real computed by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Real(f64),
}

// i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
const I64_LOWER: f64 = i64::MIN as f64;
const I64_UPPER: f64 = i64::MAX as f64;

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Real(v) => v,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(v) => v == 0,
            Number::Real(v) => v == 0.0,
        }
    }

    /// Exact integer value, if there is one that fits in an i64
    ///
    /// Reals qualify only when they have no fractional part.
    pub fn as_exact_i64(self) -> Option<i64> {
        match self {
            Number::Int(v) => Some(v),
            Number::Real(v) => {
                if v.is_finite() && v.fract() == 0.0 && v >= I64_LOWER && v < I64_UPPER {
                    Some(v as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Collapse whole-valued reals to integers (`1150.0` -> `1150`)
    pub fn normalize(self) -> Number {
        match self.as_exact_i64() {
            Some(v) => Number::Int(v),
            None => self,
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Real(v)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Real(v) => write!(f, "{:?}", v),
        }
    }
}
