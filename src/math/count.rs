//! Jump sequences for counting up to large numbers
//!
//! Nobody wants to hear every number up to a million, so targets above ten
//! are narrated as nine even jumps plus a final landing on the target.

use serde::{Deserialize, Serialize};

/// Largest target that is counted one number at a time
pub const MAX_COUNT_BY_ONES: i64 = 10;

/// Number of evenly spaced jumps before landing on the target
const JUMPS: i64 = 9;

/// Planned counting sequence for a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountPlan {
    pub step_size: i64,
    pub sequence: Vec<i64>,
    pub is_impossible: bool,
}

impl CountPlan {
    fn impossible() -> Self {
        Self {
            step_size: 0,
            sequence: Vec::new(),
            is_impossible: true,
        }
    }
}

/// Plan the jump sequence for counting up to `n`
///
/// The sequence never exceeds ten elements and, for any positive target,
/// always ends exactly on `n`.
pub fn plan(n: i64) -> CountPlan {
    if n <= 0 {
        return CountPlan::impossible();
    }

    if n <= MAX_COUNT_BY_ONES {
        return CountPlan {
            step_size: 1,
            sequence: (1..=n).collect(),
            is_impossible: false,
        };
    }

    let step = (n / 10).max(1);
    let mut sequence: Vec<i64> = (1..=JUMPS).map(|i| step * i).collect();
    if sequence.last() != Some(&n) {
        sequence.push(n);
    }

    CountPlan {
        step_size: step,
        sequence,
        is_impossible: false,
    }
}
