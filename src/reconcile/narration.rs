//! Sentences built from computed numbers
//!
//! Every number that appears in these strings is passed in by the
//! reconciler; nothing here reads classifier output.

use crate::math::count::MAX_COUNT_BY_ONES;
use crate::math::format::group_thousands;

pub const MATH_APOLOGY_SCREEN: &str = "I couldn't understand that math problem.";
pub const MATH_APOLOGY_TEXT: &str =
    "I couldn't quite figure out that math problem, but we can try another one!";

/// "You asked what {problem} is. The answer is {answer}."
pub fn answer_line(spoken_problem: &str, answer: &str) -> String {
    format!("You asked what {} is. The answer is {}.", spoken_problem, answer)
}

/// Comma-separated jumps; grouped digits once the target passes ten
pub fn jump_list(target: i64, sequence: &[i64]) -> String {
    sequence
        .iter()
        .map(|&v| {
            if target <= MAX_COUNT_BY_ONES {
                v.to_string()
            } else {
                group_thousands(v)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Intro, jumps and time, e.g. "Let's jump up to 47 popsicles. Our ten jumps are: ..."
pub fn count_narration(target: i64, unit: Option<&str>, jumps: &str, time_text: &str) -> String {
    let target_digits = group_thousands(target);
    let intro = match unit.map(str::trim).filter(|u| !u.is_empty()) {
        Some(unit) => format!("Let's jump up to {} {}.", target_digits, pluralize(unit, target)),
        None => format!("Let's jump up to {}.", target_digits),
    };

    format!(
        "{} Our ten jumps are: {}. If you counted by ones, it would take {}.",
        intro, jumps, time_text
    )
}

/// Naive English plural: append "s" unless the count is exactly one
fn pluralize(unit: &str, count: i64) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}
