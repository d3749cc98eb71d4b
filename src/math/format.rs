//! Number formatting for screens and narration

use crate::math::number::Number;

/// Digits shown after the decimal point for non-integer answers
const DECIMAL_PLACES: usize = 4;

/// Format an integer with comma thousands separators (`1234567` -> `1,234,567`)
pub fn group_thousands(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Insert commas every three digits from the right; `digits` is ASCII digits only
fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a real to four decimals with grouped whole digits, then strip
/// trailing zeros and a dangling point
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.*}", DECIMAL_PLACES, value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed),
    };
    match unsigned.split_once('.') {
        Some((whole, fraction)) => format!("{}{}.{}", sign, group_digits(whole), fraction),
        None => format!("{}{}", sign, group_digits(unsigned)),
    }
}

/// Screen form of a computed answer
pub fn format_answer(value: Number) -> String {
    match value {
        Number::Int(v) => group_thousands(v),
        Number::Real(v) => format_decimal(v),
    }
}

/// Parse a plain or comma-grouped integer (`"47"`, `"1,000,000"`, `"-12,345"`)
///
/// Grouping must be well formed: a leading group of one to three digits
/// followed by groups of exactly three.
pub fn parse_grouped(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let groups: Vec<&str> = body.split(',').collect();
    let first = groups.first()?;
    if first.is_empty() || (first.len() > 3 && groups.len() > 1) {
        return None;
    }
    let well_formed = groups
        .iter()
        .enumerate()
        .all(|(i, g)| g.chars().all(|c| c.is_ascii_digit()) && (i == 0 || g.len() == 3));
    if !well_formed {
        return None;
    }

    let digits: String = groups.concat();
    if negative {
        format!("-{}", digits).parse().ok()
    } else {
        digits.parse().ok()
    }
}
