//! Duration text parsing.
//!
//! Accepts a sequence of decimal numbers, each with an optional fraction
//! and a mandatory unit suffix, such as `"300ms"`, `"1.5h"` or `"2h45m"`.
//! Valid units are `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m` and `h`. The
//! bare text `"0"` is also accepted. Negative durations cannot be
//! represented by [`Duration`] and are rejected.

use std::time::Duration;

use thiserror::Error as ThisError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Why a duration text could not be parsed.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum DurationError {
    /// The text is empty or only a sign.
    #[error("invalid duration '{0}'")]
    Invalid(String),

    /// The text has a leading `-`.
    #[error("negative duration '{0}'")]
    Negative(String),

    /// A number without a unit.
    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),

    /// A unit that is not recognized.
    #[error("unknown unit '{unit}' in duration '{text}'")]
    UnknownUnit {
        /// The offending unit.
        unit: String,
        /// The full text.
        text: String,
    },

    /// The value does not fit in 64 bits of nanoseconds.
    #[error("duration '{0}' out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses a duration with unit suffixes.
///
/// # Errors
///
/// Returns a [`DurationError`] describing the first problem found.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use paramstore::duration::parse_duration;
///
/// assert_eq!(parse_duration("3600s").unwrap(), Duration::from_secs(3600));
/// assert_eq!(parse_duration("1m30.5s").unwrap(), Duration::from_millis(90_500));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(text.to_string());

    let mut rest = text;
    if let Some(stripped) = rest.strip_prefix('-') {
        if stripped.is_empty() {
            return Err(invalid());
        }
        return Err(DurationError::Negative(text.to_string()));
    }
    rest = rest.strip_prefix('+').unwrap_or(rest);

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;

    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_digits, after) = rest.split_at(int_len);

        let (frac_digits, after) = match after.strip_prefix('.') {
            Some(frac) => {
                let frac_len = frac.find(|c: char| !c.is_ascii_digit()).unwrap_or(frac.len());
                frac.split_at(frac_len)
            }
            None => ("", after),
        };

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);

        if unit.is_empty() {
            return Err(DurationError::MissingUnit(text.to_string()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            text: text.to_string(),
        })?;

        let overflow = || DurationError::Overflow(text.to_string());

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        if !frac_digits.is_empty() {
            // Digits past nanosecond precision cannot change the result.
            let kept = &frac_digits[..frac_digits.len().min(18)];
            let numerator: u128 = kept.parse().map_err(|_| invalid())?;
            let denominator = 10u128.pow(u32::try_from(kept.len()).map_err(|_| invalid())?);
            nanos = nanos
                .checked_add(numerator * scale / denominator)
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
        if total > u128::from(u64::MAX) {
            return Err(overflow());
        }

        rest = after;
    }

    let nanos = u64::try_from(total).map_err(|_| DurationError::Overflow(text.to_string()))?;

    Ok(Duration::from_nanos(nanos))
}
