//! XLM amounts in stroops.
//!
//! 1 XLM = 10_000_000 stroops. Parsing is done on the decimal string with
//! integer arithmetic so that "0.0000001" is exactly one stroop.

use thiserror::Error;

pub const STROOPS_PER_XLM: i128 = 10_000_000;

/// Number of fractional digits a stroop amount can carry.
pub const XLM_DECIMALS: usize = 7;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Not a number: {0}")]
    Invalid(String),

    #[error("Amount must be greater than zero")]
    NotPositive,

    #[error("Amount is too large")]
    TooLarge,
}

/// Parse a user-entered XLM amount (e.g. "12.5") into stroops.
///
/// Digits beyond the seventh decimal place are floored away. Zero and negative
/// amounts are rejected, as is anything that is not a plain decimal number.
pub fn parse_xlm(input: &str) -> Result<i128, AmountError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AmountError::Empty);
    }

    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (whole, frac) = match body.split_once('.') {
        Some((w, f)) => (w, f),
        None => (body, ""),
    };

    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(AmountError::Invalid(s.to_string()));
    }

    let whole_val = digits_to_i128(whole)?;
    let frac_val = if frac.is_empty() {
        0
    } else {
        let truncated = &frac[..frac.len().min(XLM_DECIMALS)];
        let padded = format!("{:0<width$}", truncated, width = XLM_DECIMALS);
        digits_to_i128(&padded)?
    };

    let stroops = whole_val
        .checked_mul(STROOPS_PER_XLM)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or(AmountError::TooLarge)?;

    if negative || stroops == 0 {
        return Err(AmountError::NotPositive);
    }

    Ok(stroops)
}

fn digits_to_i128(digits: &str) -> Result<i128, AmountError> {
    digits.bytes().try_fold(0i128, |acc, b| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as i128))
            .ok_or(AmountError::TooLarge)
    })
}

/// Stroops as XLM with `decimals` fractional digits, no unit suffix.
///
/// Rounds half up at the last shown digit. `decimals` is capped at 7.
pub fn format_xlm(stroops: i128, decimals: usize) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    format!("{}{}", sign, format_magnitude(stroops.unsigned_abs(), decimals))
}

/// Stroops as XLM with an explicit sign, e.g. `+1.0000000`.
pub fn format_xlm_signed(stroops: i128, decimals: usize) -> String {
    let sign = if stroops < 0 { "-" } else { "+" };
    format!("{}{}", sign, format_magnitude(stroops.unsigned_abs(), decimals))
}

fn format_magnitude(stroops: u128, decimals: usize) -> String {
    let decimals = decimals.min(XLM_DECIMALS);
    let step = 10u128.pow((XLM_DECIMALS - decimals) as u32);
    let rounded = stroops / step + u128::from(stroops % step * 2 >= step);

    let scale = 10u128.pow(decimals as u32);
    let (whole, frac) = (rounded / scale, rounded % scale);
    if decimals == 0 {
        whole.to_string()
    } else {
        format!("{}.{:0width$}", whole, frac, width = decimals)
    }
}
