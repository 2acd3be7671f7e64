//! Interpretation of numeric literal text.
//!
//! Integers become arbitrary precision [`BigInt`]s. Base 10 integers may carry an exponent
//! (`4e2`), applied with integer arithmetic: a negative exponent divides and truncates, so `4e-1`
//! is `0`. Literals with a decimal point or a size suffix (`f`, `d`) take the floating path
//! instead.
use num::BigInt;
use thiserror::Error;

use super::ast::{FloatSize, NumberValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("no digits")]
    Empty,
    #[error("`{digits}` is not a valid base {base} number")]
    InvalidDigits { digits: String, base: u32 },
    #[error("`{0}` is not a valid exponent")]
    InvalidExponent(String),
    #[error("exponent {0} is too large")]
    ExponentTooLarge(i64),
    #[error("more than one exponent marker")]
    MultipleExponents,
    #[error("floating point numbers can not have more than one period")]
    MultiplePeriods,
    #[error("`{0}` is not a valid floating point number")]
    InvalidFloat(String),
}

/// Interprets the text of a number token.
pub fn interpret(text: &str) -> Result<NumberValue, NumberError> {
    let text: String = text
        .chars()
        .filter(|&c| c != '_')
        .flat_map(char::to_lowercase)
        .collect();

    let (base, digits) = split_base(&text);

    if base == 10 && is_float(digits) {
        return float(digits);
    }

    integer(digits, base).map(NumberValue::Int)
}

fn split_base(text: &str) -> (u32, &str) {
    if let Some(digits) = text.strip_prefix("0x") {
        (16, digits)
    } else if let Some(digits) = text.strip_prefix("0o") {
        (8, digits)
    } else if let Some(digits) = text.strip_prefix("0b") {
        (2, digits)
    } else {
        (10, text)
    }
}

fn is_float(digits: &str) -> bool {
    digits.contains('.') || digits.ends_with(|c: char| FloatSize::from_suffix(c).is_some())
}

fn float(digits: &str) -> Result<NumberValue, NumberError> {
    if digits.matches('.').count() > 1 {
        return Err(NumberError::MultiplePeriods);
    }

    let (digits, size) = match digits.chars().last().and_then(FloatSize::from_suffix) {
        Some(size) => (&digits[..digits.len() - 1], size),
        None => (digits, FloatSize::Unsized),
    };

    if digits.is_empty() {
        return Err(NumberError::Empty);
    }

    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(NumberValue::Float { value, size }),
        _ => Err(NumberError::InvalidFloat(digits.to_string())),
    }
}

fn integer(digits: &str, base: u32) -> Result<BigInt, NumberError> {
    // Only base 10 has an exponent, `e` is a digit in hex
    let (mantissa, exponent) = if base == 10 {
        let mut parts = digits.split('e');
        let mantissa = parts.next().unwrap_or_default();
        let exponent = parts.next();
        if parts.next().is_some() {
            return Err(NumberError::MultipleExponents);
        }
        (mantissa, exponent)
    } else {
        (digits, None)
    };

    if mantissa.is_empty() {
        return Err(NumberError::Empty);
    }

    // `parse_bytes` would accept a sign, number tokens never have one
    if !mantissa.chars().all(|c| c.is_digit(base)) {
        return Err(NumberError::InvalidDigits {
            digits: mantissa.to_string(),
            base,
        });
    }

    let value = BigInt::parse_bytes(mantissa.as_bytes(), base).ok_or_else(|| {
        NumberError::InvalidDigits {
            digits: mantissa.to_string(),
            base,
        }
    })?;

    match exponent {
        Some(exponent) => scale(value, exponent),
        None => Ok(value),
    }
}

/// Largest positive exponent accepted, `1e4096` already has 4097 digits.
pub const MAX_EXPONENT: i64 = 4096;

/// Multiplies or (truncating) divides by a power of ten.
fn scale(value: BigInt, exponent: &str) -> Result<BigInt, NumberError> {
    let exponent: i64 = exponent
        .parse()
        .map_err(|_| NumberError::InvalidExponent(exponent.to_string()))?;

    if exponent > MAX_EXPONENT {
        return Err(NumberError::ExponentTooLarge(exponent));
    }

    if exponent < 0 {
        // The mantissa is below 10^digits, so dividing by at least that much leaves nothing
        let digits = value.to_str_radix(10).len() as u64;
        if exponent.unsigned_abs() >= digits {
            return Ok(BigInt::from(0u8));
        }

        // Truncating integer division, repeated division by ten gives the same result
        let power = BigInt::from(10u8).pow(exponent.unsigned_abs() as u32);
        Ok(value / power)
    } else {
        let power = BigInt::from(10u8).pow(exponent as u32);
        Ok(value * power)
    }
}
