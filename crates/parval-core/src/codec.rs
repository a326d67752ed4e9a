//! # Text Codec
//!
//! Parses text into any kind and formats any value back to canonical text.
//!
//! ## Parse Pipeline
//! ```text
//! "  -1.2345678e3 "
//!    │
//!    ▼  skip leading whitespace (C isspace set)
//! "-1.2345678e3 "
//!    │
//!    ▼  dispatch on destination kind
//! ┌──────────┬──────────────────────┬──────────────────────────────────────┐
//! │ bool     │ yes/y/true/t/1       │ no/n/false/f/0  (any case)           │
//! │ integral │ base-detecting: 0x.. hex, 0.. octal, else decimal          │
//! │          │ fractional/exponent text goes through the floating rules   │
//! │ floating │ decimal float, inf, nan                                    │
//! │ text     │ copied verbatim                                            │
//! └──────────┴─────────────────────────────────────────────────────────────┘
//!    │
//!    ▼  leftover non-blank text ► StringInvalid (unless already worse)
//! ```
//!
//! ## Format
//! Integers print in decimal, booleans as `true`/`false`, floating values
//! like C's `%.Ng` with N = the kind's `digits10` (6 for float, 15 for
//! double and long double).
//!
//! ```rust
//! use parval_core::codec::{format, parse};
//! use parval_core::{ConversionPolicy, Kind, Status, Value};
//!
//! let out = parse(Some("-1.2345678e3"), Kind::Double, &ConversionPolicy::default());
//! assert_eq!(out.status(), Status::Ok);
//! assert_eq!(format(out.value().unwrap()), "-1234.5678");
//! ```

use tracing::{debug, trace};

use crate::config::{ConversionPolicy, NegativeUnsigned};
use crate::convert::{floating_range, integral_range, store, Converted};
use crate::error::Status;
use crate::limits::{Limits, CHAR_IS_SIGNED};
use crate::type_code::Kind;
use crate::value::{Scalar, Value};

const TRUE_TOKENS: [&str; 5] = ["yes", "y", "true", "t", "1"];
const FALSE_TOKENS: [&str; 5] = ["no", "n", "false", "f", "0"];

// =============================================================================
// Helpers
// =============================================================================

/// The C `isspace` set.
#[inline]
pub fn is_c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// True for text made only of whitespace (including empty text).
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_c_space)
}

/// Case-insensitive boolean token lookup.
///
/// ```rust
/// use parval_core::codec::parse_bool_token;
///
/// assert_eq!(parse_bool_token("Yes"), Some(true));
/// assert_eq!(parse_bool_token("F"), Some(false));
/// assert_eq!(parse_bool_token("tru"), None);
/// ```
pub fn parse_bool_token(token: &str) -> Option<bool> {
    if TRUE_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSE_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}

// =============================================================================
// Parse
// =============================================================================

/// Result of one type-specific scan: what to store, how it went, and how many
/// bytes of the input were used.
struct Parsed {
    value: Option<Value>,
    status: Status,
    consumed: usize,
}

/// Parses `text` into a value of kind `to`.
///
/// `None` text is `StringNull` and stores nothing. Plain `char` is parsed as
/// its signed or unsigned form and reported as `Signedness` unless something
/// worse happened.
pub fn parse(text: Option<&str>, to: Kind, policy: &ConversionPolicy) -> Converted<Value> {
    let Some(text) = text else {
        debug!(%to, status = %Status::StringNull, "no text to parse");
        return Converted::unset(Status::StringNull);
    };
    if to.is_text() {
        return Converted::ok(Value::Text(text.to_string()));
    }

    let p = text.trim_start_matches(is_c_space);

    let (target, carried) = match to {
        Kind::Char if CHAR_IS_SIGNED => (Kind::SChar, Status::Signedness),
        Kind::Char => (Kind::UChar, Status::Signedness),
        _ => (to, Status::Ok),
    };
    let Some(limits) = Limits::of(target) else {
        return Converted::unset(Status::Unexpected);
    };

    let Parsed {
        value,
        status,
        consumed,
    } = match target {
        Kind::Bool => parse_bool(p),
        Kind::Float | Kind::Double | Kind::LongDouble => parse_floating(p, limits),
        _ => parse_integral(p, limits, policy),
    };
    trace!(%to, consumed, "parsed text");

    let mut status = if status.is_ok() { carried } else { status };
    if matches!(status, Status::Ok | Status::Signedness) && !is_blank(&p[consumed..]) {
        status = Status::StringInvalid;
    }
    if !status.is_ok() {
        debug!(from = "text", %to, %status, "conversion not exact");
    }

    // Re-tag a signed/unsigned char result as plain char.
    let value = if target == to {
        value
    } else {
        value.and_then(|v| v.widen()).and_then(|s| s.narrow(to))
    };
    Converted::new(value, status)
}

fn parse_bool(p: &str) -> Parsed {
    match parse_bool_token(p.trim_end_matches(is_c_space)) {
        Some(b) => Parsed {
            value: Some(Value::Bool(b)),
            status: Status::Ok,
            consumed: p.len(),
        },
        None => Parsed {
            value: None,
            status: Status::StringInvalid,
            consumed: 0,
        },
    }
}

fn parse_integral(p: &str, limits: &Limits, policy: &ConversionPolicy) -> Parsed {
    let int = scan_integer(p);

    // "-1.5e3" into an integer: treat the whole number as a floating source.
    if !int.hex {
        if let Some(float) = scan_floating(p) {
            if !float.special && !float.integral && float.consumed > int.consumed {
                return floating_into_integral(float, limits);
            }
        }
    }

    let consumed = int.consumed;
    let Some(magnitude) = int.magnitude else {
        return string_overflow(int.negative, limits, consumed);
    };

    let scalar = if limits.is_signed() {
        if int.negative {
            if magnitude > i64::MIN.unsigned_abs() {
                return string_overflow(true, limits, consumed);
            }
            Scalar::Signed((magnitude as i64).wrapping_neg())
        } else if magnitude > i64::MAX as u64 {
            return string_overflow(false, limits, consumed);
        } else {
            Scalar::Signed(magnitude as i64)
        }
    } else if int.negative && magnitude != 0 {
        match policy.negative_unsigned {
            NegativeUnsigned::Underflow => {
                return Parsed {
                    value: Some(limits.min_value()),
                    status: Status::Underflow,
                    consumed,
                }
            }
            NegativeUnsigned::Wrap => Scalar::Unsigned(magnitude.wrapping_neg()),
        }
    } else {
        Scalar::Unsigned(magnitude)
    };

    let status = integral_range(scalar, limits);
    Parsed {
        value: store(scalar, status, limits),
        status,
        consumed,
    }
}

fn floating_into_integral(float: FloatToken, limits: &Limits) -> Parsed {
    if float.value.is_infinite() {
        return string_overflow(float.value < 0.0, limits, float.consumed);
    }
    if float.underflowed {
        return string_underflow(float, limits);
    }
    let scalar = Scalar::Floating(float.value);
    let status = match integral_range(scalar, limits) {
        Status::Ok => Status::Precision,
        range => range,
    };
    Parsed {
        value: store(scalar, status, limits),
        status,
        consumed: float.consumed,
    }
}

fn parse_floating(p: &str, limits: &Limits) -> Parsed {
    let Some(float) = scan_floating(p) else {
        return Parsed {
            value: Some(Value::zero(limits.kind())),
            status: Status::Ok,
            consumed: 0,
        };
    };
    if float.value.is_infinite() && !float.special {
        return string_overflow(float.value < 0.0, limits, float.consumed);
    }
    if float.underflowed {
        return string_underflow(float, limits);
    }

    let status = floating_range(float.value, limits);
    Parsed {
        value: store(Scalar::Floating(float.value), status, limits),
        status,
        consumed: float.consumed,
    }
}

/// Nonzero text too small for the scanner: stores a (signed) zero.
fn string_underflow(float: FloatToken, limits: &Limits) -> Parsed {
    let status = Status::StringOverflow;
    Parsed {
        value: store(Scalar::Floating(float.value), status, limits),
        status,
        consumed: float.consumed,
    }
}

/// Magnitude beyond what the scanner can represent: clamp toward the sign.
fn string_overflow(negative: bool, limits: &Limits, consumed: usize) -> Parsed {
    let value = if negative {
        limits.min_value()
    } else {
        limits.max_value()
    };
    Parsed {
        value: Some(value),
        status: Status::StringOverflow,
        consumed,
    }
}

// =============================================================================
// Scanners
// =============================================================================

struct IntToken {
    negative: bool,
    /// `None` when the digits exceed `u64`.
    magnitude: Option<u64>,
    consumed: usize,
    hex: bool,
}

/// Base-detecting integer scan (`0x` hex, leading `0` octal, else decimal).
/// Consumes nothing if there are no digits.
fn scan_integer(p: &str) -> IntToken {
    let bytes = p.as_bytes();
    let (negative, sign_len) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let i = sign_len;
    let (radix, start) = if bytes.get(i) == Some(&b'0')
        && matches!(bytes.get(i + 1), Some(b'x' | b'X'))
        && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
    {
        (16, i + 2)
    } else if bytes.get(i) == Some(&b'0') {
        (8, i)
    } else {
        (10, i)
    };

    let mut magnitude = Some(0u64);
    let mut end = start;
    while let Some(digit) = bytes.get(end).and_then(|&b| char::from(b).to_digit(radix)) {
        magnitude = magnitude
            .and_then(|m| m.checked_mul(u64::from(radix)))
            .and_then(|m| m.checked_add(u64::from(digit)));
        end += 1;
    }

    if end == start {
        return IntToken {
            negative: false,
            magnitude: Some(0),
            consumed: 0,
            hex: false,
        };
    }
    IntToken {
        negative,
        magnitude,
        consumed: end,
        hex: radix == 16,
    }
}

struct FloatToken {
    value: f64,
    consumed: usize,
    /// `inf`/`infinity`/`nan` rather than digits.
    special: bool,
    /// Digits only, no fraction or exponent.
    integral: bool,
    /// Nonzero digits that still came out as zero.
    underflowed: bool,
}

fn count_digits(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

/// Longest decimal floating-point prefix of `p`; `None` if there is none.
fn scan_floating(p: &str) -> Option<FloatToken> {
    let bytes = p.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let rest = &bytes[sign_len..];
    for (word, value) in [
        ("infinity", f64::INFINITY),
        ("inf", f64::INFINITY),
        ("nan", f64::NAN),
    ] {
        let matched = rest
            .get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word.as_bytes()));
        if matched {
            return Some(FloatToken {
                value: if negative { -value } else { value },
                consumed: sign_len + word.len(),
                special: true,
                integral: false,
                underflowed: false,
            });
        }
    }

    let int_start = sign_len;
    let int_digits = count_digits(bytes, int_start);
    let mut end = int_start + int_digits;

    let mut frac = (end, 0);
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = count_digits(bytes, end + 1);
        if int_digits > 0 || frac_digits > 0 {
            frac = (end + 1, frac_digits);
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac.1 == 0 {
        return None;
    }

    let mut exponent = "";
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = count_digits(bytes, end + 1 + exp_sign);
        if exp_digits > 0 {
            exponent = &p[end + 1..end + 1 + exp_sign + exp_digits];
            end += 1 + exp_sign + exp_digits;
        }
    }

    // Normalized as sign, digits, optional fraction, optional exponent.
    let mut normalized = String::with_capacity(end + 2);
    if negative {
        normalized.push('-');
    }
    if int_digits == 0 {
        normalized.push('0');
    } else {
        normalized.push_str(&p[int_start..int_start + int_digits]);
    }
    if frac.1 > 0 {
        normalized.push('.');
        normalized.push_str(&p[frac.0..frac.0 + frac.1]);
    }
    if !exponent.is_empty() {
        normalized.push('e');
        normalized.push_str(exponent);
    }

    let value = normalized.parse::<f64>().ok()?;
    let nonzero = |from: usize, len: usize| bytes[from..from + len].iter().any(|&b| b != b'0');
    let integral = frac.1 == 0
        && exponent.is_empty()
        && bytes.get(int_start + int_digits) != Some(&b'.');
    Some(FloatToken {
        value,
        consumed: end,
        special: false,
        integral,
        underflowed: value == 0.0 && (nonzero(int_start, int_digits) || nonzero(frac.0, frac.1)),
    })
}

// =============================================================================
// Format
// =============================================================================

/// Canonical text of `value`.
///
/// ```rust
/// use parval_core::codec::format;
/// use parval_core::Value;
///
/// assert_eq!(format(&Value::Bool(true)), "true");
/// assert_eq!(format(&Value::Double(-2e32)), "-2e+32");
/// assert_eq!(format(&Value::Float(1.0 / 3.0)), "0.333333");
/// ```
pub fn format(value: &Value) -> String {
    match value {
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Char(v) => v.to_string(),
        Value::SChar(v) => v.to_string(),
        Value::Short(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Long(v) => v.to_string(),
        Value::UChar(v) => v.to_string(),
        Value::UShort(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::ULong(v) => v.to_string(),
        Value::Float(v) => format_general(f64::from(*v), digits10(Kind::Float)),
        Value::Double(v) => format_general(*v, digits10(Kind::Double)),
        Value::LongDouble(v) => format_general(*v, digits10(Kind::LongDouble)),
        Value::Text(s) => s.clone(),
    }
}

fn digits10(kind: Kind) -> usize {
    Limits::of(kind).map_or(6, |l| l.digits10() as usize)
}

/// C `%.{precision}g`: `precision` significant digits, trailing zeros
/// removed, exponent form when the exponent is below -4 or at least
/// `precision`.
///
/// ```rust
/// use parval_core::codec::format_general;
///
/// assert_eq!(format_general(-1234.5678, 15), "-1234.5678");
/// assert_eq!(format_general(123456789.0, 6), "1.23457e+08");
/// assert_eq!(format_general(0.00001, 6), "1e-05");
/// ```
pub fn format_general(v: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if v.is_nan() {
        return if v.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if v.is_infinite() {
        return if v < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:.*e}", precision - 1, v);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    let max_exponent = i32::try_from(precision).unwrap_or(i32::MAX);
    if exponent < -4 || exponent >= max_exponent {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = usize::try_from(max_exponent - 1 - exponent).unwrap_or(0);
        strip_trailing_zeros(&format!("{:.*}", decimals, v)).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
