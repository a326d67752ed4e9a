//! # Conversion Engine
//!
//! Classifies and performs scalar-to-scalar conversions. Every conversion
//! yields exactly one [`Status`] and, unless the status is `Illegal`, a value
//! that is safe to use.
//!
//! ## Algorithm (integral source)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  dest floating? ───yes──► Precision                                    │
//! │       │no                                                               │
//! │       ▼                                                                 │
//! │  dest narrower than source? ──yes──► exact compare with dest min/max    │
//! │       │                              below ► Underflow                  │
//! │       │                              above ► Overflow                   │
//! │       ▼                                                                 │
//! │  still Ok and signedness differs ──► Signedness                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok/Signedness and dest maybe narrower elsewhere ──► PlatformSize       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store: Underflow ► min, Overflow ► max, otherwise `as` cast            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Floating sources follow the same shape, but overflow/underflow into a
//! floating destination is only declared when the value exceeds the bound by
//! more than the destination's epsilon (relative).
//!
//! ## Example
//! ```rust
//! use parval_core::convert::convert_value;
//! use parval_core::{ConversionPolicy, Kind, Status, Value};
//!
//! let policy = ConversionPolicy::default();
//! let out = convert_value(&Value::ULong(3_000_000_000), Kind::Int, &policy);
//! assert_eq!(out.status(), Status::Overflow);
//! assert_eq!(out.value(), Some(&Value::Int(i32::MAX)));
//! ```

use std::cmp::Ordering;
use tracing::debug;

use crate::codec;
use crate::config::ConversionPolicy;
use crate::error::{ConversionError, ConversionResult, Status};
use crate::limits::Limits;
use crate::type_code::{Kind, TypeCode};
use crate::value::{Primitive, Scalar, Value};

// =============================================================================
// Converted
// =============================================================================

/// A value together with the classification of how it was obtained.
///
/// `value` is `None` only when nothing could be stored (`Illegal`, or a
/// parse that recognised nothing).
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Converted<T> {
    value: Option<T>,
    status: Status,
}

impl<T> Converted<T> {
    pub fn new(value: Option<T>, status: Status) -> Self {
        Converted { value, status }
    }

    pub fn ok(value: T) -> Self {
        Converted::new(Some(value), Status::Ok)
    }

    pub fn with_status(value: T, status: Status) -> Self {
        Converted::new(Some(value), status)
    }

    /// No value was produced.
    pub fn unset(status: Status) -> Self {
        Converted::new(None, status)
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    pub fn into_parts(self) -> (Option<T>, Status) {
        (self.value, self.status)
    }

    /// Strict view: the value only if the conversion was exact.
    ///
    /// A missing value under an `Ok` status reports `Unexpected`.
    pub fn into_result(self) -> ConversionResult<T> {
        self.status.into_result()?;
        self.value.ok_or(ConversionError::Unexpected)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Converted<U> {
        Converted::new(self.value.map(f), self.status)
    }
}

impl Converted<Value> {
    /// Narrows the stored value to the Rust type `T`.
    ///
    /// A value of the wrong kind is dropped and reported as `Unexpected`.
    pub fn extract<T: Primitive>(self) -> Converted<T> {
        match self.value {
            None => Converted::unset(self.status),
            Some(value) => match T::from_value(&value) {
                Some(v) => Converted::new(Some(v), self.status),
                None => Converted::unset(Status::Unexpected),
            },
        }
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Converts any value into `to`.
///
/// - text source: parsed by the codec
/// - text destination: formatted by the codec (always `Ok`)
/// - otherwise: [`convert_scalar`]
pub fn convert_value(value: &Value, to: Kind, policy: &ConversionPolicy) -> Converted<Value> {
    if let Value::Text(text) = value {
        return codec::parse(Some(text), to, policy);
    }
    if to.is_text() {
        return Converted::ok(Value::Text(codec::format(value)));
    }
    match value.widen() {
        Some(scalar) => convert_scalar(scalar, value.code(), to, policy),
        None => Converted::unset(Status::Unexpected),
    }
}

/// Converts a widened scalar whose original type is `from` into `to`.
///
/// A text destination is `Illegal`: scalars only reach text through
/// [`codec::format`].
pub fn convert_scalar(
    src: Scalar,
    from: TypeCode,
    to: Kind,
    policy: &ConversionPolicy,
) -> Converted<Value> {
    let Some(limits) = Limits::of(to) else {
        debug!(%from, %to, status = %Status::Illegal, "no conversion rule");
        return Converted::unset(Status::Illegal);
    };

    let status = match src {
        Scalar::Signed(_) | Scalar::Unsigned(_) => classify_integral(src, from, limits, policy),
        Scalar::Floating(v) => classify_floating(v, from, limits, policy),
    };

    if !status.is_ok() {
        debug!(%from, %to, %status, "conversion not exact");
    }
    Converted::new(store(src, status, limits), status)
}

// =============================================================================
// Classification
// =============================================================================

fn classify_integral(
    src: Scalar,
    from: TypeCode,
    limits: &Limits,
    policy: &ConversionPolicy,
) -> Status {
    if !limits.is_integer() {
        // Any integer fits a floating range; only digits can be lost.
        return Status::Precision;
    }

    let mut status = Status::Ok;
    if limits.is_smaller_than(from) {
        status = integral_range(src, limits);
    }

    let src_signed = matches!(src, Scalar::Signed(_));
    if status == Status::Ok && src_signed != limits.is_signed() {
        status = Status::Signedness;
    }

    if policy.platform_size_checks
        && matches!(status, Status::Ok | Status::Signedness)
        && limits.maybe_smaller_than(from)
    {
        status = Status::PlatformSize;
    }
    status
}

fn classify_floating(v: f64, from: TypeCode, limits: &Limits, policy: &ConversionPolicy) -> Status {
    let status = if limits.kind() == Kind::LongDouble {
        Status::Ok
    } else if limits.is_integer() {
        match integral_range(Scalar::Floating(v), limits) {
            Status::Ok => Status::Precision,
            range => range,
        }
    } else {
        floating_range(v, limits)
    };

    if policy.platform_size_checks && status == Status::Ok && limits.maybe_smaller_than(from) {
        return Status::PlatformSize;
    }
    status
}

/// Exact comparison of `src` against `limits.min()`/`limits.max()`.
///
/// NaN is neither below nor above.
pub(crate) fn integral_range(src: Scalar, limits: &Limits) -> Status {
    if compare(src, limits.min()) == Some(Ordering::Less) {
        Status::Underflow
    } else if compare(src, limits.max()) == Some(Ordering::Greater) {
        Status::Overflow
    } else {
        Status::Ok
    }
}

/// Epsilon-tolerant range check for a floating destination.
pub(crate) fn floating_range(v: f64, limits: &Limits) -> Status {
    let min = limits.min().as_f64();
    let max = limits.max().as_f64();
    let tolerance = 1.0 + limits.epsilon();

    if v < min && v / min > tolerance {
        Status::Underflow
    } else if v > max && v / max > tolerance {
        Status::Overflow
    } else {
        Status::Ok
    }
}

/// Value to store for `status`: the bound on overflow/underflow, nothing on
/// `Illegal`, the cast otherwise.
pub(crate) fn store(src: Scalar, status: Status, limits: &Limits) -> Option<Value> {
    match status {
        Status::Underflow => Some(limits.min_value()),
        Status::Overflow => Some(limits.max_value()),
        Status::Illegal => None,
        _ => src.narrow(limits.kind()),
    }
}

/// Mathematical comparison across signed/unsigned/floating forms.
///
/// A negative signed value is never reinterpreted as unsigned.
fn compare(a: Scalar, b: Scalar) -> Option<Ordering> {
    match (a, b) {
        (Scalar::Signed(x), Scalar::Signed(y)) => Some(x.cmp(&y)),
        (Scalar::Unsigned(x), Scalar::Unsigned(y)) => Some(x.cmp(&y)),
        (Scalar::Signed(x), Scalar::Unsigned(y)) => match u64::try_from(x) {
            Ok(x) => Some(x.cmp(&y)),
            Err(_) => Some(Ordering::Less),
        },
        (Scalar::Unsigned(x), Scalar::Signed(y)) => match u64::try_from(y) {
            Ok(y) => Some(x.cmp(&y)),
            Err(_) => Some(Ordering::Greater),
        },
        (Scalar::Floating(x), Scalar::Signed(y)) => compare_float_signed(x, y),
        (Scalar::Signed(x), Scalar::Floating(y)) => {
            compare_float_signed(y, x).map(Ordering::reverse)
        }
        (Scalar::Floating(x), Scalar::Unsigned(y)) => compare_float_unsigned(x, y),
        (Scalar::Unsigned(x), Scalar::Floating(y)) => {
            compare_float_unsigned(y, x).map(Ordering::reverse)
        }
        (Scalar::Floating(x), Scalar::Floating(y)) => x.partial_cmp(&y),
    }
}

/// 2^63 and 2^64, exactly representable unlike `i64::MAX`/`u64::MAX`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

fn compare_float_signed(x: f64, y: i64) -> Option<Ordering> {
    if x.is_nan() {
        None
    } else if x >= TWO_POW_63 {
        Some(Ordering::Greater)
    } else if x < -TWO_POW_63 {
        Some(Ordering::Less)
    } else {
        // In range, so the truncation is exact.
        let whole = x.trunc();
        Some((whole as i64).cmp(&y).then(fraction_order(x - whole)))
    }
}

fn compare_float_unsigned(x: f64, y: u64) -> Option<Ordering> {
    if x.is_nan() {
        None
    } else if x >= TWO_POW_64 {
        Some(Ordering::Greater)
    } else if x < 0.0 {
        Some(Ordering::Less)
    } else {
        let whole = x.trunc();
        Some((whole as u64).cmp(&y).then(fraction_order(x - whole)))
    }
}

fn fraction_order(fraction: f64) -> Ordering {
    fraction.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(value: impl Into<Value>, to: Kind) -> Converted<Value> {
        convert_value(&value.into(), to, &ConversionPolicy::default())
    }

    fn no_platform_checks() -> ConversionPolicy {
        ConversionPolicy {
            platform_size_checks: false,
            ..ConversionPolicy::default()
        }
    }

    #[test]
    fn test_ulong_above_int_max_overflows() {
        let out = conv(u64::from(u32::MAX), Kind::Int);
        assert_eq!(out.status(), Status::Overflow);
        assert_eq!(out.into_value(), Some(Value::Int(i32::MAX)));
    }

    #[test]
    fn test_negative_into_narrower_unsigned_underflows() {
        let out = conv(-5i64, Kind::UShort);
        assert_eq!(out.status(), Status::Underflow);
        assert_eq!(out.into_value(), Some(Value::UShort(0)));
    }

    #[test]
    fn test_negative_into_same_width_unsigned_is_signedness() {
        // No range check when the destination is not narrower.
        let out = conv(-1i64, Kind::ULong);
        assert_eq!(out.status(), Status::Signedness);
        assert_eq!(out.into_value(), Some(Value::ULong(u64::MAX)));
    }

    #[test]
    fn test_in_range_narrowing_is_platform_size() {
        let out = conv(70i64, Kind::Int);
        assert_eq!(out.status(), Status::PlatformSize);
        assert_eq!(out.into_value(), Some(Value::Int(70)));

        let out = convert_value(&Value::Long(70), Kind::Int, &no_platform_checks());
        assert!(out.is_ok());
    }

    #[test]
    fn test_platform_size_overrides_signedness() {
        let out = conv(7u64, Kind::Short);
        assert_eq!(out.status(), Status::PlatformSize);
        assert_eq!(out.into_value(), Some(Value::Short(7)));

        let out = convert_value(&Value::ULong(7), Kind::Short, &no_platform_checks());
        assert_eq!(out.status(), Status::Signedness);
    }

    #[test]
    fn test_overflow_beats_platform_size() {
        let out = conv(100_000i32, Kind::Short);
        assert_eq!(out.status(), Status::Overflow);
        assert_eq!(out.into_value(), Some(Value::Short(i16::MAX)));
    }

    #[test]
    fn test_widening_is_ok() {
        assert!(conv(-3i16, Kind::Long).is_ok());
        assert!(conv(200u8, Kind::UInt).is_ok());
        assert!(conv(-3i32, Kind::Int).is_ok());
    }

    #[test]
    fn test_integral_into_floating_is_precision() {
        let out = conv(-2_000_000_000i32, Kind::Double);
        assert_eq!(out.status(), Status::Precision);
        assert_eq!(out.into_value(), Some(Value::Double(-2e9)));
    }

    #[test]
    fn test_floating_into_integral() {
        let out = conv(-1.2345678e3f64, Kind::Int);
        assert_eq!(out.status(), Status::Precision);
        assert_eq!(out.into_value(), Some(Value::Int(-1234)));

        let out = conv(1e20f64, Kind::Long);
        assert_eq!(out.status(), Status::Overflow);
        assert_eq!(out.into_value(), Some(Value::Long(i64::MAX)));

        let out = conv(-0.5f64, Kind::UChar);
        assert_eq!(out.status(), Status::Underflow);
        assert_eq!(out.into_value(), Some(Value::UChar(0)));
    }

    #[test]
    fn test_floating_into_floating() {
        assert!(conv(1.5f64, Kind::Float).is_ok());
        assert!(conv(1.5f32, Kind::Double).is_ok());

        let out = conv(-2e32f64, Kind::Float);
        assert!(out.is_ok());

        let out = conv(1e300f64, Kind::Float);
        assert_eq!(out.status(), Status::Overflow);
        assert_eq!(out.into_value(), Some(Value::Float(f32::MAX)));

        let out = conv(-1e300f64, Kind::Float);
        assert_eq!(out.status(), Status::Underflow);
        assert_eq!(out.into_value(), Some(Value::Float(-f32::MAX)));
    }

    #[test]
    fn test_within_epsilon_of_bound_is_ok() {
        let near = f64::from(f32::MAX) * (1.0 + f64::from(f32::EPSILON) / 2.0);
        let out = conv(near, Kind::Float);
        assert!(out.is_ok());
        assert_eq!(out.into_value(), Some(Value::Float(f32::MAX)));
    }

    #[test]
    fn test_within_epsilon_of_lower_bound_is_ok() {
        let near = -f64::from(f32::MAX) * (1.0 + f64::from(f32::EPSILON) / 2.0);
        let out = conv(near, Kind::Float);
        assert!(out.is_ok());
        assert_eq!(out.into_value(), Some(Value::Float(-f32::MAX)));

        let out = conv(-1.0e39, Kind::Float);
        assert_eq!(out.into_parts(), (Some(Value::Float(-f32::MAX)), Status::Underflow));
    }

    #[test]
    fn test_two_pow_63_into_long_overflows() {
        let two_pow_63 = 9_223_372_036_854_775_808.0f64;
        let out = conv(two_pow_63, Kind::Long);
        assert_eq!(out.into_parts(), (Some(Value::Long(i64::MAX)), Status::Overflow));

        let out = conv(-two_pow_63, Kind::Long);
        assert_eq!(out.into_parts(), (Some(Value::Long(i64::MIN)), Status::Precision));

        let out = conv(18_446_744_073_709_551_616.0f64, Kind::ULong);
        assert_eq!(out.into_parts(), (Some(Value::ULong(u64::MAX)), Status::Overflow));

        let out = conv(-0.5f64, Kind::ULong);
        assert_eq!(out.into_parts(), (Some(Value::ULong(0)), Status::Underflow));

        let out = conv(-2147483648.5f64, Kind::Int);
        assert_eq!(out.into_parts(), (Some(Value::Int(i32::MIN)), Status::Underflow));
    }

    #[test]
    fn test_anything_into_long_double_is_ok() {
        assert!(conv(f64::MAX, Kind::LongDouble).is_ok());
        assert!(conv(f64::INFINITY, Kind::LongDouble).is_ok());
    }

    #[test]
    fn test_bool_conversions() {
        let out = conv(true, Kind::Int);
        assert_eq!(out.status(), Status::Signedness);
        assert_eq!(out.into_value(), Some(Value::Int(1)));

        assert!(conv(true, Kind::ULong).is_ok());

        let out = conv(1i32, Kind::Bool);
        assert_eq!(out.status(), Status::Signedness);
        assert_eq!(out.into_value(), Some(Value::Bool(true)));

        let out = conv(5u32, Kind::Bool);
        assert_eq!(out.status(), Status::Overflow);
        assert_eq!(out.into_value(), Some(Value::Bool(true)));

        let out = conv(-1i16, Kind::Bool);
        assert_eq!(out.status(), Status::Underflow);
        assert_eq!(out.into_value(), Some(Value::Bool(false)));
    }

    #[test]
    fn test_scalar_into_text_is_illegal() {
        let out = convert_scalar(
            Scalar::Signed(1),
            TypeCode::LONG,
            Kind::Text,
            &ConversionPolicy::default(),
        );
        assert_eq!(out.status(), Status::Illegal);
        assert_eq!(out.value(), None);
    }

    #[test]
    fn test_value_into_text_formats() {
        let out = conv(-1234.5678f64, Kind::Text);
        assert!(out.is_ok());
        assert_eq!(out.into_value(), Some(Value::from("-1234.5678")));
    }

    #[test]
    fn test_identity_round_trips() {
        let samples = [
            Value::Bool(true),
            Value::SChar(-7),
            Value::Short(-300),
            Value::Int(123_456),
            Value::Long(-9_000_000_000),
            Value::UChar(250),
            Value::UShort(60_000),
            Value::UInt(4_000_000_000),
            Value::ULong(u64::MAX),
            Value::Float(0.25),
            Value::Double(-1.5e-300),
            Value::LongDouble(6.02e23),
        ];
        for value in samples {
            let out = conv(value.clone(), value.kind());
            assert!(out.is_ok(), "{value:?}");
            assert_eq!(out.into_value(), Some(value));
        }
    }

    #[test]
    fn test_round_trip_preserves_value() {
        let policy = ConversionPolicy::default();
        for value in [Value::Int(-42), Value::UShort(42), Value::Float(-2.0)] {
            for kind in [Kind::Long, Kind::Double, Kind::Int] {
                let there = convert_value(&value, kind, &policy).into_value().unwrap();
                let back = convert_value(&there, value.kind(), &policy).into_value().unwrap();
                assert_eq!(back, value, "{value:?} via {kind}");
            }
        }
    }

    #[test]
    fn test_full_matrix_round_trips_small_values() {
        let policy = ConversionPolicy::default();
        for from in Kind::SCALARS {
            let one = Scalar::Unsigned(1).narrow(from).unwrap();
            for to in Kind::SCALARS {
                let there = convert_value(&one, to, &policy);
                assert!(there.status().is_value_usable(), "{from} -> {to}");
                let back = convert_value(there.value().unwrap(), from, &policy);
                assert_eq!(back.into_value(), Some(one.clone()), "{from} -> {to} -> {from}");
            }
        }
    }

    #[test]
    fn test_floating_pairs_round_trip_exactly() {
        let policy = ConversionPolicy::default();
        for from in [Kind::Float, Kind::Double, Kind::LongDouble] {
            let v = Scalar::Floating(-0.375).narrow(from).unwrap();
            for to in [Kind::Double, Kind::LongDouble] {
                let there = convert_value(&v, to, &policy);
                assert!(there.is_ok(), "{from} -> {to}");
                let back = convert_value(there.value().unwrap(), from, &policy);
                assert!(back.is_ok(), "{to} -> {from}");
                assert_eq!(back.into_value(), Some(v.clone()));
            }
        }
    }

    #[test]
    fn test_converted_helpers() {
        let c = Converted::with_status(Value::Int(3), Status::Precision);
        assert_eq!(c.clone().into_result(), Err(ConversionError::Precision));
        assert_eq!(c.clone().extract::<i32>().into_parts(), (Some(3), Status::Precision));
        assert_eq!(c.extract::<u8>().status(), Status::Unexpected);
        assert_eq!(Converted::ok(2).map(|v| v * 2).into_result(), Ok(4));
        assert_eq!(
            Converted::<i32>::unset(Status::Ok).into_result(),
            Err(ConversionError::Unexpected)
        );
    }
}
