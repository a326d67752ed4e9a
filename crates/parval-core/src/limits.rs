//! # Limits
//!
//! Immutable per-kind facts the conversion engine is parameterized by.
//!
//! ## Fixed Widths
//! ```text
//! ┌──────────────────┬───────┬──────────┬──────────────────────────────────┐
//! │ kind             │ bytes │ digits10 │ min .. max                       │
//! ├──────────────────┼───────┼──────────┼──────────────────────────────────┤
//! │ bool             │   1   │    0     │ 0 .. 1                           │
//! │ char             │   1   │    2     │ per CHAR_IS_SIGNED               │
//! │ signed char      │   1   │    2     │ -128 .. 127                      │
//! │ short / ushort   │   2   │    4     │ i16 / u16                        │
//! │ int / uint       │   4   │    9     │ i32 / u32                        │
//! │ long / ulong     │   8   │  18/19   │ i64 / u64                        │
//! │ float            │   4   │    6     │ -f32::MAX .. f32::MAX            │
//! │ double           │   8   │   15     │ -f64::MAX .. f64::MAX            │
//! │ long double      │  16   │   15     │ -f64::MAX .. f64::MAX            │
//! └──────────────────┴───────┴──────────┴──────────────────────────────────┘
//! ```
//!
//! Floating `min` is `-max`, NOT the smallest positive value, so range checks
//! are symmetric.
//!
//! Tables are plain statics: safe to read from any thread without locking.

use std::ffi::c_char;

use crate::type_code::{Kind, TypeCode};
use crate::value::{Scalar, Value};

/// Whether the target's plain `char` is signed.
pub const CHAR_IS_SIGNED: bool = c_char::MIN != 0;

const CHAR_MIN: Scalar = if CHAR_IS_SIGNED {
    Scalar::Signed(i8::MIN as i64)
} else {
    Scalar::Unsigned(0)
};

const CHAR_MAX: Scalar = if CHAR_IS_SIGNED {
    Scalar::Signed(i8::MAX as i64)
} else {
    Scalar::Unsigned(u8::MAX as u64)
};

// =============================================================================
// Limits
// =============================================================================

/// Immutable descriptor of one scalar kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    kind: Kind,
    width: usize,
    digits10: u32,
    epsilon: f64,
    is_integer: bool,
    is_signed: bool,
    min: Scalar,
    max: Scalar,
}

const fn integral(
    kind: Kind,
    width: usize,
    digits10: u32,
    is_signed: bool,
    min: Scalar,
    max: Scalar,
) -> Limits {
    Limits {
        kind,
        width,
        digits10,
        epsilon: 0.0,
        is_integer: true,
        is_signed,
        min,
        max,
    }
}

const fn signed(kind: Kind, width: usize, digits10: u32, min: i64, max: i64) -> Limits {
    integral(kind, width, digits10, true, Scalar::Signed(min), Scalar::Signed(max))
}

const fn unsigned(kind: Kind, width: usize, digits10: u32, max: u64) -> Limits {
    integral(kind, width, digits10, false, Scalar::Unsigned(0), Scalar::Unsigned(max))
}

const fn floating(kind: Kind, width: usize, digits10: u32, epsilon: f64, max: f64) -> Limits {
    Limits {
        kind,
        width,
        digits10,
        epsilon,
        is_integer: false,
        is_signed: true,
        min: Scalar::Floating(-max),
        max: Scalar::Floating(max),
    }
}

/// Indexed by `Kind::index()`; text is the last kind and has no entry.
static TABLE: [Limits; 13] = [
    integral(Kind::Bool, 1, 0, false, Scalar::Unsigned(0), Scalar::Unsigned(1)),
    integral(Kind::Char, 1, 2, CHAR_IS_SIGNED, CHAR_MIN, CHAR_MAX),
    signed(Kind::SChar, 1, 2, i8::MIN as i64, i8::MAX as i64),
    signed(Kind::Short, 2, 4, i16::MIN as i64, i16::MAX as i64),
    signed(Kind::Int, 4, 9, i32::MIN as i64, i32::MAX as i64),
    signed(Kind::Long, 8, 18, i64::MIN, i64::MAX),
    unsigned(Kind::UChar, 1, 2, u8::MAX as u64),
    unsigned(Kind::UShort, 2, 4, u16::MAX as u64),
    unsigned(Kind::UInt, 4, 9, u32::MAX as u64),
    unsigned(Kind::ULong, 8, 19, u64::MAX),
    floating(Kind::Float, 4, 6, f32::EPSILON as f64, f32::MAX as f64),
    floating(Kind::Double, 8, 15, f64::EPSILON, f64::MAX),
    floating(Kind::LongDouble, 16, 15, f64::EPSILON, f64::MAX),
];

impl Limits {
    /// Descriptor for `kind`; `None` for text.
    ///
    /// ```rust
    /// use parval_core::{Kind, Limits};
    ///
    /// let int = Limits::of(Kind::Int).unwrap();
    /// assert_eq!(int.digits10(), 9);
    /// assert!(Limits::of(Kind::Text).is_none());
    /// ```
    pub fn of(kind: Kind) -> Option<&'static Limits> {
        TABLE.get(kind.index())
    }

    /// Byte width of a concrete code; `None` for text and partial codes.
    pub fn width_of(code: TypeCode) -> Option<usize> {
        Kind::from_code(code).and_then(Limits::of).map(|l| l.width)
    }

    #[inline]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub const fn code(&self) -> TypeCode {
        self.kind.code()
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Decimal digits representable without change.
    #[inline]
    pub const fn digits10(&self) -> u32 {
        self.digits10
    }

    /// Machine epsilon; zero for integral kinds.
    #[inline]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub const fn is_integer(&self) -> bool {
        self.is_integer
    }

    #[inline]
    pub const fn is_signed(&self) -> bool {
        self.is_signed
    }

    #[inline]
    pub const fn min(&self) -> Scalar {
        self.min
    }

    #[inline]
    pub const fn max(&self) -> Scalar {
        self.max
    }

    /// `min` as a value of this kind.
    pub fn min_value(&self) -> Value {
        self.min
            .narrow(self.kind)
            .unwrap_or_else(|| Value::zero(self.kind))
    }

    /// `max` as a value of this kind.
    pub fn max_value(&self) -> Value {
        self.max
            .narrow(self.kind)
            .unwrap_or_else(|| Value::zero(self.kind))
    }

    /// Strict byte-width comparison against `code`.
    ///
    /// `bool` is smaller than every other kind regardless of width.
    /// Unknown or text codes compare as not smaller.
    pub fn is_smaller_than(&self, code: TypeCode) -> bool {
        if self.kind == Kind::Bool {
            return code != TypeCode::BOOL;
        }
        match Limits::width_of(code) {
            Some(width) => self.width < width,
            None => false,
        }
    }

    /// Whether this kind might be narrower than `code` on some platform even
    /// if it is not here.
    ///
    /// Only the char/short/int families answer yes, and only against an
    /// integral code whose width is not guaranteed to be no larger:
    /// ```text
    /// char  vs short/int/long
    /// short vs int/long
    /// int   vs long
    /// ```
    pub fn maybe_smaller_than(&self, code: TypeCode) -> bool {
        if !code.is_integral() {
            return false;
        }
        match self.kind {
            Kind::Char | Kind::SChar | Kind::UChar => !code.intersects(TypeCode::CHAR_TYPE),
            Kind::Short | Kind::UShort => {
                code.intersects(TypeCode::INT_TYPE | TypeCode::LONG_TYPE)
            }
            Kind::Int | Kind::UInt => code.intersects(TypeCode::LONG_TYPE),
            _ => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(kind: Kind) -> &'static Limits {
        Limits::of(kind).unwrap()
    }

    #[test]
    fn test_table_is_indexed_by_kind() {
        for kind in Kind::SCALARS {
            assert_eq!(limits(kind).kind(), kind);
        }
    }

    #[test]
    fn test_table_reads_from_many_threads() {
        std::thread::scope(|s| {
            for kind in Kind::SCALARS {
                s.spawn(move || assert_eq!(limits(kind).kind(), kind));
            }
        });
    }

    #[test]
    fn test_bool_is_smaller_than_everything_else() {
        let b = limits(Kind::Bool);
        for kind in Kind::ALL {
            assert_eq!(b.is_smaller_than(kind.code()), kind != Kind::Bool, "{kind}");
        }
    }

    #[test]
    fn test_is_smaller_than_by_width() {
        assert!(limits(Kind::Int).is_smaller_than(TypeCode::LONG));
        assert!(limits(Kind::Int).is_smaller_than(TypeCode::ULONG));
        assert!(!limits(Kind::Int).is_smaller_than(TypeCode::UINT));
        assert!(!limits(Kind::Long).is_smaller_than(TypeCode::INT));
        assert!(limits(Kind::Float).is_smaller_than(TypeCode::DOUBLE));
        assert!(limits(Kind::Double).is_smaller_than(TypeCode::LONG_DOUBLE));
        assert!(!limits(Kind::Short).is_smaller_than(TypeCode::TEXT));
        assert!(!limits(Kind::UChar).is_smaller_than(TypeCode::BOOL));
    }

    #[test]
    fn test_maybe_smaller_than() {
        assert!(limits(Kind::Short).maybe_smaller_than(TypeCode::INT));
        assert!(limits(Kind::UShort).maybe_smaller_than(TypeCode::ULONG));
        assert!(limits(Kind::Int).maybe_smaller_than(TypeCode::LONG));
        assert!(!limits(Kind::Int).maybe_smaller_than(TypeCode::SHORT));
        assert!(limits(Kind::SChar).maybe_smaller_than(TypeCode::SHORT));
        assert!(!limits(Kind::UChar).maybe_smaller_than(TypeCode::CHAR));
        assert!(!limits(Kind::UChar).maybe_smaller_than(TypeCode::BOOL));
        assert!(!limits(Kind::Long).maybe_smaller_than(TypeCode::ULONG));
    }

    #[test]
    fn test_maybe_smaller_than_ignores_non_integral() {
        for kind in Kind::SCALARS {
            let l = limits(kind);
            assert!(!l.maybe_smaller_than(TypeCode::DOUBLE), "{kind}");
            assert!(!l.maybe_smaller_than(TypeCode::FLOAT), "{kind}");
            assert!(!l.maybe_smaller_than(TypeCode::TEXT), "{kind}");
        }
        for code in [TypeCode::CHAR, TypeCode::INT, TypeCode::ULONG] {
            assert!(!limits(Kind::Bool).maybe_smaller_than(code));
            assert!(!limits(Kind::Double).maybe_smaller_than(code));
        }
    }

    #[test]
    fn test_floating_min_is_negative_max() {
        let f = limits(Kind::Float);
        assert_eq!(f.min(), Scalar::Floating(-(f32::MAX as f64)));
        assert_eq!(f.max_value(), Value::Float(f32::MAX));
        assert_eq!(limits(Kind::LongDouble).min_value(), Value::LongDouble(-f64::MAX));
    }

    #[test]
    fn test_digits_and_epsilon() {
        assert_eq!(limits(Kind::Float).digits10(), 6);
        assert_eq!(limits(Kind::Double).digits10(), 15);
        assert_eq!(limits(Kind::LongDouble).digits10(), 15);
        assert_eq!(limits(Kind::ULong).digits10(), 19);
        assert_eq!(limits(Kind::Int).epsilon(), 0.0);
        assert_eq!(limits(Kind::Double).epsilon(), f64::EPSILON);
    }

    #[test]
    fn test_integral_bounds() {
        assert_eq!(limits(Kind::Int).max_value(), Value::Int(i32::MAX));
        assert_eq!(limits(Kind::UShort).min_value(), Value::UShort(0));
        assert_eq!(limits(Kind::Bool).max_value(), Value::Bool(true));
        assert_eq!(limits(Kind::Char).is_signed(), CHAR_IS_SIGNED);
    }
}
