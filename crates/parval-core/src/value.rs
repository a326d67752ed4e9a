//! # Values
//!
//! The closed set of concrete values a [`crate::ValueBox`] can hold, and the
//! widened form the conversion engine works on.
//!
//! ## Widening
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Value (14 kinds)              Scalar (3 working forms)                 │
//! │  ─────────────────             ───────────────────────                  │
//! │  SChar Short Int Long   ──►    Signed(i64)                              │
//! │  Bool UChar ... ULong   ──►    Unsigned(u64)                            │
//! │  Char                   ──►    Signed or Unsigned (per target)          │
//! │  Float Double LongDouble ─►    Floating(f64)                            │
//! │  Text                   ──►    (parsed by the codec instead)            │
//! │                                                                         │
//! │  narrow(kind) goes back the other way with plain `as` casts.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use parval_core::{Kind, Value};
//!
//! let v = Value::from(-5i16);
//! assert_eq!(v.kind(), Kind::Short);
//! assert_eq!(Value::from("hello").kind(), Kind::Text);
//! ```

use serde::{Deserialize, Serialize};
use std::ffi::c_char;

use crate::limits::CHAR_IS_SIGNED;
use crate::type_code::{Kind, TypeCode};

// =============================================================================
// Value
// =============================================================================

/// One concrete value.
///
/// `Char` is the target's plain `char` (`c_char`), `LongDouble` is stored as
/// `f64` with double limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Char(c_char),
    SChar(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    UChar(u8),
    UShort(u16),
    UInt(u32),
    ULong(u64),
    Float(f32),
    Double(f64),
    LongDouble(f64),
    Text(String),
}

impl Value {
    /// Zero (or empty text) of the given kind.
    pub fn zero(kind: Kind) -> Value {
        match kind {
            Kind::Bool => Value::Bool(false),
            Kind::Char => Value::Char(0),
            Kind::SChar => Value::SChar(0),
            Kind::Short => Value::Short(0),
            Kind::Int => Value::Int(0),
            Kind::Long => Value::Long(0),
            Kind::UChar => Value::UChar(0),
            Kind::UShort => Value::UShort(0),
            Kind::UInt => Value::UInt(0),
            Kind::ULong => Value::ULong(0),
            Kind::Float => Value::Float(0.0),
            Kind::Double => Value::Double(0.0),
            Kind::LongDouble => Value::LongDouble(0.0),
            Kind::Text => Value::Text(String::new()),
        }
    }

    pub const fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Char(_) => Kind::Char,
            Value::SChar(_) => Kind::SChar,
            Value::Short(_) => Kind::Short,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::UChar(_) => Kind::UChar,
            Value::UShort(_) => Kind::UShort,
            Value::UInt(_) => Kind::UInt,
            Value::ULong(_) => Kind::ULong,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::LongDouble(_) => Kind::LongDouble,
            Value::Text(_) => Kind::Text,
        }
    }

    #[inline]
    pub const fn code(&self) -> TypeCode {
        self.kind().code()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The working form of a scalar; `None` for text.
    pub fn widen(&self) -> Option<Scalar> {
        let scalar = match *self {
            Value::Bool(v) => Scalar::Unsigned(u64::from(v)),
            Value::Char(v) => {
                if CHAR_IS_SIGNED {
                    Scalar::Signed(v as i64)
                } else {
                    Scalar::Unsigned(v as u64)
                }
            }
            Value::SChar(v) => Scalar::Signed(i64::from(v)),
            Value::Short(v) => Scalar::Signed(i64::from(v)),
            Value::Int(v) => Scalar::Signed(i64::from(v)),
            Value::Long(v) => Scalar::Signed(v),
            Value::UChar(v) => Scalar::Unsigned(u64::from(v)),
            Value::UShort(v) => Scalar::Unsigned(u64::from(v)),
            Value::UInt(v) => Scalar::Unsigned(u64::from(v)),
            Value::ULong(v) => Scalar::Unsigned(v),
            Value::Float(v) => Scalar::Floating(f64::from(v)),
            Value::Double(v) | Value::LongDouble(v) => Scalar::Floating(v),
            Value::Text(_) => return None,
        };
        Some(scalar)
    }
}

// =============================================================================
// Scalar
// =============================================================================

/// Widened scalar: every integral source is carried as 64-bit signed or
/// unsigned, every floating source as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    Signed(i64),
    Unsigned(u64),
    Floating(f64),
}

/// Plain `as` cast from any scalar form.
macro_rules! cast {
    ($scalar:expr, $t:ty) => {
        match $scalar {
            Scalar::Signed(v) => v as $t,
            Scalar::Unsigned(v) => v as $t,
            Scalar::Floating(v) => v as $t,
        }
    };
}

impl Scalar {
    pub fn as_f64(self) -> f64 {
        cast!(self, f64)
    }

    /// Converts to `kind` with C cast semantics (truncation toward zero,
    /// two's-complement wrap). Range checks are the caller's business.
    ///
    /// Two deviations from a raw cast keep the result usable: booleans are
    /// `!= 0`, and a finite value that rounds past `f32::MAX` stays finite.
    /// Returns `None` for text.
    pub fn narrow(self, kind: Kind) -> Option<Value> {
        let value = match kind {
            Kind::Bool => Value::Bool(match self {
                Scalar::Signed(v) => v != 0,
                Scalar::Unsigned(v) => v != 0,
                Scalar::Floating(v) => v != 0.0,
            }),
            Kind::Char => Value::Char(cast!(self, c_char)),
            Kind::SChar => Value::SChar(cast!(self, i8)),
            Kind::Short => Value::Short(cast!(self, i16)),
            Kind::Int => Value::Int(cast!(self, i32)),
            Kind::Long => Value::Long(cast!(self, i64)),
            Kind::UChar => Value::UChar(cast!(self, u8)),
            Kind::UShort => Value::UShort(cast!(self, u16)),
            Kind::UInt => Value::UInt(cast!(self, u32)),
            Kind::ULong => Value::ULong(cast!(self, u64)),
            Kind::Float => {
                let wide = self.as_f64();
                let narrow = wide as f32;
                if narrow.is_infinite() && wide.is_finite() {
                    Value::Float(f32::MAX.copysign(narrow))
                } else {
                    Value::Float(narrow)
                }
            }
            Kind::Double => Value::Double(self.as_f64()),
            Kind::LongDouble => Value::LongDouble(self.as_f64()),
            Kind::Text => return None,
        };
        Some(value)
    }
}

// =============================================================================
// Primitive
// =============================================================================

/// Plain `char` of the target (signed or unsigned, see
/// [`crate::limits::CHAR_IS_SIGNED`]).
///
/// A newtype because `c_char` is an alias of `i8` or `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlainChar(pub c_char);

/// Extended-precision float. Stored as `f64`, limits of `double`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LongDouble(pub f64);

/// A Rust type that maps onto exactly one [`Kind`].
pub trait Primitive: Sized {
    const KIND: Kind;

    /// Extracts `Self` if `value` is of kind [`Self::KIND`].
    fn from_value(value: &Value) -> Option<Self>;

    fn into_value(self) -> Value;
}

/// The type code of `T`, bound at compile time.
///
/// ```rust
/// use parval_core::{classify, TypeCode};
///
/// assert_eq!(classify::<u16>(), TypeCode::USHORT);
/// assert_eq!(classify::<String>(), TypeCode::TEXT);
/// ```
pub const fn classify<T: Primitive>() -> TypeCode {
    T::KIND.code()
}

macro_rules! primitive {
    ($t:ty, $variant:ident) => {
        impl Primitive for $t {
            const KIND: Kind = Kind::$variant;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v)
            }
        }
    };
}

primitive!(bool, Bool);
primitive!(i8, SChar);
primitive!(i16, Short);
primitive!(i32, Int);
primitive!(i64, Long);
primitive!(u8, UChar);
primitive!(u16, UShort);
primitive!(u32, UInt);
primitive!(u64, ULong);
primitive!(f32, Float);
primitive!(f64, Double);

impl Primitive for PlainChar {
    const KIND: Kind = Kind::Char;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(v) => Some(PlainChar(*v)),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Char(self.0)
    }
}

impl From<PlainChar> for Value {
    fn from(v: PlainChar) -> Self {
        Value::Char(v.0)
    }
}

impl Primitive for LongDouble {
    const KIND: Kind = Kind::LongDouble;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::LongDouble(v) => Some(LongDouble(*v)),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::LongDouble(self.0)
    }
}

impl From<LongDouble> for Value {
    fn from(v: LongDouble) -> Self {
        Value::LongDouble(v.0)
    }
}

impl Primitive for String {
    const KIND: Kind = Kind::Text;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_has_requested_kind() {
        for kind in Kind::ALL {
            assert_eq!(Value::zero(kind).kind(), kind);
        }
    }

    #[test]
    fn test_widen() {
        assert_eq!(Value::Bool(true).widen(), Some(Scalar::Unsigned(1)));
        assert_eq!(Value::Short(-3).widen(), Some(Scalar::Signed(-3)));
        assert_eq!(Value::ULong(u64::MAX).widen(), Some(Scalar::Unsigned(u64::MAX)));
        assert_eq!(Value::Float(0.5).widen(), Some(Scalar::Floating(0.5)));
        assert_eq!(Value::from("x").widen(), None);
    }

    #[test]
    fn test_narrow_is_c_cast() {
        assert_eq!(Scalar::Signed(-1).narrow(Kind::UChar), Some(Value::UChar(255)));
        assert_eq!(Scalar::Signed(70000).narrow(Kind::Short), Some(Value::Short(4464)));
        assert_eq!(Scalar::Floating(-1234.5678).narrow(Kind::Int), Some(Value::Int(-1234)));
        assert_eq!(Scalar::Unsigned(2).narrow(Kind::Bool), Some(Value::Bool(true)));
        assert_eq!(Scalar::Signed(1).narrow(Kind::Text), None);
    }

    #[test]
    fn test_narrow_float_stays_finite() {
        let just_over = f64::from(f32::MAX) * (1.0 + 1e-7);
        assert_eq!(
            Scalar::Floating(just_over).narrow(Kind::Float),
            Some(Value::Float(f32::MAX))
        );
        assert_eq!(
            Scalar::Floating(-just_over).narrow(Kind::Float),
            Some(Value::Float(-f32::MAX))
        );
        assert_eq!(
            Scalar::Floating(f64::INFINITY).narrow(Kind::Float),
            Some(Value::Float(f32::INFINITY))
        );
    }

    #[test]
    fn test_primitive_extraction() {
        assert_eq!(i32::from_value(&Value::Int(7)), Some(7));
        assert_eq!(i32::from_value(&Value::Long(7)), None);
        assert_eq!(String::from_value(&Value::from("abc")), Some("abc".to_string()));
        assert_eq!(LongDouble::from_value(&Value::LongDouble(1.5)), Some(LongDouble(1.5)));
        assert_eq!(PlainChar(65).into_value(), Value::Char(65));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify::<bool>(), TypeCode::BOOL);
        assert_eq!(classify::<PlainChar>(), TypeCode::CHAR);
        assert_eq!(classify::<i8>(), TypeCode::SCHAR);
        assert_eq!(classify::<f32>(), TypeCode::FLOAT);
        assert_eq!(classify::<LongDouble>(), TypeCode::LONG_DOUBLE);
    }

    #[test]
    fn test_value_serde() {
        let json = serde_json::to_string(&Value::Int(-4)).unwrap();
        assert_eq!(json, r#"{"kind":"int","value":-4}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Int(-4));
    }
}
