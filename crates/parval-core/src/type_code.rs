//! # Type Codes
//!
//! Bitmask classification of every concrete primitive a box can hold.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bit:   9     8     7    6     5     4    3    2     1     0            │
//! │       TEXT  EXT   FP   UNS   SGN  LONG INT SHORT CHAR BOOL              │
//! │                                                                         │
//! │  bool          = BOOL | UNS          float       = FP | SHORT           │
//! │  char          = CHAR                double      = FP | LONG            │
//! │  signed char   = CHAR | SGN          long double = FP | EXT             │
//! │  short         = SHORT | SGN         text        = CHAR | TEXT          │
//! │  unsigned long = LONG | UNS          ... and so on                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Family membership is a bitwise AND:
//!
//! ```rust
//! use parval_core::TypeCode;
//!
//! assert!(TypeCode::UINT.intersects(TypeCode::INT_TYPE));
//! assert!(TypeCode::DOUBLE.is_floating());
//! assert!(!TypeCode::CHAR.is_signed()); // plain char carries no sign bit
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

use crate::error::FactoryError;

// =============================================================================
// TypeCode
// =============================================================================

/// Immutable bitmask identifying a primitive's family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCode(u16);

impl TypeCode {
    // -------------------------------------------------------------------------
    // Family bits
    // -------------------------------------------------------------------------
    pub const UNKNOWN: TypeCode = TypeCode(0);
    pub const BOOL_TYPE: TypeCode = TypeCode(1 << 0);
    pub const CHAR_TYPE: TypeCode = TypeCode(1 << 1);
    pub const SHORT_TYPE: TypeCode = TypeCode(1 << 2);
    pub const INT_TYPE: TypeCode = TypeCode(1 << 3);
    pub const LONG_TYPE: TypeCode = TypeCode(1 << 4);
    pub const SIGNED_TYPE: TypeCode = TypeCode(1 << 5);
    pub const UNSIGNED_TYPE: TypeCode = TypeCode(1 << 6);
    pub const FP_TYPE: TypeCode = TypeCode(1 << 7);
    pub const EXTENDED_TYPE: TypeCode = TypeCode(1 << 8);
    pub const TEXT_TYPE: TypeCode = TypeCode(1 << 9);

    /// char/short/int/long, the families the platform-size rule looks at.
    pub const INTEGRAL_FAMILY: TypeCode =
        TypeCode(Self::CHAR_TYPE.0 | Self::SHORT_TYPE.0 | Self::INT_TYPE.0 | Self::LONG_TYPE.0);

    // -------------------------------------------------------------------------
    // Concrete types
    // -------------------------------------------------------------------------
    pub const BOOL: TypeCode = TypeCode(Self::BOOL_TYPE.0 | Self::UNSIGNED_TYPE.0);
    pub const CHAR: TypeCode = Self::CHAR_TYPE;
    pub const SCHAR: TypeCode = TypeCode(Self::CHAR_TYPE.0 | Self::SIGNED_TYPE.0);
    pub const SHORT: TypeCode = TypeCode(Self::SHORT_TYPE.0 | Self::SIGNED_TYPE.0);
    pub const INT: TypeCode = TypeCode(Self::INT_TYPE.0 | Self::SIGNED_TYPE.0);
    pub const LONG: TypeCode = TypeCode(Self::LONG_TYPE.0 | Self::SIGNED_TYPE.0);
    pub const UCHAR: TypeCode = TypeCode(Self::CHAR_TYPE.0 | Self::UNSIGNED_TYPE.0);
    pub const USHORT: TypeCode = TypeCode(Self::SHORT_TYPE.0 | Self::UNSIGNED_TYPE.0);
    pub const UINT: TypeCode = TypeCode(Self::INT_TYPE.0 | Self::UNSIGNED_TYPE.0);
    pub const ULONG: TypeCode = TypeCode(Self::LONG_TYPE.0 | Self::UNSIGNED_TYPE.0);
    pub const FLOAT: TypeCode = TypeCode(Self::FP_TYPE.0 | Self::SHORT_TYPE.0);
    pub const DOUBLE: TypeCode = TypeCode(Self::FP_TYPE.0 | Self::LONG_TYPE.0);
    pub const LONG_DOUBLE: TypeCode = TypeCode(Self::FP_TYPE.0 | Self::EXTENDED_TYPE.0);
    pub const TEXT: TypeCode = TypeCode(Self::CHAR_TYPE.0 | Self::TEXT_TYPE.0);

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        TypeCode(bits)
    }

    /// True if every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: TypeCode) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set in `self`.
    #[inline]
    pub const fn intersects(self, other: TypeCode) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_bool(self) -> bool {
        self.intersects(Self::BOOL_TYPE)
    }

    #[inline]
    pub const fn is_floating(self) -> bool {
        self.intersects(Self::FP_TYPE)
    }

    #[inline]
    pub const fn is_text(self) -> bool {
        self.intersects(Self::TEXT_TYPE)
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        self.intersects(Self::SIGNED_TYPE)
    }

    #[inline]
    pub const fn is_unsigned(self) -> bool {
        self.intersects(Self::UNSIGNED_TYPE)
    }

    /// char/short/int/long of either sign. Floating and text codes share
    /// width bits but are excluded.
    #[inline]
    pub const fn is_integral(self) -> bool {
        self.intersects(Self::INTEGRAL_FAMILY) && !self.is_floating() && !self.is_text()
    }
}

impl BitOr for TypeCode {
    type Output = TypeCode;

    fn bitor(self, rhs: TypeCode) -> TypeCode {
        TypeCode(self.0 | rhs.0)
    }
}

impl BitAnd for TypeCode {
    type Output = TypeCode;

    fn bitand(self, rhs: TypeCode) -> TypeCode {
        TypeCode(self.0 & rhs.0)
    }
}

impl fmt::Display for TypeCode {
    /// Family names joined by `|`, e.g. `int|signed`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(TypeCode, &str); 10] = [
            (TypeCode::BOOL_TYPE, "bool"),
            (TypeCode::CHAR_TYPE, "char"),
            (TypeCode::SHORT_TYPE, "short"),
            (TypeCode::INT_TYPE, "int"),
            (TypeCode::LONG_TYPE, "long"),
            (TypeCode::SIGNED_TYPE, "signed"),
            (TypeCode::UNSIGNED_TYPE, "unsigned"),
            (TypeCode::FP_TYPE, "fp"),
            (TypeCode::EXTENDED_TYPE, "extended"),
            (TypeCode::TEXT_TYPE, "text"),
        ];

        if self.0 == 0 {
            return f.write_str("unknown");
        }
        let mut first = true;
        for (bit, name) in NAMES {
            if self.intersects(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Kind
// =============================================================================

/// The closed set of concrete kinds a box can hold.
///
/// Thirteen scalars plus text. A box's kind is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Bool,
    Char,
    SChar,
    Short,
    Int,
    Long,
    UChar,
    UShort,
    UInt,
    ULong,
    Float,
    Double,
    LongDouble,
    Text,
}

impl Kind {
    pub const ALL: [Kind; 14] = [
        Kind::Bool,
        Kind::Char,
        Kind::SChar,
        Kind::Short,
        Kind::Int,
        Kind::Long,
        Kind::UChar,
        Kind::UShort,
        Kind::UInt,
        Kind::ULong,
        Kind::Float,
        Kind::Double,
        Kind::LongDouble,
        Kind::Text,
    ];

    /// Every kind except text.
    pub const SCALARS: [Kind; 13] = [
        Kind::Bool,
        Kind::Char,
        Kind::SChar,
        Kind::Short,
        Kind::Int,
        Kind::Long,
        Kind::UChar,
        Kind::UShort,
        Kind::UInt,
        Kind::ULong,
        Kind::Float,
        Kind::Double,
        Kind::LongDouble,
    ];

    pub const fn code(self) -> TypeCode {
        match self {
            Kind::Bool => TypeCode::BOOL,
            Kind::Char => TypeCode::CHAR,
            Kind::SChar => TypeCode::SCHAR,
            Kind::Short => TypeCode::SHORT,
            Kind::Int => TypeCode::INT,
            Kind::Long => TypeCode::LONG,
            Kind::UChar => TypeCode::UCHAR,
            Kind::UShort => TypeCode::USHORT,
            Kind::UInt => TypeCode::UINT,
            Kind::ULong => TypeCode::ULONG,
            Kind::Float => TypeCode::FLOAT,
            Kind::Double => TypeCode::DOUBLE,
            Kind::LongDouble => TypeCode::LONG_DOUBLE,
            Kind::Text => TypeCode::TEXT,
        }
    }

    /// Reverse of [`Kind::code`]; only exact concrete codes match.
    pub fn from_code(code: TypeCode) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Position in [`Kind::ALL`].
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Char => "char",
            Kind::SChar => "signed char",
            Kind::Short => "short",
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::UChar => "unsigned char",
            Kind::UShort => "unsigned short",
            Kind::UInt => "unsigned int",
            Kind::ULong => "unsigned long",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::LongDouble => "long double",
            Kind::Text => "text",
        }
    }

    #[inline]
    pub const fn is_text(self) -> bool {
        matches!(self, Kind::Text)
    }

    #[inline]
    pub const fn is_floating(self) -> bool {
        matches!(self, Kind::Float | Kind::Double | Kind::LongDouble)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "bool" | "boolean" => Ok(Kind::Bool),
            "char" => Ok(Kind::Char),
            "signed char" | "schar" => Ok(Kind::SChar),
            "short" => Ok(Kind::Short),
            "int" => Ok(Kind::Int),
            "long" => Ok(Kind::Long),
            "unsigned char" | "uchar" => Ok(Kind::UChar),
            "unsigned short" | "ushort" => Ok(Kind::UShort),
            "unsigned int" | "uint" => Ok(Kind::UInt),
            "unsigned long" | "ulong" => Ok(Kind::ULong),
            "float" => Ok(Kind::Float),
            "double" => Ok(Kind::Double),
            "long double" | "longdouble" => Ok(Kind::LongDouble),
            "text" | "string" => Ok(Kind::Text),
            _ => Err(FactoryError::UnknownKind {
                name: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_codes() {
        assert_eq!(TypeCode::BOOL.bits(), 0b100_0001);
        assert_eq!(TypeCode::INT, TypeCode::INT_TYPE | TypeCode::SIGNED_TYPE);
        assert_eq!(TypeCode::FLOAT, TypeCode::FP_TYPE | TypeCode::SHORT_TYPE);
        assert_eq!(TypeCode::CHAR & TypeCode::SIGNED_TYPE, TypeCode::UNKNOWN);
    }

    #[test]
    fn test_family_predicates() {
        assert!(TypeCode::BOOL.is_bool());
        assert!(TypeCode::BOOL.is_unsigned());
        assert!(!TypeCode::BOOL.is_integral());
        assert!(TypeCode::UCHAR.is_integral());
        assert!(!TypeCode::FLOAT.is_integral());
        assert!(!TypeCode::TEXT.is_integral());
        assert!(TypeCode::TEXT.is_text());
        assert!(TypeCode::LONG_DOUBLE.is_floating());
        assert!(TypeCode::LONG.contains(TypeCode::LONG_TYPE | TypeCode::SIGNED_TYPE));
    }

    #[test]
    fn test_codes_are_distinct() {
        for a in Kind::ALL {
            for b in Kind::ALL {
                assert_eq!(a == b, a.code() == b.code(), "{a} vs {b}");
            }
            assert_eq!(Kind::from_code(a.code()), Some(a));
        }
        assert_eq!(Kind::from_code(TypeCode::FP_TYPE), None);
    }

    #[test]
    fn test_type_code_display() {
        assert_eq!(TypeCode::INT.to_string(), "int|signed");
        assert_eq!(TypeCode::UNKNOWN.to_string(), "unknown");
        assert_eq!(TypeCode::TEXT.to_string(), "char|text");
    }

    #[test]
    fn test_kind_from_str() {
        for kind in Kind::ALL {
            assert_eq!(kind.to_string().parse::<Kind>().unwrap(), kind);
        }
        assert_eq!("Unsigned_Long".parse::<Kind>().unwrap(), Kind::ULong);
        assert_eq!("string".parse::<Kind>().unwrap(), Kind::Text);
        assert!(matches!(
            "quad".parse::<Kind>(),
            Err(FactoryError::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_kind_index_matches_all() {
        for (i, kind) in Kind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
