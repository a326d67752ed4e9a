//! # Error Types
//!
//! Classification and error types for parval-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Status            - Outcome of ONE conversion attempt (incl. Ok)       │
//! │  ConversionError   - Every non-ok Status, as a typed error              │
//! │  FactoryError      - Unknown family tag / kind name                     │
//! │  ConfigError       - Policy text that does not parse                    │
//! │                                                                         │
//! │  ParvalError       - Any of the above (for callers using `?` broadly)   │
//! │                                                                         │
//! │  Flow: Status ──into_result()──► ConversionError ──► ParvalError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Usable-Value Contract
//! A conversion error is NOT the same as a missing value. Every classification
//! except [`Status::Illegal`] still leaves a clamped or best-effort value in
//! the destination. Callers that only care about the value may discard the
//! error; callers that care about fidelity inspect it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Status
// =============================================================================

/// Outcome of a single conversion or parse.
///
/// Exactly one status is produced per attempt. The numeric codes are stable
/// and match the historical parameter library (`code()`).
///
/// ## Precedence
/// ```text
/// Overflow / Underflow / StringOverflow      (strongest, clamps the value)
///          │
///          ▼
/// PlatformSize                               (overrides Signedness)
///          │
///          ▼
/// Signedness / Precision
///          │
///          ▼
/// StringInvalid                              (only replaces Ok/Signedness)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Exact, value-preserving conversion.
    #[default]
    Ok = 0,
    /// No conversion rule applies; the destination is left unchanged.
    Illegal = 1,
    /// Source above destination max; destination holds its max.
    Overflow = 2,
    /// Source below destination min; destination holds its min.
    Underflow = 3,
    /// Destination width relative to source differs between platforms.
    PlatformSize = 4,
    /// Numeric family change (integral <-> floating) may lose precision.
    Precision = 5,
    /// Source and destination disagree on signedness.
    Signedness = 6,
    /// Text magnitude beyond the parser's range.
    StringOverflow = 7,
    /// Unparsed trailing text or unknown boolean token.
    StringInvalid = 8,
    /// No text at all.
    StringNull = 9,
    /// Should not happen.
    Unexpected = 10,
}

impl Status {
    /// Every status in code order.
    pub const ALL: [Status; 11] = [
        Status::Ok,
        Status::Illegal,
        Status::Overflow,
        Status::Underflow,
        Status::PlatformSize,
        Status::Precision,
        Status::Signedness,
        Status::StringOverflow,
        Status::StringInvalid,
        Status::StringNull,
        Status::Unexpected,
    ];

    /// Stable numeric code.
    ///
    /// ```rust
    /// use parval_core::Status;
    ///
    /// assert_eq!(Status::Ok.code(), 0);
    /// assert_eq!(Status::Precision.code(), 5);
    /// assert_eq!(Status::Unexpected.code(), 10);
    /// ```
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks a status up by its numeric code.
    pub fn from_code(code: u8) -> Option<Status> {
        Status::ALL.get(usize::from(code)).copied()
    }

    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }

    /// False only for [`Status::Illegal`], the one outcome that leaves the
    /// destination untouched.
    #[inline]
    pub const fn is_value_usable(self) -> bool {
        !matches!(self, Status::Illegal)
    }

    /// Short diagnostic name (`"precision-loss"`, `"string-null"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Illegal => "illegal",
            Status::Overflow => "overflow",
            Status::Underflow => "underflow",
            Status::PlatformSize => "platform-size-ambiguous",
            Status::Precision => "precision-loss",
            Status::Signedness => "signedness-change",
            Status::StringOverflow => "string-overflow",
            Status::StringInvalid => "string-invalid",
            Status::StringNull => "string-null",
            Status::Unexpected => "unexpected",
        }
    }

    /// `Ok` becomes `Ok(())`, everything else the matching [`ConversionError`].
    ///
    /// ```rust
    /// use parval_core::{ConversionError, Status};
    ///
    /// assert!(Status::Ok.into_result().is_ok());
    /// assert_eq!(Status::Overflow.into_result(), Err(ConversionError::Overflow));
    /// ```
    pub fn into_result(self) -> ConversionResult<()> {
        match ConversionError::from_status(self) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Conversion Error
// =============================================================================

/// A non-ok conversion outcome.
///
/// ## When This Occurs
/// - Assigning a value to a [`crate::ValueBox`] of a different kind
/// - Parsing text into a box
/// - Reading a box out as another kind
///
/// In all cases but `Illegal` the box already holds a usable value by the time
/// the caller sees this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionError {
    #[error("no conversion rule applies")]
    Illegal,

    #[error("value above destination maximum (clamped to max)")]
    Overflow,

    #[error("value below destination minimum (clamped to min)")]
    Underflow,

    /// The destination may be narrower than the source on some platform.
    #[error("destination size relative to source is platform dependent")]
    PlatformSize,

    #[error("conversion may lose precision")]
    Precision,

    #[error("conversion changes signedness")]
    Signedness,

    #[error("text value out of parser range")]
    StringOverflow,

    #[error("text contains unparseable characters")]
    StringInvalid,

    #[error("text value is null")]
    StringNull,

    #[error("unexpected conversion failure")]
    Unexpected,
}

impl ConversionError {
    /// Maps a status onto its error; `None` for [`Status::Ok`].
    pub const fn from_status(status: Status) -> Option<ConversionError> {
        match status {
            Status::Ok => None,
            Status::Illegal => Some(ConversionError::Illegal),
            Status::Overflow => Some(ConversionError::Overflow),
            Status::Underflow => Some(ConversionError::Underflow),
            Status::PlatformSize => Some(ConversionError::PlatformSize),
            Status::Precision => Some(ConversionError::Precision),
            Status::Signedness => Some(ConversionError::Signedness),
            Status::StringOverflow => Some(ConversionError::StringOverflow),
            Status::StringInvalid => Some(ConversionError::StringInvalid),
            Status::StringNull => Some(ConversionError::StringNull),
            Status::Unexpected => Some(ConversionError::Unexpected),
        }
    }

    pub const fn status(&self) -> Status {
        match self {
            ConversionError::Illegal => Status::Illegal,
            ConversionError::Overflow => Status::Overflow,
            ConversionError::Underflow => Status::Underflow,
            ConversionError::PlatformSize => Status::PlatformSize,
            ConversionError::Precision => Status::Precision,
            ConversionError::Signedness => Status::Signedness,
            ConversionError::StringOverflow => Status::StringOverflow,
            ConversionError::StringInvalid => Status::StringInvalid,
            ConversionError::StringNull => Status::StringNull,
            ConversionError::Unexpected => Status::Unexpected,
        }
    }

    /// Numeric code of the underlying status.
    #[inline]
    pub const fn code(&self) -> u8 {
        self.status().code()
    }

    /// Whether the destination holds a value after this error.
    #[inline]
    pub const fn is_value_usable(&self) -> bool {
        self.status().is_value_usable()
    }
}

impl From<ConversionError> for Status {
    fn from(err: ConversionError) -> Self {
        err.status()
    }
}

// =============================================================================
// Factory Error
// =============================================================================

/// Errors building a box from a runtime-selected family or kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// No family matches the type tag.
    ///
    /// ## When This Occurs
    /// - Tag contains none of `b`, `i`, `f`, `s`, `r`
    /// - Empty tag
    #[error("invalid parameter type '{tag}'")]
    InvalidType { tag: String },

    /// A kind name (as printed by `Kind`'s `Display`) was not recognised.
    #[error("unknown value kind '{name}'")]
    UnknownKind { name: String },
}

// =============================================================================
// Config Error
// =============================================================================

/// Errors loading a [`crate::ConversionPolicy`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse policy: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize policy: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting was present but its value is not one we accept.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

// =============================================================================
// Aggregate Error
// =============================================================================

/// Any parval-core error.
#[derive(Debug, Error)]
pub enum ParvalError {
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("factory error: {0}")]
    Factory(#[from] FactoryError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result of a conversion whose value has already been stored.
pub type ConversionResult<T> = Result<T, ConversionError>;

pub type FactoryResult<T> = Result<T, FactoryError>;

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        for (i, status) in Status::ALL.iter().enumerate() {
            assert_eq!(usize::from(status.code()), i);
            assert_eq!(Status::from_code(status.code()), Some(*status));
        }
        assert_eq!(Status::from_code(11), None);
    }

    #[test]
    fn test_status_error_round_trip() {
        assert_eq!(ConversionError::from_status(Status::Ok), None);
        for status in Status::ALL.iter().skip(1) {
            let err = ConversionError::from_status(*status).unwrap();
            assert_eq!(err.status(), *status);
            assert_eq!(err.code(), status.code());
            assert_eq!(Status::from(err), *status);
        }
    }

    #[test]
    fn test_only_illegal_leaves_value_unusable() {
        for status in Status::ALL {
            assert_eq!(status.is_value_usable(), status != Status::Illegal);
        }
        assert!(!ConversionError::Illegal.is_value_usable());
        assert!(ConversionError::Overflow.is_value_usable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConversionError::Overflow.to_string(),
            "value above destination maximum (clamped to max)"
        );
        let err = FactoryError::InvalidType {
            tag: "x".to_string(),
        };
        assert_eq!(err.to_string(), "invalid parameter type 'x'");

        let err = ConfigError::InvalidValue {
            key: "negative_unsigned".to_string(),
            value: "saturate".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'saturate' for negative_unsigned"
        );
    }

    #[test]
    fn test_conversion_converts_to_parval_error() {
        let err: ParvalError = ConversionError::Precision.into();
        assert!(matches!(err, ParvalError::Conversion(ConversionError::Precision)));
    }

    #[test]
    fn test_status_display_and_serde() {
        assert_eq!(Status::PlatformSize.to_string(), "platform-size-ambiguous");
        let json = serde_json::to_string(&Status::StringNull).unwrap();
        assert_eq!(json, "\"string_null\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::StringNull);
    }
}
