//! # Value Box
//!
//! A holder of exactly one concrete value whose kind is fixed at
//! construction. Assignments convert INTO that kind; reads convert OUT of it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   Factory::create("i", seed)                                           │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   ValueBox { kind: Long }  ◄── assign(3.7)      → Precision, holds 3   │
//! │          │                 ◄── assign_text("0x10") → Ok, holds 16     │
//! │          │                                                              │
//! │          ├──► to::<i16>()   → PlatformSize, 16                         │
//! │          └──► string_data() → "16"                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `assign*` call stores a value before it reports an error, so a
//! caller may ignore the error and still read something sensible. Only an
//! `Illegal` conversion, an unrecognised boolean token, or null text leave
//! the box untouched.
//!
//! ## Example
//! ```rust
//! use parval_core::{ConversionError, ValueBox};
//!
//! let mut b = ValueBox::new(0i32);
//! assert_eq!(b.assign(-1.2345678e3), Err(ConversionError::Precision));
//! assert_eq!(b.string_data(), "-1234");
//! ```

use std::fmt;

use crate::codec;
use crate::config::ConversionPolicy;
use crate::convert::{convert_value, Converted};
use crate::error::ConversionResult;
use crate::type_code::{Kind, TypeCode};
use crate::value::{Primitive, Value};

// =============================================================================
// ValueBox
// =============================================================================

/// One typed parameter value. `Clone` is a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueBox {
    value: Value,
    policy: ConversionPolicy,
}

impl ValueBox {
    /// A box of the seed's own kind holding the seed.
    pub fn new(seed: impl Into<Value>) -> Self {
        ValueBox {
            value: seed.into(),
            policy: ConversionPolicy::default(),
        }
    }

    /// A box of `kind` holding zero (or empty text).
    pub fn of_kind(kind: Kind) -> Self {
        ValueBox::new(Value::zero(kind))
    }

    pub fn with_policy(mut self, policy: ConversionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    #[inline]
    pub fn code(&self) -> TypeCode {
        self.value.code()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    // -------------------------------------------------------------------------
    // Assignment (From)
    // -------------------------------------------------------------------------

    /// Converts `value` into this box's kind and stores it.
    pub fn assign(&mut self, value: impl Into<Value>) -> ConversionResult<()> {
        self.assign_value(&value.into())
    }

    pub fn assign_value(&mut self, value: &Value) -> ConversionResult<()> {
        let converted = convert_value(value, self.kind(), &self.policy);
        self.store(converted)
    }

    /// Parses `text` into this box's kind. `None` is null text.
    pub fn assign_text(&mut self, text: Option<&str>) -> ConversionResult<()> {
        let converted = codec::parse(text, self.kind(), &self.policy);
        self.store(converted)
    }

    /// Takes the value of another box, converted into this box's kind.
    pub fn assign_from(&mut self, other: &ValueBox) -> ConversionResult<()> {
        self.assign_value(&other.value)
    }

    fn store(&mut self, converted: Converted<Value>) -> ConversionResult<()> {
        let (value, status) = converted.into_parts();
        if let Some(value) = value {
            self.value = value;
        }
        status.into_result()
    }

    // -------------------------------------------------------------------------
    // Reads (To)
    // -------------------------------------------------------------------------

    /// The value converted to the Rust type `T`.
    ///
    /// ```rust
    /// use parval_core::{Status, ValueBox};
    ///
    /// let b = ValueBox::new(70_000i64);
    /// let out = b.to::<i16>();
    /// assert_eq!(out.status(), Status::Overflow);
    /// assert_eq!(out.into_value(), Some(i16::MAX));
    /// ```
    pub fn to<T: Primitive>(&self) -> Converted<T> {
        self.to_kind(T::KIND).extract()
    }

    /// The value converted to `kind`.
    ///
    /// If the conversion produced nothing but is not `Illegal` (bad boolean
    /// token, null text) the result is zero of `kind`.
    pub fn to_kind(&self, kind: Kind) -> Converted<Value> {
        let (value, status) = convert_value(&self.value, kind, &self.policy).into_parts();
        let value = match value {
            Some(value) => Some(value),
            None if status.is_value_usable() => Some(Value::zero(kind)),
            None => None,
        };
        Converted::new(value, status)
    }

    pub fn to_text(&self) -> Converted<String> {
        self.to::<String>()
    }

    /// Best-effort text; never fails.
    pub fn string_data(&self) -> String {
        self.to_text().into_value().unwrap_or_default()
    }

    /// True for text made only of whitespace. Scalars are never blank.
    pub fn is_blank(&self) -> bool {
        match &self.value {
            Value::Text(text) => codec::is_blank(text),
            _ => false,
        }
    }
}

impl From<Value> for ValueBox {
    fn from(value: Value) -> Self {
        ValueBox::new(value)
    }
}

impl fmt::Display for ValueBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_data())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
