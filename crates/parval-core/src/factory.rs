//! # Factory
//!
//! Builds boxes whose kind is selected at runtime, either from a parameter
//! type tag or from a seed value.
//!
//! ## Tag Resolution
//! ```text
//! tag contains ...        family     kind
//! ─────────────────       ──────     ────────────
//! "b"                 ──► Bool       bool
//! "i"                 ──► Int        long
//! "f" or "s"          ──► Text       text
//! "r"                 ──► Real       double
//! none of the above   ──► FactoryError::InvalidType
//! ```
//!
//! Order matters: `"fr"` (a readable file name) must resolve to text, not to
//! a real number, so `f` is tested before `r`.
//!
//! ```rust
//! use parval_core::{Factory, Family, Kind};
//!
//! assert_eq!(Family::from_tag("fr").unwrap(), Family::Text);
//!
//! let b = Factory::new().create_strict("i", 7i32).unwrap();
//! assert_eq!(b.kind(), Kind::Long);
//! assert_eq!(b.string_data(), "7");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::config::ConversionPolicy;
use crate::convert::Converted;
use crate::error::{FactoryError, FactoryResult, ParvalError, Status};
use crate::type_code::Kind;
use crate::value::Value;
use crate::value_box::ValueBox;

// =============================================================================
// Family
// =============================================================================

/// The parameter families a type tag can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Bool,
    Int,
    Text,
    Real,
}

impl Family {
    /// Resolves a parameter type tag by substring, in the order b, i, f/s, r.
    pub fn from_tag(tag: &str) -> FactoryResult<Family> {
        if tag.contains('b') {
            Ok(Family::Bool)
        } else if tag.contains('i') {
            Ok(Family::Int)
        } else if tag.contains('f') || tag.contains('s') {
            Ok(Family::Text)
        } else if tag.contains('r') {
            Ok(Family::Real)
        } else {
            Err(FactoryError::InvalidType {
                tag: tag.to_string(),
            })
        }
    }

    /// Concrete kind a box of this family holds.
    pub const fn kind(self) -> Kind {
        match self {
            Family::Bool => Kind::Bool,
            Family::Int => Kind::Long,
            Family::Text => Kind::Text,
            Family::Real => Kind::Double,
        }
    }

    /// Canonical one-letter tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Family::Bool => "b",
            Family::Int => "i",
            Family::Text => "s",
            Family::Real => "r",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Bool => write!(f, "bool"),
            Family::Int => write!(f, "int"),
            Family::Text => write!(f, "text"),
            Family::Real => write!(f, "real"),
        }
    }
}

impl FromStr for Family {
    type Err = FactoryError;

    /// Accepts family names, then falls back to tag resolution.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bool" | "boolean" => Ok(Family::Bool),
            "int" | "integer" => Ok(Family::Int),
            "text" | "string" | "file" => Ok(Family::Text),
            "real" | "double" => Ok(Family::Real),
            _ => Family::from_tag(s),
        }
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Creates boxes that share one [`ConversionPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Factory {
    policy: ConversionPolicy,
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ConversionPolicy) -> Self {
        Factory { policy }
    }

    pub fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// A box of the family selected by `tag`, seeded with `seed`.
    ///
    /// An unknown tag is an error; an imperfect seed conversion is not. The
    /// box is returned together with the seed's classification.
    ///
    /// ```rust
    /// use parval_core::{Factory, Status, Value};
    ///
    /// let made = Factory::new().create("r", "2.5").unwrap();
    /// assert_eq!(made.status(), Status::Ok);
    /// assert_eq!(made.value().unwrap().value(), &Value::Double(2.5));
    /// ```
    pub fn create(&self, tag: &str, seed: impl Into<Value>) -> FactoryResult<Converted<ValueBox>> {
        let family = Family::from_tag(tag)?;
        let mut value_box = self.of_kind(family.kind());
        let status = match value_box.assign(seed) {
            Ok(()) => Status::Ok,
            Err(e) => e.status(),
        };
        debug!(tag, %family, %status, "created value box");
        Ok(Converted::with_status(value_box, status))
    }

    /// Like [`Factory::create`] but any imperfect seed conversion is an error.
    pub fn create_strict(
        &self,
        tag: &str,
        seed: impl Into<Value>,
    ) -> Result<ValueBox, ParvalError> {
        Ok(self.create(tag, seed)?.into_result()?)
    }

    /// A box of the seed's own kind.
    pub fn new_box(&self, seed: impl Into<Value>) -> ValueBox {
        ValueBox::new(seed).with_policy(self.policy)
    }

    /// A zero-valued box of `kind`.
    pub fn of_kind(&self, kind: Kind) -> ValueBox {
        ValueBox::of_kind(kind).with_policy(self.policy)
    }

    /// Independent deep copy of `source`.
    pub fn clone_box(&self, source: &ValueBox) -> ValueBox {
        source.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NegativeUnsigned;
    use crate::error::ConversionError;

    #[test]
    fn test_tag_resolution_order() {
        assert_eq!(Family::from_tag("b").unwrap(), Family::Bool);
        assert_eq!(Family::from_tag("i").unwrap(), Family::Int);
        assert_eq!(Family::from_tag("s").unwrap(), Family::Text);
        assert_eq!(Family::from_tag("f").unwrap(), Family::Text);
        assert_eq!(Family::from_tag("r").unwrap(), Family::Real);
        assert_eq!(Family::from_tag("fr").unwrap(), Family::Text);
        assert_eq!(Family::from_tag("fw").unwrap(), Family::Text);
    }

    #[test]
    fn test_invalid_tag() {
        assert_eq!(
            Family::from_tag("x"),
            Err(FactoryError::InvalidType {
                tag: "x".to_string()
            })
        );
        assert!(Family::from_tag("").is_err());
        assert!(Factory::new().create("q", 1i32).is_err());
    }

    #[test]
    fn test_family_kinds() {
        assert_eq!(Family::Bool.kind(), Kind::Bool);
        assert_eq!(Family::Int.kind(), Kind::Long);
        assert_eq!(Family::Text.kind(), Kind::Text);
        assert_eq!(Family::Real.kind(), Kind::Double);
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("string".parse::<Family>().unwrap(), Family::Text);
        assert_eq!("Real".parse::<Family>().unwrap(), Family::Real);
        assert_eq!("fr".parse::<Family>().unwrap(), Family::Text);
        for family in [Family::Bool, Family::Int, Family::Text, Family::Real] {
            assert_eq!(family.to_string().parse::<Family>().unwrap(), family);
            assert_eq!(Family::from_tag(family.tag()).unwrap(), family);
        }
    }

    #[test]
    fn test_create_seeds_box() {
        let factory = Factory::new();

        let made = factory.create("b", "yes").unwrap();
        assert!(made.is_ok());
        assert_eq!(made.into_value().unwrap().value(), &Value::Bool(true));

        let made = factory.create("i", 3.75f64).unwrap();
        assert_eq!(made.status(), Status::Precision);
        assert_eq!(made.into_value().unwrap().value(), &Value::Long(3));

        let made = factory.create("fr", 12i64).unwrap();
        assert!(made.is_ok());
        assert_eq!(made.into_value().unwrap().value(), &Value::from("12"));
    }

    #[test]
    fn test_create_strict() {
        let factory = Factory::new();
        let b = factory.create_strict("r", -2.0e32).unwrap();
        assert_eq!(b.string_data(), "-2e+32");

        let err = factory.create_strict("i", 0.5f64).unwrap_err();
        assert!(matches!(err, ParvalError::Conversion(ConversionError::Precision)));

        let err = factory.create_strict("z", 0.5f64).unwrap_err();
        assert!(matches!(err, ParvalError::Factory(FactoryError::InvalidType { .. })));
    }

    #[test]
    fn test_new_box_and_clone() {
        let policy = ConversionPolicy {
            platform_size_checks: true,
            negative_unsigned: NegativeUnsigned::Wrap,
        };
        let factory = Factory::with_policy(policy);
        let b = factory.new_box(7u16);
        assert_eq!(b.kind(), Kind::UShort);
        assert_eq!(b.policy(), &policy);

        let copy = factory.clone_box(&b);
        assert_eq!(copy, b);
        assert_eq!(factory.of_kind(Kind::Float).value(), &Value::Float(0.0));
    }
}
