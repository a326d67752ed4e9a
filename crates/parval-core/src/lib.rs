//! # parval-core: Typed Parameter Values
//!
//! This crate is the coercion core of a parameter interface for command-line
//! tools. It holds one strongly-typed value per parameter and converts it to
//! and from every other supported primitive and to/from text, classifying
//! every imperfect conversion while still producing a usable value.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Parameter Interface                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   Parameter objects, parameter files, prompting (NOT HERE)      │   │
//! │  │     name / mode / prompt / comment, file grammar, CLI           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ family tag + raw text                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ parval-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │ type_code │  │  limits   │  │  convert  │  │   codec   │   │   │
//! │  │   │ TypeCode  │  │  Limits   │  │ Converted │  │ parse     │   │   │
//! │  │   │ Kind      │  │ min/max   │  │ Status    │  │ format    │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │ value_box │  │  factory  │  │  config   │                  │   │
//! │  │   │ ValueBox  │  │ Family    │  │ Policy    │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO FILES • NO NETWORK • NO LOCKS • BOUNDED COMPUTATION       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`type_code`] - Bitmask families and the closed [`Kind`] set
//! - [`limits`] - Per-kind width, precision and range
//! - [`value`] - [`Value`], the widened [`Scalar`], the [`Primitive`] trait
//! - [`convert`] - Scalar conversion engine and [`Converted`] outcomes
//! - [`codec`] - Text parsing and canonical formatting
//! - [`value_box`] - [`ValueBox`], the typed parameter value
//! - [`factory`] - Boxes selected by family tag or seed
//! - [`config`] - [`ConversionPolicy`]
//! - [`error`] - [`Status`] and error types
//!
//! ## Design Principles
//!
//! 1. **Usable Values**: Every conversion stores something sensible, even on failure
//! 2. **One Classification**: Each attempt yields exactly one [`Status`]
//! 3. **Fixed Widths**: Boundary behavior does not depend on the build target
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use parval_core::{ConversionError, Factory, Kind, ValueBox};
//!
//! // A "real" parameter read from a parameter file
//! let made = Factory::new().create("r", "-1.2345678e3").unwrap();
//! let real = made.into_value().unwrap();
//! assert_eq!(real.string_data(), "-1234.5678");
//!
//! // Read it back as an int: the fraction is dropped and reported
//! let mut int = ValueBox::of_kind(Kind::Int);
//! assert_eq!(int.assign_from(&real), Err(ConversionError::Precision));
//! assert_eq!(int.string_data(), "-1234");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod factory;
pub mod limits;
pub mod type_code;
pub mod value;
pub mod value_box;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use parval_core::ValueBox` instead of
// `use parval_core::value_box::ValueBox`

pub use config::{ConversionPolicy, NegativeUnsigned};
pub use convert::Converted;
pub use error::{
    ConfigError, ConfigResult, ConversionError, ConversionResult, FactoryError, FactoryResult,
    ParvalError, Status,
};
pub use factory::{Factory, Family};
pub use limits::{Limits, CHAR_IS_SIGNED};
pub use type_code::{Kind, TypeCode};
pub use value::{classify, LongDouble, PlainChar, Primitive, Scalar, Value};
pub use value_box::ValueBox;
