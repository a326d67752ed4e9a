//! # Conversion Policy
//!
//! The two knobs that change how conversions are classified.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PARVAL_PLATFORM_SIZE_CHECKS=no                                     │
//! │     PARVAL_NEGATIVE_UNSIGNED=wrap                                      │
//! │                                                                         │
//! │  2. TOML text supplied by the caller                                   │
//! │     (this crate never opens files itself)                              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform checks on, negative unsigned text underflows              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Policy Format
//! ```toml
//! # Report "platform-size-ambiguous" for short/int/long narrowing.
//! # Turn off when every supported target has fixed-width integers.
//! platform_size_checks = true
//!
//! # How "-5" is read into an unsigned kind: "underflow" | "wrap"
//! negative_unsigned = "underflow"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::codec::parse_bool_token;
use crate::error::{ConfigError, ConfigResult};

/// Environment variable toggling [`ConversionPolicy::platform_size_checks`].
pub const ENV_PLATFORM_SIZE_CHECKS: &str = "PARVAL_PLATFORM_SIZE_CHECKS";

/// Environment variable selecting [`ConversionPolicy::negative_unsigned`].
pub const ENV_NEGATIVE_UNSIGNED: &str = "PARVAL_NEGATIVE_UNSIGNED";

// =============================================================================
// Negative Unsigned
// =============================================================================

/// Treatment of text like `"-5"` parsed into an unsigned kind.
///
/// ```text
/// "-1" into unsigned int
///    Underflow ──► 0           status: underflow
///    Wrap      ──► 4294967295  status: overflow (wrapped to u64::MAX first)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativeUnsigned {
    /// Classify as underflow and store 0.
    #[default]
    Underflow,
    /// Two's-complement wrap, then the usual range check (C `strtoul`).
    Wrap,
}

impl fmt::Display for NegativeUnsigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegativeUnsigned::Underflow => write!(f, "underflow"),
            NegativeUnsigned::Wrap => write!(f, "wrap"),
        }
    }
}

impl FromStr for NegativeUnsigned {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "underflow" | "clamp" => Ok(NegativeUnsigned::Underflow),
            "wrap" | "strtoul" => Ok(NegativeUnsigned::Wrap),
            other => Err(ConfigError::InvalidValue {
                key: "negative_unsigned".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Conversion Policy
// =============================================================================

/// Settings carried by every box and factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionPolicy {
    /// Whether in-range narrowing between integral kinds whose relative width
    /// differs across platforms is reported as `PlatformSize`.
    #[serde(default = "default_platform_size_checks")]
    pub platform_size_checks: bool,

    #[serde(default)]
    pub negative_unsigned: NegativeUnsigned,
}

fn default_platform_size_checks() -> bool {
    true
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            platform_size_checks: default_platform_size_checks(),
            negative_unsigned: NegativeUnsigned::default(),
        }
    }
}

impl ConversionPolicy {
    /// Parses a policy from TOML text; missing keys take their defaults.
    ///
    /// ```rust
    /// use parval_core::{ConversionPolicy, NegativeUnsigned};
    ///
    /// let policy = ConversionPolicy::from_toml_str("negative_unsigned = \"wrap\"").unwrap();
    /// assert!(policy.platform_size_checks);
    /// assert_eq!(policy.negative_unsigned, NegativeUnsigned::Wrap);
    /// ```
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Defaults, then TOML `text` if given, then environment overrides.
    pub fn load(text: Option<&str>) -> ConfigResult<Self> {
        let mut policy = match text {
            Some(text) => {
                debug!(bytes = text.len(), "Loading conversion policy from TOML");
                Self::from_toml_str(text)?
            }
            None => Self::default(),
        };
        policy.apply_env_overrides();
        Ok(policy)
    }

    /// Loads the policy or falls back to defaults if the text is invalid.
    pub fn load_or_default(text: Option<&str>) -> Self {
        Self::load(text).unwrap_or_else(|e| {
            warn!("Failed to load conversion policy: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Applies `PARVAL_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are logged
    /// and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PLATFORM_SIZE_CHECKS) {
            match parse_bool_token(value.trim()) {
                Some(enabled) => {
                    debug!(enabled, "Overriding platform size checks from environment");
                    self.platform_size_checks = enabled;
                }
                None => warn!(
                    key = ENV_PLATFORM_SIZE_CHECKS,
                    value = %value,
                    "Ignoring unparseable override"
                ),
            }
        }

        if let Some(value) = lookup(ENV_NEGATIVE_UNSIGNED) {
            match value.parse::<NegativeUnsigned>() {
                Ok(mode) => {
                    debug!(mode = %mode, "Overriding negative unsigned mode from environment");
                    self.negative_unsigned = mode;
                }
                Err(e) => warn!(
                    key = ENV_NEGATIVE_UNSIGNED,
                    error = %e,
                    "Ignoring unparseable override"
                ),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
