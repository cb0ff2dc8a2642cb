//! Cleanup policy selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy deciding whether a discussion's age matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupMode {
    /// Only discussions created before the cutoff are eligible.
    #[default]
    Expiration,
    /// Every matching discussion is eligible regardless of age.
    Immediate,
}

impl CleanupMode {
    /// Returns the input spelling of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Expiration => "expiration",
            Self::Immediate => "immediate",
        }
    }

    /// Parses a mode string, ignoring surrounding whitespace.
    ///
    /// The spelling is exact: `Immediate` is not a mode.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "expiration" => Some(Self::Expiration),
            "immediate" => Some(Self::Immediate),
            _ => None,
        }
    }

    /// Returns `true` when age is ignored.
    #[must_use]
    pub const fn ignores_age(&self) -> bool {
        matches!(self, Self::Immediate)
    }
}

impl fmt::Display for CleanupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CleanupMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::InvalidConfiguration {
            input: "cleanup-mode".to_string(),
            reason: format!("expected 'expiration' or 'immediate', got '{s}'"),
        })
    }
}
