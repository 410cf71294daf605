//! Jurisdiction codes.
//!
//! A jurisdiction is a lowercase region code, optionally followed by a
//! subdivision: `us`, `us-ca`, `eu`, `it`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted code, the width of the stored jurisdiction columns.
pub const MAX_JURISDICTION_LEN: usize = 20;

/// Error returned when a jurisdiction code cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JurisdictionError {
    #[error("Jurisdiction code must not be empty")]
    Empty,

    #[error("Invalid jurisdiction code '{0}'")]
    Invalid(String),

    #[error("Jurisdiction code must be at most {MAX_JURISDICTION_LEN} characters")]
    TooLong,
}

/// A normalized jurisdiction code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jurisdiction(String);

impl Jurisdiction {
    /// Parses and normalizes a jurisdiction code.
    ///
    /// Input is trimmed and lowercased. At most two `-` separated segments
    /// are accepted and each must be non-empty ASCII letters. The whole code
    /// is at most [`MAX_JURISDICTION_LEN`] characters.
    pub fn parse(code: &str) -> Result<Self, JurisdictionError> {
        let normalized = code.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(JurisdictionError::Empty);
        }
        if normalized.chars().count() > MAX_JURISDICTION_LEN {
            return Err(JurisdictionError::TooLong);
        }

        let segments: Vec<&str> = normalized.split('-').collect();
        let valid = segments.len() <= 2
            && segments
                .iter()
                .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()));

        if !valid {
            return Err(JurisdictionError::Invalid(code.trim().to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The top-level region, `us` for `us-ca`.
    pub fn region(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    pub fn subdivision(&self) -> Option<&str> {
        self.0.split_once('-').map(|(_, sub)| sub)
    }

    /// Uppercase display form, `US-CA` for `us-ca`.
    pub fn display(&self) -> String {
        display_code(&self.0)
    }
}

impl Default for Jurisdiction {
    fn default() -> Self {
        Self("us".to_string())
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Jurisdiction {
    type Error = JurisdictionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Jurisdiction> for String {
    fn from(value: Jurisdiction) -> Self {
        value.0
    }
}

impl std::str::FromStr for Jurisdiction {
    type Err = JurisdictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Display form of a raw, possibly empty, stored code.
///
/// Empty codes display as `Unknown`.
pub fn display_code(code: &str) -> String {
    let parts: Vec<&str> = code
        .trim()
        .split('-')
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [] => "Unknown".to_string(),
        [region] => region.to_uppercase(),
        [region, sub, ..] => format!("{}-{}", region.to_uppercase(), sub.to_uppercase()),
    }
}
