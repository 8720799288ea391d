//! Identity provider identifiers.
//!
//! Every identity backend the platform can authenticate against has exactly
//! one entry in [`ProviderName`]. Keeping the set closed lets provider-keyed
//! dispatch be checked exhaustively instead of falling through a string map.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for one identity backend integration.
///
/// The enum is closed: adding a provider means adding a variant here and an
/// adapter implementation, and the compiler will surface every dispatch site
/// that needs to learn about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    /// Token-based login backed by a locally stored JWT.
    Jwt,
    /// AWS Amplify hosted authentication.
    Amplify,
    /// Firebase hosted authentication.
    Firebase,
    /// Supabase hosted authentication.
    Supabase,
}

impl ProviderName {
    /// All known providers, in declaration order.
    pub const ALL: [Self; 4] = [Self::Jwt, Self::Amplify, Self::Firebase, Self::Supabase];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jwt => "jwt",
            Self::Amplify => "amplify",
            Self::Firebase => "firebase",
            Self::Supabase => "supabase",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a provider name from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProviderNameError {
    /// The string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseProviderNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown identity provider: {}", self.input)
    }
}

impl std::error::Error for ParseProviderNameError {}

impl FromStr for ProviderName {
    type Err = ParseProviderNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jwt" => Ok(Self::Jwt),
            "amplify" => Ok(Self::Amplify),
            "firebase" => Ok(Self::Firebase),
            "supabase" => Ok(Self::Supabase),
            other => Err(ParseProviderNameError {
                input: other.to_string(),
            }),
        }
    }
}
