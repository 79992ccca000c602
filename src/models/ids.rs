//! Logical log identities
//!
//! A `LogId` names one backable log file independently of where it lives or
//! which backup slot a copy occupies. Identities compare case-sensitively.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LogkeepError;

/// Stable key of a backable log file (its file name without extension)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogId(String);

impl LogId {
    /// Parse an identity token, returning `None` for tokens that cannot name a
    /// log file
    ///
    /// Surrounding whitespace is ignored. Empty tokens, tokens containing a
    /// path separator and tokens containing control characters are rejected.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() || token == "." || token == ".." {
            return None;
        }
        if token
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return None;
        }
        Some(Self(token.to_string()))
    }

    /// Get the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare two identities ignoring case
    pub fn cmp_ignore_case(&self, other: &Self) -> std::cmp::Ordering {
        let lhs = self.0.chars().flat_map(char::to_lowercase);
        let rhs = other.0.chars().flat_map(char::to_lowercase);
        lhs.cmp(rhs)
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LogId {
    type Err = LogkeepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| LogkeepError::Validation(format!("Invalid log identity: '{}'", s)))
    }
}

impl TryFrom<String> for LogId {
    type Error = LogkeepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LogId> for String {
    fn from(id: LogId) -> Self {
        id.0
    }
}
