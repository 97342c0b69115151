//! Conflict mode enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller-selected policy for a stale `expected_version`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictMode {
    /// Last write wins; the conflict is ignored.
    #[default]
    Overwrite,
    /// Last write wins, with the mismatch recorded in the history entry.
    Version,
    /// Reject the write and ask the caller to refetch.
    Merge,
}

impl fmt::Display for ConflictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Version => write!(f, "version"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

impl FromStr for ConflictMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "version" => Ok(Self::Version),
            "merge" => Ok(Self::Merge),
            _ => Err(format!("Unknown conflict mode: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Merge".parse::<ConflictMode>(), Ok(ConflictMode::Merge));
        assert_eq!(ConflictMode::Version.to_string(), "version");
        assert!("three-way".parse::<ConflictMode>().is_err());
        assert_eq!(ConflictMode::default(), ConflictMode::Overwrite);
    }
}
