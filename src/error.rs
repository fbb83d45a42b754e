//! Error types for framework construction and coverage analysis
//!
//! Join mismatches between catalogs are not errors; they are dropped and
//! logged. Everything here is returned to the caller, which decides whether
//! to abort. File identity is not known at this layer and is attached by
//! the I/O layer that wraps these errors.

use thiserror::Error;

/// Result type alias for crosswalk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Header or row shape does not meet the minimum column contract
    #[error("Malformed input ({context}): expected {expected}, found {found}")]
    MalformedInput {
        context: String,
        expected: String,
        found: String,
    },

    /// Requested framework label does not exist in the built collection
    #[error("Unknown framework: {name}")]
    UnknownFramework { name: String },

    /// Coverage ratio requested for a framework with no controls
    #[error("Coverage ratio undefined: target framework has no controls")]
    DivisionUndefined,
}

impl Error {
    /// Create a malformed input error
    pub fn malformed(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::MalformedInput {
            context: context.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unknown framework error
    pub fn unknown_framework(name: impl Into<String>) -> Self {
        Self::UnknownFramework { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_expected_and_found() {
        let err = Error::malformed("header", "at least 5 columns", "3 columns");
        assert_eq!(
            err.to_string(),
            "Malformed input (header): expected at least 5 columns, found 3 columns"
        );
    }

    #[test]
    fn test_unknown_framework_message() {
        let err = Error::unknown_framework("PCI DSS");
        assert_eq!(err.to_string(), "Unknown framework: PCI DSS");
    }
}
