//! Error types for the cache domain.
//!
//! Errors here come from building the TTL registry or parsing domain
//! values supplied from the outside (settings, query strings). Cache
//! traffic itself never produces a `CoreError`.
//!
//! # Example
//!
//! ```
//! use stellara_core::{CoreError, TtlRegistry};
//! use std::collections::HashMap;
//!
//! let overrides = HashMap::from([("quotes".to_string(), 30)]);
//! let err = TtlRegistry::with_overrides(&overrides).unwrap_err();
//! assert!(matches!(err, CoreError::UnknownCategory(_)));
//! ```

use thiserror::Error;

/// Main error type for core cache domain operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A category name did not match any TTL registry entry.
    #[error("unknown cache category '{0}'")]
    UnknownCategory(String),

    /// An asset update kind could not be parsed.
    #[error("invalid asset update kind '{0}': expected price, volume, metadata or all")]
    InvalidUpdateKind(String),

    /// A key segment contains the `:` delimiter.
    #[error("invalid key segment '{segment}': {reason}")]
    InvalidKeySegment {
        /// The offending segment.
        segment: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid key segment error.
    pub fn invalid_segment(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKeySegment {
            segment: segment.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::UnknownCategory("quotes".to_string());
        assert_eq!(err.to_string(), "unknown cache category 'quotes'");

        let err = CoreError::InvalidUpdateKind("supply".to_string());
        assert!(err.to_string().starts_with("invalid asset update kind 'supply'"));

        let err = CoreError::invalid_segment("a:b", "segments cannot contain ':'");
        assert_eq!(
            err.to_string(),
            "invalid key segment 'a:b': segments cannot contain ':'"
        );
    }
}
