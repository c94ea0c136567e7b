//! Stellara Core - Cache domain types
//!
//! This crate provides the pieces of the cache layer that have no I/O:
//! key construction, the TTL registry and the update events consumed by
//! the invalidation service.

pub mod error;
pub mod events;
pub mod keys;
pub mod registry;

pub use error::{CoreError, Result};
pub use events::{AssetUpdateKind, AssetUpdated, NewsUpdated};
pub use keys::{ParsedKey, build_key, parse_key, simplified_prefix};
pub use registry::{CacheCategory, DEFAULT_TTL_SECONDS, TtlConfigEntry, TtlRegistry, prefixes};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }
}
