//! TTL registry: named cache categories with their key prefix and lifetime.
//!
//! The registry is built once at startup and never mutated afterwards.
//! It answers two questions for any key through the same longest-prefix
//! lookup: which TTL applies, and which metrics bucket the key counts
//! against.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::keys::{build_key, simplified_prefix};

/// TTL used for keys that match no registry entry (5 minutes).
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Well-known key namespaces.
pub mod prefixes {
    /// Root of every market entry.
    pub const MARKET: &str = "cache:market";
    /// Market snapshots (prices, volumes).
    pub const MARKET_SNAPSHOT: &str = "cache:market:snapshot";
    /// News listings.
    pub const NEWS: &str = "cache:news";
    /// Reserved for cached metrics payloads.
    pub const METRICS: &str = "cache:metrics";
}

/// Named cache categories known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    /// Market snapshot data.
    MarketSnapshot,
    /// Extended market data with technical indicators.
    MarketSnapshotExtended,
    /// News listings, optionally per category.
    News,
    /// Trending subset of the news listing.
    NewsTrending,
}

impl CacheCategory {
    /// Every category, in registry order.
    pub const ALL: [CacheCategory; 4] = [
        CacheCategory::MarketSnapshot,
        CacheCategory::MarketSnapshotExtended,
        CacheCategory::News,
        CacheCategory::NewsTrending,
    ];

    /// Snake-case name used in settings and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheCategory::MarketSnapshot => "market_snapshot",
            CacheCategory::MarketSnapshotExtended => "market_snapshot_extended",
            CacheCategory::News => "news",
            CacheCategory::NewsTrending => "news_trending",
        }
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        CacheCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

/// One row of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtlConfigEntry {
    /// Category this entry describes.
    pub category: CacheCategory,
    /// Lifetime in seconds. `0` means the entry never expires.
    pub ttl_seconds: u64,
    /// Leading portion of every key in this category.
    pub key_prefix: String,
    /// Human readable description.
    pub description: String,
}

impl TtlConfigEntry {
    fn new(
        category: CacheCategory,
        ttl_seconds: u64,
        key_prefix: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            ttl_seconds,
            key_prefix: key_prefix.into(),
            description: description.into(),
        }
    }

    /// Name of the metrics bucket this entry aggregates into.
    pub fn bucket(&self) -> String {
        simplified_prefix(&self.key_prefix)
    }

    /// Whether entries written with this config should expire.
    pub fn expires(&self) -> bool {
        self.ttl_seconds > 0
    }
}

/// Immutable table of cache categories.
///
/// # Examples
///
/// ```
/// use stellara_core::TtlRegistry;
///
/// let registry = TtlRegistry::default();
/// assert_eq!(registry.ttl_for("cache:market:snapshot:USD-STELLARA"), 60);
/// assert_eq!(registry.ttl_for("cache:market:snapshot:extended:USD-STELLARA"), 300);
/// assert_eq!(registry.bucket_for("cache:news:trending"), "cache:news");
/// ```
#[derive(Debug, Clone)]
pub struct TtlRegistry {
    entries: Vec<TtlConfigEntry>,
    /// Indices into `entries`, longest key prefix first.
    match_order: Vec<usize>,
}

impl Default for TtlRegistry {
    fn default() -> Self {
        let extended_prefix = build_key(prefixes::MARKET_SNAPSHOT, ["extended"]);
        let trending_prefix = build_key(prefixes::NEWS, ["trending"]);

        Self::from_entries(vec![
            TtlConfigEntry::new(
                CacheCategory::MarketSnapshot,
                60,
                prefixes::MARKET_SNAPSHOT,
                "Market snapshot data (prices, volumes, etc.)",
            ),
            TtlConfigEntry::new(
                CacheCategory::MarketSnapshotExtended,
                300,
                extended_prefix,
                "Extended market data with technical indicators",
            ),
            TtlConfigEntry::new(
                CacheCategory::News,
                600,
                prefixes::NEWS,
                "Crypto news and market updates",
            ),
            TtlConfigEntry::new(
                CacheCategory::NewsTrending,
                300,
                trending_prefix,
                "Trending news articles",
            ),
        ])
    }
}

impl TtlRegistry {
    fn from_entries(entries: Vec<TtlConfigEntry>) -> Self {
        let mut match_order: Vec<usize> = (0..entries.len()).collect();
        match_order.sort_by(|a, b| {
            entries[*b]
                .key_prefix
                .len()
                .cmp(&entries[*a].key_prefix.len())
        });
        Self {
            entries,
            match_order,
        }
    }

    /// Builds the default table with per-category TTL overrides.
    ///
    /// Keys of `overrides` are category names (`market_snapshot`, `news`, ...).
    pub fn with_overrides(overrides: &HashMap<String, u64>) -> Result<Self> {
        let mut registry = Self::default();
        for (name, ttl) in overrides {
            let category: CacheCategory = name.parse()?;
            if let Some(entry) = registry.entries.iter_mut().find(|e| e.category == category) {
                entry.ttl_seconds = *ttl;
            }
        }
        Ok(registry)
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[TtlConfigEntry] {
        &self.entries
    }

    /// Entry for a category.
    pub fn entry(&self, category: CacheCategory) -> &TtlConfigEntry {
        // The table always holds one entry per category.
        self.entries
            .iter()
            .find(|e| e.category == category)
            .unwrap_or(&self.entries[0])
    }

    /// Returns the most specific entry whose prefix starts `key`.
    ///
    /// Longer prefixes are tried first so `cache:market:snapshot` never
    /// shadows `cache:market:snapshot:extended`.
    pub fn resolve(&self, key: &str) -> Option<&TtlConfigEntry> {
        self.match_order
            .iter()
            .map(|i| &self.entries[*i])
            .find(|entry| key.starts_with(entry.key_prefix.as_str()))
    }

    /// TTL for a key, or [`DEFAULT_TTL_SECONDS`] when no entry matches.
    pub fn ttl_for(&self, key: &str) -> u64 {
        self.resolve(key)
            .map(|entry| entry.ttl_seconds)
            .unwrap_or(DEFAULT_TTL_SECONDS)
    }

    /// Metrics bucket for a key.
    ///
    /// Falls back to the key's own first two segments so unknown keys are
    /// still counted under an ad hoc bucket.
    pub fn bucket_for(&self, key: &str) -> String {
        match self.resolve(key) {
            Some(entry) => entry.bucket(),
            None => simplified_prefix(key),
        }
    }

    /// Distinct bucket names, in declaration order.
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.entries {
            let bucket = entry.bucket();
            if !names.contains(&bucket) {
                names.push(bucket);
            }
        }
        names
    }
}
