//! Domain update events that drive cache invalidation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What changed about an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetUpdateKind {
    Price,
    Volume,
    Metadata,
    #[default]
    All,
}

impl AssetUpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetUpdateKind::Price => "price",
            AssetUpdateKind::Volume => "volume",
            AssetUpdateKind::Metadata => "metadata",
            AssetUpdateKind::All => "all",
        }
    }
}

impl fmt::Display for AssetUpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetUpdateKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(AssetUpdateKind::Price),
            "volume" => Ok(AssetUpdateKind::Volume),
            "metadata" => Ok(AssetUpdateKind::Metadata),
            "all" => Ok(AssetUpdateKind::All),
            _ => Err(CoreError::InvalidUpdateKind(s.to_string())),
        }
    }
}

/// Emitted when an asset changes upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpdated {
    pub asset_id: String,
    #[serde(default)]
    pub kind: AssetUpdateKind,
}

impl AssetUpdated {
    pub fn new(asset_id: impl Into<String>, kind: AssetUpdateKind) -> Self {
        Self {
            asset_id: asset_id.into(),
            kind,
        }
    }
}

/// Emitted when news data changes upstream.
///
/// `category == None` means every category changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsUpdated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_trending: Option<bool>,
}

impl NewsUpdated {
    pub fn new(category: Option<String>, is_trending: Option<bool>) -> Self {
        Self {
            category,
            is_trending,
        }
    }

    /// Whether the trending listing must be dropped as well.
    pub fn touches_trending(&self) -> bool {
        self.is_trending.unwrap_or(false)
    }
}
