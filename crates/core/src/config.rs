use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::tree::{DepthLimit, RootSelector};
use crate::viewport::ViewportConfig;

/// Startup settings for an [`OrgChart`](crate::chart::OrgChart).
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub root: RootSelector,
    pub depth_limit: DepthLimit,
    pub viewport: ViewportConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            root: RootSelector::All,
            depth_limit: DepthLimit::Limited(1),
            viewport: ViewportConfig::default(),
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
