//! Dependency edges

use std::fmt;

/// A directed host -> dependency edge between two asset names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Stamp {
    host_asset_name: String,
    dependency_asset_name: String,
}

impl Stamp {
    pub fn new<H: Into<String>, D: Into<String>>(host_asset_name: H, dependency_asset_name: D) -> Self {
        Self {
            host_asset_name: host_asset_name.into(),
            dependency_asset_name: dependency_asset_name.into(),
        }
    }

    pub fn host_asset_name(&self) -> &str {
        &self.host_asset_name
    }

    pub fn dependency_asset_name(&self) -> &str {
        &self.dependency_asset_name
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.host_asset_name, self.dependency_asset_name)
    }
}
