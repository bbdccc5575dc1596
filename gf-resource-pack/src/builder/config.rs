//! Resource pack builder configuration

use crate::error::Result;
use gf_resource_core::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Resource pack builder configuration
///
/// Persisted as YAML; missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePackBuilderConfig {
    /// Directory containing `Full/` and receiving `ResourcePack/`
    pub working_directory: PathBuf,
    pub platform: Platform,
    /// Type name looked up in the compression helper registry
    pub compression_helper_type_name: String,
    /// Also write the decompressed diff next to each pack
    pub backup_diff: bool,
    /// Copy the target version list into the diff backup
    pub backup_version: bool,
    /// Not applied by the builder yet
    pub length_limit: u64,
}

impl Default for ResourcePackBuilderConfig {
    fn default() -> Self {
        Self {
            working_directory: PathBuf::new(),
            platform: Platform::Windows,
            compression_helper_type_name: "DefaultCompressionHelper".to_string(),
            backup_diff: false,
            backup_version: false,
            length_limit: 0,
        }
    }
}

impl ResourcePackBuilderConfig {
    pub fn new<P: Into<PathBuf>>(working_directory: P, platform: Platform) -> Self {
        Self {
            working_directory: working_directory.into(),
            platform,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}
