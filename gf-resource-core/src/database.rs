//! Asset database collaborator
//!
//! The editor owns the real asset database. Tooling only needs three queries
//! from it, captured by [`AssetDatabase`]. [`SnapshotAssetDatabase`] answers
//! them from a YAML snapshot exported by the editor (or built in memory).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Queries the tooling needs from the engine's asset database
pub trait AssetDatabase {
    /// Path of the asset with the given guid
    fn guid_to_path(&self, guid: &str) -> Option<String>;

    /// Guid of the asset at the given path
    fn path_to_guid(&self, path: &str) -> Option<String>;

    /// Direct dependencies of the asset at the given path
    fn dependencies(&self, path: &str) -> Vec<String>;
}

/// One asset entry of a snapshot file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub guid: String,
    pub path: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    assets: Vec<AssetRecord>,
}

/// In-memory asset database
#[derive(Debug, Default, Clone)]
pub struct SnapshotAssetDatabase {
    paths: HashMap<String, String>,
    guids: HashMap<String, String>,
    dependencies: HashMap<String, Vec<String>>,
}

impl SnapshotAssetDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse a snapshot from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let file: SnapshotFile = serde_yaml::from_str(text)?;
        let mut db = Self::new();
        for record in file.assets {
            db.insert(record.guid, record.path, record.dependencies);
        }
        Ok(db)
    }

    /// Serialize the snapshot back to YAML, ordered by path
    pub fn to_yaml_string(&self) -> Result<String> {
        let mut assets: Vec<AssetRecord> = self
            .guids
            .iter()
            .map(|(path, guid)| AssetRecord {
                guid: guid.clone(),
                path: path.clone(),
                dependencies: self.dependencies.get(path).cloned().unwrap_or_default(),
            })
            .collect();
        assets.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(serde_yaml::to_string(&SnapshotFile { assets })?)
    }

    /// Register an asset and its direct dependencies
    pub fn insert<G, P, I, D>(&mut self, guid: G, path: P, dependencies: I)
    where
        G: Into<String>,
        P: Into<String>,
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let guid = guid.into();
        let path = path.into();
        self.paths.insert(guid.clone(), path.clone());
        self.guids.insert(path.clone(), guid);
        self.dependencies
            .insert(path, dependencies.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl AssetDatabase for SnapshotAssetDatabase {
    fn guid_to_path(&self, guid: &str) -> Option<String> {
        self.paths.get(guid).cloned()
    }

    fn path_to_guid(&self, path: &str) -> Option<String> {
        self.guids.get(path).cloned()
    }

    fn dependencies(&self, path: &str) -> Vec<String> {
        self.dependencies.get(path).cloned().unwrap_or_default()
    }
}
