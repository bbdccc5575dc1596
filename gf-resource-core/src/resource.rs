//! Resource (asset bundle) records
//!
//! A [`Resource`] is one packaged unit shipped as a single file. It owns an
//! ordered set of asset guids; the back reference from each asset is kept in
//! sync by [`crate::ResourceCollection`].

use crate::constants::full_name;
use crate::error::{ResourceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How the runtime loads a resource file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum LoadType {
    /// Asset bundle loaded straight from its file
    #[default]
    LoadFromFile = 0,
    /// Asset bundle loaded from a byte buffer
    LoadFromMemory = 1,
    /// Asset bundle loaded from memory after quick (header) decryption
    LoadFromMemoryAndQuickDecrypt = 2,
    /// Asset bundle loaded from memory after full decryption
    LoadFromMemoryAndDecrypt = 3,
    /// Raw binary file
    LoadFromBinary = 4,
    /// Raw binary file after quick decryption
    LoadFromBinaryAndQuickDecrypt = 5,
    /// Raw binary file after full decryption
    LoadFromBinaryAndDecrypt = 6,
}

impl LoadType {
    /// Decode a load type from its serialized byte
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(LoadType::LoadFromFile),
            1 => Ok(LoadType::LoadFromMemory),
            2 => Ok(LoadType::LoadFromMemoryAndQuickDecrypt),
            3 => Ok(LoadType::LoadFromMemoryAndDecrypt),
            4 => Ok(LoadType::LoadFromBinary),
            5 => Ok(LoadType::LoadFromBinaryAndQuickDecrypt),
            6 => Ok(LoadType::LoadFromBinaryAndDecrypt),
            other => Err(ResourceError::parse(format!("Unknown load type: {}", other))),
        }
    }

    /// Serialized byte of the load type
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the resource is a raw binary rather than an asset bundle
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            LoadType::LoadFromBinary
                | LoadType::LoadFromBinaryAndQuickDecrypt
                | LoadType::LoadFromBinaryAndDecrypt
        )
    }
}

/// Kind of assets a resource holds, fixed by the first assigned asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetType {
    #[default]
    Unknown,
    Asset,
    Scene,
}

/// Identity of a resource: name plus optional variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub name: String,
    pub variant: Option<String>,
}

impl ResourceKey {
    pub fn new<S: Into<String>>(name: S, variant: Option<S>) -> Self {
        Self {
            name: name.into(),
            variant: variant.map(Into::into),
        }
    }

    /// `name` or `name.variant`
    pub fn full_name(&self) -> String {
        full_name(&self.name, self.variant.as_deref())
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// A resource record
#[derive(Debug, Clone)]
pub struct Resource {
    key: ResourceKey,
    file_system: Option<String>,
    load_type: LoadType,
    packed: bool,
    resource_groups: BTreeSet<String>,
    asset_type: AssetType,
    asset_guids: BTreeSet<String>,
}

impl Resource {
    /// Create an empty resource
    pub fn create(
        name: String,
        variant: Option<String>,
        file_system: Option<String>,
        load_type: LoadType,
        packed: bool,
        resource_groups: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            key: ResourceKey { name, variant },
            file_system,
            load_type,
            packed,
            resource_groups: resource_groups
                .into_iter()
                .filter(|group| !group.is_empty())
                .collect(),
            asset_type: AssetType::Unknown,
            asset_guids: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn variant(&self) -> Option<&str> {
        self.key.variant.as_deref()
    }

    pub fn full_name(&self) -> String {
        self.key.full_name()
    }

    pub fn file_system(&self) -> Option<&str> {
        self.file_system.as_deref()
    }

    pub fn load_type(&self) -> LoadType {
        self.load_type
    }

    pub fn packed(&self) -> bool {
        self.packed
    }

    pub fn resource_groups(&self) -> impl Iterator<Item = &str> {
        self.resource_groups.iter().map(String::as_str)
    }

    pub fn has_resource_group(&self, group: &str) -> bool {
        self.resource_groups.contains(group)
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn is_loaded_from_binary(&self) -> bool {
        self.load_type.is_binary()
    }

    /// Guids of the owned assets, in guid order
    pub fn asset_guids(&self) -> impl Iterator<Item = &str> {
        self.asset_guids.iter().map(String::as_str)
    }

    pub fn asset_count(&self) -> usize {
        self.asset_guids.len()
    }

    pub fn contains_asset(&self, guid: &str) -> bool {
        self.asset_guids.contains(guid)
    }

    pub(crate) fn rename(&mut self, name: String, variant: Option<String>) {
        self.key = ResourceKey { name, variant };
    }

    pub(crate) fn set_load_type(&mut self, load_type: LoadType) -> Result<()> {
        if self.asset_type == AssetType::Scene && load_type.is_binary() {
            return Err(ResourceError::asset_type(format!(
                "Scene resource '{}' can not use load type {:?}",
                self.full_name(),
                load_type
            )));
        }
        self.load_type = load_type;
        Ok(())
    }

    pub(crate) fn set_packed(&mut self, packed: bool) {
        self.packed = packed;
    }

    /// Record an asset; the first asset fixes the resource's asset type.
    pub(crate) fn add_asset(&mut self, guid: &str, is_scene: bool) -> Result<()> {
        let incoming = if is_scene {
            AssetType::Scene
        } else {
            AssetType::Asset
        };

        match self.asset_type {
            AssetType::Unknown => {
                if incoming == AssetType::Scene && self.load_type.is_binary() {
                    return Err(ResourceError::asset_type(format!(
                        "Resource '{}' is loaded from binary and can not hold scenes",
                        self.full_name()
                    )));
                }
                self.asset_type = incoming;
            }
            current if current != incoming => {
                return Err(ResourceError::asset_type(format!(
                    "Resource '{}' holds {:?} assets, can not add a {:?} asset",
                    self.full_name(),
                    current,
                    incoming
                )));
            }
            _ => {}
        }

        self.asset_guids.insert(guid.to_string());
        Ok(())
    }

    pub(crate) fn remove_asset(&mut self, guid: &str) {
        self.asset_guids.remove(guid);
        if self.asset_guids.is_empty() {
            self.asset_type = AssetType::Unknown;
        }
    }

    /// Detach every asset; returns the detached guids
    pub(crate) fn clear(&mut self) -> Vec<String> {
        self.asset_type = AssetType::Unknown;
        std::mem::take(&mut self.asset_guids).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(load_type: LoadType) -> Resource {
        Resource::create(
            "ui".to_string(),
            None,
            None,
            load_type,
            false,
            vec!["base".to_string(), String::new()],
        )
    }

    #[test]
    fn test_load_type_bytes() {
        for value in 0..=6u8 {
            assert_eq!(LoadType::from_u8(value).unwrap().as_u8(), value);
        }
        assert!(LoadType::from_u8(7).is_err());
        assert!(LoadType::LoadFromBinaryAndDecrypt.is_binary());
        assert!(!LoadType::LoadFromMemory.is_binary());
    }

    #[test]
    fn test_asset_type_is_fixed_by_first_asset() {
        let mut res = resource(LoadType::LoadFromFile);
        assert_eq!(res.asset_type(), AssetType::Unknown);
        res.add_asset("g1", false).unwrap();
        assert_eq!(res.asset_type(), AssetType::Asset);
        assert!(res.add_asset("g2", true).is_err());
        res.remove_asset("g1");
        assert_eq!(res.asset_type(), AssetType::Unknown);
        res.add_asset("g2", true).unwrap();
        assert_eq!(res.asset_type(), AssetType::Scene);
    }

    #[test]
    fn test_scene_resource_rejects_binary_load_type() {
        let mut res = resource(LoadType::LoadFromFile);
        res.add_asset("scene", true).unwrap();
        assert!(res.set_load_type(LoadType::LoadFromBinary).is_err());
        assert!(res.set_load_type(LoadType::LoadFromMemory).is_ok());

        let mut binary = resource(LoadType::LoadFromBinary);
        assert!(binary.add_asset("scene", true).is_err());
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let res = resource(LoadType::LoadFromFile);
        assert_eq!(res.resource_groups().collect::<Vec<_>>(), vec!["base"]);
    }
}
