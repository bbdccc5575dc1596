//! Resource collection
//!
//! The editable set of resources and the assets assigned to them. Every
//! operation keeps both sides of the ownership relation consistent: an
//! asset's resource key always names the resource whose guid set contains it.

use crate::asset::Asset;
use crate::constants::{RESOURCE_NAME_REGEX, VARIANT_NAME_REGEX, is_scene_path};
use crate::database::AssetDatabase;
use crate::error::{ResourceError, Result};
use crate::resource::{LoadType, Resource, ResourceKey};
use crate::xml;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Progress hooks fired while a collection file is loaded
pub trait CollectionLoadListener {
    fn on_loading_resource(&mut self, _index: usize, _count: usize) {}

    fn on_loading_asset(&mut self, _index: usize, _count: usize) {}

    fn on_load_completed(&mut self) {}
}

impl CollectionLoadListener for () {}

/// Resources and their assets
#[derive(Debug, Default, Clone)]
pub struct ResourceCollection {
    resources: BTreeMap<ResourceKey, Resource>,
    assets: BTreeMap<String, Asset>,
}

impl ResourceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a collection from `ResourceCollection.xml`
    ///
    /// A document that can not be parsed is deleted before the error is
    /// returned. Entries that break the naming or ownership rules are
    /// skipped with a warning.
    pub fn load<P: AsRef<Path>>(
        path: P,
        database: &dyn AssetDatabase,
        listener: &mut dyn CollectionLoadListener,
    ) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let document = match xml::parse_document(&text) {
            Ok(document) => document,
            Err(e) => {
                warn!("Resource collection '{}' is corrupted: {}", path.display(), e);
                if let Err(remove_error) = std::fs::remove_file(path) {
                    warn!(
                        "Can not delete corrupted resource collection '{}': {}",
                        path.display(),
                        remove_error
                    );
                }
                return Err(e);
            }
        };

        let mut collection = Self::new();

        let resource_count = document.resources.len();
        for (index, entry) in document.resources.into_iter().enumerate() {
            listener.on_loading_resource(index, resource_count);
            let full_name = crate::constants::full_name(&entry.name, entry.variant.as_deref());
            if let Err(e) = collection.add_resource(
                &entry.name,
                entry.variant.as_deref(),
                entry.file_system.as_deref(),
                entry.load_type,
                entry.packed,
                entry.resource_groups,
            ) {
                warn!("Can not add resource '{}': {}", full_name, e);
            }
        }

        let asset_count = document.assets.len();
        for (index, entry) in document.assets.into_iter().enumerate() {
            listener.on_loading_asset(index, asset_count);
            let key = ResourceKey {
                name: entry.resource_name,
                variant: entry.resource_variant,
            };
            if let Err(e) = collection.assign_asset(database, &entry.guid, &key) {
                warn!(
                    "Can not assign asset '{}' to resource '{}': {}",
                    entry.guid, key, e
                );
            }
        }

        listener.on_load_completed();
        info!(
            "Loaded resource collection '{}' ({} resources, {} assets)",
            path.display(),
            collection.resource_count(),
            collection.asset_count()
        );

        Ok(collection)
    }

    /// Write the collection to `ResourceCollection.xml`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = xml::write_document(self.resources.values(), self.assets.values())?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        debug!("Saved resource collection to '{}'", path.display());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.resources.clear();
        self.assets.clear();
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Resources ordered by name, then variant
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Assets ordered by guid
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// Assets owned by one resource, ordered by guid
    pub fn assets_of(&self, key: &ResourceKey) -> Vec<&Asset> {
        self.resources
            .get(key)
            .map(|resource| {
                resource
                    .asset_guids()
                    .filter_map(|guid| self.assets.get(guid))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_resource(&self, key: &ResourceKey) -> Option<&Resource> {
        self.resources.get(key)
    }

    pub fn has_resource(&self, key: &ResourceKey) -> bool {
        self.resources.contains_key(key)
    }

    pub fn get_asset(&self, guid: &str) -> Option<&Asset> {
        self.assets.get(guid)
    }

    pub fn has_asset(&self, guid: &str) -> bool {
        self.assets.contains_key(guid)
    }

    /// Check a name/variant pair against the naming rules
    pub fn is_valid_resource_name(name: &str, variant: Option<&str>) -> bool {
        if name.is_empty() || !RESOURCE_NAME_REGEX.is_match(name) {
            return false;
        }

        match variant {
            Some(variant) => VARIANT_NAME_REGEX.is_match(variant),
            None => true,
        }
    }

    /// Check that `name`/`variant` is valid and does not collide with any
    /// resource other than `current`
    pub fn is_available_resource_name(
        &self,
        name: &str,
        variant: Option<&str>,
        current: Option<&ResourceKey>,
    ) -> bool {
        self.check_available(name, variant, current).is_ok()
    }

    fn check_available(
        &self,
        name: &str,
        variant: Option<&str>,
        current: Option<&ResourceKey>,
    ) -> Result<()> {
        let full_name = crate::constants::full_name(name, variant);
        if name.is_empty() || !RESOURCE_NAME_REGEX.is_match(name) {
            return Err(ResourceError::invalid_resource_name(
                full_name.as_str(),
                "name must be slash separated segments of [A-Za-z0-9._-]",
            ));
        }
        if let Some(variant) = variant
            && !VARIANT_NAME_REGEX.is_match(variant)
        {
            return Err(ResourceError::invalid_resource_name(
                full_name.as_str(),
                "variant must match [a-z0-9_-]",
            ));
        }

        let lowered = full_name.to_lowercase();
        for key in self.resources.keys() {
            if Some(key) == current {
                continue;
            }

            let other = key.full_name();
            if key.name == name && key.variant.as_deref() == variant {
                return Err(ResourceError::DuplicateResource { full_name });
            }

            let other_lowered = other.to_lowercase();
            if other_lowered == lowered
                || other_lowered.starts_with(&format!("{}/", lowered))
                || lowered.starts_with(&format!("{}/", other_lowered))
            {
                return Err(ResourceError::UnavailableResourceName { full_name, other });
            }
        }

        Ok(())
    }

    /// Create an empty resource
    pub fn add_resource(
        &mut self,
        name: &str,
        variant: Option<&str>,
        file_system: Option<&str>,
        load_type: LoadType,
        packed: bool,
        resource_groups: impl IntoIterator<Item = String>,
    ) -> Result<()> {
        self.check_available(name, variant, None)?;

        let resource = Resource::create(
            name.to_string(),
            variant.map(str::to_string),
            file_system.map(str::to_string),
            load_type,
            packed,
            resource_groups,
        );
        self.resources.insert(resource.key().clone(), resource);
        Ok(())
    }

    /// Rename a resource in place; its assets follow it
    pub fn rename_resource(
        &mut self,
        key: &ResourceKey,
        new_name: &str,
        new_variant: Option<&str>,
    ) -> Result<()> {
        if !self.resources.contains_key(key) {
            return Err(ResourceError::resource_not_found(key.full_name()));
        }
        if key.name == new_name && key.variant.as_deref() == new_variant {
            return Ok(());
        }
        self.check_available(new_name, new_variant, Some(key))?;

        let mut resource = self
            .resources
            .remove(key)
            .ok_or_else(|| ResourceError::resource_not_found(key.full_name()))?;
        resource.rename(new_name.to_string(), new_variant.map(str::to_string));
        let new_key = resource.key().clone();

        for guid in resource.asset_guids() {
            if let Some(asset) = self.assets.get_mut(guid) {
                asset.set_resource(Some(new_key.clone()));
            }
        }

        self.resources.insert(new_key, resource);
        Ok(())
    }

    /// Remove a resource; its assets leave the collection with it
    pub fn remove_resource(&mut self, key: &ResourceKey) -> Result<()> {
        let mut resource = self
            .resources
            .remove(key)
            .ok_or_else(|| ResourceError::resource_not_found(key.full_name()))?;

        for guid in resource.clear() {
            self.assets.remove(&guid);
        }
        Ok(())
    }

    pub fn set_resource_load_type(&mut self, key: &ResourceKey, load_type: LoadType) -> Result<()> {
        self.resources
            .get_mut(key)
            .ok_or_else(|| ResourceError::resource_not_found(key.full_name()))?
            .set_load_type(load_type)
    }

    pub fn set_resource_packed(&mut self, key: &ResourceKey, packed: bool) -> Result<()> {
        self.resources
            .get_mut(key)
            .ok_or_else(|| ResourceError::resource_not_found(key.full_name()))?
            .set_packed(packed);
        Ok(())
    }

    /// Assign an asset to a resource, moving it out of its previous owner
    pub fn assign_asset(
        &mut self,
        database: &dyn AssetDatabase,
        guid: &str,
        key: &ResourceKey,
    ) -> Result<()> {
        let asset_name = database
            .guid_to_path(guid)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ResourceError::UnresolvedAsset {
                guid: guid.to_string(),
            })?;

        let previous = self
            .assets
            .get(guid)
            .and_then(|asset| asset.resource().cloned());

        self.resources
            .get_mut(key)
            .ok_or_else(|| ResourceError::resource_not_found(key.full_name()))?
            .add_asset(guid, is_scene_path(&asset_name))?;

        if let Some(previous) = previous.filter(|previous| previous != key)
            && let Some(old_owner) = self.resources.get_mut(&previous)
        {
            old_owner.remove_asset(guid);
        }

        self.assets
            .entry(guid.to_string())
            .or_insert_with(|| Asset::new(guid))
            .set_resource(Some(key.clone()));
        Ok(())
    }

    /// Detach an asset from its resource and drop it from the collection
    pub fn unassign_asset(&mut self, guid: &str) -> Result<()> {
        let asset = self
            .assets
            .remove(guid)
            .ok_or_else(|| ResourceError::asset_not_found(guid))?;

        if let Some(key) = asset.resource()
            && let Some(resource) = self.resources.get_mut(key)
        {
            resource.remove_asset(guid);
        }
        Ok(())
    }
}
