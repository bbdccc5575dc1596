//! Per-asset dependency aggregation

use gf_resource_core::ResourceKey;

/// An asset of the collection together with its owning resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub guid: String,
    pub name: String,
    pub resource: ResourceKey,
}

/// Everything one asset depends on
///
/// Lists are kept in discovery order until [`DependencyData::refresh_data`]
/// sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyData {
    dependency_resources: Vec<ResourceKey>,
    dependency_assets: Vec<AssetRef>,
    scattered_dependency_asset_names: Vec<String>,
}

impl DependencyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dependency_resource_count(&self) -> usize {
        self.dependency_resources.len()
    }

    pub fn dependency_asset_count(&self) -> usize {
        self.dependency_assets.len()
    }

    pub fn scattered_dependency_asset_count(&self) -> usize {
        self.scattered_dependency_asset_names.len()
    }

    /// Record a bundled dependency; its resource is recorded once
    pub fn add_dependency_asset(&mut self, asset: AssetRef) {
        if !self.dependency_resources.contains(&asset.resource) {
            self.dependency_resources.push(asset.resource.clone());
        }
        self.dependency_assets.push(asset);
    }

    /// Record a dependency that no resource owns
    pub fn add_scattered_dependency_asset<S: Into<String>>(&mut self, dependency_asset_name: S) {
        self.scattered_dependency_asset_names
            .push(dependency_asset_name.into());
    }

    pub fn dependency_resources(&self) -> &[ResourceKey] {
        &self.dependency_resources
    }

    pub fn dependency_assets(&self) -> &[AssetRef] {
        &self.dependency_assets
    }

    pub fn scattered_dependency_asset_names(&self) -> &[String] {
        &self.scattered_dependency_asset_names
    }

    /// Sort resources by full name, assets by name, scattered names lexically
    pub fn refresh_data(&mut self) {
        self.dependency_resources
            .sort_by_cached_key(|resource| resource.full_name());
        self.dependency_assets
            .sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.guid.cmp(&b.guid)));
        self.scattered_dependency_asset_names.sort();
    }
}
