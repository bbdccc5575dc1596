//! Resource analyzer controller
//!
//! Loads a resource collection, walks every asset's dependencies through the
//! asset database and exposes the results as sortable, filterable views.

use crate::circular::CircularDependencyChecker;
use crate::dependency_data::{AssetRef, DependencyData};
use crate::error::{AnalyzerError, Result};
use crate::stamp::Stamp;
use gf_resource_core::{
    AssetDatabase, CollectionLoadListener, ResourceCollection, is_script_path,
};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lifecycle of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerState {
    Uninitialized,
    Prepared,
    Analyzed,
}

/// Sort order of [`ResourceAnalyzerController::get_asset_names`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetsOrderType {
    #[default]
    AssetNameAsc,
    AssetNameDesc,
    DependencyResourceCountAsc,
    DependencyResourceCountDesc,
    DependencyAssetCountAsc,
    DependencyAssetCountDesc,
    ScatteredDependencyAssetCountAsc,
    ScatteredDependencyAssetCountDesc,
}

/// Sort order of [`ResourceAnalyzerController::get_scattered_asset_names`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScatteredAssetsOrderType {
    #[default]
    AssetNameAsc,
    AssetNameDesc,
    HostAssetCountAsc,
    HostAssetCountDesc,
}

/// Progress hooks fired by [`ResourceAnalyzerController::analyze`]
pub trait AnalyzeListener {
    fn on_analyzing_asset(&mut self, _index: usize, _count: usize) {}

    fn on_analyze_completed(&mut self) {}
}

impl AnalyzeListener for () {}

/// Dependency analyzer over one resource collection
pub struct ResourceAnalyzerController<D: AssetDatabase> {
    database: D,
    collection_path: PathBuf,
    collection: ResourceCollection,
    state: AnalyzerState,
    dependency_datas: BTreeMap<String, DependencyData>,
    scattered_assets: IndexMap<String, Vec<AssetRef>>,
    circular_dependency_datas: Vec<Vec<String>>,
}

impl<D: AssetDatabase> ResourceAnalyzerController<D> {
    pub fn new<P: Into<PathBuf>>(database: D, collection_path: P) -> Self {
        Self {
            database,
            collection_path: collection_path.into(),
            collection: ResourceCollection::new(),
            state: AnalyzerState::Uninitialized,
            dependency_datas: BTreeMap::new(),
            scattered_assets: IndexMap::new(),
            circular_dependency_datas: Vec::new(),
        }
    }

    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    pub fn collection_path(&self) -> &Path {
        &self.collection_path
    }

    pub fn collection(&self) -> &ResourceCollection {
        &self.collection
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Load the resource collection
    ///
    /// Returns `false` when the collection file is missing or unreadable; the
    /// caller should ask the user to create it with the collection editor.
    pub fn prepare(&mut self, listener: &mut dyn CollectionLoadListener) -> bool {
        self.reset_results();
        self.collection.clear();
        self.state = AnalyzerState::Uninitialized;

        match ResourceCollection::load(&self.collection_path, &self.database, listener) {
            Ok(collection) => {
                self.collection = collection;
                self.state = AnalyzerState::Prepared;
                true
            }
            Err(e) => {
                warn!(
                    "Can not load resource collection '{}': {}",
                    self.collection_path.display(),
                    e
                );
                false
            }
        }
    }

    /// Compute dependency data, scattered assets and circular dependencies
    ///
    /// Assets whose guid or dependencies can not be resolved are skipped.
    pub fn analyze(&mut self, listener: &mut dyn AnalyzeListener) -> Result<()> {
        if self.state == AnalyzerState::Uninitialized {
            return Err(AnalyzerError::InvalidState {
                required: AnalyzerState::Prepared,
                actual: self.state,
            });
        }

        self.reset_results();

        let mut stamps = BTreeSet::new();
        let mut walker = DependencyWalker {
            database: &self.database,
            collection: &self.collection,
            scattered_assets: &mut self.scattered_assets,
            stamps: &mut stamps,
        };

        let count = self.collection.asset_count();
        for (index, asset) in self.collection.assets().enumerate() {
            listener.on_analyzing_asset(index, count);

            let Some(asset_name) = asset.name(&self.database) else {
                warn!("Can not find asset by guid '{}'", asset.guid());
                continue;
            };
            let Some(resource) = asset.resource() else {
                continue;
            };

            let host = AssetRef {
                guid: asset.guid().to_string(),
                name: asset_name.to_string(),
                resource: resource.clone(),
            };
            let mut dependency_data = DependencyData::new();
            walker.walk(asset_name, &host, &mut dependency_data);
            dependency_data.refresh_data();
            self.dependency_datas.insert(host.name, dependency_data);
        }

        for hosts in self.scattered_assets.values_mut() {
            hosts.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let stamps: Vec<Stamp> = stamps.into_iter().collect();
        self.circular_dependency_datas = CircularDependencyChecker::new(&stamps).check();

        self.state = AnalyzerState::Analyzed;
        listener.on_analyze_completed();
        info!(
            "Analyzed {} assets: {} scattered assets, {} circular dependencies",
            self.dependency_datas.len(),
            self.scattered_assets.len(),
            self.circular_dependency_datas.len()
        );
        Ok(())
    }

    /// Names of analyzed assets, filtered by a case-insensitive substring
    pub fn get_asset_names(&self, order: AssetsOrderType, filter: Option<&str>) -> Vec<String> {
        let filter = normalized_filter(filter);
        let mut entries: Vec<(&String, &DependencyData)> = self
            .dependency_datas
            .iter()
            .filter(|(name, _)| matches_filter(name, filter.as_deref()))
            .collect();

        entries.sort_by(|(a_name, a), (b_name, b)| {
            let by_name = a_name.cmp(b_name);
            match order {
                AssetsOrderType::AssetNameAsc => by_name,
                AssetsOrderType::AssetNameDesc => by_name.reverse(),
                AssetsOrderType::DependencyResourceCountAsc => a
                    .dependency_resource_count()
                    .cmp(&b.dependency_resource_count())
                    .then(by_name),
                AssetsOrderType::DependencyResourceCountDesc => b
                    .dependency_resource_count()
                    .cmp(&a.dependency_resource_count())
                    .then(by_name),
                AssetsOrderType::DependencyAssetCountAsc => a
                    .dependency_asset_count()
                    .cmp(&b.dependency_asset_count())
                    .then(by_name),
                AssetsOrderType::DependencyAssetCountDesc => b
                    .dependency_asset_count()
                    .cmp(&a.dependency_asset_count())
                    .then(by_name),
                AssetsOrderType::ScatteredDependencyAssetCountAsc => a
                    .scattered_dependency_asset_count()
                    .cmp(&b.scattered_dependency_asset_count())
                    .then(by_name),
                AssetsOrderType::ScatteredDependencyAssetCountDesc => b
                    .scattered_dependency_asset_count()
                    .cmp(&a.scattered_dependency_asset_count())
                    .then(by_name),
            }
        });

        entries.into_iter().map(|(name, _)| name.clone()).collect()
    }

    /// Names of scattered assets, filtered by a case-insensitive substring
    pub fn get_scattered_asset_names(
        &self,
        order: ScatteredAssetsOrderType,
        filter: Option<&str>,
    ) -> Vec<String> {
        let filter = normalized_filter(filter);
        let mut entries: Vec<(&String, usize)> = self
            .scattered_assets
            .iter()
            .filter(|(name, _)| matches_filter(name, filter.as_deref()))
            .map(|(name, hosts)| (name, hosts.len()))
            .collect();

        entries.sort_by(|(a_name, a_hosts), (b_name, b_hosts)| {
            let by_name: Ordering = a_name.cmp(b_name);
            match order {
                ScatteredAssetsOrderType::AssetNameAsc => by_name,
                ScatteredAssetsOrderType::AssetNameDesc => by_name.reverse(),
                ScatteredAssetsOrderType::HostAssetCountAsc => a_hosts.cmp(b_hosts).then(by_name),
                ScatteredAssetsOrderType::HostAssetCountDesc => b_hosts.cmp(a_hosts).then(by_name),
            }
        });

        entries.into_iter().map(|(name, _)| name.clone()).collect()
    }

    /// Assets that depend on a scattered asset, ordered by name
    pub fn get_host_assets(&self, scattered_asset_name: &str) -> &[AssetRef] {
        self.scattered_assets
            .get(scattered_asset_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get_dependency_data(&self, asset_name: &str) -> Result<&DependencyData> {
        self.dependency_datas
            .get(asset_name)
            .ok_or_else(|| AnalyzerError::unknown_asset(asset_name))
    }

    /// Cycle routes found by the last [`analyze`](Self::analyze)
    pub fn get_circular_dependency_datas(&self) -> &[Vec<String>] {
        &self.circular_dependency_datas
    }

    fn reset_results(&mut self) {
        self.dependency_datas.clear();
        self.scattered_assets.clear();
        self.circular_dependency_datas.clear();
    }
}

/// Walks dependencies on behalf of one host asset
struct DependencyWalker<'a, D: AssetDatabase> {
    database: &'a D,
    collection: &'a ResourceCollection,
    scattered_assets: &'a mut IndexMap<String, Vec<AssetRef>>,
    stamps: &'a mut BTreeSet<Stamp>,
}

impl<D: AssetDatabase> DependencyWalker<'_, D> {
    /// Record the direct dependencies of `asset_name` for `host`; scattered
    /// dependencies are walked further, bundled ones end the walk.
    ///
    /// A host reached back through scattered assets is recorded like any
    /// other bundled dependency, leaving a (host, host) stamp.
    fn walk(&mut self, asset_name: &str, host: &AssetRef, dependency_data: &mut DependencyData) {
        for dependency_name in self.database.dependencies(asset_name) {
            if dependency_name == asset_name || is_script_path(&dependency_name) {
                continue;
            }

            if !self
                .stamps
                .insert(Stamp::new(host.name.as_str(), dependency_name.as_str()))
            {
                continue;
            }

            let Some(guid) = self.database.path_to_guid(&dependency_name) else {
                warn!("Can not find guid by asset '{}'", dependency_name);
                continue;
            };

            let owner = self
                .collection
                .get_asset(&guid)
                .and_then(|asset| asset.resource().cloned());

            match owner {
                Some(resource) => {
                    dependency_data.add_dependency_asset(AssetRef {
                        guid,
                        name: dependency_name,
                        resource,
                    });
                }
                None => {
                    debug!("'{}' depends on scattered asset '{}'", host.name, dependency_name);
                    dependency_data.add_scattered_dependency_asset(dependency_name.as_str());
                    self.scattered_assets
                        .entry(dependency_name.clone())
                        .or_default()
                        .push(host.clone());
                    self.walk(&dependency_name, host, dependency_data);
                }
            }
        }
    }
}

fn normalized_filter(filter: Option<&str>) -> Option<String> {
    filter
        .map(str::trim)
        .filter(|filter| !filter.is_empty())
        .map(str::to_lowercase)
}

fn matches_filter(name: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) => name.to_lowercase().contains(filter),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = normalized_filter(Some("  Prefab "));
        assert!(matches_filter("Assets/Hero.PREFAB", filter.as_deref()));
        assert!(!matches_filter("Assets/Hero.mat", filter.as_deref()));
        assert!(matches_filter("anything", normalized_filter(Some("")).as_deref()));
        assert!(matches_filter("anything", None));
    }
}
