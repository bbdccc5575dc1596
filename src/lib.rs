//! Game Framework Resource Tools
//!
//! Editor-side tooling for Game Framework resources: loading the resource
//! collection, analyzing asset dependencies (scattered assets and circular
//! dependencies) and building resource packs that carry the difference
//! between two full builds.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gf_resource::{AssetsOrderType, ResourceAnalyzerController, SnapshotAssetDatabase};
//!
//! let database = SnapshotAssetDatabase::load("AssetDatabase.yaml")?;
//! let mut analyzer = ResourceAnalyzerController::new(database, "ResourceCollection.xml");
//! if analyzer.prepare(&mut ()) {
//!     analyzer.analyze(&mut ())?;
//!     for name in analyzer.get_asset_names(AssetsOrderType::AssetNameAsc, None) {
//!         println!("{}", name);
//!     }
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export the member crates
pub use gf_resource_analyzer as analyzer;
pub use gf_resource_core as resource;
pub use gf_resource_pack as pack;

// Re-export main types
pub use gf_resource_analyzer::{
    AnalyzeListener, AnalyzerError, AnalyzerState, AssetRef, AssetsOrderType,
    CircularDependencyChecker, DependencyData, ResourceAnalyzerController,
    ScatteredAssetsOrderType, Stamp,
};
pub use gf_resource_core::{
    Asset, AssetDatabase, AssetType, CollectionLoadListener, LoadType, Platform, Resource,
    ResourceCollection, ResourceError, ResourceKey, SnapshotAssetDatabase,
};
pub use gf_resource_pack::{
    BuildResourcePacksListener, BuiltResourcePack, CompressionHelper, CompressionHelperRegistry,
    PackError, ResourcePackBuilderConfig, ResourcePackBuilderController, ResourcePackVersionList,
    UpdatableVersionList,
};
