//! Game Framework Resource Core
//!
//! Core data structures shared by the resource tooling crates: assets,
//! resources (asset bundles), the editable resource collection and the
//! asset database the collection resolves guids through.

pub mod asset;
pub mod collection;
pub mod constants;
pub mod database;
pub mod error;
pub mod platform;
pub mod resource;
mod xml;

// Re-export main types
pub use asset::Asset;
pub use collection::{CollectionLoadListener, ResourceCollection};
pub use constants::*;
pub use database::{AssetDatabase, AssetRecord, SnapshotAssetDatabase};
pub use error::{ResourceError, Result};
pub use platform::Platform;
pub use resource::{AssetType, LoadType, Resource, ResourceKey};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        let key = ResourceKey::new("ui/main", Some("hd"));
        assert_eq!(key.full_name(), "ui/main.hd");
        assert_eq!(key.to_string(), "ui/main.hd");
    }
}
