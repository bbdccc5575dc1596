//! Game Framework Resource Pack
//!
//! Binary version list codecs and the resource pack builder, which packs the
//! resources that changed between two full builds into a single file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gf_resource_core::Platform;
//! use gf_resource_pack::{ResourcePackBuilderConfig, ResourcePackBuilderController};
//!
//! let config = ResourcePackBuilderConfig::new("Build", Platform::Android);
//! let builder = ResourcePackBuilderController::new(config)?;
//! let versions = builder.get_version_names();
//! if let Some((target, sources)) = versions.split_last() {
//!     builder.build_resource_packs(sources, target, &mut ());
//! }
//! # Ok::<(), gf_resource_pack::PackError>(())
//! ```

pub mod builder;
pub mod compression;
pub mod encryption;
pub mod error;
pub mod reader;
pub mod serializer;
pub mod verifier;
pub mod version_list;
pub mod writer;

// Re-export main types
pub use builder::{
    BuildResourcePacksListener, BuiltResourcePack, ResourcePackBuilderConfig,
    ResourcePackBuilderController,
};
pub use compression::{
    CompressionHelper, CompressionHelperRegistry, DefaultCompressionHelper, Lz4CompressionHelper,
    NoneCompressionHelper,
};
pub use error::{PackError, Result};
pub use reader::BinaryReader;
pub use serializer::VersionedSerializer;
pub use version_list::{
    PackedResource, ResourcePackVersionList, UpdatableVersionList, VersionAsset,
    VersionFileSystem, VersionResource, VersionResourceGroup,
};
pub use writer::BinaryWriter;
