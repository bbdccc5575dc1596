//! Resource pack builder controller
//!
//! A resource pack holds every resource of a target version that is new or
//! changed relative to a source version. The file is a
//! [`ResourcePackVersionList`] header followed by the compressed resource
//! files in header order.

use super::config::ResourcePackBuilderConfig;
use super::listener::BuildResourcePacksListener;
use crate::compression::{CompressionHelper, CompressionHelperRegistry};
use crate::error::{PackError, Result};
use crate::verifier::crc32_stream;
use crate::version_list::{PackedResource, ResourcePackVersionList, UpdatableVersionList, VersionResource};
use gf_resource_core::{
    DEFAULT_EXTENSION, FULL_DIRECTORY_NAME, NONE_VERSION_NAME, RESOURCE_PACK_DIRECTORY_NAME,
    RESOURCE_PACK_FILE_PREFIX,
};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Outcome of one successful pack build
#[derive(Debug, Clone)]
pub struct BuiltResourcePack {
    pub path: PathBuf,
    pub header: ResourcePackVersionList,
    pub backup_path: Option<PathBuf>,
}

pub struct ResourcePackBuilderController {
    config: ResourcePackBuilderConfig,
    compression_helper: Box<dyn CompressionHelper>,
}

impl ResourcePackBuilderController {
    /// Create a builder using the default compression helpers
    pub fn new(config: ResourcePackBuilderConfig) -> Result<Self> {
        Self::with_registry(config, &CompressionHelperRegistry::default())
    }

    pub fn with_registry(
        config: ResourcePackBuilderConfig,
        registry: &CompressionHelperRegistry,
    ) -> Result<Self> {
        let compression_helper = registry.create(&config.compression_helper_type_name)?;
        Ok(Self {
            config,
            compression_helper,
        })
    }

    pub fn config(&self) -> &ResourcePackBuilderConfig {
        &self.config
    }

    pub fn compression_helper(&self) -> &dyn CompressionHelper {
        self.compression_helper.as_ref()
    }

    /// `{working_directory}/Full`
    pub fn full_path(&self) -> PathBuf {
        self.config.working_directory.join(FULL_DIRECTORY_NAME)
    }

    /// `{working_directory}/Full/{version}/{platform}`
    pub fn version_path(&self, version: &str) -> PathBuf {
        self.full_path()
            .join(version)
            .join(self.config.platform.as_str())
    }

    /// `{working_directory}/ResourcePack/{platform}`
    pub fn output_path(&self) -> PathBuf {
        self.config
            .working_directory
            .join(RESOURCE_PACK_DIRECTORY_NAME)
            .join(self.config.platform.as_str())
    }

    pub fn is_valid_working_directory(&self) -> bool {
        !self.config.working_directory.as_os_str().is_empty() && self.full_path().is_dir()
    }

    /// Versions under `Full/` built for the configured platform
    ///
    /// Ordered by internal resource version (the number after the last `_`),
    /// then by name.
    pub fn get_version_names(&self) -> Vec<String> {
        if !self.is_valid_working_directory() {
            return Vec::new();
        }

        let entries = match fs::read_dir(self.full_path()) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Can not list '{}': {}", self.full_path().display(), e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| self.version_path(name).is_dir())
            .collect();
        names.sort_by(|a, b| {
            internal_resource_version(a)
                .cmp(&internal_resource_version(b))
                .then_with(|| a.cmp(b))
        });
        names
    }

    /// Load the version list of a built version
    pub fn load_version_list(&self, version: &str) -> Result<(PathBuf, UpdatableVersionList)> {
        let path = UpdatableVersionList::find_file(&self.version_path(version))?;
        let list = UpdatableVersionList::load(&path, self.compression_helper())?;
        Ok((path, list))
    }

    /// Build the full pack and one pack per source version
    ///
    /// A failed pair is logged and reported to the listener; the remaining
    /// pairs are still built. Returns the number of packs built.
    pub fn build_resource_packs(
        &self,
        source_versions: &[String],
        target_version: &str,
        listener: &mut dyn BuildResourcePacksListener,
    ) -> usize {
        let count = source_versions.len() + 1;
        listener.on_build_resource_packs_started(count);

        let sources = std::iter::once(None).chain(source_versions.iter().map(|v| Some(v.as_str())));
        let mut success_count = 0;
        for (index, source_version) in sources.enumerate() {
            match self.build_resource_pack(source_version, target_version) {
                Ok(pack) => {
                    success_count += 1;
                    info!(
                        "Built resource pack '{}' with {} resources",
                        pack.path.display(),
                        pack.header.resources.len()
                    );
                    listener.on_build_resource_pack_success(
                        index,
                        count,
                        source_version,
                        target_version,
                    );
                }
                Err(e) => {
                    error!(
                        "Build resource pack from '{}' to '{}' failed: {}",
                        source_version.unwrap_or(NONE_VERSION_NAME),
                        target_version,
                        e
                    );
                    listener.on_build_resource_pack_failure(
                        index,
                        count,
                        source_version,
                        target_version,
                    );
                }
            }
        }

        listener.on_build_resource_packs_completed(success_count, count);
        success_count
    }

    /// Build the pack from `source_version` (or nothing) to `target_version`
    pub fn build_resource_pack(
        &self,
        source_version: Option<&str>,
        target_version: &str,
    ) -> Result<BuiltResourcePack> {
        if !self.is_valid_working_directory() {
            return Err(PackError::InvalidWorkingDirectory(
                self.config.working_directory.clone(),
            ));
        }

        let (target_list_path, target_list) = self.load_version_list(target_version)?;
        let source_list = match source_version {
            Some(version) => self.load_version_list(version)?.1,
            None => UpdatableVersionList::default(),
        };

        let changed = changed_resources(&source_list, &target_list);
        debug!(
            "{} of {} resources changed from '{}' to '{}'",
            changed.len(),
            target_list.resources.len(),
            source_version.unwrap_or(NONE_VERSION_NAME),
            target_version
        );

        let pack_name = resource_pack_name(source_version, target_version);
        let output_path = self.output_path();
        fs::create_dir_all(&output_path)?;
        let working_path = output_path.join(format!("{}.{}", pack_name, DEFAULT_EXTENSION));

        let header = match self.write_pack(&working_path, target_version, &changed) {
            Ok(header) => header,
            Err(e) => {
                if working_path.exists()
                    && let Err(remove_error) = fs::remove_file(&working_path)
                {
                    warn!(
                        "Can not delete incomplete resource pack '{}': {}",
                        working_path.display(),
                        remove_error
                    );
                }
                return Err(e);
            }
        };

        let final_name = format!("{}.{:08x}", pack_name, header.hash);
        let path = output_path.join(format!("{}.{}", final_name, DEFAULT_EXTENSION));
        if path.exists() {
            fs::remove_file(&path)?;
        }
        fs::rename(&working_path, &path)?;

        let backup_path = if self.config.backup_diff {
            let backup_working_path = output_path.join(&pack_name);
            match self.backup_diff(
                &backup_working_path,
                &output_path.join(&final_name),
                target_version,
                &target_list_path,
                &changed,
            ) {
                Ok(backup_path) => Some(backup_path),
                Err(e) => {
                    if backup_working_path.exists()
                        && let Err(remove_error) = fs::remove_dir_all(&backup_working_path)
                    {
                        warn!(
                            "Can not delete incomplete backup '{}': {}",
                            backup_working_path.display(),
                            remove_error
                        );
                    }
                    return Err(e);
                }
            }
        } else {
            None
        };

        Ok(BuiltResourcePack {
            path,
            header,
            backup_path,
        })
    }

    /// Write header and body, then patch the header with the body position,
    /// length and CRC32
    fn write_pack(
        &self,
        path: &Path,
        target_version: &str,
        changed: &[&VersionResource],
    ) -> Result<ResourcePackVersionList> {
        let serializer = ResourcePackVersionList::serializer();

        let mut offset = 0u64;
        let resources: Vec<PackedResource> = changed
            .iter()
            .map(|resource| {
                let packed = PackedResource {
                    name: resource.name.clone(),
                    variant: resource.variant.clone(),
                    extension: resource.extension.clone(),
                    load_type: resource.load_type,
                    offset,
                    length: resource.length,
                    hash: resource.hash,
                    compressed_length: resource.compressed_length,
                    compressed_hash: resource.compressed_hash,
                };
                offset += u64::from(resource.compressed_length);
                packed
            })
            .collect();
        let mut header = ResourcePackVersionList::placeholder(resources);
        let body_length = header.body_length();

        let placeholder = serializer.serialize(&header)?;
        let header_length = placeholder.len();

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&placeholder)?;

        let version_path = self.version_path(target_version);
        let mut written = 0u64;
        for resource in changed {
            let resource_path = version_path.join(resource.full_file_name());
            if !resource_path.is_file() {
                return Err(PackError::ResourceFileNotFound(resource_path));
            }
            let bytes = fs::read(&resource_path)?;
            writer.write_all(&bytes)?;
            written += bytes.len() as u64;
        }
        writer.flush()?;
        drop(writer);

        if written != body_length {
            return Err(PackError::length_mismatch(
                "resource pack body",
                body_length,
                written,
            ));
        }

        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        file.seek(SeekFrom::Start(header_length as u64))?;
        let (hash, hashed) = crc32_stream(&mut file)?;
        if hashed != body_length {
            return Err(PackError::length_mismatch(
                "resource pack body",
                body_length,
                hashed,
            ));
        }

        header.offset = u32::try_from(header_length)
            .map_err(|_| PackError::invalid_data("resource pack header is too large"))?;
        header.length = body_length;
        header.hash = hash;
        let bytes = serializer.serialize(&header)?;
        if bytes.len() != header_length {
            return Err(PackError::length_mismatch(
                "resource pack header",
                header_length as u64,
                bytes.len() as u64,
            ));
        }

        file.seek(SeekFrom::Start(0))?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(header)
    }

    /// Write the decompressed changed resources into `final_path`
    fn backup_diff(
        &self,
        working_path: &Path,
        final_path: &Path,
        target_version: &str,
        target_list_path: &Path,
        changed: &[&VersionResource],
    ) -> Result<PathBuf> {
        if working_path.exists() {
            fs::remove_dir_all(working_path)?;
        }
        fs::create_dir_all(working_path)?;

        let version_path = self.version_path(target_version);
        for resource in changed {
            let compressed = fs::read(version_path.join(resource.full_file_name()))?;
            let bytes = self.compression_helper.decompress(&compressed)?;
            if bytes.len() as u64 != u64::from(resource.length) {
                return Err(PackError::length_mismatch(
                    format!("backup of '{}'", resource.full_name()),
                    u64::from(resource.length),
                    bytes.len() as u64,
                ));
            }

            let backup_file = working_path.join(resource.backup_file_name());
            if let Some(parent) = backup_file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&backup_file, bytes)?;
        }

        if self.config.backup_version
            && let Some(file_name) = target_list_path.file_name()
        {
            fs::copy(target_list_path, working_path.join(file_name))?;
        }

        if final_path.exists() {
            fs::remove_dir_all(final_path)?;
        }
        fs::rename(working_path, final_path)?;
        Ok(final_path.to_path_buf())
    }
}

/// `GameFrameworkResourcePack-{source|none-version}-{target}`
pub fn resource_pack_name(source_version: Option<&str>, target_version: &str) -> String {
    format!(
        "{}-{}-{}",
        RESOURCE_PACK_FILE_PREFIX,
        source_version.unwrap_or(NONE_VERSION_NAME),
        target_version
    )
}

/// Resources of `target` that `source` lacks or holds with other content
pub fn changed_resources<'a>(
    source: &UpdatableVersionList,
    target: &'a UpdatableVersionList,
) -> Vec<&'a VersionResource> {
    let by_identity: HashMap<(&str, Option<&str>, &str), &VersionResource> = source
        .resources
        .iter()
        .map(|resource| {
            (
                (
                    resource.name.as_str(),
                    resource.variant.as_deref(),
                    resource.extension.as_str(),
                ),
                resource,
            )
        })
        .collect();

    target
        .resources
        .iter()
        .filter(|resource| {
            let identity = (
                resource.name.as_str(),
                resource.variant.as_deref(),
                resource.extension.as_str(),
            );
            !by_identity
                .get(&identity)
                .is_some_and(|old| old.same_content(resource))
        })
        .collect()
}

/// Number after the last `_` of a version name, e.g. `1_0_3` -> 3
fn internal_resource_version(version_name: &str) -> Option<u32> {
    version_name
        .rsplit_once('_')
        .and_then(|(_, number)| number.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_resource_core::LoadType;

    fn resource(name: &str, hash: u32) -> VersionResource {
        VersionResource {
            name: name.to_string(),
            variant: None,
            extension: DEFAULT_EXTENSION.to_string(),
            load_type: LoadType::LoadFromFile,
            length: 10,
            hash,
            compressed_length: 8,
            compressed_hash: hash,
            asset_indexes: Vec::new(),
        }
    }

    fn list(resources: Vec<VersionResource>) -> UpdatableVersionList {
        UpdatableVersionList {
            resources,
            ..UpdatableVersionList::default()
        }
    }

    #[test]
    fn test_changed_resources() {
        let source = list(vec![resource("a", 1), resource("b", 2), resource("c", 3)]);
        let mut moved = resource("c", 3);
        moved.load_type = LoadType::LoadFromMemory;
        let target = list(vec![resource("a", 1), resource("b", 9), moved, resource("d", 4)]);

        let names: Vec<&str> = changed_resources(&source, &target)
            .iter()
            .map(|resource| resource.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "c", "d"]);

        assert_eq!(
            changed_resources(&UpdatableVersionList::default(), &target).len(),
            4
        );
        assert!(changed_resources(&target, &target).is_empty());
    }

    #[test]
    fn test_resource_pack_name() {
        assert_eq!(
            resource_pack_name(None, "1_0_2"),
            "GameFrameworkResourcePack-none-version-1_0_2"
        );
        assert_eq!(
            resource_pack_name(Some("1_0_1"), "1_0_2"),
            "GameFrameworkResourcePack-1_0_1-1_0_2"
        );
    }

    #[test]
    fn test_internal_resource_version() {
        assert_eq!(internal_resource_version("1_0_12"), Some(12));
        assert_eq!(internal_resource_version("release"), None);
        assert_eq!(internal_resource_version("1_0_beta"), None);
    }
}
