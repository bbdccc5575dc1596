//! Updatable version list (`GameFrameworkVersion.{crc:x8}.dat`)
//!
//! Format versions:
//! - 0: assets, resources and resource groups
//! - 1: resources also carry their compressed length and hash
//! - 2: adds file systems between resources and resource groups

use super::{
    read_count, read_extension, read_indexes, read_load_type, read_name, write_extension,
    write_indexes,
};
use crate::compression::CompressionHelper;
use crate::encryption::{ENCRYPT_KEY_LENGTH, random_key};
use crate::error::{PackError, Result};
use crate::reader::BinaryReader;
use crate::serializer::VersionedSerializer;
use crate::verifier::crc32;
use crate::writer::BinaryWriter;
use gf_resource_core::{DEFAULT_EXTENSION, LoadType, VERSION_LIST_FILE_PREFIX, full_name};
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static SERIALIZER: Lazy<VersionedSerializer<UpdatableVersionList>> = Lazy::new(|| {
    let mut serializer = VersionedSerializer::new("updatable version list", *b"GFU");
    serializer.register_serialize_callback(0, serialize_v0);
    serializer.register_serialize_callback(1, serialize_v1);
    serializer.register_serialize_callback(2, serialize_v2);
    serializer.register_deserialize_callback(0, deserialize_v0);
    serializer.register_deserialize_callback(1, deserialize_v1);
    serializer.register_deserialize_callback(2, deserialize_v2);
    serializer
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionAsset {
    pub name: String,
    pub dependency_asset_indexes: Vec<usize>,
}

/// One resource of a full build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResource {
    pub name: String,
    pub variant: Option<String>,
    pub extension: String,
    pub load_type: LoadType,
    pub length: u32,
    pub hash: u32,
    pub compressed_length: u32,
    pub compressed_hash: u32,
    pub asset_indexes: Vec<usize>,
}

impl VersionResource {
    pub fn full_name(&self) -> String {
        full_name(&self.name, self.variant.as_deref())
    }

    /// Name of the compressed file under `Full/{version}/{platform}/`
    pub fn full_file_name(&self) -> String {
        format!(
            "{}.{:08x}.{}",
            self.full_name(),
            self.hash,
            DEFAULT_EXTENSION
        )
    }

    /// Name of the decompressed file in a backup directory
    pub fn backup_file_name(&self) -> String {
        format!("{}.{}", self.full_name(), self.extension)
    }

    /// Whether `other` describes the same resource
    pub fn same_identity(&self, other: &VersionResource) -> bool {
        self.name == other.name && self.variant == other.variant && self.extension == other.extension
    }

    /// Whether `other` describes the same resource with identical content
    pub fn same_content(&self, other: &VersionResource) -> bool {
        self.same_identity(other)
            && self.load_type == other.load_type
            && self.length == other.length
            && self.hash == other.hash
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFileSystem {
    pub name: String,
    pub resource_indexes: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResourceGroup {
    pub name: String,
    pub resource_indexes: Vec<usize>,
}

/// Manifest of one full build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatableVersionList {
    pub applicable_game_version: String,
    pub internal_resource_version: u32,
    pub assets: Vec<VersionAsset>,
    pub resources: Vec<VersionResource>,
    pub file_systems: Vec<VersionFileSystem>,
    pub resource_groups: Vec<VersionResourceGroup>,
}

impl UpdatableVersionList {
    pub fn serializer() -> &'static VersionedSerializer<UpdatableVersionList> {
        &SERIALIZER
    }

    /// `GameFrameworkVersion.{crc:x8}.dat` with the crc of the serialized bytes
    pub fn file_name(crc: u32) -> String {
        format!("{}.{:08x}.{}", VERSION_LIST_FILE_PREFIX, crc, DEFAULT_EXTENSION)
    }

    /// Whether a file name follows the version list naming
    pub fn is_version_list_file_name(file_name: &str) -> bool {
        file_name
            .strip_prefix(VERSION_LIST_FILE_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|rest| rest.strip_suffix(DEFAULT_EXTENSION))
            .is_some_and(|rest| rest.ends_with('.'))
    }

    /// Find the version list file in a `Full/{version}/{platform}` directory
    pub fn find_file(directory: &Path) -> Result<PathBuf> {
        let mut candidates = Vec::new();
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if Self::is_version_list_file_name(&entry.file_name().to_string_lossy()) {
                candidates.push(entry.path());
            }
        }
        candidates.sort();
        candidates
            .into_iter()
            .next()
            .ok_or_else(|| PackError::VersionListNotFound(directory.to_path_buf()))
    }

    /// Read and decompress a version list file
    pub fn load(path: &Path, helper: &dyn CompressionHelper) -> Result<Self> {
        let compressed = fs::read(path)?;
        let bytes = helper.decompress(&compressed)?;
        debug!(
            "Loaded version list '{}' ({} -> {} bytes)",
            path.display(),
            compressed.len(),
            bytes.len()
        );
        Self::serializer().deserialize(&bytes)
    }

    /// Serialize, compress and write into `directory`, returning the file path
    pub fn save_to_directory(&self, directory: &Path, helper: &dyn CompressionHelper) -> Result<PathBuf> {
        let bytes = Self::serializer().serialize(self)?;
        let path = directory.join(Self::file_name(crc32(&bytes)));
        fs::create_dir_all(directory)?;
        fs::write(&path, helper.compress(&bytes)?)?;
        Ok(path)
    }
}

struct Layout {
    compressed: bool,
    file_systems: bool,
}

const V0: Layout = Layout {
    compressed: false,
    file_systems: false,
};
const V1: Layout = Layout {
    compressed: true,
    file_systems: false,
};
const V2: Layout = Layout {
    compressed: true,
    file_systems: true,
};

fn serialize_v0(writer: &mut BinaryWriter<Vec<u8>>, list: &UpdatableVersionList) -> Result<()> {
    serialize_with_layout(writer, list, &V0)
}

fn serialize_v1(writer: &mut BinaryWriter<Vec<u8>>, list: &UpdatableVersionList) -> Result<()> {
    serialize_with_layout(writer, list, &V1)
}

fn serialize_v2(writer: &mut BinaryWriter<Vec<u8>>, list: &UpdatableVersionList) -> Result<()> {
    serialize_with_layout(writer, list, &V2)
}

fn deserialize_v0(reader: &mut BinaryReader<'_>) -> Result<UpdatableVersionList> {
    deserialize_with_layout(reader, &V0)
}

fn deserialize_v1(reader: &mut BinaryReader<'_>) -> Result<UpdatableVersionList> {
    deserialize_with_layout(reader, &V1)
}

fn deserialize_v2(reader: &mut BinaryReader<'_>) -> Result<UpdatableVersionList> {
    deserialize_with_layout(reader, &V2)
}

fn serialize_with_layout(
    writer: &mut BinaryWriter<Vec<u8>>,
    list: &UpdatableVersionList,
    layout: &Layout,
) -> Result<()> {
    let key = random_key();
    writer.write_bytes(&key)?;
    writer.write_encrypted_string(Some(&list.applicable_game_version), &key)?;
    writer.write_7bit_encoded_u32(list.internal_resource_version)?;

    writer.write_7bit_encoded_usize(list.assets.len())?;
    for asset in &list.assets {
        writer.write_encrypted_string(Some(&asset.name), &key)?;
        write_indexes(writer, &asset.dependency_asset_indexes)?;
    }

    writer.write_7bit_encoded_usize(list.resources.len())?;
    for resource in &list.resources {
        writer.write_encrypted_string(Some(&resource.name), &key)?;
        writer.write_encrypted_string(resource.variant.as_deref(), &key)?;
        write_extension(writer, &resource.extension, &key)?;
        writer.write_u8(resource.load_type.as_u8())?;
        writer.write_7bit_encoded_u32(resource.length)?;
        writer.write_u32(resource.hash)?;
        if layout.compressed {
            writer.write_7bit_encoded_u32(resource.compressed_length)?;
            writer.write_u32(resource.compressed_hash)?;
        }
        write_indexes(writer, &resource.asset_indexes)?;
    }

    if layout.file_systems {
        writer.write_7bit_encoded_usize(list.file_systems.len())?;
        for file_system in &list.file_systems {
            writer.write_encrypted_string(Some(&file_system.name), &key)?;
            write_indexes(writer, &file_system.resource_indexes)?;
        }
    }

    writer.write_7bit_encoded_usize(list.resource_groups.len())?;
    for group in &list.resource_groups {
        writer.write_encrypted_string(Some(&group.name), &key)?;
        write_indexes(writer, &group.resource_indexes)?;
    }

    Ok(())
}

fn deserialize_with_layout(
    reader: &mut BinaryReader<'_>,
    layout: &Layout,
) -> Result<UpdatableVersionList> {
    let key: [u8; ENCRYPT_KEY_LENGTH] = reader.read_array()?;
    let applicable_game_version = reader.read_encrypted_string(&key)?.unwrap_or_default();
    let internal_resource_version = reader.read_7bit_encoded_u32()?;

    // Dependency indexes may point forward, so they are bounded by the count
    let asset_count = read_count(reader)?;
    let mut assets = Vec::with_capacity(asset_count);
    for _ in 0..asset_count {
        let name = read_name(reader, &key, "asset")?;
        let dependency_asset_indexes = read_indexes(reader, asset_count)?;
        assets.push(VersionAsset {
            name,
            dependency_asset_indexes,
        });
    }

    let resource_count = read_count(reader)?;
    let mut resources = Vec::with_capacity(resource_count);
    for _ in 0..resource_count {
        let name = read_name(reader, &key, "resource")?;
        let variant = reader.read_encrypted_string(&key)?;
        let extension = read_extension(reader, &key)?;
        let load_type = read_load_type(reader)?;
        let length = reader.read_7bit_encoded_u32()?;
        let hash = reader.read_u32()?;
        let (compressed_length, compressed_hash) = if layout.compressed {
            (reader.read_7bit_encoded_u32()?, reader.read_u32()?)
        } else {
            (length, hash)
        };
        let asset_indexes = read_indexes(reader, asset_count)?;
        resources.push(VersionResource {
            name,
            variant,
            extension,
            load_type,
            length,
            hash,
            compressed_length,
            compressed_hash,
            asset_indexes,
        });
    }

    let mut file_systems = Vec::new();
    if layout.file_systems {
        let count = read_count(reader)?;
        for _ in 0..count {
            let name = read_name(reader, &key, "file system")?;
            let resource_indexes = read_indexes(reader, resource_count)?;
            file_systems.push(VersionFileSystem {
                name,
                resource_indexes,
            });
        }
    }

    let group_count = read_count(reader)?;
    let mut resource_groups = Vec::with_capacity(group_count);
    for _ in 0..group_count {
        let name = read_name(reader, &key, "resource group")?;
        let resource_indexes = read_indexes(reader, resource_count)?;
        resource_groups.push(VersionResourceGroup {
            name,
            resource_indexes,
        });
    }

    Ok(UpdatableVersionList {
        applicable_game_version,
        internal_resource_version,
        assets,
        resources,
        file_systems,
        resource_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::NoneCompressionHelper;

    fn resource(name: &str, variant: Option<&str>, hash: u32) -> VersionResource {
        VersionResource {
            name: name.to_string(),
            variant: variant.map(str::to_string),
            extension: DEFAULT_EXTENSION.to_string(),
            load_type: LoadType::LoadFromFile,
            length: 100,
            hash,
            compressed_length: 60,
            compressed_hash: hash ^ 0xFFFF,
            asset_indexes: vec![0],
        }
    }

    fn list() -> UpdatableVersionList {
        let mut raw = resource("config", None, 7);
        raw.extension = "bytes".to_string();
        raw.load_type = LoadType::LoadFromBinary;
        raw.asset_indexes = vec![1];

        UpdatableVersionList {
            applicable_game_version: "1.0".to_string(),
            internal_resource_version: 3,
            assets: vec![
                VersionAsset {
                    name: "Assets/Hero.prefab".to_string(),
                    dependency_asset_indexes: vec![1],
                },
                VersionAsset {
                    name: "Assets/Config.bytes".to_string(),
                    dependency_asset_indexes: vec![],
                },
            ],
            resources: vec![resource("characters", Some("hd"), 0xDEAD_BEEF), raw],
            file_systems: vec![VersionFileSystem {
                name: "main".to_string(),
                resource_indexes: vec![0, 1],
            }],
            resource_groups: vec![VersionResourceGroup {
                name: "base".to_string(),
                resource_indexes: vec![0],
            }],
        }
    }

    #[test]
    fn test_latest_format_keeps_everything() {
        let list = list();
        let serializer = UpdatableVersionList::serializer();
        assert_eq!(serializer.latest_version(), Some(2));

        let bytes = serializer.serialize(&list).unwrap();
        assert_eq!(&bytes[..4], b"GFU\x02");
        assert_eq!(serializer.deserialize(&bytes).unwrap(), list);
    }

    #[test]
    fn test_older_formats_drop_newer_fields() {
        let list = list();
        let serializer = UpdatableVersionList::serializer();

        let v1 = serializer
            .deserialize(&serializer.serialize_with_version(&list, 1).unwrap())
            .unwrap();
        assert!(v1.file_systems.is_empty());
        assert_eq!(v1.resources, list.resources);

        let v0 = serializer
            .deserialize(&serializer.serialize_with_version(&list, 0).unwrap())
            .unwrap();
        assert_eq!(v0.resources[0].compressed_length, 100);
        assert_eq!(v0.resources[0].compressed_hash, 0xDEAD_BEEF);
        assert_eq!(v0.resource_groups, list.resource_groups);
    }

    #[test]
    fn test_file_names() {
        let list = list();
        assert_eq!(list.resources[0].full_file_name(), "characters.hd.deadbeef.dat");
        assert_eq!(list.resources[1].full_file_name(), "config.00000007.dat");
        assert_eq!(list.resources[1].backup_file_name(), "config.bytes");
        assert_eq!(
            UpdatableVersionList::file_name(0x1a2b),
            "GameFrameworkVersion.00001a2b.dat"
        );
        assert!(UpdatableVersionList::is_version_list_file_name(
            "GameFrameworkVersion.00001a2b.dat"
        ));
        assert!(!UpdatableVersionList::is_version_list_file_name(
            "GameFrameworkVersion.dat"
        ));
        assert!(!UpdatableVersionList::is_version_list_file_name("characters.hd.deadbeef.dat"));
    }

    #[test]
    fn test_save_and_find_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let list = list();
        let path = list
            .save_to_directory(dir.path(), &NoneCompressionHelper)
            .unwrap();

        assert_eq!(UpdatableVersionList::find_file(dir.path()).unwrap(), path);
        let loaded = UpdatableVersionList::load(&path, &NoneCompressionHelper).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn test_missing_version_list() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            UpdatableVersionList::find_file(dir.path()),
            Err(PackError::VersionListNotFound(_))
        ));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut list = list();
        list.resources[0].asset_indexes = vec![5];
        let bytes = UpdatableVersionList::serializer().serialize(&list).unwrap();
        assert!(matches!(
            UpdatableVersionList::serializer().deserialize(&bytes),
            Err(PackError::InvalidData(_))
        ));
    }

    #[test]
    fn test_resource_comparison() {
        let a = resource("characters", None, 1);
        let mut b = a.clone();
        assert!(a.same_content(&b));
        b.length += 1;
        assert!(a.same_identity(&b));
        assert!(!a.same_content(&b));
        b.extension = "bytes".to_string();
        assert!(!a.same_identity(&b));
    }
}
