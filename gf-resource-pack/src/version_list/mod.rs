//! Version list files
//!
//! [`UpdatableVersionList`] describes every resource of one full build;
//! [`ResourcePackVersionList`] is the header of a resource pack.

pub mod resource_pack;
pub mod updatable;

pub use resource_pack::{PackedResource, ResourcePackVersionList};
pub use updatable::{
    UpdatableVersionList, VersionAsset, VersionFileSystem, VersionResource, VersionResourceGroup,
};

use crate::error::{PackError, Result};
use crate::reader::BinaryReader;
use crate::writer::BinaryWriter;
use gf_resource_core::{DEFAULT_EXTENSION, LoadType};

/// Extension as stored on disk: omitted when it is the default one
pub(crate) fn write_extension(
    writer: &mut BinaryWriter<Vec<u8>>,
    extension: &str,
    key: &[u8],
) -> Result<()> {
    let stored = (extension != DEFAULT_EXTENSION).then_some(extension);
    writer.write_encrypted_string(stored, key)
}

pub(crate) fn read_extension(reader: &mut BinaryReader<'_>, key: &[u8]) -> Result<String> {
    Ok(reader
        .read_encrypted_string(key)?
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()))
}

pub(crate) fn read_name(reader: &mut BinaryReader<'_>, key: &[u8], what: &str) -> Result<String> {
    reader
        .read_encrypted_string(key)?
        .ok_or_else(|| PackError::invalid_data(format!("{} name is empty", what)))
}

pub(crate) fn read_load_type(reader: &mut BinaryReader<'_>) -> Result<LoadType> {
    Ok(LoadType::from_u8(reader.read_u8()?)?)
}

pub(crate) fn write_indexes(writer: &mut BinaryWriter<Vec<u8>>, indexes: &[usize]) -> Result<()> {
    writer.write_7bit_encoded_usize(indexes.len())?;
    for &index in indexes {
        writer.write_7bit_encoded_usize(index)?;
    }
    Ok(())
}

/// Read an index list, rejecting entries outside `0..bound`
pub(crate) fn read_indexes(reader: &mut BinaryReader<'_>, bound: usize) -> Result<Vec<usize>> {
    let count = reader.read_7bit_encoded_usize()?;
    let mut indexes = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        let index = reader.read_7bit_encoded_usize()?;
        if index >= bound {
            return Err(PackError::invalid_data(format!(
                "index {} out of range 0..{}",
                index, bound
            )));
        }
        indexes.push(index);
    }
    Ok(indexes)
}

/// Read an element count, capped by the bytes left so a corrupt count can
/// not trigger a huge allocation
pub(crate) fn read_count(reader: &mut BinaryReader<'_>) -> Result<usize> {
    let count = reader.read_7bit_encoded_usize()?;
    if count > reader.remaining() {
        return Err(PackError::not_enough_data(count, reader.remaining()));
    }
    Ok(count)
}
