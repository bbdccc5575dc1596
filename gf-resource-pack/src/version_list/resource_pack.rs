//! Resource pack header (`GFK`, format version 0)
//!
//! The header is followed by the compressed bytes of every packed resource.
//! `offset`, `length` and `hash` locate and checksum that body; they are
//! stored fixed-width so the header can be rewritten in place once the body
//! is known.

use super::{read_count, read_extension, read_load_type, read_name, write_extension};
use crate::encryption::{ENCRYPT_KEY_LENGTH, random_key};
use crate::error::{PackError, Result};
use crate::reader::BinaryReader;
use crate::serializer::VersionedSerializer;
use crate::writer::BinaryWriter;
use gf_resource_core::{LoadType, full_name};
use once_cell::sync::Lazy;

static SERIALIZER: Lazy<VersionedSerializer<ResourcePackVersionList>> = Lazy::new(|| {
    let mut serializer = VersionedSerializer::new("resource pack version list", *b"GFK");
    serializer.register_serialize_callback(0, serialize_v0);
    serializer.register_deserialize_callback(0, deserialize_v0);
    serializer
});

/// One resource stored in a pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedResource {
    pub name: String,
    pub variant: Option<String>,
    pub extension: String,
    pub load_type: LoadType,
    /// Position of the compressed bytes relative to the start of the body
    pub offset: u64,
    pub length: u32,
    pub hash: u32,
    pub compressed_length: u32,
    pub compressed_hash: u32,
}

impl PackedResource {
    pub fn full_name(&self) -> String {
        full_name(&self.name, self.variant.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePackVersionList {
    /// Position of the body in the pack file
    pub offset: u32,
    /// Length of the body
    pub length: u64,
    /// CRC32 of the body
    pub hash: u32,
    pub resources: Vec<PackedResource>,
}

impl ResourcePackVersionList {
    pub fn serializer() -> &'static VersionedSerializer<ResourcePackVersionList> {
        &SERIALIZER
    }

    /// Header with the body fields zeroed, used to reserve space
    pub fn placeholder(resources: Vec<PackedResource>) -> Self {
        Self {
            offset: 0,
            length: 0,
            hash: 0,
            resources,
        }
    }

    /// Sum of the compressed lengths, i.e. the expected body length
    pub fn body_length(&self) -> u64 {
        self.resources
            .iter()
            .map(|resource| u64::from(resource.compressed_length))
            .sum()
    }

    /// Read the header at the start of a pack file
    ///
    /// Trailing body bytes are ignored.
    pub fn read_header(data: &[u8]) -> Result<Self> {
        Self::serializer().deserialize(data)
    }
}

fn serialize_v0(writer: &mut BinaryWriter<Vec<u8>>, list: &ResourcePackVersionList) -> Result<()> {
    let key = random_key();
    writer.write_bytes(&key)?;
    writer.write_u32(list.offset)?;
    writer.write_u64(list.length)?;
    writer.write_u32(list.hash)?;

    writer.write_7bit_encoded_usize(list.resources.len())?;
    for resource in &list.resources {
        writer.write_encrypted_string(Some(&resource.name), &key)?;
        writer.write_encrypted_string(resource.variant.as_deref(), &key)?;
        write_extension(writer, &resource.extension, &key)?;
        writer.write_u8(resource.load_type.as_u8())?;
        writer.write_7bit_encoded_u64(resource.offset)?;
        writer.write_7bit_encoded_u32(resource.length)?;
        writer.write_u32(resource.hash)?;
        writer.write_7bit_encoded_u32(resource.compressed_length)?;
        writer.write_u32(resource.compressed_hash)?;
    }

    Ok(())
}

fn deserialize_v0(reader: &mut BinaryReader<'_>) -> Result<ResourcePackVersionList> {
    let key: [u8; ENCRYPT_KEY_LENGTH] = reader.read_array()?;
    let offset = reader.read_u32()?;
    let length = reader.read_u64()?;
    let hash = reader.read_u32()?;

    let count = read_count(reader)?;
    let mut resources = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_name(reader, &key, "resource")?;
        let variant = reader.read_encrypted_string(&key)?;
        let extension = read_extension(reader, &key)?;
        let load_type = read_load_type(reader)?;
        let resource_offset = reader.read_7bit_encoded_u64()?;
        let resource_length = reader.read_7bit_encoded_u32()?;
        let resource_hash = reader.read_u32()?;
        let compressed_length = reader.read_7bit_encoded_u32()?;
        let compressed_hash = reader.read_u32()?;
        resources.push(PackedResource {
            name,
            variant,
            extension,
            load_type,
            offset: resource_offset,
            length: resource_length,
            hash: resource_hash,
            compressed_length,
            compressed_hash,
        });
    }

    let list = ResourcePackVersionList {
        offset,
        length,
        hash,
        resources,
    };
    if list.length != 0 && list.length != list.body_length() {
        return Err(PackError::length_mismatch(
            "resource pack header",
            list.body_length(),
            list.length,
        ));
    }
    Ok(list)
}
