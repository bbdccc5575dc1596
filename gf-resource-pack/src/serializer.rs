//! Versioned binary serialization
//!
//! Every file starts with a three byte magic followed by a one byte format
//! version. Callbacks are registered per version; writing always uses the
//! highest registered version, reading dispatches on the stored one.

use crate::error::{PackError, Result};
use crate::reader::BinaryReader;
use crate::writer::BinaryWriter;
use std::collections::BTreeMap;

/// Writes the body of one format version
pub type SerializeCallback<T> = fn(&mut BinaryWriter<Vec<u8>>, &T) -> Result<()>;

/// Reads the body of one format version
pub type DeserializeCallback<T> = fn(&mut BinaryReader<'_>) -> Result<T>;

/// Length of the magic plus version prefix
pub const HEADER_LENGTH: usize = 4;

pub struct VersionedSerializer<T> {
    kind: &'static str,
    magic: [u8; 3],
    serializers: BTreeMap<u8, SerializeCallback<T>>,
    deserializers: BTreeMap<u8, DeserializeCallback<T>>,
}

impl<T> VersionedSerializer<T> {
    pub fn new(kind: &'static str, magic: [u8; 3]) -> Self {
        Self {
            kind,
            magic,
            serializers: BTreeMap::new(),
            deserializers: BTreeMap::new(),
        }
    }

    pub fn register_serialize_callback(&mut self, version: u8, callback: SerializeCallback<T>) {
        self.serializers.insert(version, callback);
    }

    pub fn register_deserialize_callback(&mut self, version: u8, callback: DeserializeCallback<T>) {
        self.deserializers.insert(version, callback);
    }

    /// Highest version with a serialize callback
    pub fn latest_version(&self) -> Option<u8> {
        self.serializers.keys().next_back().copied()
    }

    /// Serialize with the latest registered version
    pub fn serialize(&self, data: &T) -> Result<Vec<u8>> {
        let version = self.latest_version().ok_or(PackError::UnsupportedVersion {
            kind: self.kind,
            version: 0,
        })?;
        self.serialize_with_version(data, version)
    }

    pub fn serialize_with_version(&self, data: &T, version: u8) -> Result<Vec<u8>> {
        let callback = self
            .serializers
            .get(&version)
            .ok_or(PackError::UnsupportedVersion {
                kind: self.kind,
                version,
            })?;

        let mut writer = BinaryWriter::new(Vec::new());
        writer.write_bytes(&self.magic)?;
        writer.write_u8(version)?;
        callback(&mut writer, data)?;
        Ok(writer.into_inner())
    }

    pub fn deserialize(&self, data: &[u8]) -> Result<T> {
        let mut reader = BinaryReader::new(data);
        let magic: [u8; 3] = reader.read_array()?;
        if magic != self.magic {
            return Err(PackError::invalid_signature(
                String::from_utf8_lossy(&self.magic).into_owned(),
                String::from_utf8_lossy(&magic).into_owned(),
            ));
        }

        let version = reader.read_u8()?;
        let callback = self
            .deserializers
            .get(&version)
            .ok_or(PackError::UnsupportedVersion {
                kind: self.kind,
                version,
            })?;
        callback(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_v0(writer: &mut BinaryWriter<Vec<u8>>, value: &u32) -> Result<()> {
        writer.write_u32(*value)
    }

    fn write_v1(writer: &mut BinaryWriter<Vec<u8>>, value: &u32) -> Result<()> {
        writer.write_7bit_encoded_u32(*value)
    }

    fn read_v0(reader: &mut BinaryReader<'_>) -> Result<u32> {
        reader.read_u32()
    }

    fn read_v1(reader: &mut BinaryReader<'_>) -> Result<u32> {
        reader.read_7bit_encoded_u32()
    }

    fn serializer() -> VersionedSerializer<u32> {
        let mut serializer = VersionedSerializer::new("test", *b"TST");
        serializer.register_serialize_callback(0, write_v0);
        serializer.register_serialize_callback(1, write_v1);
        serializer.register_deserialize_callback(0, read_v0);
        serializer.register_deserialize_callback(1, read_v1);
        serializer
    }

    #[test]
    fn test_latest_version_is_written() {
        let serializer = serializer();
        let bytes = serializer.serialize(&5).unwrap();
        assert_eq!(bytes, vec![b'T', b'S', b'T', 1, 5]);
        assert_eq!(serializer.deserialize(&bytes).unwrap(), 5);

        let old = serializer.serialize_with_version(&5, 0).unwrap();
        assert_eq!(old.len(), HEADER_LENGTH + 4);
        assert_eq!(serializer.deserialize(&old).unwrap(), 5);
    }

    #[test]
    fn test_header_checks() {
        let serializer = serializer();
        assert!(matches!(
            serializer.deserialize(b"BAD\x00\x01\x00\x00\x00"),
            Err(PackError::InvalidSignature { .. })
        ));
        assert!(matches!(
            serializer.deserialize(b"TST\x09"),
            Err(PackError::UnsupportedVersion { version: 9, .. })
        ));
        assert!(serializer.serialize_with_version(&1, 3).is_err());
    }
}
