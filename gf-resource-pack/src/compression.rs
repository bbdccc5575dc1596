//! Compression helpers for version list files and backups
//!
//! Helpers are looked up by type name through [`CompressionHelperRegistry`],
//! which is how the builder configuration selects one.

use crate::error::{PackError, Result};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use indexmap::IndexMap;
use std::io::{Read, Write};

/// Compresses and decompresses whole buffers
pub trait CompressionHelper {
    /// Registered type name
    fn name(&self) -> &'static str;

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Gzip via flate2
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCompressionHelper;

impl CompressionHelper for DefaultCompressionHelper {
    fn name(&self) -> &'static str {
        "DefaultCompressionHelper"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(data)
            .map_err(|e| PackError::compression_failed(format!("Gzip compression failed: {}", e)))?;
        encoder
            .finish()
            .map_err(|e| PackError::compression_failed(format!("Gzip compression failed: {}", e)))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).map_err(|e| {
            PackError::decompression_failed(format!("Gzip decompression failed: {}", e))
        })?;
        Ok(decompressed)
    }
}

/// LZ4 block format with the uncompressed size prepended
#[derive(Debug, Default, Clone, Copy)]
pub struct Lz4CompressionHelper;

impl CompressionHelper for Lz4CompressionHelper {
    fn name(&self) -> &'static str {
        "Lz4CompressionHelper"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(lz4_flex::compress_prepend_size(data))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(lz4_flex::decompress_size_prepended(data)?)
    }
}

/// Stores data as-is
#[derive(Debug, Default, Clone, Copy)]
pub struct NoneCompressionHelper;

impl CompressionHelper for NoneCompressionHelper {
    fn name(&self) -> &'static str {
        "NoneCompressionHelper"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

type HelperFactory = fn() -> Box<dyn CompressionHelper>;

fn boxed<H: CompressionHelper + Default + 'static>() -> Box<dyn CompressionHelper> {
    Box::new(H::default())
}

/// Compression helpers by type name
pub struct CompressionHelperRegistry {
    factories: IndexMap<&'static str, HelperFactory>,
}

impl Default for CompressionHelperRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("DefaultCompressionHelper", boxed::<DefaultCompressionHelper>);
        registry.register("Lz4CompressionHelper", boxed::<Lz4CompressionHelper>);
        registry.register("NoneCompressionHelper", boxed::<NoneCompressionHelper>);
        registry
    }
}

impl CompressionHelperRegistry {
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, factory: HelperFactory) {
        self.factories.insert(name, factory);
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn CompressionHelper>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| PackError::UnknownCompressionHelper(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"GameFramework GameFramework GameFramework GameFramework";

    #[test]
    fn test_every_default_helper_restores_data() {
        let registry = CompressionHelperRegistry::default();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "DefaultCompressionHelper",
                "Lz4CompressionHelper",
                "NoneCompressionHelper"
            ]
        );

        for name in names {
            let helper = registry.create(name).unwrap();
            assert_eq!(helper.name(), name);
            let compressed = helper.compress(SAMPLE).unwrap();
            assert_eq!(helper.decompress(&compressed).unwrap(), SAMPLE);
        }
    }

    #[test]
    fn test_unknown_helper() {
        let registry = CompressionHelperRegistry::default();
        assert!(!registry.contains("ZstdCompressionHelper"));
        assert!(matches!(
            registry.create("ZstdCompressionHelper"),
            Err(PackError::UnknownCompressionHelper(_))
        ));
    }

    #[test]
    fn test_corrupted_input_fails() {
        assert!(DefaultCompressionHelper.decompress(b"not gzip").is_err());
        assert!(Lz4CompressionHelper.decompress(&[4, 0, 0, 0, 0xFF]).is_err());
    }
}
