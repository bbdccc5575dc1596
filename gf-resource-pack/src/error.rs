//! Error types for version lists and resource packs

use gf_resource_core::ResourceError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pack operations
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while reading, writing or building packs
#[derive(Error, Debug)]
pub enum PackError {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the resource model
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Builder configuration could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid file format
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Header magic does not match the serializer
    #[error("Invalid signature: expected {expected}, got {actual}")]
    InvalidSignature { expected: String, actual: String },

    /// No callback registered for a format version
    #[error("Unsupported {kind} format version: {version}")]
    UnsupportedVersion { kind: &'static str, version: u8 },

    /// Not enough data
    #[error("Not enough data: expected {expected}, got {actual}")]
    NotEnoughData { expected: usize, actual: usize },

    /// Invalid data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Compression failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// Decompression failed
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// No compression helper registered under the name
    #[error("Unknown compression helper: {0}")]
    UnknownCompressionHelper(String),

    /// Working directory does not have the expected layout
    #[error("Invalid working directory: {}", .0.display())]
    InvalidWorkingDirectory(PathBuf),

    /// A version directory has no version list file
    #[error("Version list not found in {}", .0.display())]
    VersionListNotFound(PathBuf),

    /// A resource listed in the version list is missing on disk
    #[error("Resource file not found: {}", .0.display())]
    ResourceFileNotFound(PathBuf),

    /// Byte count or header size differs from what was computed
    #[error("Length mismatch in {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: String,
        expected: u64,
        actual: u64,
    },
}

impl PackError {
    /// Create a new invalid format error
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create a new invalid signature error
    pub fn invalid_signature<S: Into<String>>(expected: S, actual: S) -> Self {
        Self::InvalidSignature {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a new not enough data error
    pub fn not_enough_data(expected: usize, actual: usize) -> Self {
        Self::NotEnoughData { expected, actual }
    }

    /// Create a new invalid data error
    pub fn invalid_data<S: Into<String>>(msg: S) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a new compression failed error
    pub fn compression_failed<S: Into<String>>(msg: S) -> Self {
        Self::CompressionFailed(msg.into())
    }

    /// Create a new decompression failed error
    pub fn decompression_failed<S: Into<String>>(msg: S) -> Self {
        Self::DecompressionFailed(msg.into())
    }

    /// Create a new length mismatch error
    pub fn length_mismatch<S: Into<String>>(what: S, expected: u64, actual: u64) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}

impl From<lz4_flex::block::DecompressError> for PackError {
    fn from(err: lz4_flex::block::DecompressError) -> Self {
        Self::decompression_failed(format!("LZ4 decompression failed: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for PackError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::invalid_data(format!("Invalid UTF-8 string: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PackError::length_mismatch("resource pack body", 10, 8);
        assert_eq!(
            err.to_string(),
            "Length mismatch in resource pack body: expected 10, got 8"
        );

        let err = PackError::UnsupportedVersion {
            kind: "resource pack version list",
            version: 7,
        };
        assert_eq!(
            err.to_string(),
            "Unsupported resource pack version list format version: 7"
        );
    }
}
