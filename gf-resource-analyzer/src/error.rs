//! Error types for dependency analysis

use gf_resource_core::ResourceError;
use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors raised by the analyzer
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Error from the resource collection layer
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Operation called before the controller reached the required state
    #[error("Analyzer is {actual:?}, operation requires {required:?}")]
    InvalidState {
        required: crate::controller::AnalyzerState,
        actual: crate::controller::AnalyzerState,
    },

    /// Asset has no dependency data
    #[error("Can not find dependency data for asset '{0}'")]
    UnknownAsset(String),
}

impl AnalyzerError {
    /// Create an unknown asset error
    pub fn unknown_asset<S: Into<String>>(asset_name: S) -> Self {
        Self::UnknownAsset(asset_name.into())
    }
}
