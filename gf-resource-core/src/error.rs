//! Error types for resource collection handling

use std::io;
use thiserror::Error;

/// Result type alias for resource collection operations
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Main error type for the resource collection model
#[derive(Error, Debug)]
pub enum ResourceError {
    /// IO errors when reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed collection XML
    #[error("XML error: {0}")]
    Xml(String),

    /// Asset database snapshot could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Resource name or variant does not match the naming rules
    #[error("Invalid resource name '{name}': {message}")]
    InvalidResourceName { name: String, message: String },

    /// Resource already present in the collection
    #[error("Resource '{full_name}' already exists")]
    DuplicateResource { full_name: String },

    /// Resource name collides with the directory layout of another resource
    #[error("Resource name '{full_name}' conflicts with resource '{other}'")]
    UnavailableResourceName { full_name: String, other: String },

    /// Resource not present in the collection
    #[error("Resource '{full_name}' not found")]
    ResourceNotFound { full_name: String },

    /// Asset not present in the collection
    #[error("Asset '{guid}' not found")]
    AssetNotFound { guid: String },

    /// Asset guid does not resolve to a path
    #[error("Can not resolve asset guid '{guid}'")]
    UnresolvedAsset { guid: String },

    /// Scene and non-scene assets mixed, or an illegal load type for a scene
    #[error("Asset type error: {message}")]
    AssetType { message: String },

    /// Generic parsing errors
    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl ResourceError {
    /// Create an XML error
    pub fn xml<S: Into<String>>(message: S) -> Self {
        Self::Xml(message.into())
    }

    /// Create an invalid resource name error
    pub fn invalid_resource_name<S: Into<String>>(name: S, message: S) -> Self {
        Self::InvalidResourceName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a resource not found error
    pub fn resource_not_found<S: Into<String>>(full_name: S) -> Self {
        Self::ResourceNotFound {
            full_name: full_name.into(),
        }
    }

    /// Create an asset not found error
    pub fn asset_not_found<S: Into<String>>(guid: S) -> Self {
        Self::AssetNotFound { guid: guid.into() }
    }

    /// Create an asset type error
    pub fn asset_type<S: Into<String>>(message: S) -> Self {
        Self::AssetType {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ResourceError::xml("unexpected eof");
        assert!(matches!(err, ResourceError::Xml(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ResourceError::invalid_resource_name("a//b", "empty path segment");
        let msg = format!("{}", err);
        assert!(msg.contains("a//b"));
        assert!(msg.contains("empty path segment"));
    }
}
