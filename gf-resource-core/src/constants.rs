//! Constants shared by the collection, analyzer and pack builder
//!
//! File name conventions, directory layout names and the naming rules for
//! resources and variants.

use once_cell::sync::Lazy;
use regex::Regex;

/// Extension used for every file written under the `Full` directory
pub const DEFAULT_EXTENSION: &str = "dat";

/// Directory holding full (per-version) resource builds
pub const FULL_DIRECTORY_NAME: &str = "Full";

/// Directory holding built resource packs
pub const RESOURCE_PACK_DIRECTORY_NAME: &str = "ResourcePack";

/// Prefix of the updatable version list file (`GameFrameworkVersion.{crc:x8}.dat`)
pub const VERSION_LIST_FILE_PREFIX: &str = "GameFrameworkVersion";

/// Prefix of a resource pack file
pub const RESOURCE_PACK_FILE_PREFIX: &str = "GameFrameworkResourcePack";

/// Source version name used for a pack built against no source version
pub const NONE_VERSION_NAME: &str = "none-version";

/// Root element of every Game Framework XML configuration
pub const XML_ROOT_ELEMENT: &str = "UnityGameFramework";

/// Extension that marks a scene asset
pub const SCENE_EXTENSION: &str = ".unity";

/// Extensions that are never treated as asset dependencies
pub const SCRIPT_EXTENSIONS: &[&str] = &[".cs", ".dll"];

/// Resource name rule: slash separated path segments
pub static RESOURCE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9\._-]+/)*[A-Za-z0-9\._-]+$").expect("resource name regex is valid")
});

/// Variant name rule: lower case identifiers
pub static VARIANT_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("variant name regex is valid"));

/// Check whether an asset path names a scene
pub fn is_scene_path(path: &str) -> bool {
    path.ends_with(SCENE_EXTENSION)
}

/// Check whether an asset path names a script or compiled assembly
pub fn is_script_path(path: &str) -> bool {
    SCRIPT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Build `name` or `name.variant`
pub fn full_name(name: &str, variant: Option<&str>) -> String {
    match variant {
        Some(variant) => format!("{}.{}", name, variant),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_rules() {
        assert!(RESOURCE_NAME_REGEX.is_match("ui/main_menu"));
        assert!(RESOURCE_NAME_REGEX.is_match("fonts.default"));
        assert!(!RESOURCE_NAME_REGEX.is_match("ui//main"));
        assert!(!RESOURCE_NAME_REGEX.is_match("/ui"));
        assert!(!RESOURCE_NAME_REGEX.is_match("ui main"));
    }

    #[test]
    fn test_variant_rules() {
        assert!(VARIANT_NAME_REGEX.is_match("en-us"));
        assert!(!VARIANT_NAME_REGEX.is_match("EN"));
    }

    #[test]
    fn test_path_kinds() {
        assert!(is_scene_path("Assets/Scenes/Main.unity"));
        assert!(is_script_path("Assets/Scripts/Player.cs"));
        assert!(is_script_path("Assets/Plugins/Lib.dll"));
        assert!(!is_script_path("Assets/Textures/a.png"));
        assert_eq!(full_name("ui", Some("hd")), "ui.hd");
        assert_eq!(full_name("ui", None), "ui");
    }
}
