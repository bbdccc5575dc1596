//! Build target platforms

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target platform of a resource build
///
/// The name doubles as the directory name under `Full/{version}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Windows64,
    MacOS,
    Linux,
    IOS,
    Android,
    WindowsStore,
    WebGL,
}

impl Platform {
    /// All known platforms
    pub const ALL: [Platform; 8] = [
        Platform::Windows,
        Platform::Windows64,
        Platform::MacOS,
        Platform::Linux,
        Platform::IOS,
        Platform::Android,
        Platform::WindowsStore,
        Platform::WebGL,
    ];

    /// Directory name of the platform
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Windows64 => "Windows64",
            Platform::MacOS => "MacOS",
            Platform::Linux => "Linux",
            Platform::IOS => "IOS",
            Platform::Android => "Android",
            Platform::WindowsStore => "WindowsStore",
            Platform::WebGL => "WebGL",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .copied()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ResourceError::parse(format!("Unknown platform: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trip_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
        assert_eq!("windows64".parse::<Platform>().unwrap(), Platform::Windows64);
        assert!("PlayStation".parse::<Platform>().is_err());
    }
}
