//! Game Framework Resource Analyzer
//!
//! Dependency analysis over a resource collection: which resources and
//! assets every bundled asset pulls in, which dependencies are scattered
//! (owned by no resource) and which assets depend on each other in a cycle.

pub mod circular;
pub mod controller;
pub mod dependency_data;
pub mod error;
pub mod stamp;

// Re-export main types
pub use circular::CircularDependencyChecker;
pub use controller::{
    AnalyzeListener, AnalyzerState, AssetsOrderType, ResourceAnalyzerController,
    ScatteredAssetsOrderType,
};
pub use dependency_data::{AssetRef, DependencyData};
pub use error::{AnalyzerError, Result};
pub use stamp::Stamp;
