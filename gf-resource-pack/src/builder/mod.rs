//! Resource pack building

pub mod config;
pub mod controller;
pub mod listener;

pub use config::ResourcePackBuilderConfig;
pub use controller::{
    BuiltResourcePack, ResourcePackBuilderController, changed_resources, resource_pack_name,
};
pub use listener::BuildResourcePacksListener;
