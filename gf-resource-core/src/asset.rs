//! Asset records

use crate::database::AssetDatabase;
use crate::resource::ResourceKey;
use once_cell::unsync::OnceCell;

/// An asset identified by its guid
///
/// The path-like name is looked up through the [`AssetDatabase`] the first
/// time it is requested and cached afterwards.
#[derive(Debug, Clone)]
pub struct Asset {
    guid: String,
    name: OnceCell<Option<String>>,
    resource: Option<ResourceKey>,
}

impl Asset {
    pub fn new<S: Into<String>>(guid: S) -> Self {
        Self {
            guid: guid.into(),
            name: OnceCell::new(),
            resource: None,
        }
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Resolve the asset path, `None` when the database does not know the guid
    pub fn name(&self, database: &dyn AssetDatabase) -> Option<&str> {
        self.name
            .get_or_init(|| database.guid_to_path(&self.guid))
            .as_deref()
    }

    /// Owning resource, if any
    pub fn resource(&self) -> Option<&ResourceKey> {
        self.resource.as_ref()
    }

    pub(crate) fn set_resource(&mut self, resource: Option<ResourceKey>) {
        self.resource = resource;
    }
}
