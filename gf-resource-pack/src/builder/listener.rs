//! Progress hooks of the resource pack builder

/// Callbacks fired by [`super::ResourcePackBuilderController::build_resource_packs`]
///
/// `source_version` is `None` for the full pack.
pub trait BuildResourcePacksListener {
    fn on_build_resource_packs_started(&mut self, _count: usize) {}

    fn on_build_resource_pack_success(
        &mut self,
        _index: usize,
        _count: usize,
        _source_version: Option<&str>,
        _target_version: &str,
    ) {
    }

    fn on_build_resource_pack_failure(
        &mut self,
        _index: usize,
        _count: usize,
        _source_version: Option<&str>,
        _target_version: &str,
    ) {
    }

    fn on_build_resource_packs_completed(&mut self, _success_count: usize, _count: usize) {}
}

impl BuildResourcePacksListener for () {}
