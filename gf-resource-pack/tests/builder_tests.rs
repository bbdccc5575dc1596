//! Resource pack builder tests
//!
//! Full builds are laid out under a temporary working directory the way the
//! resource builder writes them, then packed.

use gf_resource_core::{LoadType, Platform};
use gf_resource_pack::verifier::crc32;
use gf_resource_pack::{
    BuildResourcePacksListener, CompressionHelper, DefaultCompressionHelper, PackError,
    ResourcePackBuilderConfig, ResourcePackBuilderController, ResourcePackVersionList,
    UpdatableVersionList, VersionResource,
};
use std::fs;
use std::path::Path;

type Entry<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn write_version(working_directory: &Path, version: &str, entries: &[Entry<'_>]) -> UpdatableVersionList {
    let helper = DefaultCompressionHelper;
    let directory = working_directory
        .join("Full")
        .join(version)
        .join(Platform::Windows.as_str());
    fs::create_dir_all(&directory).unwrap();

    let mut list = UpdatableVersionList {
        applicable_game_version: "1.0".to_string(),
        internal_resource_version: 1,
        ..UpdatableVersionList::default()
    };
    for (name, variant, content) in entries {
        let compressed = helper.compress(content).unwrap();
        let resource = VersionResource {
            name: name.to_string(),
            variant: variant.map(str::to_string),
            extension: "dat".to_string(),
            load_type: LoadType::LoadFromFile,
            length: content.len() as u32,
            hash: crc32(content),
            compressed_length: compressed.len() as u32,
            compressed_hash: crc32(&compressed),
            asset_indexes: Vec::new(),
        };
        let path = directory.join(resource.full_file_name());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &compressed).unwrap();
        list.resources.push(resource);
    }
    list.save_to_directory(&directory, &helper).unwrap();
    list
}

fn builder(working_directory: &Path) -> ResourcePackBuilderController {
    let config = ResourcePackBuilderConfig::new(working_directory, Platform::Windows);
    ResourcePackBuilderController::new(config).unwrap()
}

const V1: &[Entry<'static>] = &[
    ("characters", None, "hero and boss bundle".as_bytes()),
    ("ui/main", Some("hd"), "main ui bundle, high definition".as_bytes()),
];

const V2: &[Entry<'static>] = &[
    ("characters", None, "hero and boss bundle".as_bytes()),
    ("ui/main", Some("hd"), "main ui bundle, high definition, patched".as_bytes()),
    ("sounds", None, "new sound bank".as_bytes()),
];

#[test]
fn test_full_pack_includes_every_resource() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_version(dir.path(), "1_0_1", V1);

    let pack = builder(dir.path()).build_resource_pack(None, "1_0_1").unwrap();
    assert_eq!(pack.header.resources.len(), 2);
    assert!(pack.backup_path.is_none());

    let file_name = pack.path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(
        file_name,
        format!(
            "GameFrameworkResourcePack-none-version-1_0_1.{:08x}.dat",
            pack.header.hash
        )
    );
    assert_eq!(
        pack.path.parent().unwrap(),
        dir.path().join("ResourcePack").join("Windows")
    );

    let data = fs::read(&pack.path).unwrap();
    let header = ResourcePackVersionList::read_header(&data).unwrap();
    assert_eq!(header, pack.header);

    let body = &data[header.offset as usize..];
    assert_eq!(body.len() as u64, header.length);
    assert_eq!(crc32(body), header.hash);

    let version_path = dir.path().join("Full").join("1_0_1").join("Windows");
    for (packed, resource) in header.resources.iter().zip(&list.resources) {
        assert_eq!(packed.full_name(), resource.full_name());
        assert_eq!(packed.length, resource.length);
        let start = packed.offset as usize;
        let end = start + packed.compressed_length as usize;
        let expected = fs::read(version_path.join(resource.full_file_name())).unwrap();
        assert_eq!(&body[start..end], expected.as_slice());
    }
    assert_eq!(header.resources[1].offset, u64::from(header.resources[0].compressed_length));
}

#[test]
fn test_identical_versions_give_header_only_pack() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1_0_1", V1);
    write_version(dir.path(), "1_0_2", V1);

    let pack = builder(dir.path())
        .build_resource_pack(Some("1_0_1"), "1_0_2")
        .unwrap();
    assert!(pack.header.resources.is_empty());
    assert_eq!(pack.header.length, 0);

    let data = fs::read(&pack.path).unwrap();
    assert_eq!(data.len(), pack.header.offset as usize);
    assert!(
        pack.path
            .to_string_lossy()
            .contains("GameFrameworkResourcePack-1_0_1-1_0_2.")
    );
}

#[test]
fn test_diff_pack_holds_changed_and_new_resources() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1_0_1", V1);
    write_version(dir.path(), "1_0_2", V2);

    let pack = builder(dir.path())
        .build_resource_pack(Some("1_0_1"), "1_0_2")
        .unwrap();
    let names: Vec<String> = pack
        .header
        .resources
        .iter()
        .map(|resource| resource.full_name())
        .collect();
    assert_eq!(names, vec!["ui/main.hd", "sounds"]);
    assert_eq!(pack.header.resources[0].offset, 0);
    assert_eq!(pack.header.length, pack.header.body_length());
}

#[test]
fn test_missing_resource_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_version(dir.path(), "1_0_1", V1);
    let version_path = dir.path().join("Full").join("1_0_1").join("Windows");
    fs::remove_file(version_path.join(list.resources[0].full_file_name())).unwrap();

    let result = builder(dir.path()).build_resource_pack(None, "1_0_1");
    assert!(matches!(result, Err(PackError::ResourceFileNotFound(_))));

    let output = dir.path().join("ResourcePack").join("Windows");
    assert_eq!(fs::read_dir(output).unwrap().count(), 0);
}

#[test]
fn test_resized_resource_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_version(dir.path(), "1_0_1", V1);
    let version_path = dir.path().join("Full").join("1_0_1").join("Windows");
    fs::write(version_path.join(list.resources[0].full_file_name()), b"short").unwrap();

    let result = builder(dir.path()).build_resource_pack(None, "1_0_1");
    assert!(matches!(result, Err(PackError::LengthMismatch { .. })));
}

#[derive(Default)]
struct Events {
    started: Option<usize>,
    successes: Vec<(usize, Option<String>)>,
    failures: Vec<(usize, Option<String>)>,
    completed: Option<(usize, usize)>,
}

impl BuildResourcePacksListener for Events {
    fn on_build_resource_packs_started(&mut self, count: usize) {
        self.started = Some(count);
    }

    fn on_build_resource_pack_success(
        &mut self,
        index: usize,
        _count: usize,
        source_version: Option<&str>,
        _target_version: &str,
    ) {
        self.successes.push((index, source_version.map(str::to_string)));
    }

    fn on_build_resource_pack_failure(
        &mut self,
        index: usize,
        _count: usize,
        source_version: Option<&str>,
        _target_version: &str,
    ) {
        self.failures.push((index, source_version.map(str::to_string)));
    }

    fn on_build_resource_packs_completed(&mut self, success_count: usize, count: usize) {
        self.completed = Some((success_count, count));
    }
}

#[test]
fn test_build_resource_packs_continues_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1_0_1", V1);
    write_version(dir.path(), "1_0_2", V2);

    let mut events = Events::default();
    let sources = vec!["0_9_0".to_string(), "1_0_1".to_string()];
    let success_count = builder(dir.path()).build_resource_packs(&sources, "1_0_2", &mut events);

    assert_eq!(success_count, 2);
    assert_eq!(events.started, Some(3));
    assert_eq!(
        events.successes,
        vec![(0, None), (2, Some("1_0_1".to_string()))]
    );
    assert_eq!(events.failures, vec![(1, Some("0_9_0".to_string()))]);
    assert_eq!(events.completed, Some((2, 3)));
}

#[test]
fn test_backup_diff_writes_decompressed_resources() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1_0_1", V1);
    write_version(dir.path(), "1_0_2", V2);

    let mut config = ResourcePackBuilderConfig::new(dir.path(), Platform::Windows);
    config.backup_diff = true;
    config.backup_version = true;
    let builder = ResourcePackBuilderController::new(config).unwrap();

    let pack = builder.build_resource_pack(Some("1_0_1"), "1_0_2").unwrap();
    let backup = pack.backup_path.unwrap();
    assert_eq!(
        backup.file_name().unwrap().to_string_lossy(),
        format!("GameFrameworkResourcePack-1_0_1-1_0_2.{:08x}", pack.header.hash)
    );

    assert_eq!(
        fs::read(backup.join("ui").join("main.hd.dat")).unwrap(),
        b"main ui bundle, high definition, patched"
    );
    assert_eq!(fs::read(backup.join("sounds.dat")).unwrap(), b"new sound bank");
    assert!(!backup.join("characters.dat").exists());
    assert!(UpdatableVersionList::find_file(&backup).is_ok());
}

#[test]
fn test_version_names_are_ordered_by_internal_version() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1_0_10", V1);
    write_version(dir.path(), "1_0_2", V1);
    fs::create_dir_all(dir.path().join("Full").join("1_0_3").join("Android")).unwrap();

    assert_eq!(builder(dir.path()).get_version_names(), vec!["1_0_2", "1_0_10"]);
}

#[test]
fn test_invalid_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let builder = builder(&dir.path().join("missing"));

    assert!(!builder.is_valid_working_directory());
    assert!(builder.get_version_names().is_empty());
    assert!(matches!(
        builder.build_resource_pack(None, "1_0_1"),
        Err(PackError::InvalidWorkingDirectory(_))
    ));
}

#[test]
fn test_unknown_compression_helper_is_rejected() {
    let mut config = ResourcePackBuilderConfig::new("Build", Platform::Windows);
    config.compression_helper_type_name = "ZipCompressionHelper".to_string();
    assert!(matches!(
        ResourcePackBuilderController::new(config),
        Err(PackError::UnknownCompressionHelper(_))
    ));
}
