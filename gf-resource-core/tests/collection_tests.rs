//! Resource collection file tests
//!
//! Loading and saving `ResourceCollection.xml` against a temporary directory.

use gf_resource_core::{
    CollectionLoadListener, LoadType, ResourceCollection, ResourceKey, SnapshotAssetDatabase,
};
use std::fs;

const COLLECTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<UnityGameFramework>
  <ResourceCollection>
    <Resources>
      <Resource Name="characters" LoadType="0" Packed="True" ResourceGroups="base" />
      <Resource Name="ui" Variant="hd" FileSystem="ui_fs" LoadType="1" Packed="False" />
      <Resource Name="bad name" LoadType="0" Packed="False" />
      <Resource Name="scenes" LoadType="0" Packed="False" />
    </Resources>
    <Assets>
      <Asset Guid="g1" ResourceName="characters" />
      <Asset Guid="g2" ResourceName="ui" ResourceVariant="hd" />
      <Asset Guid="g3" ResourceName="scenes" />
      <Asset Guid="g4" ResourceName="missing" />
      <Asset Guid="unknown" ResourceName="characters" />
    </Assets>
  </ResourceCollection>
</UnityGameFramework>"#;

fn database() -> SnapshotAssetDatabase {
    let mut db = SnapshotAssetDatabase::new();
    db.insert("g1", "Assets/Characters/Hero.prefab", Vec::<String>::new());
    db.insert("g2", "Assets/UI/Main.prefab", Vec::<String>::new());
    db.insert("g3", "Assets/Scenes/Intro.unity", Vec::<String>::new());
    db.insert("g4", "Assets/Orphan.prefab", Vec::<String>::new());
    db
}

#[derive(Default)]
struct Recorder {
    resources: Vec<(usize, usize)>,
    assets: Vec<(usize, usize)>,
    completed: usize,
}

impl CollectionLoadListener for Recorder {
    fn on_loading_resource(&mut self, index: usize, count: usize) {
        self.resources.push((index, count));
    }

    fn on_loading_asset(&mut self, index: usize, count: usize) {
        self.assets.push((index, count));
    }

    fn on_load_completed(&mut self) {
        self.completed += 1;
    }
}

#[test]
fn test_load_skips_invalid_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ResourceCollection.xml");
    fs::write(&path, COLLECTION).unwrap();

    let db = database();
    let mut recorder = Recorder::default();
    let collection = ResourceCollection::load(&path, &db, &mut recorder).unwrap();

    assert_eq!(collection.resource_count(), 3);
    assert_eq!(collection.asset_count(), 3);
    assert!(collection.has_asset("g1"));
    assert!(!collection.has_asset("g4"));
    assert!(!collection.has_asset("unknown"));

    let ui = collection
        .get_resource(&ResourceKey::new("ui", Some("hd")))
        .unwrap();
    assert_eq!(ui.file_system(), Some("ui_fs"));
    assert_eq!(ui.load_type(), LoadType::LoadFromMemory);

    assert_eq!(recorder.resources.len(), 4);
    assert_eq!(recorder.resources[3], (3, 4));
    assert_eq!(recorder.assets.len(), 5);
    assert_eq!(recorder.completed, 1);
}

#[test]
fn test_save_then_load_preserves_collection() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("ResourceCollection.xml");
    fs::write(&source, COLLECTION).unwrap();

    let db = database();
    let collection = ResourceCollection::load(&source, &db, &mut ()).unwrap();

    let saved = dir.path().join("Configs").join("Saved.xml");
    collection.save(&saved).unwrap();
    let reloaded = ResourceCollection::load(&saved, &db, &mut ()).unwrap();

    assert_eq!(reloaded.resource_count(), collection.resource_count());
    assert_eq!(reloaded.asset_count(), collection.asset_count());

    let characters = reloaded
        .get_resource(&ResourceKey::new("characters", None))
        .unwrap();
    assert!(characters.packed());
    assert!(characters.has_resource_group("base"));
    assert_eq!(
        reloaded.get_asset("g2").unwrap().resource(),
        Some(&ResourceKey::new("ui", Some("hd")))
    );
}

#[test]
fn test_corrupted_collection_is_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ResourceCollection.xml");
    fs::write(&path, "<UnityGameFramework><ResourceCollection><Resources>").unwrap();

    let db = database();
    assert!(ResourceCollection::load(&path, &db, &mut ()).is_err());
    assert!(!path.exists());
}

#[test]
fn test_missing_collection_fails_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ResourceCollection.xml");

    let db = database();
    assert!(ResourceCollection::load(&path, &db, &mut ()).is_err());
    assert!(!path.exists());
}
