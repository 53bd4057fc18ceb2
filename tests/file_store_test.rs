//! ファイル保存のテスト

use junkai_common::{City, CityStore, KvStore, Record};
use junkai_sync::file_store::FileStore;
use tempfile::tempdir;

#[test]
fn test_values_survive_reopen() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("storage.json");

    let mut store = FileStore::open(&path);
    assert!(store.is_empty());
    store.set("junkai:city:大和市", "[]").unwrap();
    store.set("other", "x").unwrap();
    assert!(path.exists(), "親ディレクトリごと作成されること");

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get("junkai:city:大和市").unwrap().as_deref(), Some("[]"));
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_remove_is_persisted() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");

    let mut store = FileStore::open(&path);
    store.set("a", "1").unwrap();
    store.remove("a").unwrap();
    store.remove("missing").unwrap();

    assert_eq!(FileStore::open(&path).get("a").unwrap(), None);
}

/// 壊れたファイルは空として扱う
#[test]
fn test_corrupt_file_starts_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ broken").unwrap();

    let mut store = FileStore::open(&path);
    assert!(store.is_empty());

    store.set("a", "1").unwrap();
    assert_eq!(FileStore::open(&path).len(), 1);
}

#[test]
fn test_unknown_version_starts_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"version":99,"entries":{"a":"1"}}"#).unwrap();

    assert!(FileStore::open(&path).is_empty());
}

#[test]
fn test_city_store_on_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");

    let mut store = CityStore::new(FileStore::open(&path));
    let record = Record {
        city: "海老名市".into(),
        station: "海老名駅".into(),
        number: "相模 1".into(),
        ui_index: "E1".into(),
        ui_index_num: 1,
        ..Default::default()
    };
    store.save_city(City::Ebina, &[record.clone()]).unwrap();

    let reopened = CityStore::new(FileStore::open(&path));
    assert_eq!(reopened.read_city(City::Ebina), vec![record]);
    assert!(reopened.read_city(City::Yamato).is_empty());
}
