use std::fs;

use distmap_core::storage::{FileStorage, MappingStorage, MemoryStorage, StorageError};
use distmap_core::LanguageData;
use tempfile::tempdir;

fn sample(language: &str) -> LanguageData {
    let mut data = LanguageData::new(language);
    data.resources.insert("app_name".into(), "key_1".into());
    data
}

#[tokio::test]
async fn memory_save_and_get_round_trip() {
    let store = MemoryStorage::new();
    store.save_mapping(sample("en")).await.unwrap();
    let stored = store.get_mapping("en").await.unwrap();
    assert_eq!(stored.data, sample("en"));
    assert!(store.get_mapping("fr").await.is_none());
}

#[tokio::test]
async fn memory_save_replaces_same_language() {
    let store = MemoryStorage::new();
    store.save_mapping(sample("en")).await.unwrap();
    let mut newer = sample("en");
    newer.resources.insert("title".into(), "key_2".into());
    store.save_mapping(newer.clone()).await.unwrap();

    assert_eq!(store.len().await, 1);
    assert_eq!(store.get_mapping("en").await.unwrap().data, newer);
}

#[tokio::test]
async fn file_storage_creates_nested_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("a/b/c");
    let store = FileStorage::new(&root);
    store.save_mapping(sample("pt-BR")).await.unwrap();

    assert!(root.join("mapping-pt-BR.json").is_file());
    let stored = store.get_mapping("pt-BR").await.unwrap();
    assert_eq!(stored.data, sample("pt-BR"));
}

#[tokio::test]
async fn file_storage_rejects_file_root() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("file.txt");
    fs::write(&file_path, "data").unwrap();

    let err = FileStorage::new(&file_path).save_mapping(sample("en")).await.unwrap_err();
    assert!(matches!(err, StorageError::NotADirectory(_)));
}

#[tokio::test]
async fn file_storage_rejects_path_like_language() {
    let dir = tempdir().unwrap();
    let err = FileStorage::new(dir.path())
        .save_mapping(sample("../en"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidLanguage(_)));
}

#[tokio::test]
async fn file_storage_missing_language() {
    let dir = tempdir().unwrap();
    let store = FileStorage::new(dir.path());
    assert!(store.get_mapping("en").await.is_none());
    assert!(matches!(store.load("en").await.unwrap_err(), StorageError::Io(_)));
}

#[tokio::test]
async fn file_storage_accepts_bcp47_qualifier() {
    let dir = tempdir().unwrap();
    let store = FileStorage::new(dir.path());
    store.save_mapping(sample("b+sr+Latn")).await.unwrap();

    assert!(dir.path().join("mapping-b+sr+Latn.json").is_file());
    assert_eq!(store.get_mapping("b+sr+Latn").await.unwrap().data, sample("b+sr+Latn"));
}
