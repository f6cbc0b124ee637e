//! End-to-end gallery scenarios.

use std::cell::RefCell;
use std::rc::Rc;

use crate::gallery::Gallery;
use crate::ingest::{BlockingSpawner, IngestionPipeline, MemoryFile, QueueSpawner};
use crate::keybindings::KeyPress;
use crate::model::ImageRecord;
use crate::persistence::{DEFAULT_STORAGE_KEY, PersistenceAdapter};
use crate::storage::{KeyValueStorage, MemoryStorage};
use crate::view::{HeadlessSurface, ViewRenderer};

type SharedGallery = Rc<RefCell<Gallery<MemoryStorage, HeadlessSurface>>>;

fn open_gallery(storage: &MemoryStorage) -> SharedGallery {
    Rc::new(RefCell::new(Gallery::open(
        PersistenceAdapter::new(storage.clone()),
        ViewRenderer::new(HeadlessSurface::new()),
    )))
}

/// Completion callback that adds records to the shared gallery.
fn add_to(gallery: &SharedGallery) -> impl Fn(ImageRecord) + Clone + 'static {
    let gallery = gallery.clone();
    move |record| {
        gallery
            .borrow_mut()
            .add(record)
            .expect("generated ids are unique");
    }
}

fn saved_records(storage: &MemoryStorage) -> Vec<ImageRecord> {
    PersistenceAdapter::new(storage.clone()).load()
}

#[test]
fn test_upload_caption_delete() {
    let storage = MemoryStorage::new();
    let gallery = open_gallery(&storage);
    assert!(gallery.borrow().surface().empty_state_visible);

    let png = MemoryFile::new("a.png", "image/png", vec![7u8; 2048]);
    IngestionPipeline::new().ingest(vec![png], &BlockingSpawner, add_to(&gallery));

    let id = {
        let gallery = gallery.borrow();
        let records = gallery.store().list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a.png");
        assert_eq!(records[0].size_label, "2 KB");
        assert_eq!(records[0].caption, "");
        assert!(!gallery.surface().empty_state_visible);
        assert_eq!(gallery.surface().cards.len(), 1);
        records[0].id.clone()
    };

    assert!(gallery.borrow_mut().update_caption(&id, "hello"));
    assert_eq!(gallery.borrow().store().get(&id).unwrap().caption, "hello");
    assert_eq!(saved_records(&storage)[0].caption, "hello");

    assert!(gallery.borrow_mut().delete(&id));
    let gallery = gallery.borrow();
    assert!(gallery.store().is_empty());
    assert!(gallery.surface().cards.is_empty());
    assert!(gallery.surface().empty_state_visible);
    assert!(saved_records(&storage).is_empty());
}

#[test]
fn test_non_images_are_ignored() {
    let storage = MemoryStorage::new();
    let gallery = open_gallery(&storage);

    let accepted = IngestionPipeline::new().ingest(
        vec![
            MemoryFile::new("notes.txt", "text/plain", b"notes".to_vec()),
            MemoryFile::new("b.jpg", "image/jpeg", vec![1, 2, 3]),
        ],
        &BlockingSpawner,
        add_to(&gallery),
    );

    assert_eq!(accepted, 1);
    assert_eq!(gallery.borrow().store().len(), 1);
    assert_eq!(gallery.borrow().store().list()[0].name, "b.jpg");
}

#[test]
fn test_cards_follow_completion_order() {
    let gallery = open_gallery(&MemoryStorage::new());
    let spawner = QueueSpawner::new();
    let files = ["one.png", "two.png", "three.png"]
        .into_iter()
        .map(|name| MemoryFile::new(name, "image/png", vec![0u8; 16]));

    IngestionPipeline::new().ingest(files, &spawner, add_to(&gallery));
    spawner.run_last();
    spawner.run_next();
    spawner.run_all();

    let gallery = gallery.borrow();
    let store_names: Vec<&str> = gallery.store().list().iter().map(|r| r.name.as_str()).collect();
    let card_names: Vec<&str> = gallery.surface().cards.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(store_names, vec!["three.png", "one.png", "two.png"]);
    assert_eq!(card_names, store_names);
}

#[test]
fn test_reload_restores_collection() {
    let storage = MemoryStorage::new();
    {
        let gallery = open_gallery(&storage);
        let files = (0..3).map(|i| MemoryFile::new(format!("{}.png", i), "image/png", vec![0u8; 1500]));
        IngestionPipeline::new().ingest(files, &BlockingSpawner, add_to(&gallery));
        let second = gallery.borrow().store().list()[1].id.clone();
        gallery.borrow_mut().update_caption(&second, "middle");
    }

    let gallery = open_gallery(&storage);
    let gallery = gallery.borrow();
    let records = gallery.store().list();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].caption, "middle");
    assert!(records.iter().all(|r| r.size_label == "1.46 KB"));
    assert_eq!(gallery.surface().cards, records);
}

#[test]
fn test_malformed_storage_hydrates_empty() {
    let storage = MemoryStorage::new();
    storage
        .set_item(DEFAULT_STORAGE_KEY, "[{\"id\": 1, \"src\": ")
        .unwrap();

    let gallery = open_gallery(&storage);
    assert!(gallery.borrow().store().is_empty());
    assert!(gallery.borrow().surface().empty_state_visible);
}

#[test]
fn test_full_storage_keeps_session_state() {
    let storage = MemoryStorage::with_quota(64);
    let gallery = open_gallery(&storage);

    let png = MemoryFile::new("big.png", "image/png", vec![0u8; 4096]);
    IngestionPipeline::new().ingest(vec![png], &BlockingSpawner, add_to(&gallery));

    assert_eq!(gallery.borrow().store().len(), 1);
    assert_eq!(gallery.borrow().surface().cards.len(), 1);
    assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn test_viewer_lifecycle() {
    let gallery = open_gallery(&MemoryStorage::new());
    IngestionPipeline::new().ingest(
        vec![MemoryFile::new("a.png", "image/png", vec![1u8; 10])],
        &BlockingSpawner,
        add_to(&gallery),
    );
    let id = gallery.borrow().store().list()[0].id.clone();

    let mut gallery = gallery.borrow_mut();
    assert!(gallery.open_viewer(&id));
    let modal = gallery.surface().modal.clone().unwrap();
    assert_eq!(modal.name, "a.png");
    assert!(modal.caption.is_none());

    assert!(gallery.handle_key(&KeyPress::new("Escape")).handled);
    assert!(gallery.surface().modal.is_none());
    assert!(!gallery.close_viewer());
}
