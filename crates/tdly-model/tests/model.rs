//! Model read/write/list behavior against counted in-memory storage

use pretty_assertions::assert_eq;
use std::sync::Arc;
use tdly_model::{
    DocumentItem, DocumentSerializer, InMemoryDocumentStorage, Model, ModelConfig, ModelError, TdlyDocument, WriteOutcome,
    YamlDocumentSerializer, ITEM_TYPE, LIST_TYPE, TAGS_TYPE,
};
use tdly_test_utils::{
    init_tracing, CountingStorage, BASE_PATH, EXAMPLE_LIST, EXAMPLE_LIST_PATH, EXAMPLE_TAGS_PATH,
};

fn model(storage: &Arc<CountingStorage>) -> Model<TdlyDocument> {
    init_tracing();
    let config = ModelConfig::new().with_base_path(BASE_PATH);
    Model::tdly(config, storage.clone()).unwrap()
}

#[tokio::test]
async fn repeated_reads_hit_storage_once() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let first = model.read_generic(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap();
    let second = model.read_generic(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap();

    assert_eq!(storage.reads(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        model.cached_hash(LIST_TYPE, EXAMPLE_LIST_PATH),
        Some(YamlDocumentSerializer.compute_content_hash(EXAMPLE_LIST))
    );
}

#[tokio::test]
async fn typed_reads_reinflate_from_cache() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let list = model.read(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap();
    let again = model.read(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap();
    assert_eq!(storage.reads(), 1);
    assert_eq!(list, again);

    let list = list.into_list().unwrap();
    assert_eq!(list.tags, vec!["chores"]);
    assert_eq!(
        list.items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        vec!["weird", "idk idk"]
    );
    assert_eq!(list.items[0].tags, vec!["odd"]);
}

#[tokio::test]
async fn tags_document() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let tags = model.read(TAGS_TYPE, EXAMPLE_TAGS_PATH).await.unwrap().into_tags().unwrap();
    assert_eq!(tags.find("housework").map(|t| t.name.as_str()), Some("chores"));
    assert!(tags.find("odd").is_some());
}

#[tokio::test]
async fn unchanged_write_skips_storage() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let generic = model.read_generic(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap();
    let outcome = model.write(&generic).await.unwrap();

    assert_eq!(outcome, WriteOutcome::Unchanged);
    assert_eq!(storage.writes(), 0);
    assert_eq!(storage.reads(), 1);
}

#[tokio::test]
async fn unchanged_typed_round_trip_skips_storage() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let list = model.read(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap().into_list().unwrap();
    let outcome = model.write(&list.to_document()).await.unwrap();

    assert_eq!(outcome, WriteOutcome::Unchanged);
    assert_eq!(storage.writes(), 0);
}

const SPARSE_LIST: &str = "\
name: sparse
type: List
created: last week
tags:
properties:
  tags:
items:
- name: first
  type: Item
  done: true
  properties:
    guid: 5c1d0a7e-0000-4000-8000-000000000001
    content: nothing here
    tags:
";

#[tokio::test]
async fn unchanged_typed_round_trip_keeps_null_tags_and_extra_keys() {
    let inner = InMemoryDocumentStorage::new();
    inner.insert_raw(format!("{BASE_PATH}/lists/sparse.yml"), SPARSE_LIST);
    let storage = Arc::new(CountingStorage::new(Arc::new(inner)));
    let model = model(&storage);

    let list = model.read(LIST_TYPE, "lists/sparse.yml").await.unwrap().into_list().unwrap();
    assert!(list.tags.is_empty());
    assert!(list.items[0].tags.is_empty());

    let outcome = model.write(&list.to_document()).await.unwrap();
    assert_eq!(outcome, WriteOutcome::Unchanged);
    assert_eq!(storage.writes(), 0);
}

#[tokio::test]
async fn written_documents_keep_unknown_keys() {
    let inner = InMemoryDocumentStorage::new();
    inner.insert_raw(format!("{BASE_PATH}/lists/sparse.yml"), SPARSE_LIST);
    let storage = Arc::new(CountingStorage::new(Arc::new(inner)));
    let model = model(&storage);

    let mut list = model.read(LIST_TYPE, "lists/sparse.yml").await.unwrap().into_list().unwrap();
    list.items[0].content = "something now".to_string();
    assert!(model.write(&list.to_document()).await.unwrap().is_written());

    let stored = model.read_generic(LIST_TYPE, "lists/sparse.yml").await.unwrap();
    assert_eq!(stored.layout.order.first().map(String::as_str), Some("name"));
    assert!(stored.layout.extra.contains_key("created"));
    assert!(stored.items[0].layout.extra.contains_key("done"));
}

#[tokio::test]
async fn changed_write_is_stored_and_reflected() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let old_hash = {
        model.read_generic(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap();
        model.cached_hash(LIST_TYPE, EXAMPLE_LIST_PATH).unwrap()
    };

    let mut list = model.read(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap().into_list().unwrap();
    list.items[1].content = "figured it out".to_string();
    let outcome = model.write(&list.to_document()).await.unwrap();

    let WriteOutcome::Written { hash } = outcome else {
        panic!("expected a write, got {outcome:?}");
    };
    assert_ne!(hash, old_hash);
    assert_eq!(storage.writes(), 1);
    // one initial load plus the confirm read-back
    assert_eq!(storage.reads(), 2);

    let reread = model.read(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap().into_list().unwrap();
    assert_eq!(reread.items[1].content, "figured it out");
    assert_eq!(model.cached_hash(LIST_TYPE, EXAMPLE_LIST_PATH), Some(hash));
    assert_eq!(storage.reads(), 2);
}

#[tokio::test]
async fn write_of_uncached_document_is_stored() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let doc = tdly_model::Document::new(LIST_TYPE, "fresh", "lists/fresh.yml").with_item(
        DocumentItem::new(ITEM_TYPE, "first")
            .with_property("guid", "a1")
            .with_property("content", "hello"),
    );
    let outcome = model.write(&doc).await.unwrap();

    assert!(outcome.is_written());
    assert_eq!(storage.writes(), 1);
    let generic = model.read_generic(LIST_TYPE, "lists/fresh.yml").await.unwrap();
    assert_eq!(*generic, doc);
    assert_eq!(storage.reads(), 1);
}

#[tokio::test]
async fn failed_write_leaves_cache_untouched() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let generic = model.read_generic(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap();
    let hash = model.cached_hash(LIST_TYPE, EXAMPLE_LIST_PATH);

    let mut edited = (*generic).clone();
    edited.name = "renamed".to_string();
    storage.fail_writes(true);

    let err = model.write(&edited).await.unwrap_err();
    assert!(matches!(err, ModelError::Storage(_)));
    assert_eq!(model.cached_hash(LIST_TYPE, EXAMPLE_LIST_PATH), hash);
    let cached = model.read_generic(LIST_TYPE, EXAMPLE_LIST_PATH).await.unwrap();
    assert_eq!(cached.name, "Example list");
}

#[tokio::test]
async fn write_rejects_foreign_item_types() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let doc = tdly_model::Document::new(LIST_TYPE, "mixed", "mixed.yml")
        .with_item(DocumentItem::new("Tag", "not an item"));
    let err = model.write(&doc).await.unwrap_err();

    assert!(matches!(err, ModelError::Document(_)));
    assert_eq!(storage.writes(), 0);
}

#[tokio::test]
async fn unknown_document_type_fails_before_io() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let err = model.read_generic("Calendar", "cal.yml").await.unwrap_err();
    assert!(matches!(err, ModelError::UnknownDocumentType(t) if t == "Calendar"));
    assert_eq!(storage.reads(), 0);
}

#[tokio::test]
async fn inflation_errors_surface_on_read() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let doc = tdly_model::Document::new(LIST_TYPE, "broken", "broken.yml")
        .with_item(DocumentItem::new(ITEM_TYPE, "no guid").with_property("content", "x"));
    model.write(&doc).await.unwrap();

    let err = model.read(LIST_TYPE, "broken.yml").await.unwrap_err();
    assert!(matches!(err, ModelError::Inflate(_)));
}

#[tokio::test]
async fn concurrent_reads_share_one_load() {
    let storage = CountingStorage::seeded();
    let model = Arc::new(model(&storage));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let model = Arc::clone(&model);
            tokio::spawn(async move { model.read_generic(LIST_TYPE, EXAMPLE_LIST_PATH).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(storage.reads(), 1);
}

#[tokio::test]
async fn list_delegates_to_storage() {
    let storage = CountingStorage::seeded();
    let model = model(&storage);

    let root = model.list().await.unwrap();
    assert_eq!(root.documents.iter().collect::<Vec<_>>(), vec!["tags.yml"]);
    assert_eq!(root.folders.iter().collect::<Vec<_>>(), vec!["lists"]);

    let lists = model.list_in("lists").await.unwrap();
    assert_eq!(lists.documents.iter().collect::<Vec<_>>(), vec!["example.yml"]);
    assert_eq!(storage.lists(), 2);
}

#[test]
fn unsupported_extension() {
    let storage = CountingStorage::seeded();
    let config = ModelConfig::new().with_default_extension("xml");
    let err = Model::tdly(config, storage).unwrap_err();
    assert!(matches!(err, ModelError::UnsupportedExtension(ext) if ext == "xml"));
}

#[test]
fn document_types() {
    let storage = CountingStorage::seeded();
    assert_eq!(model(&storage).document_types(), vec![LIST_TYPE, TAGS_TYPE]);
}
