mod common;

use rusty_library_ledger::adapters::postgres::PostgresDocumentStore;
use rusty_library_ledger::application::checkout::{ServiceDependencies, adjust_book_count};
use rusty_library_ledger::domain::BookId;
use rusty_library_ledger::domain::commands::AdjustBookCount;
use rusty_library_ledger::ports::{CommitOutcome, Document, DocumentRef, DocumentStore, Write};
use serde_json::{Value, json};
use serial_test::serial;
use sqlx::PgPool;
use std::sync::Arc;

/// テストデータをクリーンアップ
async fn cleanup_documents(pool: &PgPool) {
    sqlx::query("DELETE FROM documents")
        .execute(pool)
        .await
        .expect("Failed to cleanup documents");
}

async fn setup_store() -> (PgPool, PostgresDocumentStore) {
    let pool = common::create_test_pool().await;
    cleanup_documents(&pool).await;
    let store = PostgresDocumentStore::new(pool.clone());
    (pool, store)
}

fn fields(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_set_and_get_document() {
    let (_pool, store) = setup_store().await;
    let target = DocumentRef::new("books", "B1");

    store
        .set(&target, fields(json!({ "count": 3, "title": "Dế Mèn" })))
        .await
        .unwrap();

    let doc = store.get(&target).await.unwrap().unwrap();
    assert_eq!(doc.id, "B1");
    assert_eq!(doc.data.get("count"), Some(&json!(3)));
    assert!(store.get(&DocumentRef::new("books", "B2")).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_add_generates_id() {
    let (_pool, store) = setup_store().await;

    let id = store
        .add("checkout", fields(json!({ "email": "reader@example.com", "status": 0 })))
        .await
        .unwrap();

    let doc = store
        .get(&DocumentRef::new("checkout", id.as_str()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.data.get("status"), Some(&json!(0)));
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_field_matches_collection_and_value() {
    let (_pool, store) = setup_store().await;
    store
        .set(
            &DocumentRef::new("checkout", "C1"),
            fields(json!({ "email": "reader@example.com", "status": 0 })),
        )
        .await
        .unwrap();
    store
        .set(
            &DocumentRef::new("checkout", "C2"),
            fields(json!({ "email": "other@example.com", "status": 1 })),
        )
        .await
        .unwrap();
    store
        .set(
            &DocumentRef::new("audit", "A1"),
            fields(json!({ "email": "reader@example.com" })),
        )
        .await
        .unwrap();

    let found = store
        .find_by_field("checkout", "email", &json!("reader@example.com"))
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "C1");
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_commit_applies_update_and_delete_together() {
    let (_pool, store) = setup_store().await;
    let book = DocumentRef::new("books", "B1");
    let checkout = DocumentRef::new("checkout", "C1");
    store
        .set(&book, fields(json!({ "count": 3, "title": "Dế Mèn" })))
        .await
        .unwrap();
    store
        .set(&checkout, fields(json!({ "bookId": "B1", "status": 0 })))
        .await
        .unwrap();
    let book_version = store.get(&book).await.unwrap().unwrap().version;
    let checkout_version = store.get(&checkout).await.unwrap().unwrap().version;

    let outcome = store
        .commit(vec![
            Write::Delete {
                target: checkout.clone(),
                expected_version: checkout_version,
            },
            Write::Update {
                target: book.clone(),
                expected_version: book_version,
                fields: fields(json!({ "count": 4 })),
            },
        ])
        .await
        .unwrap();

    assert_eq!(outcome, CommitOutcome::Committed);
    assert!(store.get(&checkout).await.unwrap().is_none());
    let updated = store.get(&book).await.unwrap().unwrap();
    assert_eq!(updated.data.get("count"), Some(&json!(4)));
    // 更新は既存フィールドとマージされる
    assert_eq!(updated.data.get("title"), Some(&json!("Dế Mèn")));
    assert!(updated.version > book_version);
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_commit_with_stale_version_applies_nothing() {
    let (_pool, store) = setup_store().await;
    let book = DocumentRef::new("books", "B1");
    let checkout = DocumentRef::new("checkout", "C1");
    store.set(&book, fields(json!({ "count": 3 }))).await.unwrap();
    store
        .set(&checkout, fields(json!({ "status": 1 })))
        .await
        .unwrap();
    let stale_book_version = store.get(&book).await.unwrap().unwrap().version;
    let checkout_version = store.get(&checkout).await.unwrap().unwrap().version;

    // 別の書き込みで書籍のバージョンを進める
    store.set(&book, fields(json!({ "count": 7 }))).await.unwrap();

    let outcome = store
        .commit(vec![
            Write::Update {
                target: checkout.clone(),
                expected_version: checkout_version,
                fields: fields(json!({ "status": 2 })),
            },
            Write::Update {
                target: book.clone(),
                expected_version: stale_book_version,
                fields: fields(json!({ "count": 4 })),
            },
        ])
        .await
        .unwrap();

    assert_eq!(outcome, CommitOutcome::Conflict);
    let checkout_doc = store.get(&checkout).await.unwrap().unwrap();
    assert_eq!(checkout_doc.data.get("status"), Some(&json!(1)));
    let book_doc = store.get(&book).await.unwrap().unwrap();
    assert_eq!(book_doc.data.get("count"), Some(&json!(7)));
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_parallel_adjustments_against_postgres() {
    let (_pool, store) = setup_store().await;
    store
        .set(&DocumentRef::new("books", "B1"), fields(json!({ "count": 3 })))
        .await
        .unwrap();
    let store: Arc<PostgresDocumentStore> = Arc::new(store);
    let deps = ServiceDependencies::new(store.clone());

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let deps = deps.clone();
            tokio::spawn(async move {
                adjust_book_count(
                    &deps,
                    AdjustBookCount {
                        book_id: BookId::new("B1").unwrap(),
                        delta: 1,
                    },
                )
                .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let doc = store
        .get(&DocumentRef::new("books", "B1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.data.get("count"), Some(&json!(5)));
}
