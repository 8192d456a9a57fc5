//! Postgres dialog store tests
//!
//! Skipped unless `TEST_DATABASE_URL` points at a disposable database.

#![allow(dead_code)]

mod common;

use dialog_dialogs::{DialogStore, Message, PgDialogStore};
use uuid::Uuid;

use crate::common::test_pool;

fn fresh_pair() -> (String, String) {
    (Uuid::new_v4().to_string(), Uuid::new_v4().to_string())
}

#[tokio::test]
async fn test_add_then_list_is_symmetric_and_ordered() {
    let Some(pool) = test_pool().await.unwrap() else {
        return;
    };
    let store = PgDialogStore::new(pool);
    let (a, b) = fresh_pair();

    let first = store.add(&Message::new(&a, &b, "one")).await.unwrap();
    let second = store.add(&Message::new(&b, &a, "two")).await.unwrap();
    store.add(&Message::new(&a, &b, "three")).await.unwrap();
    assert_ne!(first, second);

    let forward = store.list_between(&a, &b).await.unwrap();
    let backward = store.list_between(&b, &a).await.unwrap();
    assert_eq!(forward, backward);

    let texts: Vec<&str> = forward.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert_eq!(forward[0].id, first);
    assert!(forward.iter().all(|m| m.is_between(&a, &b)));
}

#[tokio::test]
async fn test_conversations_do_not_leak() {
    let Some(pool) = test_pool().await.unwrap() else {
        return;
    };
    let store = PgDialogStore::new(pool);
    let (a, b) = fresh_pair();
    let c = Uuid::new_v4().to_string();

    store.add(&Message::new(&a, &b, "for b")).await.unwrap();
    store.add(&Message::new(&a, &c, "for c")).await.unwrap();

    let listed = store.list_between(&a, &c).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text, "for c");

    let (x, y) = fresh_pair();
    assert!(store.list_between(&x, &y).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let Some(pool) = test_pool().await.unwrap() else {
        return;
    };
    let store = PgDialogStore::new(pool);
    let (a, b) = fresh_pair();

    assert!(store.add(&Message::new(&a, &b, "")).await.is_err());
    assert!(store.list_between(&a, &b).await.unwrap().is_empty());
}
