use chrono::NaiveDate;

use flashcard_algo::MemoryState;

mod common;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reviewed(due: NaiveDate, reviewed_on: NaiveDate) -> MemoryState {
    MemoryState {
        difficulty: Some(4.93),
        stability: Some(2.4),
        due_date: due,
        last_review_date: Some(reviewed_on),
    }
}

#[tokio::test]
async fn test_create_and_get_roundtrip() {
    let (store, _temp) = common::create_test_store().await;
    let today = day(2024, 1, 5);

    let created = store.create("bonjour", "hello", today).await.unwrap();
    assert_eq!(created.due_date, today);
    assert!(created.difficulty.is_none());
    assert!(created.stability.is_none());
    assert!(created.last_review_date.is_none());

    let fetched = store.get(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.front, "bonjour");
    assert_eq!(fetched.back, "hello");
    assert_eq!(fetched.memory_state(), created.memory_state());

    assert!(store.get("no-such-id").await.unwrap().is_none());
}

#[tokio::test]
async fn test_apply_review_persists_memory_state() {
    let (store, _temp) = common::create_test_store().await;
    let today = day(2024, 1, 5);
    let card = store.create("merci", "thanks", today).await.unwrap();

    let state = reviewed(day(2024, 1, 7), today);
    assert!(store.apply_review(&card.id, &state).await.unwrap());

    let fetched = store.get(&card.id).await.unwrap().unwrap();
    assert_eq!(fetched.memory_state(), state);
    // Content untouched by a review.
    assert_eq!(fetched.front, "merci");
    assert_eq!(fetched.back, "thanks");
}

#[tokio::test]
async fn test_apply_review_reports_vanished_card() {
    let (store, _temp) = common::create_test_store().await;
    let today = day(2024, 1, 5);
    let card = store.create("oui", "yes", today).await.unwrap();

    // Card deleted between the scheduler run and the write-back.
    assert!(store.delete(&card.id).await.unwrap());
    let state = reviewed(day(2024, 1, 7), today);
    assert!(!store.apply_review(&card.id, &state).await.unwrap());
}

#[tokio::test]
async fn test_update_content_after_delete_is_a_miss() {
    let (store, _temp) = common::create_test_store().await;
    let card = store.create("chat", "cat", day(2024, 1, 1)).await.unwrap();
    assert!(store.delete(&card.id).await.unwrap());

    let updated = store
        .update_content(&card.id, Some("chatte"), None)
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_list_due_orders_by_due_date_then_id() {
    let (store, _temp) = common::create_test_store().await;
    let created_on = day(2024, 1, 1);

    let a = store.create("a", "a", created_on).await.unwrap();
    let b = store.create("b", "b", created_on).await.unwrap();
    let c = store.create("c", "c", created_on).await.unwrap();
    let d = store.create("d", "d", created_on).await.unwrap();

    store
        .apply_review(&a.id, &reviewed(day(2024, 1, 3), created_on))
        .await
        .unwrap();
    store
        .apply_review(&b.id, &reviewed(day(2024, 1, 2), created_on))
        .await
        .unwrap();
    store
        .apply_review(&c.id, &reviewed(day(2024, 1, 2), created_on))
        .await
        .unwrap();
    // Not yet due.
    store
        .apply_review(&d.id, &reviewed(day(2024, 2, 1), created_on))
        .await
        .unwrap();

    let due = store.list_due(day(2024, 1, 5)).await.unwrap();
    assert_eq!(due.len(), 3);

    assert_eq!(due[0].due_date, day(2024, 1, 2));
    assert_eq!(due[1].due_date, day(2024, 1, 2));
    assert_eq!(due[2].due_date, day(2024, 1, 3));

    // Same-day ties come back in id order.
    let mut tie_ids = vec![b.id.clone(), c.id.clone()];
    tie_ids.sort();
    assert_eq!(due[0].id, tie_ids[0]);
    assert_eq!(due[1].id, tie_ids[1]);
}

#[tokio::test]
async fn test_list_due_excludes_future_cards() {
    let (store, _temp) = common::create_test_store().await;
    let card = store.create("a", "a", day(2024, 1, 10)).await.unwrap();

    assert!(store.list_due(day(2024, 1, 5)).await.unwrap().is_empty());

    let due = store.list_due(day(2024, 1, 10)).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, card.id);
}

#[tokio::test]
async fn test_update_content_partial() {
    let (store, _temp) = common::create_test_store().await;
    let card = store.create("chein", "dog", day(2024, 1, 1)).await.unwrap();

    let updated = store
        .update_content(&card.id, Some("chien"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.front, "chien");
    assert_eq!(updated.back, "dog");

    let fetched = store.get(&card.id).await.unwrap().unwrap();
    assert_eq!(fetched.front, "chien");

    assert!(store
        .update_content("no-such-id", Some("x"), None)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_delete_and_clear() {
    let (store, _temp) = common::create_test_store().await;
    let today = day(2024, 1, 1);

    let card = store.create("a", "a", today).await.unwrap();
    assert!(store.delete(&card.id).await.unwrap());
    assert!(!store.delete(&card.id).await.unwrap());

    store.create("b", "b", today).await.unwrap();
    store.create("c", "c", today).await.unwrap();
    assert_eq!(store.clear().await.unwrap(), 2);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_inserts_due_cards() {
    let (store, _temp) = common::create_test_store().await;
    let today = day(2024, 1, 1);

    let pairs = vec![
        ("bonjour".to_string(), "hello".to_string()),
        ("merci".to_string(), "thanks".to_string()),
    ];
    let imported = store.import(&pairs, today).await.unwrap();
    assert_eq!(imported, 2);

    let due = store.list_due(today).await.unwrap();
    assert_eq!(due.len(), 2);
    assert!(due.iter().all(|card| card.stability.is_none()));
}
