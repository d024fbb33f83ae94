use chrono::NaiveDate;
use martin_core::ContactBook;
use martin_core::Field;
use martin_core::Status;
use martin_core::status::classify;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::common::MemoryDirectory;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn directory() -> MemoryDirectory {
    MemoryDirectory::with_people(vec![
        json!({
            "resourceName": "people/alice",
            "etag": "a0",
            "names": [{ "displayName": "Alice" }],
            "userDefined": [
                { "key": "Tier", "value": "1" },
                { "key": "LastContactDate", "value": "2025-08-18" }
            ]
        }),
        json!({
            "resourceName": "people/bob",
            "etag": "b0",
            "names": [{ "displayName": "Bob" }],
            "userDefined": [
                { "key": "Tier", "value": "2" },
                { "key": "Nickname", "value": "Bobby" }
            ]
        }),
        json!({ "resourceName": "people/anon", "etag": "n0" }),
    ])
}

fn statuses(book: &ContactBook) -> Vec<(String, Status)> {
    book.records()
        .iter()
        .map(|r| (r.display_name().to_string(), classify(r, today())))
        .collect()
}

#[tokio::test]
async fn overdue_and_missing_data_then_fixed_by_edit() {
    let dir = directory();
    let mut book = ContactBook::new();

    let summary = book.reload(&dir).await.unwrap();
    assert_eq!(summary.loaded, 2);
    assert_eq!(summary.skipped_unnamed, 1);
    assert_eq!(
        statuses(&book),
        vec![
            ("Alice".to_string(), Status::Overdue),
            ("Bob".to_string(), Status::MissingData),
        ]
    );

    book.submit_edit(&dir, 1, "Last Contact Date", "2026-10-18")
        .await
        .unwrap();
    assert_eq!(classify(&book.records()[1], today()), Status::Normal);

    // Sibling custom entries survive the whole-group replace.
    let stored = dir.stored("people/bob");
    let keys: Vec<&str> = stored.user_defined.iter().map(|u| u.key.as_str()).collect();
    assert_eq!(keys, vec!["Tier", "Nickname", "LastContactDate"]);

    // A fresh load sees the same state.
    book.reload(&dir).await.unwrap();
    assert_eq!(classify(&book.records()[1], today()), Status::Normal);
}

#[tokio::test]
async fn consecutive_edits_use_the_refreshed_etag() {
    let dir = directory();
    let mut book = ContactBook::new();
    book.reload(&dir).await.unwrap();

    book.submit_edit(&dir, 0, "Name", "Alice Liddell").await.unwrap();
    assert_eq!(book.records()[0].handle().etag(), Some("etag-1"));

    book.submit_edit(&dir, 0, "How I Know Them", "Wonderland")
        .await
        .unwrap();
    assert_eq!(book.records()[0].handle().etag(), Some("etag-2"));
    assert_eq!(
        *dir.masks.lock().unwrap(),
        vec!["names".to_string(), "organizations".to_string()]
    );

    let stored = dir.stored("people/alice");
    assert_eq!(stored.names[0].display_name.as_deref(), Some("Alice Liddell"));
    assert_eq!(stored.organizations[0].name.as_deref(), Some("Wonderland"));
}

#[tokio::test]
async fn failed_push_is_retried_with_the_next_edit() {
    let dir = directory();
    let mut book = ContactBook::new();
    book.reload(&dir).await.unwrap();

    *dir.fail_next_patch.lock().unwrap() = true;
    let err = book.submit_edit(&dir, 1, "Tier", "3").await.unwrap_err();
    assert!(!err.is_validation());
    assert!(book.records()[1].has_pending_changes());

    book.submit_edit(&dir, 1, "Birthday", "04/01/1970").await.unwrap();
    assert_eq!(
        *dir.masks.lock().unwrap(),
        vec!["birthdays,userDefined".to_string()]
    );
    let stored = dir.stored("people/bob");
    assert_eq!(stored.user_defined[0].value, "3");
}

#[tokio::test]
async fn sorting_survives_reload() {
    let dir = directory();
    let mut book = ContactBook::new();
    book.reload(&dir).await.unwrap();

    book.activate_sort(Field::Tier.index()).unwrap();
    book.activate_sort(Field::Tier.index()).unwrap();
    let names: Vec<&str> = book.records().iter().map(|r| r.display_name()).collect();
    assert_eq!(names, vec!["Bob", "Alice"]);

    book.reload(&dir).await.unwrap();
    let names: Vec<&str> = book.records().iter().map(|r| r.display_name()).collect();
    assert_eq!(names, vec!["Bob", "Alice"]);
}

#[tokio::test]
async fn birthday_acknowledgment_reaches_the_directory() {
    let dir = directory();
    let mut book = ContactBook::new();
    book.reload(&dir).await.unwrap();

    book.acknowledge_birthday(&dir, 0, today(), "Birthday text")
        .await
        .unwrap();

    let stored = dir.stored("people/alice");
    let values: Vec<(&str, &str)> = stored
        .user_defined
        .iter()
        .map(|u| (u.key.as_str(), u.value.as_str()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("Tier", "1"),
            ("LastContactDate", "2026-10-18"),
            ("LastContactNote", "Birthday text"),
        ]
    );
    assert_eq!(dir.masks.lock().unwrap().len(), 1);
}
