//! End-to-end pipeline tests over in-memory stores and a recording sender.

use std::sync::Arc;

use quotefeed::email::Mailbox;
use quotefeed::newsletter::{NewsletterPipeline, DEFAULT_QUOTE_ID};
use quotefeed::store::{DeliveryStatus, Frequency, StoreError};
use quotefeed::testing::{test_profile, test_quote, MemoryStore, MockEmailSender};

const APP_URL: &str = "https://app.example.com";

fn pipeline(store: &MemoryStore, sender: &MockEmailSender) -> NewsletterPipeline {
    NewsletterPipeline::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(sender.clone()),
        Mailbox::new("noreply@quotefeed.app").with_name("Quotefeed"),
        APP_URL,
    )
}

fn favorite(id: &str, user_id: &str) -> quotefeed::store::Quote {
    test_quote(id, user_id, &format!("Favorite {id}"), true)
}

fn popular(id: &str, views: i32) -> quotefeed::store::Quote {
    let mut quote = test_quote(id, "someone-else", &format!("Popular {id}"), false);
    quote.is_public = true;
    quote.view_count = views;
    quote
}

#[tokio::test]
async fn delivers_favorites_to_a_daily_recipient() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("u1", Some("Ada"), Frequency::Daily));
    store.set_identity("u1", "ada@example.com", None);
    store.push_quote(favorite("q1", "u1"));
    store.push_quote(favorite("q2", "u1"));

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.total, 1);
    assert!(report.details.is_none());

    assert!(sender.was_sent_to("ada@example.com"));
    let email = sender.last_sent().unwrap();
    assert_eq!(
        email.subject.as_deref(),
        Some("Your daily inspiration from Quotefeed")
    );
    let html = email.html.as_deref().unwrap();
    assert!(html.contains("Favorite q1"));
    assert!(html.contains("Favorite q2"));

    let entries = store.log_entries_for("u1");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, DeliveryStatus::Sent);
    assert_eq!(entries[0].frequency, Frequency::Daily);
    assert_eq!(entries[0].content["quotes"][0]["id"], "q1");
}

#[tokio::test]
async fn falls_back_to_popular_then_default() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("no-favs", None, Frequency::Daily));
    store.set_identity("no-favs", "nofavs@example.com", Some("Sam"));
    store.push_quote(popular("p1", 90));
    store.push_quote(popular("p2", 40));

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();
    assert_eq!(report.sent, 1);

    let html = sender.last_sent().unwrap().html.unwrap();
    assert!(html.contains("Popular p1"));
    assert!(html.contains("Popular p2"));

    // A user with neither favorites nor any public quotes in the store gets
    // the built-in default quote.
    let empty = MemoryStore::new();
    empty.push_profile(test_profile("lonely", None, Frequency::Daily));
    empty.set_identity("lonely", "lonely@example.com", None);

    let sender = MockEmailSender::new();
    let report = pipeline(&empty, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();
    assert_eq!(report.sent, 1);

    let html = sender.last_sent().unwrap().html.unwrap();
    assert!(html.contains("Steve Jobs"));

    let entries = empty.log_entries_for("lonely");
    assert_eq!(entries[0].content["quotes"][0]["id"], DEFAULT_QUOTE_ID);
}

#[tokio::test]
async fn one_failing_recipient_does_not_stop_the_batch() {
    let store = MemoryStore::new();
    for (user, email) in [
        ("u1", "one@example.com"),
        ("u2", "two@example.com"),
        ("u3", "three@example.com"),
    ] {
        store.push_profile(test_profile(user, None, Frequency::Daily));
        store.set_identity(user, email, None);
        store.push_quote(favorite(&format!("q-{user}"), user));
    }

    let sender = MockEmailSender::new();
    sender.fail_for("two@example.com");

    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();

    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.total, 3);
    assert!(sender.was_sent_to("one@example.com"));
    assert!(sender.was_sent_to("three@example.com"));

    let failed = store.log_entries_for("u2");
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].status, DeliveryStatus::Failed);
    assert!(failed[0].content["error"].as_str().unwrap().contains("provider"));

    // Every recipient logged exactly one entry.
    assert_eq!(store.log_entries().len(), 3);
}

#[tokio::test]
async fn missing_email_fails_only_that_recipient() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("with-email", None, Frequency::Daily));
    store.set_identity("with-email", "ok@example.com", None);
    store.push_profile(test_profile("without-email", None, Frequency::Daily));
    store.push_quote(favorite("f1", "with-email"));

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 1);

    let entries = store.log_entries_for("without-email");
    assert_eq!(entries[0].content["error"], "no email found");
}

#[tokio::test]
async fn no_frequency_runs_daily_then_weekly_with_details() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("d1", None, Frequency::Daily));
    store.set_identity("d1", "d1@example.com", None);
    store.push_profile(test_profile("w1", None, Frequency::Weekly));
    store.set_identity("w1", "w1@example.com", None);
    store.push_profile(test_profile("w2", None, Frequency::Weekly));
    store.set_identity("w2", "w2@example.com", None);
    // Monthly recipients are outside the default trigger.
    store.push_profile(test_profile("m1", None, Frequency::Monthly));
    store.set_identity("m1", "m1@example.com", None);

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender).run(None, None).await.unwrap();

    assert_eq!(report.sent, 3);
    assert_eq!(report.total, 3);

    let details = report.details.unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].frequency, Frequency::Daily);
    assert_eq!(details[0].summary.sent, 1);
    assert_eq!(details[1].frequency, Frequency::Weekly);
    assert_eq!(details[1].summary.sent, 2);
    assert!(!sender.was_sent_to("m1@example.com"));
}

#[tokio::test]
async fn user_id_restricts_the_batch_to_one_recipient() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("target", None, Frequency::Daily));
    store.set_identity("target", "target@example.com", None);
    store.push_profile(test_profile("bystander", None, Frequency::Daily));
    store.set_identity("bystander", "bystander@example.com", None);

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), Some("target"))
        .await
        .unwrap();

    assert_eq!(report.total, 1);
    assert!(sender.was_sent_to("target@example.com"));
    assert!(!sender.was_sent_to("bystander@example.com"));
}

#[tokio::test]
async fn empty_recipient_set_is_a_clean_zero_report() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("off", None, Frequency::Disabled));

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();

    assert_eq!(report.sent, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.total, 0);
    assert_eq!(sender.sent_count(), 0);
    assert!(store.log_entries().is_empty());
}

#[tokio::test]
async fn recipient_resolution_failure_is_batch_fatal() {
    let store = MemoryStore::new();
    store.fail_recipients(StoreError::Connectivity("pool closed".to_string()));

    let sender = MockEmailSender::new();
    let result = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await;

    assert!(result.is_err());
    assert_eq!(sender.sent_count(), 0);
    assert!(store.log_entries().is_empty());
}

#[tokio::test]
async fn quote_connectivity_failure_fails_the_recipient_but_not_siblings() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("u1", None, Frequency::Daily));
    store.set_identity("u1", "u1@example.com", None);
    store.fail_favorites(StoreError::Connectivity("connection refused".to_string()));

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();

    assert_eq!(report.sent, 0);
    assert_eq!(report.failed, 1);

    let entries = store.log_entries_for("u1");
    assert_eq!(entries[0].status, DeliveryStatus::Failed);
    assert!(entries[0].content["error"]
        .as_str()
        .unwrap()
        .contains("quote selection failed"));
}

#[tokio::test]
async fn quote_query_failure_degrades_to_the_next_tier() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("u1", None, Frequency::Daily));
    store.set_identity("u1", "u1@example.com", None);
    store.push_quote(popular("p1", 10));
    store.fail_favorites(StoreError::Query("relation vanished".to_string()));

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();

    assert_eq!(report.sent, 1);
    let html = sender.last_sent().unwrap().html.unwrap();
    assert!(html.contains("Popular p1"));
}

#[tokio::test]
async fn log_insert_failure_does_not_change_the_outcome() {
    let store = MemoryStore::new();
    store.push_profile(test_profile("u1", None, Frequency::Daily));
    store.set_identity("u1", "u1@example.com", None);
    store.fail_log(StoreError::Query("log table locked".to_string()));

    let sender = MockEmailSender::new();
    let report = pipeline(&store, &sender)
        .run(Some(Frequency::Daily), None)
        .await
        .unwrap();

    assert_eq!(report.sent, 1);
    assert!(sender.was_sent_to("u1@example.com"));
}
