//! Tests for the file-backed chat log store.

use std::sync::Arc;

use assert_matches::assert_matches;
use kevs_core::chat::{ChatMessage, Sender};
use kevs_db::chat_log::{ChatLogError, ChatLogStore};

#[tokio::test]
async fn missing_file_is_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = ChatLogStore::new(dir.path().join("logs"));

    let history = store.load("nobody").await.unwrap();
    assert!(history.is_empty());
    // Loading must not create the directory.
    assert!(!store.dir().exists());
}

#[tokio::test]
async fn append_preserves_order_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = ChatLogStore::new(dir.path());

    store.append("alice", ChatMessage::user("one")).await.unwrap();
    store.append("alice", ChatMessage::bot("two")).await.unwrap();
    let history = store
        .append_all("alice", [ChatMessage::user("three"), ChatMessage::bot("four")])
        .await
        .unwrap();

    let texts: Vec<_> = history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["one", "two", "three", "four"]);

    // A fresh store over the same directory sees the same history.
    let reloaded = ChatLogStore::new(dir.path()).load("alice").await.unwrap();
    assert_eq!(reloaded, history);
    assert_eq!(reloaded[1].who, Sender::Bot);
}

#[tokio::test]
async fn file_name_is_sanitized_username() {
    let dir = tempfile::tempdir().unwrap();
    let store = ChatLogStore::new(dir.path());

    store.append("Alice.Smith", ChatMessage::user("hey")).await.unwrap();

    assert!(dir.path().join("alicesmith.json").is_file());
    assert!(!dir.path().join("alicesmith.json.tmp").exists());
    // Usernames that sanitize to the same stem share a history.
    assert_eq!(store.load("alicesmith").await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_appends_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ChatLogStore::new(dir.path()));

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .append("busy", ChatMessage::user(format!("msg {i}")))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.load("busy").await.unwrap().len(), 20);
}

#[tokio::test]
async fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store = ChatLogStore::new(dir.path());
    std::fs::write(store.path_for("broken"), b"{not json").unwrap();

    assert_matches!(store.load("broken").await, Err(ChatLogError::Json { .. }));
    assert_matches!(
        store.append("broken", ChatMessage::user("x")).await,
        Err(ChatLogError::Json { .. })
    );
}

#[tokio::test]
async fn exchange_is_written_user_then_bot() {
    let dir = tempfile::tempdir().unwrap();
    let store = ChatLogStore::new(dir.path());

    store
        .append_exchange("carol", [ChatMessage::user("hi"), ChatMessage::bot("hello")])
        .await
        .unwrap();
    let history = store
        .append_exchange("carol", [ChatMessage::user("bye"), ChatMessage::bot("later")])
        .await
        .unwrap();

    let senders: Vec<_> = history.iter().map(|m| m.who).collect();
    assert_eq!(senders, [Sender::User, Sender::Bot, Sender::User, Sender::Bot]);
    assert_eq!(history[2].text, "bye");
}

#[tokio::test]
async fn empty_username_uses_anonymous_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = ChatLogStore::new(dir.path());

    store.append("...", ChatMessage::user("who am i")).await.unwrap();

    assert!(dir.path().join("anonymous.json").is_file());
}
