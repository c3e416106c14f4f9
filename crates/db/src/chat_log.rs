//! Per-user chat history stored as one JSON array file per user.
//!
//! Every append is a full read-modify-write of the user's file. Writes go
//! to a temporary sibling and are renamed over the target, so a reader
//! never sees a half-written file. Appends to the same file are serialized
//! within this process; separate processes sharing the directory can still
//! lose an append (last writer wins).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kevs_core::chat::{log_file_name, ChatMessage};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum ChatLogError {
    #[error("Chat log I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chat log JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed chat history store rooted at a directory.
#[derive(Debug)]
pub struct ChatLogStore {
    dir: PathBuf,
    /// One async mutex per log file name.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChatLogStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the history file for `username`.
    pub fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(log_file_name(username))
    }

    /// Load a user's full history. A missing file is an empty history.
    pub async fn load(&self, username: &str) -> Result<Vec<ChatMessage>, ChatLogError> {
        read_history(&self.path_for(username)).await
    }

    /// Append one message and return the updated history.
    pub async fn append(
        &self,
        username: &str,
        message: ChatMessage,
    ) -> Result<Vec<ChatMessage>, ChatLogError> {
        self.append_all(username, [message]).await
    }

    /// Append both halves of a chat exchange and return the updated history.
    pub async fn append_exchange(
        &self,
        username: &str,
        exchange: [ChatMessage; 2],
    ) -> Result<Vec<ChatMessage>, ChatLogError> {
        self.append_all(username, exchange).await
    }

    /// Append several messages in one read-modify-write and return the
    /// updated history.
    pub async fn append_all(
        &self,
        username: &str,
        messages: impl IntoIterator<Item = ChatMessage>,
    ) -> Result<Vec<ChatMessage>, ChatLogError> {
        let file_name = log_file_name(username);
        let path = self.dir.join(&file_name);

        let file_lock = self.lock_for(&file_name).await;
        let result = {
            let _guard = file_lock.lock().await;
            self.read_modify_write(&path, messages).await
        };
        self.release_lock(&file_name, file_lock).await;

        let history = result?;
        tracing::debug!(
            path = %path.display(),
            entries = history.len(),
            "Chat log written"
        );

        Ok(history)
    }

    async fn read_modify_write(
        &self,
        path: &Path,
        messages: impl IntoIterator<Item = ChatMessage>,
    ) -> Result<Vec<ChatMessage>, ChatLogError> {
        let mut history = read_history(path).await?;
        history.extend(messages);
        self.write_history(path, &history).await?;
        Ok(history)
    }

    async fn lock_for(&self, file_name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(file_name.to_string()).or_default())
    }

    /// Drop this caller's handle and remove the map entry once no other
    /// append holds or waits on it.
    async fn release_lock(&self, file_name: &str, file_lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        drop(file_lock);
        if locks
            .get(file_name)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(file_name);
        }
    }

    async fn write_history(
        &self,
        path: &Path,
        history: &[ChatMessage],
    ) -> Result<(), ChatLogError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_error(&self.dir))?;

        let bytes = serde_json::to_vec_pretty(history).map_err(|source| ChatLogError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(io_error(&temp_path))?;
        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(io_error(path))?;

        Ok(())
    }
}

async fn read_history(path: &Path) -> Result<Vec<ChatMessage>, ChatLogError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error(path)(e)),
    };

    serde_json::from_slice(&bytes).map_err(|source| ChatLogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ChatLogError {
    let path = path.to_path_buf();
    move |source| ChatLogError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn locks_are_pruned_after_appends() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ChatLogStore::new(dir.path()));

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let username = format!("user{}", i % 3);
                store.append(&username, ChatMessage::user("hi")).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(store.locks.lock().await.is_empty());
        assert_eq!(store.load("user0").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn failed_append_still_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"file").unwrap();
        let store = ChatLogStore::new(&blocked);

        assert!(store.append("alice", ChatMessage::user("hi")).await.is_err());
        assert!(store.locks.lock().await.is_empty());
    }
}
