// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flat-file store: one JSON file per namespace under a data directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{RewardStore, StoreError};

/// File-backed blob store.
///
/// Writes go through a temp file and rename, so a namespace's blob is never
/// observable half-written. Concurrent writers from other processes are not
/// coordinated; last rename wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| io_error("<root>", &e))?;
        Ok(Self { root })
    }

    /// File path for a namespace. The namespace is percent-encoded so ids
    /// can never escape the data directory or collide on special characters.
    fn path_for(&self, namespace: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", urlencoding::encode(namespace)))
    }
}

#[async_trait]
impl RewardStore for FileStore {
    async fn get(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(namespace)).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(namespace, &e)),
        }
    }

    async fn put(&self, namespace: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.path_for(namespace);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob)
            .await
            .map_err(|e| io_error(namespace, &e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(namespace, &e))
    }

    async fn remove(&self, namespace: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(namespace)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(namespace, &e)),
        }
    }
}

fn io_error(namespace: &str, e: &std::io::Error) -> StoreError {
    StoreError::Io {
        namespace: namespace.to_string(),
        message: e.to_string(),
    }
}
