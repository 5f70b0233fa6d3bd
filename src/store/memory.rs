// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for tests and ephemeral runs.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{RewardStore, StoreError};

/// Blob store backed by a concurrent map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RewardStore for MemoryStore {
    async fn get(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(namespace).map(|e| e.value().clone()))
    }

    async fn put(&self, namespace: &str, blob: &str) -> Result<(), StoreError> {
        self.blobs.insert(namespace.to_string(), blob.to_string());
        Ok(())
    }

    async fn remove(&self, namespace: &str) -> Result<(), StoreError> {
        self.blobs.remove(namespace);
        Ok(())
    }
}
