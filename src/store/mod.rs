// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Namespaced key-value persistence for service state.
//!
//! Each service owns one namespace and reads/writes its whole state as a
//! single JSON blob. The store is deliberately dumb: no schema, no
//! transactions, just durable blobs. `FileStore` backs production with one
//! file per namespace; `MemoryStore` backs tests.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error for namespace {namespace}: {message}")]
    Io { namespace: String, message: String },
}

/// Blob storage keyed by namespace.
#[async_trait]
pub trait RewardStore: Send + Sync {
    /// Fetch a namespace's blob; `None` when nothing was ever stored.
    async fn get(&self, namespace: &str) -> Result<Option<String>, StoreError>;

    /// Replace a namespace's blob.
    async fn put(&self, namespace: &str, blob: &str) -> Result<(), StoreError>;

    /// Delete a namespace's blob; deleting an absent namespace is fine.
    async fn remove(&self, namespace: &str) -> Result<(), StoreError>;
}
