//! Per-tenant monotonic sequence allocation.
//!
//! The counters behind human-readable entity codes are the one piece of
//! shared mutable state in the import subsystem. They live behind
//! [`SequenceStore`] so no other module can reach the backing storage, and
//! the in-memory store performs the increment as a single read-modify-write
//! while holding the store lock. An implementation over an external store
//! must use an equivalent storage-level atomic upsert-and-increment, not a
//! read-then-write pair, or concurrent service instances will hand out
//! duplicate values.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, TenantId};

#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Atomically increments the counter for `(tenant, entity_class)` and
    /// returns the new value. The first allocation for a key returns 1.
    ///
    /// An allocated value that is never used (because a later pipeline step
    /// fails) is burned: counters never move backwards and values are never
    /// reissued, so entity codes may carry gaps.
    async fn allocate(&self, tenant: &TenantId, entity_class: &str) -> Result<u64, DomainError>;

    /// Returns the value the next [`allocate`](Self::allocate) call would
    /// return, without reserving it. A concurrent allocation can invalidate
    /// the previewed value immediately; callers must treat it as display
    /// material only.
    async fn peek(&self, tenant: &TenantId, entity_class: &str) -> Result<u64, DomainError>;
}

#[derive(Default)]
pub struct InMemorySequenceStore {
    counters: Mutex<HashMap<(TenantId, String), u64>>,
}

impl InMemorySequenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceStore for InMemorySequenceStore {
    async fn allocate(&self, tenant: &TenantId, entity_class: &str) -> Result<u64, DomainError> {
        let mut counters = self.counters.lock().await;
        let counter = counters
            .entry((tenant.clone(), entity_class.to_string()))
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn peek(&self, tenant: &TenantId, entity_class: &str) -> Result<u64, DomainError> {
        let counters = self.counters.lock().await;
        let last = counters
            .get(&(tenant.clone(), entity_class.to_string()))
            .copied()
            .unwrap_or(0);
        Ok(last + 1)
    }
}
