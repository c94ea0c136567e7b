//! Store double that records every call and can be told to fail.

use std::collections::HashSet;

use parking_lot::Mutex;
use stellara_store::{KeyValueStore, MemoryStore, StoreError, StoreResult, async_trait};

/// Store operation, for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Set,
    SetWithExpiry,
    Delete,
    DeleteMany,
    KeysMatching,
    ServerInfo,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get(String),
    Set(String),
    SetWithExpiry(String, u64),
    Delete(String),
    DeleteMany(Vec<String>),
    KeysMatching(String),
    ServerInfo,
}

/// Memory-backed store recording calls in order.
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<StoreCall>>,
    failing: Mutex<HashSet<Op>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(1_000),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Makes every later call of `op` fail with a connection error.
    pub fn fail(&self, op: Op) {
        self.failing.lock().insert(op);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Deleted keys, single and batch, in call order.
    pub fn deleted_keys(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .flat_map(|call| match call {
                StoreCall::Delete(key) => vec![key.clone()],
                StoreCall::DeleteMany(keys) => keys.clone(),
                _ => Vec::new(),
            })
            .collect()
    }

    /// Seeds a key without recording the call.
    pub async fn seed(&self, key: &str, value: &str) {
        self.inner.set(key, value).await.unwrap();
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.unwrap()
    }

    fn record(&self, call: StoreCall, op: Op) -> StoreResult<()> {
        self.calls.lock().push(call);
        if self.failing.lock().contains(&op) {
            return Err(StoreError::connection("injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.record(StoreCall::Get(key.to_string()), Op::Get)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.record(StoreCall::Set(key.to_string()), Op::Set)?;
        self.inner.set(key, value).await
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()> {
        self.record(
            StoreCall::SetWithExpiry(key.to_string(), ttl_seconds),
            Op::SetWithExpiry,
        )?;
        self.inner.set_with_expiry(key, value, ttl_seconds).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.record(StoreCall::Delete(key.to_string()), Op::Delete)?;
        self.inner.delete(key).await
    }

    async fn delete_many(&self, keys: &[String]) -> StoreResult<u64> {
        self.record(StoreCall::DeleteMany(keys.to_vec()), Op::DeleteMany)?;
        self.inner.delete_many(keys).await
    }

    async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.record(StoreCall::KeysMatching(pattern.to_string()), Op::KeysMatching)?;
        self.inner.keys_matching(pattern).await
    }

    async fn server_info(&self) -> StoreResult<String> {
        self.record(StoreCall::ServerInfo, Op::ServerInfo)?;
        self.inner.server_info().await
    }

    fn name(&self) -> &str {
        "recording"
    }
}
