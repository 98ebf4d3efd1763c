// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Implements [`crate::CounterStore`] in memory.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, LazyLock, Mutex,
    },
};

use async_trait::async_trait;

use crate::store::{CounterStore, CounterStoreError};

/// The counters in a namespace.
type CounterMap = BTreeMap<String, u64>;

/// The global table of namespaces.
static MEMORY_NAMESPACES: LazyLock<Mutex<BTreeMap<String, Arc<Mutex<CounterMap>>>>> =
    LazyLock::new(|| Mutex::new(BTreeMap::new()));

/// Distinguishes the namespaces handed out by [`MemoryCounterStore::fresh`].
static FRESH_NAMESPACE: AtomicU64 = AtomicU64::new(0);

/// A counter store persisted in process memory.
///
/// All stores opened on the same namespace share one map, so concurrent
/// clients observe each other exactly as they would against an external
/// store.
#[derive(Clone)]
pub struct MemoryCounterStore {
    map: Arc<Mutex<CounterMap>>,
}

impl MemoryCounterStore {
    /// Opens the store for `namespace`, creating it if absent.
    pub fn open(namespace: &str) -> Self {
        let mut namespaces = MEMORY_NAMESPACES
            .lock()
            .expect("MemoryCounterStore lock should not be poisoned");
        let map = namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(CounterMap::new())))
            .clone();
        MemoryCounterStore { map }
    }

    /// Opens a store on a namespace no other store has seen. Used by tests
    /// that must not observe each other's counters.
    pub fn fresh() -> Self {
        let index = FRESH_NAMESPACE.fetch_add(1, Ordering::Relaxed);
        Self::open(&format!("fresh-{index}"))
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, CounterStoreError> {
        let map = self
            .map
            .lock()
            .expect("MemoryCounterStore lock should not be poisoned");
        Ok(map.get(key).copied())
    }

    async fn set(&self, key: &str, value: u64) -> Result<(), CounterStoreError> {
        let mut map = self
            .map
            .lock()
            .expect("MemoryCounterStore lock should not be poisoned");
        map.insert(key.to_string(), value);
        Ok(())
    }

    async fn incr_by(&self, key: &str, delta: u64) -> Result<u64, CounterStoreError> {
        let mut map = self
            .map
            .lock()
            .expect("MemoryCounterStore lock should not be poisoned");
        let value = map.entry(key.to_string()).or_insert(0);
        *value += delta;
        Ok(*value)
    }
}
