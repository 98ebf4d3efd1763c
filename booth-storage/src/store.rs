// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use thiserror::Error;

/// The error type of counter store operations.
#[derive(Clone, Debug, Error)]
pub enum CounterStoreError {
    /// The backing store could not be reached or failed to answer.
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
    /// The stored value under `key` is not an unsigned integer.
    #[error("malformed counter value for key {key}")]
    MalformedValue { key: String },
}

/// A shared store of named counters.
///
/// Each operation is individually atomic at the store; no transaction spans
/// several of them. Callers that read and later increment the same key must
/// tolerate interleaving with other clients.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Reads the current value of `key`, or `None` if it was never set.
    async fn get(&self, key: &str) -> Result<Option<u64>, CounterStoreError>;

    /// Sets `key` to `value`, creating it if absent.
    async fn set(&self, key: &str, value: u64) -> Result<(), CounterStoreError>;

    /// Atomically adds `delta` to `key` and returns the new value. An absent
    /// key counts as 0.
    async fn incr_by(&self, key: &str, delta: u64) -> Result<u64, CounterStoreError>;
}
