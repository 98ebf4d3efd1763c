// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Implements [`crate::CounterStore`] on a Redis instance.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands as _, ErrorKind};

use crate::store::{CounterStore, CounterStoreError};

/// A counter store backed by a shared Redis instance.
///
/// The connection manager transparently reconnects; a command that still
/// fails surfaces as [`CounterStoreError::Unavailable`].
#[derive(Clone)]
pub struct RedisCounterStore {
    connection: ConnectionManager,
}

impl RedisCounterStore {
    /// Connects to the Redis instance at `url`.
    pub async fn connect(url: &str) -> Result<Self, CounterStoreError> {
        let client = redis::Client::open(url)
            .map_err(|error| CounterStoreError::Unavailable(error.to_string()))?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(|error| CounterStoreError::Unavailable(error.to_string()))?;
        Ok(RedisCounterStore { connection })
    }

    fn convert_error(key: &str, error: redis::RedisError) -> CounterStoreError {
        if error.kind() == ErrorKind::TypeError {
            CounterStoreError::MalformedValue {
                key: key.to_string(),
            }
        } else {
            CounterStoreError::Unavailable(error.to_string())
        }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, CounterStoreError> {
        let mut connection = self.connection.clone();
        connection
            .get(key)
            .await
            .map_err(|error| Self::convert_error(key, error))
    }

    async fn set(&self, key: &str, value: u64) -> Result<(), CounterStoreError> {
        let mut connection = self.connection.clone();
        connection
            .set(key, value)
            .await
            .map_err(|error| Self::convert_error(key, error))
    }

    async fn incr_by(&self, key: &str, delta: u64) -> Result<u64, CounterStoreError> {
        let mut connection = self.connection.clone();
        connection
            .incr(key, delta)
            .await
            .map_err(|error| Self::convert_error(key, error))
    }
}
