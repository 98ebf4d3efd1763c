// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use booth_base::identifiers::SequenceNumber;

use crate::store::{CounterStore, CounterStoreError};

/// Hands out the strictly increasing numbers that name minted collectibles.
///
/// Reading and advancing are separate store operations: the number is needed
/// before the asset and metadata are built, but must only be consumed once a
/// mint has actually been submitted. The split is not transactional — two
/// runs that both call [`SequenceAllocator::next`] before either advances
/// observe the same value.
pub struct SequenceAllocator<S> {
    store: S,
    key: String,
}

impl<S> SequenceAllocator<S>
where
    S: CounterStore,
{
    pub fn new(store: S, key: impl Into<String>) -> Self {
        SequenceAllocator {
            store,
            key: key.into(),
        }
    }

    /// Returns the sequence number the next mint will use, initializing the
    /// counter to 1 on first-ever use. Does not advance the counter.
    pub async fn next(&self) -> Result<SequenceNumber, CounterStoreError> {
        match self.store.get(&self.key).await? {
            Some(value) => Ok(SequenceNumber(value)),
            None => {
                self.store.set(&self.key, SequenceNumber::FIRST.0).await?;
                Ok(SequenceNumber::FIRST)
            }
        }
    }

    /// Consumes the current value after a mint has been submitted, moving
    /// the counter to the next number.
    pub async fn advance(&self) -> Result<u64, CounterStoreError> {
        self.store.incr_by(&self.key, 1).await
    }
}

#[cfg(test)]
#[path = "unit_tests/sequence_tests.rs"]
mod sequence_tests;
