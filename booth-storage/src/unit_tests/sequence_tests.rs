// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use booth_base::identifiers::SequenceNumber;

use super::SequenceAllocator;
use crate::{CounterStore as _, MemoryCounterStore};

const KEY: &str = "globalcounter";

#[tokio::test]
async fn first_read_initializes_to_one() {
    let allocator = SequenceAllocator::new(MemoryCounterStore::fresh(), KEY);
    assert_eq!(allocator.next().await.unwrap(), SequenceNumber(1));
}

#[tokio::test]
async fn next_peeks_without_advancing() {
    let allocator = SequenceAllocator::new(MemoryCounterStore::fresh(), KEY);
    assert_eq!(allocator.next().await.unwrap(), SequenceNumber(1));
    assert_eq!(allocator.next().await.unwrap(), SequenceNumber(1));
}

#[tokio::test]
async fn advance_consumes_exactly_one_value() {
    let allocator = SequenceAllocator::new(MemoryCounterStore::fresh(), KEY);
    assert_eq!(allocator.next().await.unwrap(), SequenceNumber(1));
    allocator.advance().await.unwrap();
    assert_eq!(allocator.next().await.unwrap(), SequenceNumber(2));
    allocator.advance().await.unwrap();
    assert_eq!(allocator.next().await.unwrap(), SequenceNumber(3));
}

#[tokio::test]
async fn allocators_on_one_namespace_share_the_counter() {
    let store = MemoryCounterStore::fresh();
    let first = SequenceAllocator::new(store.clone(), KEY);
    let second = SequenceAllocator::new(store, KEY);
    assert_eq!(first.next().await.unwrap(), SequenceNumber(1));
    first.advance().await.unwrap();
    assert_eq!(second.next().await.unwrap(), SequenceNumber(2));
}

#[tokio::test]
async fn incr_by_treats_absent_keys_as_zero() {
    let store = MemoryCounterStore::fresh();
    assert_eq!(store.incr_by(KEY, 5).await.unwrap(), 5);
    assert_eq!(store.get(KEY).await.unwrap(), Some(5));
}
