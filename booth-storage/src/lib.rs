// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Storage abstractions for the shared mint counter.
//!
//! The counter is the only mutable state shared across concurrent kiosk
//! sessions; everything here goes through single atomic operations on the
//! backing store.

pub mod backends;
mod sequence;
mod store;

pub use crate::{
    backends::{memory::MemoryCounterStore, redis::RedisCounterStore},
    sequence::SequenceAllocator,
    store::{CounterStore, CounterStoreError},
};
