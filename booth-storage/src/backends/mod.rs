// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The supported counter store backends.

pub mod memory;
pub mod redis;
