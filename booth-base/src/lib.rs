// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared building blocks for the booth service: the identifiers every mint
//! carries, the data types exchanged between pipeline stages, and the tracing
//! initialization used by the binaries.

pub mod data_types;
pub mod identifiers;
pub mod tracing;
