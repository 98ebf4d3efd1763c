// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Data types exchanged between the pipeline stages.

use serde::{Deserialize, Serialize};

use crate::identifiers::AssetId;

/// A published asset: an immutable name bound to a publicly fetchable image.
///
/// Created once per pipeline run, never mutated, never deleted by this
/// system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// The identifier the asset was published under.
    pub id: AssetId,
    /// The permanently addressable delivery URL of the rendered image.
    pub url: String,
}
