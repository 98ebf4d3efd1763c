// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identifiers for minted collectibles and their published assets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The position of a collectible in the global mint sequence.
///
/// Values are handed out by the sequence allocator, start at 1, and are
/// strictly increasing across all kiosk sessions. Each value is consumed by
/// at most one confirmed mint.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// The value the counter is initialized to on first-ever use.
    pub const FIRST: SequenceNumber = SequenceNumber(1);
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for SequenceNumber {
    fn from(value: u64) -> Self {
        SequenceNumber(value)
    }
}

/// The permanent, content-independent name of a published asset.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        AssetId(id.into())
    }

    /// The deterministic identifier a collectible's asset is published under.
    pub fn for_sequence(prefix: &str, sequence: SequenceNumber) -> Self {
        AssetId(format!("{prefix}{sequence}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The name of a visual preset the asset store can stamp onto a render.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetName(String);

impl PresetName {
    pub fn new(name: impl Into<String>) -> Self {
        PresetName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
