// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use booth_base::{
    data_types::AssetRecord,
    identifiers::{AssetId, PresetName, SequenceNumber},
};

use crate::{
    collage,
    store::{AssetStore, AssetStoreError, ImageFormat, UploadOptions},
};

/// Side length of the final published render.
pub const FINAL_SIDE: u32 = 720;

/// Publishes rendered captures under their sequence-derived identifiers.
///
/// Downstream stages never learn whether the source was one capture or four:
/// a collage is composited first and re-published as a single opaque asset.
pub struct AssetPublisher<S> {
    store: S,
    prefix: String,
}

impl<S> AssetPublisher<S>
where
    S: AssetStore,
{
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        AssetPublisher {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Publishes one rendered capture as the asset of collectible
    /// `sequence`, optionally stamped with a visual preset.
    pub async fn publish(
        &self,
        bytes: &[u8],
        sequence: SequenceNumber,
        preset: Option<&PresetName>,
    ) -> Result<AssetRecord, AssetStoreError> {
        self.publish_bytes(bytes, sequence, preset).await
    }

    /// Composites four captures into a 2×2 collage and publishes the result
    /// as the asset of collectible `sequence`.
    ///
    /// The preset is stamped at composite time, so the published bytes are
    /// already final.
    pub async fn publish_collage(
        &self,
        images: &[Vec<u8>],
        sequence: SequenceNumber,
        preset: Option<&PresetName>,
    ) -> Result<AssetRecord, AssetStoreError> {
        let composite = collage::compose(&self.store, images, preset).await?;
        self.publish_bytes(&composite, sequence, None).await
    }

    async fn publish_bytes(
        &self,
        bytes: &[u8],
        sequence: SequenceNumber,
        preset: Option<&PresetName>,
    ) -> Result<AssetRecord, AssetStoreError> {
        let id = AssetId::for_sequence(&self.prefix, sequence);
        let options = UploadOptions::square(FINAL_SIDE)
            .with_target(id)
            .with_format(ImageFormat::Png)
            .with_preset(preset.cloned());
        let stored = self.store.upload(bytes, options).await?;
        Ok(AssetRecord {
            id: stored.id,
            url: stored.url,
        })
    }
}

#[cfg(test)]
#[path = "unit_tests/publisher_tests.rs"]
mod publisher_tests;
