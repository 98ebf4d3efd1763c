// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Test doubles for the asset store boundary.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use booth_base::identifiers::{AssetId, PresetName};

use crate::store::{AssetStore, AssetStoreError, Overlay, StoredAsset, UploadOptions};

/// One successful upload as the store recorded it.
#[derive(Clone, Debug)]
pub struct RecordedUpload {
    pub id: AssetId,
    pub options: UploadOptions,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct MemoryAssetStoreState {
    assets: BTreeMap<String, Vec<u8>>,
    uploads: Vec<RecordedUpload>,
    upload_attempts: u64,
    remote_calls: u64,
    failing_uploads: u32,
    auto_id: u64,
}

/// An in-memory [`AssetStore`]: serves its own delivery URLs, counts remote
/// calls, and can be told to fail the next uploads.
///
/// Clones share state, so a test can keep a handle for inspection after
/// moving the store into a publisher.
#[derive(Clone, Default)]
pub struct MemoryAssetStore {
    state: Arc<Mutex<MemoryAssetStoreState>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        MemoryAssetStore::default()
    }

    /// Makes the next `count` uploads fail with [`AssetStoreError::Upload`].
    pub fn fail_next_uploads(&self, count: u32) {
        self.state.lock().unwrap().failing_uploads = count;
    }

    /// Number of upload calls made, including injected failures.
    pub fn upload_attempts(&self) -> u64 {
        self.state.lock().unwrap().upload_attempts
    }

    /// Total number of remote calls made (uploads and fetches).
    pub fn remote_calls(&self) -> u64 {
        self.state.lock().unwrap().remote_calls
    }

    /// The successful uploads, in order.
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    /// The stored bytes of an asset, if it exists.
    pub fn bytes_of(&self, id: &AssetId) -> Option<Vec<u8>> {
        self.state.lock().unwrap().assets.get(id.as_str()).cloned()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload(
        &self,
        bytes: &[u8],
        options: UploadOptions,
    ) -> Result<StoredAsset, AssetStoreError> {
        let mut state = self.state.lock().unwrap();
        state.remote_calls += 1;
        state.upload_attempts += 1;
        if state.failing_uploads > 0 {
            state.failing_uploads -= 1;
            return Err(AssetStoreError::Upload("injected upload failure".into()));
        }
        let id = match options.target_id.clone() {
            Some(id) => id,
            None => {
                state.auto_id += 1;
                AssetId::new(format!("asset-{}", state.auto_id))
            }
        };
        state.assets.insert(id.to_string(), bytes.to_vec());
        state.uploads.push(RecordedUpload {
            id: id.clone(),
            options,
            bytes: bytes.to_vec(),
        });
        Ok(StoredAsset {
            url: format!("memory://assets/{id}"),
            id,
        })
    }

    fn composite_url(
        &self,
        base: &AssetId,
        overlays: &[Overlay],
        preset: Option<&PresetName>,
    ) -> String {
        let mut ids = vec![base.to_string()];
        ids.extend(overlays.iter().map(|overlay| overlay.id.to_string()));
        match preset {
            Some(preset) => format!("memory://render/{}?t={preset}", ids.join("+")),
            None => format!("memory://render/{}", ids.join("+")),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetStoreError> {
        let mut state = self.state.lock().unwrap();
        state.remote_calls += 1;
        if let Some(rest) = url.strip_prefix("memory://render/") {
            let ids = rest.split('?').next().unwrap_or(rest);
            let mut bytes = Vec::new();
            for id in ids.split('+') {
                let tile = state
                    .assets
                    .get(id)
                    .ok_or_else(|| AssetStoreError::Fetch(format!("unknown tile {id}")))?;
                bytes.extend_from_slice(tile);
            }
            Ok(bytes)
        } else if let Some(id) = url.strip_prefix("memory://assets/") {
            state
                .assets
                .get(id)
                .cloned()
                .ok_or_else(|| AssetStoreError::Fetch(format!("unknown asset {id}")))
        } else {
            Err(AssetStoreError::Fetch(format!("unresolvable URL {url}")))
        }
    }
}
