// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The asset store boundary of the booth service: uploading captures,
//! compositing collages, and publishing the final render under its
//! sequence-derived identifier.

pub mod collage;
mod http;
mod publisher;
mod store;
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use crate::{
    http::HttpAssetStore,
    publisher::{AssetPublisher, FINAL_SIDE},
    store::{
        AssetStore, AssetStoreError, CropMode, ImageFormat, Overlay, StoredAsset, UploadOptions,
    },
};
