// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use booth_base::identifiers::{AssetId, PresetName};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The error type of asset store operations.
#[derive(Debug, Error)]
pub enum AssetStoreError {
    /// A collage was requested with the wrong number of captures.
    #[error("expected exactly {expected} images, got {got}")]
    InvalidImageCount { expected: usize, got: usize },

    /// The store did not accept an upload.
    #[error("upload rejected: {0}")]
    Upload(String),

    /// A rendered asset could not be fetched back.
    #[error("fetching rendered asset failed: {0}")]
    Fetch(String),

    /// The store's answer could not be interpreted.
    #[error("malformed asset service response: {0}")]
    MalformedResponse(String),

    /// The transport failed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A URL could not be built from the configured bases.
    #[error("invalid asset service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// How a source image is fitted into the target dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropMode {
    /// Crop so the image fills the target exactly.
    Fill,
    /// Scale so the image fits inside the target.
    Fit,
}

impl CropMode {
    pub(crate) fn code(self) -> &'static str {
        match self {
            CropMode::Fill => "fill",
            CropMode::Fit => "fit",
        }
    }
}

/// The stored format of an uploaded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
}

impl ImageFormat {
    pub(crate) fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
        }
    }
}

/// Rendering directives attached to an upload.
#[derive(Clone, Debug, Default)]
pub struct UploadOptions {
    /// Publish under this identifier instead of a store-assigned one.
    pub target_id: Option<AssetId>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<CropMode>,
    pub format: Option<ImageFormat>,
    /// A named visual preset the store stamps onto the render.
    pub preset: Option<PresetName>,
}

impl UploadOptions {
    /// Options for a square crop-to-fill render of the given side length.
    pub fn square(side: u32) -> Self {
        UploadOptions {
            width: Some(side),
            height: Some(side),
            crop: Some(CropMode::Fill),
            ..UploadOptions::default()
        }
    }

    pub fn with_target(mut self, id: AssetId) -> Self {
        self.target_id = Some(id);
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_preset(mut self, preset: Option<PresetName>) -> Self {
        self.preset = preset;
        self
    }
}

/// An asset as the store reports it after an upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub id: AssetId,
    pub url: String,
}

/// One overlaid tile of a server-side composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    pub id: AssetId,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// An opaque image hosting and transformation service.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Uploads raw image bytes, returning the stored asset's identifier and
    /// delivery URL.
    async fn upload(
        &self,
        bytes: &[u8],
        options: UploadOptions,
    ) -> Result<StoredAsset, AssetStoreError>;

    /// Builds the delivery URL of a server-side composite of `base` with
    /// `overlays`, optionally stamped with a named preset. Pure; the store
    /// renders when the URL is fetched.
    fn composite_url(
        &self,
        base: &AssetId,
        overlays: &[Overlay],
        preset: Option<&PresetName>,
    ) -> String;

    /// Fetches the rendered bytes behind a delivery URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetStoreError>;
}
