// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use booth_base::identifiers::{AssetId, PresetName};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::store::{AssetStore, AssetStoreError, Overlay, StoredAsset, UploadOptions};

/// The asset service reached over HTTP.
///
/// Uploads go to `<api_base>/upload` as JSON with a base64 payload; rendered
/// assets are addressed under `delivery_base` with transformation directives
/// encoded as path segments.
pub struct HttpAssetStore {
    client: reqwest::Client,
    api_base: Url,
    delivery_base: Url,
    access_token: Option<String>,
}

#[derive(Serialize)]
struct UploadRequest {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transformation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

impl HttpAssetStore {
    pub fn new(api_base: Url, delivery_base: Url, access_token: Option<String>) -> Self {
        HttpAssetStore {
            client: reqwest::Client::new(),
            api_base,
            delivery_base,
            access_token,
        }
    }
}

/// Encodes the rendering directives of `options` as one transformation path,
/// e.g. `w_720,h_720,c_fill/t_holiday`.
pub(crate) fn transformation_path(options: &UploadOptions) -> Option<String> {
    let mut segments = Vec::new();
    if let (Some(width), Some(height)) = (options.width, options.height) {
        let crop = options.crop.map_or("fill", |crop| crop.code());
        segments.push(format!("w_{width},h_{height},c_{crop}"));
    }
    if let Some(preset) = &options.preset {
        segments.push(format!("t_{preset}"));
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(
        &self,
        bytes: &[u8],
        options: UploadOptions,
    ) -> Result<StoredAsset, AssetStoreError> {
        let request = UploadRequest {
            file: BASE64.encode(bytes),
            public_id: options.target_id.as_ref().map(|id| id.to_string()),
            transformation: transformation_path(&options),
            format: options.format.map(|format| format.extension()),
        };
        let url = self.api_base.join("upload")?;
        let mut builder = self.client.post(url).json(&request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(AssetStoreError::Upload(format!(
                "asset service answered {}",
                response.status()
            )));
        }
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|error| AssetStoreError::MalformedResponse(error.to_string()))?;
        Ok(StoredAsset {
            id: AssetId::new(body.public_id),
            url: body.secure_url,
        })
    }

    fn composite_url(
        &self,
        base: &AssetId,
        overlays: &[Overlay],
        preset: Option<&PresetName>,
    ) -> String {
        let mut segments = Vec::with_capacity(overlays.len() + 2);
        if let Some(first) = overlays.first() {
            // The base tile is cropped to the same dimensions as its overlays.
            segments.push(format!("w_{},h_{},c_fill", first.width, first.height));
        }
        for overlay in overlays {
            segments.push(format!(
                "l_{},w_{},h_{},x_{},y_{},c_fill",
                overlay.id, overlay.width, overlay.height, overlay.x, overlay.y
            ));
        }
        if let Some(preset) = preset {
            segments.push(format!("t_{preset}"));
        }
        format!(
            "{}/{}/{}",
            self.delivery_base.as_str().trim_end_matches('/'),
            segments.join("/"),
            base
        )
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetStoreError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AssetStoreError::Fetch(format!(
                "asset service answered {}",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
#[path = "unit_tests/http_tests.rs"]
mod http_tests;
