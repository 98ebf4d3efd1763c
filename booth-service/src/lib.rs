// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The server component of the booth service.

pub mod config;
pub mod pipeline;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use booth_assets::{collage, AssetStore, AssetStoreError, UploadOptions, FINAL_SIDE};
use booth_base::identifiers::PresetName;
use booth_ledger::{Ledger, WalletIssuer};
use booth_storage::CounterStore;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::pipeline::{CaptureRequest, MintPipeline, PipelineError};

/// A mint request: one rendered capture or the four captures of a collage.
#[derive(Debug, Deserialize)]
pub struct MintRequest {
    /// Base64 (or data-URI) encoded images.
    pub images: Vec<String>,
    pub preset: Option<String>,
}

/// The caller-facing result of a confirmed mint.
#[derive(Debug, Serialize)]
pub struct MintResponse {
    #[serde(rename = "tiplinkUrl")]
    pub tiplink_url: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct CollageRequest {
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// The HTTP surface of the capture-to-mint pipeline.
pub struct BoothService<S, A, L, W> {
    pipeline: MintPipeline<S, A, L, W>,
}

enum ApiError {
    /// The request itself is malformed; reported to the caller.
    BadRequest(String),
    /// A pipeline failure; the caller gets a generic message, the log gets
    /// the details.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::BAD_GATEWAY, message),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::InvalidImageCount(count) => {
                ApiError::BadRequest(format!("expected 1 or 4 images, got {count}"))
            }
            error => {
                tracing::error!(%error, "mint request failed");
                ApiError::Internal("mint failed".to_string())
            }
        }
    }
}

impl From<AssetStoreError> for ApiError {
    fn from(error: AssetStoreError) -> Self {
        match error {
            AssetStoreError::InvalidImageCount { expected, got } => {
                ApiError::BadRequest(format!("expected exactly {expected} images, got {got}"))
            }
            error => {
                tracing::error!(%error, "upload request failed");
                ApiError::Internal("upload failed".to_string())
            }
        }
    }
}

/// Decodes a base64 image payload, accepting the data-URI form clients
/// send.
fn decode_image(payload: &str) -> Result<Vec<u8>, ApiError> {
    let encoded = if payload.starts_with("data:") {
        payload
            .split_once(',')
            .map(|(_, encoded)| encoded)
            .ok_or_else(|| ApiError::BadRequest("malformed data URI".to_string()))?
    } else {
        payload
    };
    BASE64
        .decode(encoded)
        .map_err(|_| ApiError::BadRequest("invalid image encoding".to_string()))
}

fn decode_images(payloads: &[String]) -> Result<Vec<Vec<u8>>, ApiError> {
    payloads.iter().map(|image| decode_image(image)).collect()
}

impl<S, A, L, W> BoothService<S, A, L, W>
where
    S: CounterStore + 'static,
    A: AssetStore + 'static,
    L: Ledger + 'static,
    W: WalletIssuer + 'static,
{
    pub fn new(pipeline: MintPipeline<S, A, L, W>) -> Self {
        BoothService { pipeline }
    }

    /// Runs the service until the cancellation token fires.
    pub async fn run(self, port: u16, cancellation_token: CancellationToken) -> anyhow::Result<()> {
        let service = Arc::new(self);
        let app = Router::new()
            .route("/v1/mint", post(Self::handle_mint))
            .route("/v1/upload", post(Self::handle_upload))
            .route("/v1/collage", post(Self::handle_collage))
            .route("/ready", get(|| async { "ready!" }))
            .layer(CorsLayer::permissive())
            .with_state(service);

        let listener =
            tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
        info!("booth service listening on port {port}");
        axum::serve(listener, app)
            .with_graceful_shutdown(cancellation_token.cancelled_owned())
            .await?;
        Ok(())
    }

    /// Mints the posted capture session and answers with the claim URL.
    async fn handle_mint(
        State(service): State<Arc<Self>>,
        Json(request): Json<MintRequest>,
    ) -> Result<Json<MintResponse>, ApiError> {
        let capture = CaptureRequest {
            images: decode_images(&request.images)?,
            preset: request.preset.map(PresetName::new),
        };
        let outcome = service.pipeline.run(capture).await?;
        Ok(Json(MintResponse {
            tiplink_url: outcome.claim_url.to_string(),
        }))
    }

    /// Uploads one capture for preview, without minting.
    async fn handle_upload(
        State(service): State<Arc<Self>>,
        Json(request): Json<UploadRequest>,
    ) -> Result<Json<UploadResponse>, ApiError> {
        let bytes = decode_image(&request.image)?;
        let stored = service
            .pipeline
            .publisher()
            .store()
            .upload(&bytes, UploadOptions::square(FINAL_SIDE))
            .await?;
        Ok(Json(UploadResponse {
            id: stored.id.to_string(),
            url: stored.url,
        }))
    }

    /// Composites four captures into a collage and uploads the result,
    /// without minting.
    async fn handle_collage(
        State(service): State<Arc<Self>>,
        Json(request): Json<CollageRequest>,
    ) -> Result<Json<UploadResponse>, ApiError> {
        let images = decode_images(&request.images)?;
        let store = service.pipeline.publisher().store();
        let composite = collage::compose(store, &images, None).await?;
        let stored = store.upload(&composite, UploadOptions::default()).await?;
        Ok(Json(UploadResponse {
            id: stored.id.to_string(),
            url: stored.url,
        }))
    }
}
