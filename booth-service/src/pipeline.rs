// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The capture-to-mint pipeline.

use booth_assets::{collage::COLLAGE_INPUTS, AssetPublisher, AssetStore, AssetStoreError};
use booth_base::{
    data_types::AssetRecord,
    identifiers::{PresetName, SequenceNumber},
};
use booth_ledger::{
    CollectibleDescriptor, Ledger, MintError, MintPolicy, MintSubmitter, WalletIssuanceError,
    WalletIssuer,
};
use booth_storage::{CounterStore, CounterStoreError, SequenceAllocator};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Number of attempts for the publish unit, including the first.
const PUBLISH_ATTEMPTS: u32 = 3;

/// A capture session ready to be minted: one rendered photo, or the four
/// captures of a collage, plus an optional visual preset.
///
/// The image bytes are immutable client input; re-running a stage resends
/// the same bytes.
#[derive(Clone, Debug)]
pub struct CaptureRequest {
    pub images: Vec<Vec<u8>>,
    pub preset: Option<PresetName>,
}

/// The terminal result of a confirmed mint.
#[derive(Clone, Debug)]
pub struct MintOutcome {
    pub sequence: SequenceNumber,
    pub asset: AssetRecord,
    pub recipient: Pubkey,
    pub claim_url: Url,
    pub signature: Signature,
}

/// The error type of a pipeline run. Each stage reports its own kind; none
/// of them ever carries a partial claim link.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No sequence number, no further action.
    #[error("sequence allocation failed: {0}")]
    Sequence(#[from] CounterStoreError),
    /// The capture has neither one image nor a full collage.
    #[error("expected 1 or {COLLAGE_INPUTS} images, got {0}")]
    InvalidImageCount(usize),
    /// The publish unit failed on every attempt.
    #[error("asset publication failed after {attempts} attempts: {source}")]
    Publish {
        attempts: u32,
        source: AssetStoreError,
    },
    /// The wallet provider failed; a sequence value and asset are orphaned.
    #[error("wallet issuance failed: {0}")]
    Wallet(#[from] WalletIssuanceError),
    /// The ledger rejected the mint; sequence, asset, and wallet are
    /// orphaned.
    #[error("mint submission failed: {0}")]
    Submission(MintError),
    /// Confirmation timed out; the mint may or may not have landed.
    #[error("mint confirmation timed out: {0}")]
    Confirmation(MintError),
}

/// Orchestrates one mint per call:
/// sequence allocation → asset publication → descriptor building → wallet
/// issuance → submission, terminal on the confirmed claim URL or the first
/// fatal error.
///
/// Only the publish unit is retried. Wallet issuance and submission
/// failures leave an already-consumed sequence number and asset behind;
/// those are surfaced as warnings for operator reconciliation, not
/// compensated.
pub struct MintPipeline<S, A, L, W> {
    allocator: SequenceAllocator<S>,
    publisher: AssetPublisher<A>,
    submitter: MintSubmitter<L>,
    issuer: W,
    platform_creator: Pubkey,
    policy: MintPolicy,
}

impl<S, A, L, W> MintPipeline<S, A, L, W>
where
    S: CounterStore,
    A: AssetStore,
    L: Ledger,
    W: WalletIssuer,
{
    pub fn new(
        allocator: SequenceAllocator<S>,
        publisher: AssetPublisher<A>,
        submitter: MintSubmitter<L>,
        issuer: W,
        platform_creator: Pubkey,
        policy: MintPolicy,
    ) -> Self {
        MintPipeline {
            allocator,
            publisher,
            submitter,
            issuer,
            platform_creator,
            policy,
        }
    }

    pub fn publisher(&self) -> &AssetPublisher<A> {
        &self.publisher
    }

    /// Runs the pipeline for one capture session.
    #[tracing::instrument(name = "MintPipeline::run", skip_all, fields(images = request.images.len()))]
    pub async fn run(&self, request: CaptureRequest) -> Result<MintOutcome, PipelineError> {
        let image_count = request.images.len();
        if image_count != 1 && image_count != COLLAGE_INPUTS {
            return Err(PipelineError::InvalidImageCount(image_count));
        }

        let sequence = self.allocator.next().await?;
        let asset = self.publish_with_retry(&request, sequence).await?;

        let descriptor = CollectibleDescriptor::build(
            asset.clone(),
            sequence,
            self.submitter.authority_address(),
            self.submitter.collection_mint(),
            self.platform_creator,
            &self.policy,
        );

        let wallet = match self.issuer.issue().await {
            Ok(wallet) => wallet,
            Err(error) => {
                warn!(
                    %sequence,
                    asset = %asset.id,
                    "orphaned sequence: wallet issuance failed after asset publication"
                );
                return Err(error.into());
            }
        };

        let signature = match self.submitter.submit(&descriptor, wallet.address).await {
            Ok(signature) => signature,
            Err(error) => {
                warn!(
                    %sequence,
                    asset = %asset.id,
                    recipient = %wallet.address,
                    "orphaned sequence: mint submission failed"
                );
                return Err(match error {
                    MintError::ConfirmationTimeout(_) => PipelineError::Confirmation(error),
                    _ => PipelineError::Submission(error),
                });
            }
        };

        if let Err(error) = self.allocator.advance().await {
            // The mint landed; the counter now lags the true number of
            // minted items until an operator reconciles it.
            warn!(%sequence, %error, "counter advance failed after submission");
        }

        info!(%sequence, %signature, recipient = %wallet.address, "collectible minted");
        Ok(MintOutcome {
            sequence,
            asset,
            recipient: wallet.address,
            claim_url: wallet.claim_url,
            signature,
        })
    }

    /// Runs the publish unit, retrying it as a whole from the same captured
    /// bytes. Partial retries would re-upload already-succeeded tiles under
    /// new identifiers and corrupt the collage layout.
    async fn publish_with_retry(
        &self,
        request: &CaptureRequest,
        sequence: SequenceNumber,
    ) -> Result<AssetRecord, PipelineError> {
        let preset = request.preset.as_ref();
        let mut attempt = 1;
        loop {
            let result = match request.images.as_slice() {
                [image] => self.publisher.publish(image, sequence, preset).await,
                images => self.publisher.publish_collage(images, sequence, preset).await,
            };
            match result {
                Ok(record) => return Ok(record),
                Err(source @ AssetStoreError::InvalidImageCount { .. }) => {
                    // Shape errors are caller errors; retrying cannot help.
                    return Err(PipelineError::Publish {
                        attempts: attempt,
                        source,
                    });
                }
                Err(source) if attempt >= PUBLISH_ATTEMPTS => {
                    return Err(PipelineError::Publish {
                        attempts: attempt,
                        source,
                    });
                }
                Err(error) => {
                    warn!(%sequence, attempt, %error, "asset publication failed; retrying");
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "unit_tests/pipeline_tests.rs"]
mod pipeline_tests;
