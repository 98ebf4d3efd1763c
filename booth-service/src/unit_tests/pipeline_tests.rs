// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;
use async_trait::async_trait;
use booth_assets::{test_utils::MemoryAssetStore, AssetPublisher};
use booth_base::identifiers::{AssetId, SequenceNumber};
use booth_ledger::{
    test_utils::{FailingWalletIssuer, MockLedger},
    CollectionAccounts, LinkWalletIssuer, MintError, MintPolicy, MintSubmitter,
};
use booth_storage::{CounterStore, CounterStoreError, MemoryCounterStore, SequenceAllocator};
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use url::Url;

use super::{CaptureRequest, MintPipeline, PipelineError};

const COUNTER_KEY: &str = "globalcounter";

fn accounts() -> CollectionAccounts {
    CollectionAccounts {
        collection_mint: Pubkey::new_unique(),
        collection_metadata: Pubkey::new_unique(),
        collection_master_edition: Pubkey::new_unique(),
        merkle_tree: Pubkey::new_unique(),
    }
}

fn policy() -> MintPolicy {
    MintPolicy {
        display_name: "Booth Collectible".into(),
        symbol: "BOOTH".into(),
        metadata_base_uri: "https://meta.example/".into(),
        metadata_prefix: "booth".into(),
    }
}

fn issuer() -> LinkWalletIssuer {
    LinkWalletIssuer::new(Url::parse("https://claim.example").unwrap())
}

fn capture(image_count: usize) -> CaptureRequest {
    CaptureRequest {
        images: (0..image_count).map(|i| vec![i as u8; 8]).collect(),
        preset: None,
    }
}

struct TestHarness {
    counter: MemoryCounterStore,
    assets: MemoryAssetStore,
    ledger: MockLedger,
    pipeline: MintPipeline<MemoryCounterStore, MemoryAssetStore, MockLedger, LinkWalletIssuer>,
}

fn harness_with_ledger(ledger: MockLedger) -> TestHarness {
    let counter = MemoryCounterStore::fresh();
    let assets = MemoryAssetStore::new();
    let pipeline = MintPipeline::new(
        SequenceAllocator::new(counter.clone(), COUNTER_KEY),
        AssetPublisher::new(assets.clone(), "booth"),
        MintSubmitter::new(ledger.clone(), Keypair::new(), accounts()),
        issuer(),
        Pubkey::new_unique(),
        policy(),
    );
    TestHarness {
        counter,
        assets,
        ledger,
        pipeline,
    }
}

fn harness() -> TestHarness {
    harness_with_ledger(MockLedger::confirming())
}

#[tokio::test]
async fn sequential_runs_mint_one_and_two() {
    let harness = harness();

    let first = harness.pipeline.run(capture(1)).await.unwrap();
    assert_eq!(first.sequence, SequenceNumber(1));
    assert_eq!(first.asset.id, AssetId::new("booth1"));
    assert!(first
        .claim_url
        .as_str()
        .starts_with("https://claim.example/i#"));

    let second = harness.pipeline.run(capture(1)).await.unwrap();
    assert_eq!(second.sequence, SequenceNumber(2));
    assert_eq!(second.asset.id, AssetId::new("booth2"));

    assert_eq!(harness.counter.get(COUNTER_KEY).await.unwrap(), Some(3));
    assert_eq!(harness.ledger.submissions(), 2);
    assert_ne!(first.recipient, second.recipient);
}

#[tokio::test]
async fn publish_retries_as_a_unit_until_success() {
    let harness = harness();
    harness.assets.fail_next_uploads(2);

    let outcome = harness.pipeline.run(capture(1)).await.unwrap();

    assert_eq!(outcome.sequence, SequenceNumber(1));
    assert_eq!(harness.assets.upload_attempts(), 3);
    assert_eq!(harness.ledger.submissions(), 1);
}

#[tokio::test]
async fn publish_failure_is_terminal_after_three_attempts() {
    let harness = harness();
    harness.assets.fail_next_uploads(3);

    let result = harness.pipeline.run(capture(1)).await;

    assert_matches!(result, Err(PipelineError::Publish { attempts: 3, .. }));
    // No fourth attempt, no submission, and the counter is unadvanced.
    assert_eq!(harness.assets.upload_attempts(), 3);
    assert_eq!(harness.ledger.submissions(), 0);
    assert_eq!(harness.counter.get(COUNTER_KEY).await.unwrap(), Some(1));
}

#[tokio::test]
async fn rejects_image_counts_other_than_one_or_four() {
    let harness = harness();

    for count in [0, 2, 3, 5] {
        let result = harness.pipeline.run(capture(count)).await;
        assert_matches!(result, Err(PipelineError::InvalidImageCount(got)) if got == count);
    }

    // Rejected pre-flight: no remote call was made, no sequence allocated.
    assert_eq!(harness.assets.remote_calls(), 0);
    assert_eq!(harness.counter.get(COUNTER_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn collage_mints_one_opaque_asset() {
    let harness = harness();

    let outcome = harness.pipeline.run(capture(4)).await.unwrap();

    assert_eq!(outcome.asset.id, AssetId::new("booth1"));
    // Four tile uploads, one render fetch, one final upload.
    assert_eq!(harness.assets.remote_calls(), 6);
    assert_eq!(harness.ledger.submissions(), 1);
}

#[test_log::test(tokio::test)]
async fn wallet_failure_orphans_the_sequence() {
    let counter = MemoryCounterStore::fresh();
    let assets = MemoryAssetStore::new();
    let ledger = MockLedger::confirming();
    let pipeline = MintPipeline::new(
        SequenceAllocator::new(counter.clone(), COUNTER_KEY),
        AssetPublisher::new(assets.clone(), "booth"),
        MintSubmitter::new(ledger.clone(), Keypair::new(), accounts()),
        FailingWalletIssuer,
        Pubkey::new_unique(),
        policy(),
    );

    let result = pipeline.run(capture(1)).await;

    assert_matches!(result, Err(PipelineError::Wallet(_)));
    // The sequence value and asset are consumed but the counter did not
    // advance, and nothing reached the ledger.
    assert!(assets.bytes_of(&AssetId::new("booth1")).is_some());
    assert_eq!(counter.get(COUNTER_KEY).await.unwrap(), Some(1));
    assert_eq!(ledger.submissions(), 0);
}

#[tokio::test]
async fn rejection_and_timeout_surface_distinctly() {
    let harness = harness_with_ledger(MockLedger::with_outcomes(vec![
        Err(MintError::Rejected("tree authority mismatch".into())),
        Err(MintError::ConfirmationTimeout("block height exceeded".into())),
    ]));

    let first = harness.pipeline.run(capture(1)).await;
    assert_matches!(first, Err(PipelineError::Submission(MintError::Rejected(_))));

    let second = harness.pipeline.run(capture(1)).await;
    assert_matches!(
        second,
        Err(PipelineError::Confirmation(MintError::ConfirmationTimeout(_)))
    );

    // Neither failed submission consumed the sequence value.
    assert_eq!(harness.counter.get(COUNTER_KEY).await.unwrap(), Some(1));
}

/// A counter store whose increments fail, as a Redis outage between
/// submission and advance would.
#[derive(Clone)]
struct AdvanceFailingStore(MemoryCounterStore);

#[async_trait]
impl CounterStore for AdvanceFailingStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, CounterStoreError> {
        self.0.get(key).await
    }

    async fn set(&self, key: &str, value: u64) -> Result<(), CounterStoreError> {
        self.0.set(key, value).await
    }

    async fn incr_by(&self, _key: &str, _delta: u64) -> Result<u64, CounterStoreError> {
        Err(CounterStoreError::Unavailable("injected outage".into()))
    }
}

#[test_log::test(tokio::test)]
async fn advance_failure_after_submission_still_returns_the_claim() {
    let counter = MemoryCounterStore::fresh();
    let ledger = MockLedger::confirming();
    let pipeline = MintPipeline::new(
        SequenceAllocator::new(AdvanceFailingStore(counter.clone()), COUNTER_KEY),
        AssetPublisher::new(MemoryAssetStore::new(), "booth"),
        MintSubmitter::new(ledger.clone(), Keypair::new(), accounts()),
        issuer(),
        Pubkey::new_unique(),
        policy(),
    );

    let outcome = pipeline.run(capture(1)).await.unwrap();

    // The mint landed and the claim is returned; the counter lags behind.
    assert_eq!(ledger.submissions(), 1);
    assert!(outcome.claim_url.as_str().contains("claim.example"));
    assert_eq!(counter.get(COUNTER_KEY).await.unwrap(), Some(1));
}
