// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The booth service binary.

use std::path::PathBuf;

use anyhow::Context as _;
use booth_assets::{AssetPublisher, HttpAssetStore};
use booth_ledger::{LinkWalletIssuer, MintSubmitter, RpcLedger};
use booth_service::{
    config::{self, ServiceConfig},
    pipeline::MintPipeline,
    BoothService,
};
use booth_storage::{RedisCounterStore, SequenceAllocator};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(
    name = "booth-service",
    about = "Mints photo-booth captures as claimable compressed collectibles."
)]
struct Options {
    /// Path of the service configuration file.
    #[arg(long, default_value = "booth.json")]
    config: PathBuf,

    /// Overrides the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    booth_base::tracing::init();
    let options = Options::parse();

    let config = ServiceConfig::from_file(&options.config)
        .with_context(|| format!("failed to load configuration from {:?}", options.config))?;
    let authority = config::authority_from_env()?;

    let counter = RedisCounterStore::connect(&config.counter.url)
        .await
        .context("failed to connect to the counter store")?;
    let allocator = SequenceAllocator::new(counter, config.counter.key.clone());

    let store = HttpAssetStore::new(
        config.assets.api_base.clone(),
        config.assets.delivery_base.clone(),
        config.assets.access_token.clone(),
    );
    let publisher = AssetPublisher::new(store, config.mint.asset_prefix.clone());

    let ledger = RpcLedger::new(config.ledger.url.clone(), config.ledger.commitment()?);
    let submitter = MintSubmitter::new(ledger, authority, config.shop.collection_accounts()?);
    let issuer = LinkWalletIssuer::new(config.mint.claim_base.clone());

    let pipeline = MintPipeline::new(
        allocator,
        publisher,
        submitter,
        issuer,
        config.shop.platform_creator()?,
        config.mint.policy(),
    );

    let cancellation_token = CancellationToken::new();
    let shutdown = cancellation_token.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown.cancel();
    });

    let port = options.port.unwrap_or(config.port);
    BoothService::new(pipeline).run(port, cancellation_token).await
}
