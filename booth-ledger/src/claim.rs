// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Custodial claim wallets: freshly generated key pairs delivered as
//! bearer links.

use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer as _,
};
use thiserror::Error;
use url::Url;

/// The error type of wallet issuance.
#[derive(Clone, Debug, Error)]
pub enum WalletIssuanceError {
    /// The claim-link provider could not be reached.
    #[error("claim-link provider unavailable: {0}")]
    Unavailable(String),
    /// The configured claim base URL cannot address claim links.
    #[error("invalid claim base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// A freshly issued custodial wallet: the mint recipient address and the
/// link that hands control of it to the bearer.
///
/// The secret key stays inside the issuer; holders of this value can only
/// address the wallet or share the link.
#[derive(Clone, Debug)]
pub struct ClaimWallet {
    pub address: Pubkey,
    pub claim_url: Url,
}

/// Issues custodial wallets, one per mint.
#[async_trait]
pub trait WalletIssuer: Send + Sync {
    /// Issues a fresh wallet with a bearer claim link.
    ///
    /// Every call produces a new independent wallet; callers must issue
    /// exactly one per pipeline run, since each wallet receives exactly one
    /// collectible.
    async fn issue(&self) -> Result<ClaimWallet, WalletIssuanceError>;
}

/// Issues wallets whose secret key travels in the fragment of the claim
/// link, so whoever opens the link controls the wallet.
pub struct LinkWalletIssuer {
    base: Url,
}

impl LinkWalletIssuer {
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        LinkWalletIssuer { base }
    }
}

#[async_trait]
impl WalletIssuer for LinkWalletIssuer {
    async fn issue(&self) -> Result<ClaimWallet, WalletIssuanceError> {
        let keypair = Keypair::new();
        let secret = bs58::encode(keypair.to_bytes()).into_string();
        let mut claim_url = self.base.join("i")?;
        claim_url.set_fragment(Some(&secret));
        Ok(ClaimWallet {
            address: keypair.pubkey(),
            claim_url,
        })
    }
}

#[cfg(test)]
#[path = "unit_tests/claim_tests.rs"]
mod claim_tests;
