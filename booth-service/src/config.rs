// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration of the booth service.

use std::{env, fs, path::Path, str::FromStr as _};

use booth_ledger::{CollectionAccounts, MintPolicy};
use serde::Deserialize;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Keypair};
use thiserror::Error;
use url::Url;

/// Name of the environment variable carrying the shop authority key.
///
/// The secret is injected from the environment and never appears in the
/// configuration file.
pub const AUTHORITY_KEY_ENV: &str = "BOOTH_AUTHORITY_KEY";

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid address in field {field}: {message}")]
    InvalidAddress {
        field: &'static str,
        message: String,
    },
    #[error("invalid commitment level {0:?}")]
    InvalidCommitment(String),
    #[error("the {AUTHORITY_KEY_ENV} environment variable is not set")]
    MissingAuthorityKey,
    #[error("invalid authority key: {0}")]
    InvalidAuthorityKey(String),
}

/// The full configuration of one booth service instance.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    pub ledger: LedgerConfig,
    pub counter: CounterConfig,
    pub assets: AssetServiceConfig,
    pub shop: ShopConfig,
    pub mint: MintConfig,
}

fn default_port() -> u16 {
    8080
}

#[derive(Clone, Debug, Deserialize)]
pub struct LedgerConfig {
    /// RPC endpoint of the ledger.
    pub url: String,
    /// The confirmation level submissions block on.
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

impl LedgerConfig {
    pub fn commitment(&self) -> Result<CommitmentConfig, Error> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|_| Error::InvalidCommitment(self.commitment.clone()))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CounterConfig {
    /// Connection URL of the shared counter store.
    pub url: String,
    /// Namespace key of the mint counter, shared by all instances.
    pub key: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AssetServiceConfig {
    pub api_base: Url,
    pub delivery_base: Url,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// The standing on-ledger accounts of the shop, as base58 strings.
#[derive(Clone, Debug, Deserialize)]
pub struct ShopConfig {
    pub collection_mint: String,
    pub collection_metadata: String,
    pub collection_master_edition: String,
    pub merkle_tree: String,
    /// Attribution-only creator entry added to every descriptor.
    pub platform_creator: String,
}

impl ShopConfig {
    pub fn collection_accounts(&self) -> Result<CollectionAccounts, Error> {
        Ok(CollectionAccounts {
            collection_mint: parse_address("shop.collection_mint", &self.collection_mint)?,
            collection_metadata: parse_address(
                "shop.collection_metadata",
                &self.collection_metadata,
            )?,
            collection_master_edition: parse_address(
                "shop.collection_master_edition",
                &self.collection_master_edition,
            )?,
            merkle_tree: parse_address("shop.merkle_tree", &self.merkle_tree)?,
        })
    }

    pub fn platform_creator(&self) -> Result<Pubkey, Error> {
        parse_address("shop.platform_creator", &self.platform_creator)
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Pubkey, Error> {
    value.parse().map_err(|error: solana_sdk::pubkey::ParsePubkeyError| {
        Error::InvalidAddress {
            field,
            message: error.to_string(),
        }
    })
}

#[derive(Clone, Debug, Deserialize)]
pub struct MintConfig {
    /// Display name all collectibles share.
    pub display_name: String,
    pub symbol: String,
    /// Identifier prefix of published assets.
    pub asset_prefix: String,
    pub metadata_base_uri: String,
    pub metadata_prefix: String,
    /// Base URL claim links are issued under.
    pub claim_base: Url,
}

impl MintConfig {
    pub fn policy(&self) -> MintPolicy {
        MintPolicy {
            display_name: self.display_name.clone(),
            symbol: self.symbol.clone(),
            metadata_base_uri: self.metadata_base_uri.clone(),
            metadata_prefix: self.metadata_prefix.clone(),
        }
    }
}

impl ServiceConfig {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Reads the shop authority key pair from the environment.
pub fn authority_from_env() -> Result<Keypair, Error> {
    let encoded = env::var(AUTHORITY_KEY_ENV).map_err(|_| Error::MissingAuthorityKey)?;
    let bytes = bs58::decode(encoded.trim())
        .into_vec()
        .map_err(|error| Error::InvalidAuthorityKey(error.to_string()))?;
    Keypair::from_bytes(&bytes).map_err(|error| Error::InvalidAuthorityKey(error.to_string()))
}

#[cfg(test)]
#[path = "unit_tests/config_tests.rs"]
mod config_tests;
