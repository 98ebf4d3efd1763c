// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;
use solana_sdk::commitment_config::CommitmentConfig;

use super::{Error, LedgerConfig, ServiceConfig};

const SAMPLE: &str = r#"
{
    "ledger": {
        "url": "https://rpc.example/?api-key=secret"
    },
    "counter": {
        "url": "redis://counter.example:6379",
        "key": "globalcounter"
    },
    "assets": {
        "api_base": "https://assets.example/api/",
        "delivery_base": "https://assets.example/render"
    },
    "shop": {
        "collection_mint": "E4UoNp3xrE2VYRe4huepMqVGjQD4SaJ8MvsRG4Dd49r7",
        "collection_metadata": "4mKqFQt13AmAu81FotJUs8pRYHAYK7t929BrLRRcqwJy",
        "collection_master_edition": "HFZt4g4nqT7kXvGHo3uqZ6o2MYx1Akc4h1jjVVSHeMYZ",
        "merkle_tree": "HCWBzn7eomDYsUtMXpxaTK5NC1sa6MGTuAJJdxHzaLac",
        "platform_creator": "G1tCgTadgcxKFMsu544aHsL1eexzwLi1ZgRN9b3KQkrL"
    },
    "mint": {
        "display_name": "Booth Collectible",
        "symbol": "BOOTH",
        "asset_prefix": "booth",
        "metadata_base_uri": "https://meta.example/",
        "metadata_prefix": "booth",
        "claim_base": "https://claim.example/"
    }
}
"#;

#[test]
fn sample_config_parses_with_defaults() {
    let config: ServiceConfig = serde_json::from_str(SAMPLE).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.ledger.commitment().unwrap(), CommitmentConfig::confirmed());
    assert_eq!(config.counter.key, "globalcounter");
    assert!(config.assets.access_token.is_none());

    let accounts = config.shop.collection_accounts().unwrap();
    assert_eq!(
        accounts.collection_mint.to_string(),
        "E4UoNp3xrE2VYRe4huepMqVGjQD4SaJ8MvsRG4Dd49r7"
    );
    config.shop.platform_creator().unwrap();
    assert_eq!(config.mint.policy().symbol, "BOOTH");
}

#[test]
fn malformed_addresses_name_the_field() {
    let mut config: ServiceConfig = serde_json::from_str(SAMPLE).unwrap();
    config.shop.merkle_tree = "not-a-key".to_string();

    assert_matches!(
        config.shop.collection_accounts(),
        Err(Error::InvalidAddress {
            field: "shop.merkle_tree",
            ..
        })
    );
}

#[test]
fn unknown_commitment_levels_are_rejected() {
    let ledger = LedgerConfig {
        url: "https://rpc.example".to_string(),
        commitment: "instant".to_string(),
    };
    assert_matches!(ledger.commitment(), Err(Error::InvalidCommitment(_)));
}
