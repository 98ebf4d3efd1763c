// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use booth_base::{
    data_types::AssetRecord,
    identifiers::{AssetId, SequenceNumber},
};
use solana_sdk::pubkey::Pubkey;

use super::{CollectibleDescriptor, MintPolicy};

fn policy() -> MintPolicy {
    MintPolicy {
        display_name: "Booth Collectible".into(),
        symbol: "BOOTH".into(),
        metadata_base_uri: "https://meta.example/".into(),
        metadata_prefix: "booth".into(),
    }
}

fn asset(sequence: u64) -> AssetRecord {
    AssetRecord {
        id: AssetId::for_sequence("booth", SequenceNumber(sequence)),
        url: format!("https://assets.example/booth{sequence}"),
    }
}

#[test]
fn build_is_deterministic() {
    let shop = Pubkey::new_unique();
    let collection = Pubkey::new_unique();
    let platform = Pubkey::new_unique();
    let build = || {
        CollectibleDescriptor::build(
            asset(12),
            SequenceNumber(12),
            shop,
            collection,
            platform,
            &policy(),
        )
    };
    assert_eq!(build(), build());
}

#[test]
fn build_applies_the_fixed_policy() {
    let shop = Pubkey::new_unique();
    let collection = Pubkey::new_unique();
    let platform = Pubkey::new_unique();
    let descriptor = CollectibleDescriptor::build(
        asset(3),
        SequenceNumber(3),
        shop,
        collection,
        platform,
        &policy(),
    );

    assert!(!descriptor.is_mutable);
    assert_eq!(descriptor.seller_fee_basis_points, 0);
    assert!(!descriptor.primary_sale_happened);
    assert_eq!(descriptor.collection, collection);

    assert_eq!(descriptor.creators.len(), 2);
    assert_eq!(descriptor.creators[0].address, shop);
    assert_eq!(descriptor.creators[0].share, 100);
    assert!(!descriptor.creators[0].verified);
    assert_eq!(descriptor.creators[1].address, platform);
    assert_eq!(descriptor.creators[1].share, 0);
}

#[test]
fn metadata_uri_embeds_the_sequence() {
    let descriptor = CollectibleDescriptor::build(
        asset(41),
        SequenceNumber(41),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        &policy(),
    );
    assert_eq!(descriptor.uri, "https://meta.example/booth41.json");
}

#[test]
fn metadata_args_mirror_the_descriptor() {
    let collection = Pubkey::new_unique();
    let descriptor = CollectibleDescriptor::build(
        asset(5),
        SequenceNumber(5),
        Pubkey::new_unique(),
        collection,
        Pubkey::new_unique(),
        &policy(),
    );
    let args = descriptor.to_metadata_args();

    assert_eq!(args.name, descriptor.name);
    assert_eq!(args.symbol, descriptor.symbol);
    assert_eq!(args.uri, descriptor.uri);
    assert_eq!(args.seller_fee_basis_points, 0);
    assert!(!args.is_mutable);
    assert_eq!(args.edition_nonce, Some(0));
    assert_eq!(args.collection.as_ref().map(|c| c.key), Some(collection));
    assert_eq!(args.collection.map(|c| c.verified), Some(false));
    assert_eq!(args.creators.len(), 2);
    assert!(args.uses.is_none());
}
