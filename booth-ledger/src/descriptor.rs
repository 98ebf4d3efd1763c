// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The immutable descriptor serialized into every mint instruction.

use booth_base::{data_types::AssetRecord, identifiers::SequenceNumber};
use mpl_bubblegum::types::{
    Collection, Creator, MetadataArgs, TokenProgramVersion, TokenStandard,
};
use solana_sdk::pubkey::Pubkey;

/// Naming policy applied to every minted collectible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintPolicy {
    /// The display name all collectibles share.
    pub display_name: String,
    pub symbol: String,
    /// Base URL of the off-chain metadata documents.
    pub metadata_base_uri: String,
    /// Name prefix of the per-sequence metadata document.
    pub metadata_prefix: String,
}

/// One creator entry of a descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatorEntry {
    pub address: Pubkey,
    pub verified: bool,
    pub share: u8,
}

/// The full description of one collectible instance.
///
/// Built once per pipeline run, serialized into the mint instruction, and
/// never altered after submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectibleDescriptor {
    pub name: String,
    pub symbol: String,
    /// URI of the off-chain metadata document.
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub is_mutable: bool,
    pub edition_nonce: u8,
    pub primary_sale_happened: bool,
    pub creators: Vec<CreatorEntry>,
    /// The collection the mint is verified against.
    pub collection: Pubkey,
    /// The published asset this collectible depicts.
    pub asset: AssetRecord,
}

impl CollectibleDescriptor {
    /// Builds the descriptor for collectible `sequence` depicting `asset`.
    ///
    /// Pure and deterministic: identical inputs always produce an identical
    /// descriptor. The royalty and attribution policy is fixed — the
    /// collectible is non-mutable, carries no resale royalty, credits the
    /// shop with the full creator share and the platform with an
    /// attribution-only entry.
    pub fn build(
        asset: AssetRecord,
        sequence: SequenceNumber,
        shop: Pubkey,
        collection: Pubkey,
        platform: Pubkey,
        policy: &MintPolicy,
    ) -> Self {
        CollectibleDescriptor {
            name: policy.display_name.clone(),
            symbol: policy.symbol.clone(),
            uri: format!(
                "{}{}{}.json",
                policy.metadata_base_uri, policy.metadata_prefix, sequence
            ),
            seller_fee_basis_points: 0,
            is_mutable: false,
            edition_nonce: 0,
            primary_sale_happened: false,
            creators: vec![
                CreatorEntry {
                    address: shop,
                    verified: false,
                    share: 100,
                },
                CreatorEntry {
                    address: platform,
                    verified: false,
                    share: 0,
                },
            ],
            collection,
            asset,
        }
    }

    /// The on-wire metadata of the mint instruction.
    pub fn to_metadata_args(&self) -> MetadataArgs {
        MetadataArgs {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            uri: self.uri.clone(),
            seller_fee_basis_points: self.seller_fee_basis_points,
            primary_sale_happened: self.primary_sale_happened,
            is_mutable: self.is_mutable,
            edition_nonce: Some(self.edition_nonce),
            token_standard: Some(TokenStandard::NonFungible),
            collection: Some(Collection {
                verified: false,
                key: self.collection,
            }),
            uses: None,
            token_program_version: TokenProgramVersion::Original,
            creators: self
                .creators
                .iter()
                .map(|creator| Creator {
                    address: creator.address,
                    verified: creator.verified,
                    share: creator.share,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "unit_tests/descriptor_tests.rs"]
mod descriptor_tests;
