// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The ledger boundary of the booth service: building collectible
//! descriptors, issuing custodial claim wallets, and submitting compressed
//! mints into the shop collection.

pub mod claim;
pub mod descriptor;
pub mod submitter;
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use crate::{
    claim::{ClaimWallet, LinkWalletIssuer, WalletIssuanceError, WalletIssuer},
    descriptor::{CollectibleDescriptor, CreatorEntry, MintPolicy},
    submitter::{CollectionAccounts, Ledger, MintError, MintSubmitter, RpcLedger},
};
