// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Building, signing, and submitting the mint-into-collection transaction.

use async_trait::async_trait;
use mpl_bubblegum::instructions::MintToCollectionV1Builder;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_request::RpcError,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer as _,
    transaction::Transaction,
};
use thiserror::Error;

use crate::descriptor::CollectibleDescriptor;

/// Seed of the collection-CPI signer PDA under the Bubblegum program.
const COLLECTION_CPI_SEED: &[u8] = b"collection_cpi";

/// The error type of mint submission. The three kinds must stay
/// distinguishable: a rejection is final, a confirmation timeout is not —
/// the transaction may still have landed.
#[derive(Clone, Debug, Error)]
pub enum MintError {
    /// The ledger did not hand out a recent blockhash.
    #[error("failed to fetch a recent blockhash: {0}")]
    BlockhashUnavailable(String),
    /// The ledger rejected the submitted transaction.
    #[error("mint transaction rejected: {0}")]
    Rejected(String),
    /// Confirmation did not arrive in time; the transaction may or may not
    /// have landed.
    #[error("mint confirmation timed out: {0}")]
    ConfirmationTimeout(String),
}

/// An opaque ledger that accepts a signed transaction and confirms or
/// rejects it.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash, MintError>;

    /// Submits the transaction and blocks until the ledger reports the
    /// configured confirmation level.
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, MintError>;
}

/// The nonblocking RPC implementation of [`Ledger`], pinned to one
/// commitment level.
pub struct RpcLedger {
    client: RpcClient,
}

impl RpcLedger {
    pub fn new(url: String, commitment: CommitmentConfig) -> Self {
        RpcLedger {
            client: RpcClient::new_with_commitment(url, commitment),
        }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> Result<Hash, MintError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|error| MintError::BlockhashUnavailable(error.to_string()))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, MintError> {
        self.client
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(classify_send_error)
    }
}

/// Maps RPC client failures onto the submit outcomes.
///
/// Transaction errors and RPC response errors are ledger-side rejections.
/// The client's unable-to-confirm path and transport timeouts are
/// ambiguous: the transaction may have landed, so they classify as
/// [`MintError::ConfirmationTimeout`] and are never reported as success.
fn classify_send_error(error: ClientError) -> MintError {
    match &error.kind {
        ClientErrorKind::TransactionError(_) => MintError::Rejected(error.to_string()),
        ClientErrorKind::RpcError(RpcError::RpcResponseError { .. }) => {
            MintError::Rejected(error.to_string())
        }
        ClientErrorKind::RpcError(RpcError::ForUser(_)) => {
            MintError::ConfirmationTimeout(error.to_string())
        }
        ClientErrorKind::Reqwest(inner) if inner.is_timeout() => {
            MintError::ConfirmationTimeout(error.to_string())
        }
        _ => MintError::Rejected(error.to_string()),
    }
}

/// The standing shop accounts every mint references.
#[derive(Clone, Debug)]
pub struct CollectionAccounts {
    pub collection_mint: Pubkey,
    pub collection_metadata: Pubkey,
    pub collection_master_edition: Pubkey,
    pub merkle_tree: Pubkey,
}

/// Submits one compressed mint into the shop collection per call.
///
/// The shop's standing authority key signs alone; the recipient never
/// signs. Retry policy belongs to the caller — none of the failure kinds is
/// retried here.
pub struct MintSubmitter<L> {
    ledger: L,
    authority: Keypair,
    accounts: CollectionAccounts,
}

impl<L> MintSubmitter<L>
where
    L: Ledger,
{
    pub fn new(ledger: L, authority: Keypair, accounts: CollectionAccounts) -> Self {
        MintSubmitter {
            ledger,
            authority,
            accounts,
        }
    }

    /// The shop authority address: fee payer, tree delegate, and creator.
    pub fn authority_address(&self) -> Pubkey {
        self.authority.pubkey()
    }

    /// The collection the submitter mints into.
    pub fn collection_mint(&self) -> Pubkey {
        self.accounts.collection_mint
    }

    /// Derives the two program addresses gating the mint: the tree
    /// authority of the shop's merkle tree and the collection-CPI signer.
    fn derived_accounts(&self) -> (Pubkey, Pubkey) {
        let (tree_authority, _) = Pubkey::find_program_address(
            &[self.accounts.merkle_tree.as_ref()],
            &mpl_bubblegum::ID,
        );
        let (collection_cpi_signer, _) =
            Pubkey::find_program_address(&[COLLECTION_CPI_SEED], &mpl_bubblegum::ID);
        (tree_authority, collection_cpi_signer)
    }

    /// Builds the unsigned mint instruction addressed to `recipient`.
    fn mint_instruction(
        &self,
        descriptor: &CollectibleDescriptor,
        recipient: Pubkey,
    ) -> Instruction {
        let (tree_authority, collection_cpi_signer) = self.derived_accounts();
        let shop = self.authority.pubkey();
        MintToCollectionV1Builder::new()
            .tree_config(tree_authority)
            .leaf_owner(recipient)
            .leaf_delegate(shop)
            .merkle_tree(self.accounts.merkle_tree)
            .payer(shop)
            .tree_creator_or_delegate(shop)
            .collection_authority(shop)
            .collection_mint(self.accounts.collection_mint)
            .collection_metadata(self.accounts.collection_metadata)
            .collection_edition(self.accounts.collection_master_edition)
            .bubblegum_signer(collection_cpi_signer)
            .metadata(descriptor.to_metadata_args())
            .instruction()
    }

    /// Submits one mint and blocks until the ledger confirms it.
    pub async fn submit(
        &self,
        descriptor: &CollectibleDescriptor,
        recipient: Pubkey,
    ) -> Result<Signature, MintError> {
        let blockhash = self.ledger.latest_blockhash().await?;
        let instruction = self.mint_instruction(descriptor, recipient);
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&self.authority.pubkey()),
            &[&self.authority],
            blockhash,
        );
        self.ledger.send_and_confirm(&transaction).await
    }
}

#[cfg(test)]
#[path = "unit_tests/submitter_tests.rs"]
mod submitter_tests;
