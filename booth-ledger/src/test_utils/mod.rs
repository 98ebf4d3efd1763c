// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Test doubles for the ledger boundary.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use solana_sdk::{hash::Hash, signature::Signature, transaction::Transaction};

use crate::{
    claim::{ClaimWallet, WalletIssuanceError, WalletIssuer},
    submitter::{Ledger, MintError},
};

#[derive(Default)]
struct MockLedgerState {
    outcomes: VecDeque<Result<Signature, MintError>>,
    submissions: Vec<Transaction>,
}

/// A [`Ledger`] that hands out scripted outcomes and records every
/// submitted transaction. With no scripted outcomes, every submission
/// confirms. Clones share state, so a test can keep a handle for
/// inspection after moving the ledger into a submitter.
#[derive(Clone, Default)]
pub struct MockLedger {
    state: Arc<Mutex<MockLedgerState>>,
}

impl MockLedger {
    /// A ledger that confirms every submission.
    pub fn confirming() -> Self {
        MockLedger::default()
    }

    /// A ledger that answers submissions with `outcomes` in order, then
    /// confirms.
    pub fn with_outcomes(outcomes: Vec<Result<Signature, MintError>>) -> Self {
        MockLedger {
            state: Arc::new(Mutex::new(MockLedgerState {
                outcomes: outcomes.into(),
                submissions: Vec::new(),
            })),
        }
    }

    /// Number of transactions submitted so far.
    pub fn submissions(&self) -> usize {
        self.state.lock().unwrap().submissions.len()
    }

    /// The most recently submitted transaction.
    pub fn last_transaction(&self) -> Option<Transaction> {
        self.state.lock().unwrap().submissions.last().cloned()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn latest_blockhash(&self) -> Result<Hash, MintError> {
        Ok(Hash::default())
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, MintError> {
        let mut state = self.state.lock().unwrap();
        state.submissions.push(transaction.clone());
        state
            .outcomes
            .pop_front()
            .unwrap_or_else(|| Ok(Signature::default()))
    }
}

/// A [`WalletIssuer`] whose provider is down.
#[derive(Default)]
pub struct FailingWalletIssuer;

#[async_trait]
impl WalletIssuer for FailingWalletIssuer {
    async fn issue(&self) -> Result<ClaimWallet, WalletIssuanceError> {
        Err(WalletIssuanceError::Unavailable(
            "injected issuer outage".into(),
        ))
    }
}
