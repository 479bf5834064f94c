// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! The capabilities the core consumes from the wallet connection and from a bulk balance feed.
//!
//! The core never constructs or destroys a session; it is handed one and reads it per operation.

use crate::balance::RawBalance;
use crate::chain::NetworkIdentifier;
use crate::common::{Address, Calldata, TxHash};
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// The user, or the wallet on their behalf, declined the request.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    #[error("Wallet session does not support {0}")]
    Unsupported(&'static str),
    #[error("{0}")]
    Other(String),
}

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    #[error("{0}")]
    Other(String),
}

/// An abi-like description of one contract function call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    /// Human readable function signature, e.g. `transfer(address,uint256)`.
    pub function: String,
    /// ABI encoded selector and arguments.
    pub calldata: Calldata,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub status: ReceiptStatus,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

/// Signs and broadcasts transactions on behalf of the session.
#[async_trait]
pub trait SigningClient: Send + Sync {
    /// Returns as soon as the transaction has been broadcast.
    async fn submit_contract_call(&self, call: ContractCall) -> Result<TxHash, SessionError>;
}

/// Read-only view of the chain the signing client is attached to.
#[async_trait]
pub trait ReadClient: Send + Sync {
    async fn chain_id(&self) -> Result<u64, SessionError>;
    /// Waits, without a deadline, until the transaction is included.
    async fn await_receipt(&self, tx_hash: TxHash) -> Result<Receipt, SessionError>;
}

/// An authenticated wallet.
#[async_trait]
pub trait WalletSession: Send + Sync {
    fn address(&self) -> Address;
    /// The active network exactly as the wallet reports it, in any textual encoding.
    fn active_network(&self) -> Option<String>;
    fn can_switch_network(&self) -> bool;
    /// Ask the wallet to move to another network. The change may complete asynchronously.
    async fn switch_network(&self, network: &NetworkIdentifier) -> Result<(), SessionError>;
    /// The native currency balance.
    async fn balance(&self) -> Result<RawBalance, SessionError>;
    fn signing_client(&self) -> Option<Arc<dyn SigningClient>>;
    fn read_client(&self) -> Option<Arc<dyn ReadClient>>;
}

/// One entry of a bulk balance feed.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBalanceEntry {
    pub symbol: String,
    pub address: Option<String>,
    pub balance: RawBalance,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenBalances {
    pub balances: Vec<TokenBalanceEntry>,
    pub is_loading: bool,
}

/// A bulk token-balance source keyed by account and network.
#[async_trait]
pub trait TokenBalanceFeed: Send + Sync {
    async fn token_balances(
        &self,
        account: Address,
        network: &NetworkIdentifier,
    ) -> Result<TokenBalances, FeedError>;
}
