// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#![allow(dead_code)]

use alloy::primitives::{address, b256, Address};
use async_trait::async_trait;
use donate_evm::balance::RawBalance;
use donate_evm::chain::NetworkIdentifier;
use donate_evm::common::TxHash;
use donate_evm::session::{
    ContractCall, FeedError, ReadClient, Receipt, ReceiptStatus, SessionError, SigningClient,
    TokenBalanceEntry, TokenBalanceFeed, TokenBalances, WalletSession,
};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const DONOR: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const RECIPIENT: &str = "0x385e7887E5b41750E3679Da787B943EC42f37d75";
pub const USDC: &str = "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238";
pub const TX_HASH: TxHash =
    b256!("5f2b6a4d8e0c1a3b5d7f9e1c3a5b7d9f0e2c4a6b8d0f1e3c5a7b9d1f3e5c7a9b");

/// Everything a fake wallet was asked to do, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Switch(NetworkIdentifier),
    Submit(ContractCall),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn events(log: &EventLog) -> Vec<Event> {
    log.lock().map(|events| events.clone()).unwrap_or_default()
}

fn record(log: &EventLog, event: Event) {
    if let Ok(mut events) = log.lock() {
        events.push(event);
    }
}

pub struct FakeSigner {
    log: EventLog,
}

#[async_trait]
impl SigningClient for FakeSigner {
    async fn submit_contract_call(&self, call: ContractCall) -> Result<TxHash, SessionError> {
        record(&self.log, Event::Submit(call));
        Ok(TX_HASH)
    }
}

/// Holds every receipt request until the test releases it.
pub struct FakeReader {
    chain_id: u64,
    receipt: tokio::sync::Mutex<Option<oneshot::Receiver<ReceiptStatus>>>,
}

#[async_trait]
impl ReadClient for FakeReader {
    async fn chain_id(&self) -> Result<u64, SessionError> {
        Ok(self.chain_id)
    }

    async fn await_receipt(&self, tx_hash: TxHash) -> Result<Receipt, SessionError> {
        let receiver = self
            .receipt
            .lock()
            .await
            .take()
            .ok_or_else(|| SessionError::Other("receipt already consumed".to_string()))?;
        let status = receiver
            .await
            .map_err(|_| SessionError::Other("receipt never arrived".to_string()))?;
        Ok(Receipt {
            transaction_hash: tx_hash,
            block_number: Some(1),
            status,
        })
    }
}

pub struct FakeSession {
    active_network: Mutex<Option<String>>,
    can_switch: bool,
    balance: RawBalance,
    log: EventLog,
    signer: Arc<FakeSigner>,
    reader: Arc<FakeReader>,
}

/// A fake wallet plus the handles a test uses to drive and inspect it.
pub struct FakeWallet {
    pub session: Arc<FakeSession>,
    pub log: EventLog,
    pub receipt: oneshot::Sender<ReceiptStatus>,
}

impl FakeWallet {
    /// `signing_chain_id` is what the read client reports regardless of the wallet's flag.
    pub fn new(active_network: &str, can_switch: bool, signing_chain_id: u64) -> Self {
        let log = EventLog::default();
        let (receipt, receiver) = oneshot::channel();
        let session = FakeSession {
            active_network: Mutex::new(Some(active_network.to_string())),
            can_switch,
            balance: RawBalance::Text("0.5".to_string()),
            log: Arc::clone(&log),
            signer: Arc::new(FakeSigner {
                log: Arc::clone(&log),
            }),
            reader: Arc::new(FakeReader {
                chain_id: signing_chain_id,
                receipt: tokio::sync::Mutex::new(Some(receiver)),
            }),
        };
        Self {
            session: Arc::new(session),
            log,
            receipt,
        }
    }

    pub fn on_sepolia() -> Self {
        Self::new("eip155:11155111", false, 11155111)
    }
}

#[async_trait]
impl WalletSession for FakeSession {
    fn address(&self) -> Address {
        DONOR
    }

    fn active_network(&self) -> Option<String> {
        self.active_network
            .lock()
            .ok()
            .and_then(|active| active.clone())
    }

    fn can_switch_network(&self) -> bool {
        self.can_switch
    }

    async fn switch_network(&self, network: &NetworkIdentifier) -> Result<(), SessionError> {
        record(&self.log, Event::Switch(*network));
        if let Ok(mut active) = self.active_network.lock() {
            *active = Some(network.to_hex());
        }
        Ok(())
    }

    async fn balance(&self) -> Result<RawBalance, SessionError> {
        Ok(self.balance.clone())
    }

    fn signing_client(&self) -> Option<Arc<dyn SigningClient>> {
        Some(Arc::clone(&self.signer) as Arc<dyn SigningClient>)
    }

    fn read_client(&self) -> Option<Arc<dyn ReadClient>> {
        Some(Arc::clone(&self.reader) as Arc<dyn ReadClient>)
    }
}

/// A feed whose contents the test can replace at any time.
#[derive(Default)]
pub struct FakeFeed {
    balances: Mutex<TokenBalances>,
}

impl FakeFeed {
    pub fn with_usdc(balance: &str) -> Self {
        let feed = Self::default();
        feed.set_usdc(balance);
        feed
    }

    pub fn set_usdc(&self, balance: &str) {
        if let Ok(mut balances) = self.balances.lock() {
            *balances = TokenBalances {
                balances: vec![TokenBalanceEntry {
                    symbol: "USDC".to_string(),
                    address: Some(USDC.to_lowercase()),
                    balance: RawBalance::structured(Some(balance), None),
                }],
                is_loading: false,
            };
        }
    }
}

#[async_trait]
impl TokenBalanceFeed for FakeFeed {
    async fn token_balances(
        &self,
        _account: Address,
        _network: &NetworkIdentifier,
    ) -> Result<TokenBalances, FeedError> {
        self.balances
            .lock()
            .map(|balances| balances.clone())
            .map_err(|err| FeedError::Other(err.to_string()))
    }
}
