// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! A [`WalletSession`] backed by a local private key and an HTTP RPC endpoint.

use crate::amount::format_units;
use crate::balance::RawBalance;
use crate::chain::NetworkIdentifier;
use crate::common::{Address, EthereumWallet, TxHash, U256};
use crate::contract::erc20::IERC20;
use crate::session::{
    ContractCall, FeedError, ReadClient, Receipt, ReceiptStatus, SessionError, SigningClient,
    TokenBalanceEntry, TokenBalanceFeed, TokenBalances, WalletSession,
};
use crate::token::TokenDescriptor;
use crate::utils::http_provider;
use crate::Network;
use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest;
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// How often a pending transaction's receipt is polled for.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Private key is invalid")]
    PrivateKeyInvalid,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Parse a hex encoded private key, with or without `0x`.
pub fn wallet_from_private_key(private_key: &str) -> Result<(Address, EthereumWallet), Error> {
    let signer = PrivateKeySigner::from_str(private_key.trim()).map_err(|err| {
        error!("Error parsing private key: {err}");
        Error::PrivateKeyInvalid
    })?;
    Ok((signer.address(), EthereumWallet::from(signer)))
}

pub struct EvmSession {
    address: Address,
    chain_id: u64,
    signer: Arc<EvmSigner>,
    reader: Arc<EvmReader>,
}

impl EvmSession {
    /// Connect to the network's RPC endpoint, recording the chain it serves.
    pub async fn connect(network: &Network, private_key: &str) -> Result<Self, Error> {
        let (address, wallet) = wallet_from_private_key(private_key)?;
        let rpc_url = network.rpc_url().clone();
        let reader = Arc::new(EvmReader::new(rpc_url.clone()));
        let chain_id = reader.chain_id().await?;
        info!("Connected wallet {address:?} to chain {chain_id} via {rpc_url}");

        Ok(Self {
            address,
            chain_id,
            signer: Arc::new(EvmSigner::new(rpc_url, wallet)),
            reader,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait]
impl WalletSession for EvmSession {
    fn address(&self) -> Address {
        self.address
    }

    fn active_network(&self) -> Option<String> {
        Some(self.chain_id.to_string())
    }

    fn can_switch_network(&self) -> bool {
        false
    }

    async fn switch_network(&self, _network: &NetworkIdentifier) -> Result<(), SessionError> {
        Err(SessionError::Unsupported("network switching"))
    }

    async fn balance(&self) -> Result<RawBalance, SessionError> {
        let balance = self.reader.native_balance(self.address).await?;
        Ok(RawBalance::SmallestUnit(balance))
    }

    fn signing_client(&self) -> Option<Arc<dyn SigningClient>> {
        Some(Arc::clone(&self.signer) as Arc<dyn SigningClient>)
    }

    fn read_client(&self) -> Option<Arc<dyn ReadClient>> {
        Some(Arc::clone(&self.reader) as Arc<dyn ReadClient>)
    }
}

pub struct EvmSigner {
    rpc_url: reqwest::Url,
    wallet: EthereumWallet,
}

impl EvmSigner {
    pub fn new(rpc_url: reqwest::Url, wallet: EthereumWallet) -> Self {
        Self { rpc_url, wallet }
    }
}

#[async_trait]
impl SigningClient for EvmSigner {
    async fn submit_contract_call(&self, call: ContractCall) -> Result<TxHash, SessionError> {
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(self.wallet.clone())
            .on_http(self.rpc_url.clone());

        debug!("Sending {} to contract {:?}", call.function, call.to);
        let request = TransactionRequest::default()
            .with_to(call.to)
            .with_input(call.calldata);
        let pending = provider
            .send_transaction(request)
            .await
            .inspect_err(|err| error!("Error sending {} to {:?}: {err:?}", call.function, call.to))?;

        let tx_hash = *pending.tx_hash();
        debug!("{} is pending with tx_hash: {tx_hash:?}", call.function);
        Ok(tx_hash)
    }
}

pub struct EvmReader {
    rpc_url: reqwest::Url,
}

impl EvmReader {
    pub fn new(rpc_url: reqwest::Url) -> Self {
        Self { rpc_url }
    }

    async fn native_balance(&self, account: Address) -> Result<U256, SessionError> {
        debug!("Getting native balance of account: {account:?}");
        let balance = http_provider(self.rpc_url.clone())
            .get_balance(account)
            .await
            .inspect_err(|err| error!("Error getting native balance of {account:?}: {err:?}"))?;
        Ok(balance)
    }
}

#[async_trait]
impl ReadClient for EvmReader {
    async fn chain_id(&self) -> Result<u64, SessionError> {
        let chain_id = http_provider(self.rpc_url.clone())
            .get_chain_id()
            .await
            .inspect_err(|err| error!("Error getting chain id: {err:?}"))?;
        Ok(chain_id)
    }

    async fn await_receipt(&self, tx_hash: TxHash) -> Result<Receipt, SessionError> {
        let provider = http_provider(self.rpc_url.clone());
        loop {
            let maybe_receipt = provider
                .get_transaction_receipt(tx_hash)
                .await
                .inspect_err(|err| error!("Error getting receipt of {tx_hash:?}: {err:?}"))?;

            if let Some(receipt) = maybe_receipt {
                let status = if receipt.status() {
                    ReceiptStatus::Success
                } else {
                    ReceiptStatus::Reverted
                };
                debug!("Transaction {tx_hash:?} included with status {status:?}");
                return Ok(Receipt {
                    transaction_hash: receipt.transaction_hash,
                    block_number: receipt.block_number,
                    status,
                });
            }

            trace!("Transaction {tx_hash:?} not included yet");
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}

/// A bulk balance feed that queries the RPC endpoint directly for the network's native currency
/// and its donation token.
pub struct RpcTokenBalanceFeed {
    network: Network,
}

impl RpcTokenBalanceFeed {
    pub fn new(network: Network) -> Self {
        Self { network }
    }
}

#[async_trait]
impl TokenBalanceFeed for RpcTokenBalanceFeed {
    async fn token_balances(
        &self,
        account: Address,
        network: &NetworkIdentifier,
    ) -> Result<TokenBalances, FeedError> {
        if *network != self.network.chain() {
            return Err(FeedError::Other(format!(
                "Feed serves {}, not {network}",
                self.network.chain()
            )));
        }

        let native = self.network.native_token();
        let token = self.network.donation_token();
        let token_read = async {
            match token.contract {
                Some(contract) => Some(self.token_balance(contract, token, account).await),
                None => None,
            }
        };
        let (native_read, token_read) =
            tokio::join!(self.native_balance(native, account), token_read);

        collect_entries(native, native_read, token, token_read)
    }
}

impl RpcTokenBalanceFeed {
    async fn native_balance(
        &self,
        native: &TokenDescriptor,
        account: Address,
    ) -> Result<U256, FeedError> {
        debug!("Getting {} balance of account: {account:?}", native.symbol);
        let balance = http_provider(self.network.rpc_url().clone())
            .get_balance(account)
            .await
            .inspect_err(|err| error!("Error getting {} balance: {err:?}", native.symbol))?;
        Ok(balance)
    }

    async fn token_balance(
        &self,
        contract: Address,
        token: &TokenDescriptor,
        account: Address,
    ) -> Result<U256, FeedError> {
        debug!("Getting {} balance of account: {account:?}", token.symbol);
        let provider = http_provider(self.network.rpc_url().clone());
        let balance = IERC20::new(contract, provider)
            .balanceOf(account)
            .call()
            .await
            .inspect_err(|err| error!("Error getting {} balance: {err:?}", token.symbol))
            .map_err(|err| FeedError::Other(err.to_string()))?
            ._0;
        Ok(balance)
    }
}

/// Build the feed from independent reads. A failed read only drops its own entry; the feed
/// fails only when nothing could be read at all.
fn collect_entries(
    native: &TokenDescriptor,
    native_read: Result<U256, FeedError>,
    token: &TokenDescriptor,
    token_read: Option<Result<U256, FeedError>>,
) -> Result<TokenBalances, FeedError> {
    let mut balances = Vec::new();
    let mut last_error = None;

    match native_read {
        Ok(raw) => balances.push(TokenBalanceEntry {
            symbol: native.symbol.clone(),
            address: None,
            balance: RawBalance::SmallestUnit(raw),
        }),
        Err(err) => {
            warn!("Leaving {} out of the balance feed: {err}", native.symbol);
            last_error = Some(err);
        }
    }

    if let (Some(contract), Some(token_read)) = (token.contract, token_read) {
        match token_read.and_then(|raw| {
            format_units(raw, token.decimals).map_err(|err| FeedError::Other(err.to_string()))
        }) {
            Ok(formatted) => balances.push(TokenBalanceEntry {
                symbol: token.symbol.clone(),
                address: Some(contract.to_string()),
                balance: RawBalance::structured(Some(&formatted.to_string()), None),
            }),
            Err(err) => {
                warn!("Leaving {} out of the balance feed: {err}", token.symbol);
                last_error = Some(err);
            }
        }
    }

    match last_error {
        Some(err) if balances.is_empty() => Err(err),
        _ => Ok(TokenBalances {
            balances,
            is_loading: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::DecimalAmount;
    use crate::balance::{BalanceResolver, Provenance};
    use crate::session::mocks::{MockFeed, MockSession};
    use alloy::primitives::address;

    const ACCOUNT: Address = address!("385e7887E5b41750E3679Da787B943EC42f37d75");
    const USDC: Address = address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");

    fn eth() -> TokenDescriptor {
        TokenDescriptor::native("ETH", 18, 4, &["SepoliaETH", "SEP"])
    }

    fn usdc() -> TokenDescriptor {
        TokenDescriptor::erc20(USDC, "USDC", 6, 2)
    }

    fn unavailable(method: &str) -> FeedError {
        FeedError::Other(format!("{method} unavailable"))
    }

    // Anvil's first default account.
    const PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn private_keys_parse_with_or_without_prefix() -> Result<(), Error> {
        let (address, _) = wallet_from_private_key(PRIVATE_KEY)?;
        let (unprefixed, _) = wallet_from_private_key(PRIVATE_KEY.trim_start_matches("0x"))?;

        assert_eq!(
            address,
            Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").expect("address")
        );
        assert_eq!(address, unprefixed);
        Ok(())
    }

    #[test]
    fn malformed_private_keys_are_rejected() {
        for key in ["", "0x", "not a key", "0x1234"] {
            assert!(matches!(
                wallet_from_private_key(key),
                Err(Error::PrivateKeyInvalid)
            ));
        }
    }

    #[test]
    fn failed_native_read_only_drops_the_native_entry() -> Result<(), FeedError> {
        let feed = collect_entries(
            &eth(),
            Err(unavailable("eth_getBalance")),
            &usdc(),
            Some(Ok(U256::from(25_500_000u64))),
        )?;

        assert_eq!(
            feed.balances,
            vec![TokenBalanceEntry {
                symbol: "USDC".to_string(),
                address: Some(USDC.to_string()),
                balance: RawBalance::structured(Some("25.5"), None),
            }]
        );
        assert!(!feed.is_loading);
        Ok(())
    }

    #[test]
    fn failed_token_read_keeps_the_native_entry() -> Result<(), FeedError> {
        let wei = U256::from(2_000_000_000_000_000_000u128);
        let feed = collect_entries(&eth(), Ok(wei), &usdc(), Some(Err(unavailable("eth_call"))))?;

        assert_eq!(feed.balances.len(), 1);
        assert_eq!(feed.balances[0].symbol, "ETH");
        assert_eq!(feed.balances[0].balance, RawBalance::SmallestUnit(wei));
        Ok(())
    }

    #[test]
    fn feed_fails_only_when_every_read_fails() {
        let result = collect_entries(
            &eth(),
            Err(unavailable("eth_getBalance")),
            &usdc(),
            Some(Err(unavailable("eth_call"))),
        );

        assert!(matches!(result, Err(FeedError::Other(message)) if message == "eth_call unavailable"));
    }

    #[tokio::test]
    async fn token_balance_survives_a_failed_native_read() -> Result<(), FeedError> {
        let entries = collect_entries(
            &eth(),
            Err(unavailable("eth_getBalance")),
            &usdc(),
            Some(Ok(U256::from(25_500_000u64))),
        )?;

        let mut session = MockSession::new();
        session.expect_address().return_const(ACCOUNT);
        session
            .expect_balance()
            .times(1)
            .returning(|| Err(SessionError::Other("getBalance unavailable".to_string())));
        let mut feed = MockFeed::new();
        feed.expect_token_balances()
            .times(1)
            .return_once(move |_, _| Ok(entries));

        let resolver = BalanceResolver::new(NetworkIdentifier::new(11155111), eth(), usdc());
        let snapshot = resolver.resolve(&session, &feed).await;

        let token = snapshot.get("USDC").expect("USDC reading");
        assert_eq!(token.provenance, Provenance::PrimarySource);
        assert_eq!(token.display(), "25.50");
        assert_eq!(
            snapshot.available(&usdc()),
            DecimalAmount::from_str("25.5").expect("amount")
        );
        assert_eq!(
            snapshot.get("ETH").expect("ETH reading").provenance,
            Provenance::DefaultZero
        );
        Ok(())
    }
}
