// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#[macro_use]
extern crate tracing;

use crate::chain::NetworkIdentifier;
use crate::common::{Address, TxHash};
use crate::token::TokenDescriptor;
use alloy::primitives::address;
use alloy::transports::http::reqwest;
use std::sync::LazyLock;

pub mod amount;
pub mod balance;
pub mod chain;
mod client;
pub mod common;
pub mod contract;
pub mod reconcile;
pub mod session;
pub mod token;
pub mod transfer;
pub mod utils;
pub mod wallet;

pub use client::DonationClient;

const SEPOLIA_CHAIN_ID: u64 = 11155111;

static PUBLIC_SEPOLIA_HTTP_RPC_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "https://ethereum-sepolia-rpc.publicnode.com"
        .parse()
        .expect("Invalid RPC URL")
});

const SEPOLIA_USDC_ADDRESS: Address = address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");

const SEPOLIA_EXPLORER_URL: &str = "https://sepolia.etherscan.io";
const SEPOLIA_ETH_FAUCET_URL: &str = "https://sepoliafaucet.com/";
const SEPOLIA_USDC_FAUCET_URL: &str = "https://faucet.circle.com/";

static SEPOLIA_NATIVE_TOKEN: LazyLock<TokenDescriptor> =
    LazyLock::new(|| TokenDescriptor::native("ETH", 18, 4, &["SepoliaETH", "SEP"]));

static SEPOLIA_DONATION_TOKEN: LazyLock<TokenDescriptor> =
    LazyLock::new(|| TokenDescriptor::erc20(SEPOLIA_USDC_ADDRESS, "USDC", 6, 2));

static CUSTOM_NATIVE_TOKEN: LazyLock<TokenDescriptor> =
    LazyLock::new(|| TokenDescriptor::native("ETH", 18, 4, &[]));

#[derive(Clone, Debug, PartialEq)]
pub struct CustomNetwork {
    pub rpc_url_http: reqwest::Url,
    pub chain_id: u64,
    pub donation_token: TokenDescriptor,
    pub explorer_url: Option<String>,
}

impl CustomNetwork {
    pub fn new(
        rpc_url_http: reqwest::Url,
        chain_id: u64,
        donation_token: TokenDescriptor,
        explorer_url: Option<String>,
    ) -> Self {
        Self {
            rpc_url_http,
            chain_id,
            donation_token,
            explorer_url,
        }
    }
}

/// The network donations are sent on, with its token and explorer configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Network {
    #[default]
    Sepolia,
    Custom(CustomNetwork),
}

impl Network {
    /// Human readable name, as used in user facing messages.
    pub fn name(&self) -> String {
        match self {
            Network::Sepolia => "Sepolia".to_string(),
            Network::Custom(custom) => format!("chain {}", custom.chain_id),
        }
    }

    pub fn chain(&self) -> NetworkIdentifier {
        match self {
            Network::Sepolia => NetworkIdentifier::new(SEPOLIA_CHAIN_ID),
            Network::Custom(custom) => NetworkIdentifier::new(custom.chain_id),
        }
    }

    pub fn rpc_url(&self) -> &reqwest::Url {
        match self {
            Network::Sepolia => &PUBLIC_SEPOLIA_HTTP_RPC_URL,
            Network::Custom(custom) => &custom.rpc_url_http,
        }
    }

    pub fn native_token(&self) -> &TokenDescriptor {
        match self {
            Network::Sepolia => &SEPOLIA_NATIVE_TOKEN,
            Network::Custom(_) => &CUSTOM_NATIVE_TOKEN,
        }
    }

    pub fn donation_token(&self) -> &TokenDescriptor {
        match self {
            Network::Sepolia => &SEPOLIA_DONATION_TOKEN,
            Network::Custom(custom) => &custom.donation_token,
        }
    }

    pub fn explorer_url(&self) -> Option<&str> {
        match self {
            Network::Sepolia => Some(SEPOLIA_EXPLORER_URL),
            Network::Custom(custom) => custom.explorer_url.as_deref(),
        }
    }

    /// Block explorer link for a transaction.
    pub fn transaction_url(&self, tx_hash: &TxHash) -> Option<String> {
        self.explorer_url()
            .map(|explorer| format!("{explorer}/tx/{}", alloy::hex::encode_prefixed(tx_hash)))
    }

    /// Block explorer link for an account.
    pub fn address_url(&self, address: &Address) -> Option<String> {
        self.explorer_url()
            .map(|explorer| format!("{explorer}/address/{address}"))
    }

    /// Where test funds for the native currency can be obtained.
    pub fn native_faucet_url(&self) -> Option<&str> {
        match self {
            Network::Sepolia => Some(SEPOLIA_ETH_FAUCET_URL),
            Network::Custom(_) => None,
        }
    }

    /// Where test funds for the donation token can be obtained.
    pub fn token_faucet_url(&self) -> Option<&str> {
        match self {
            Network::Sepolia => Some(SEPOLIA_USDC_FAUCET_URL),
            Network::Custom(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    #[test]
    fn sepolia_is_the_default_network() {
        let network = Network::default();

        assert_eq!(network, Network::Sepolia);
        assert_eq!(network.chain().to_namespaced(), "eip155:11155111");
        assert_eq!(network.native_token().display_decimals, 4);
        assert_eq!(network.donation_token().decimals, 6);
        assert_eq!(network.donation_token().display_decimals, 2);
        assert_eq!(network.name(), "Sepolia");
    }

    #[test]
    fn transaction_url_concatenates_explorer_and_hash() {
        let tx_hash = b256!("00000000000000000000000000000000000000000000000000000000000000ff");

        assert_eq!(
            Network::Sepolia.transaction_url(&tx_hash).as_deref(),
            Some("https://sepolia.etherscan.io/tx/0x00000000000000000000000000000000000000000000000000000000000000ff")
        );
    }

    #[test]
    fn address_url_uses_the_checksummed_address() {
        assert_eq!(
            Network::Sepolia.address_url(&SEPOLIA_USDC_ADDRESS).as_deref(),
            Some("https://sepolia.etherscan.io/address/0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238")
        );
    }

    #[test]
    fn custom_networks_without_an_explorer_have_no_links() {
        let network = Network::Custom(CustomNetwork::new(
            reqwest::Url::parse("http://localhost:8545").expect("url"),
            31337,
            TokenDescriptor::erc20(SEPOLIA_USDC_ADDRESS, "USDC", 6, 2),
            None,
        ));

        assert_eq!(network.transaction_url(&TxHash::ZERO), None);
        assert_eq!(network.address_url(&Address::ZERO), None);
        assert_eq!(network.token_faucet_url(), None);
        assert_eq!(network.name(), "chain 31337");
    }
}
