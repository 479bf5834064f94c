// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::eyre::{Context, Result};
use color_eyre::Section;
use donate_evm::utils::{
    get_network_from_env, CHAIN_ID, DONATE_NETWORK, DONATION_TOKEN_ADDRESS, RPC_URL,
};
use donate_evm::wallet::{EvmSession, RpcTokenBalanceFeed};
use donate_evm::{DonationClient, Network};
use std::sync::Arc;
use std::time::Duration;

pub fn get_network() -> Result<Network> {
    get_network_from_env()
        .wrap_err("Failed to resolve the donation network")
        .with_suggestion(|| {
            format!("set {DONATE_NETWORK}=sepolia, or all of {RPC_URL}, {CHAIN_ID} and {DONATION_TOKEN_ADDRESS}")
        })
}

/// Connect the wallet to the configured network's RPC endpoint.
pub async fn connect(settle_delay: Duration) -> Result<DonationClient> {
    let network = get_network()?;
    let secret_key = super::keys::get_secret_key()?;

    info!("Connecting to {} at {}", network.name(), network.rpc_url());
    let session = EvmSession::connect(&network, &secret_key)
        .await
        .wrap_err("Failed to connect the wallet to the network")
        .with_suggestion(|| format!("check that {} is reachable", network.rpc_url()))?;
    let feed = RpcTokenBalanceFeed::new(network.clone());

    Ok(
        DonationClient::new(network, Arc::new(session), Arc::new(feed))
            .with_settle_delay(settle_delay),
    )
}
