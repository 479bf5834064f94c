// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::Address;
use crate::token::TokenDescriptor;
use crate::{CustomNetwork, Network};
use alloy::network::Ethereum;
use alloy::providers::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
};
use alloy::providers::{Identity, ProviderBuilder, ReqwestProvider};
use alloy::transports::http::{reqwest, Client, Http};
use std::env;
use std::str::FromStr;

/// environment variable selecting a built-in network by name
pub const DONATE_NETWORK: &str = "DONATE_NETWORK";
/// environment variables to connect to a custom EVM network
pub const RPC_URL: &str = "RPC_URL";
const RPC_URL_BUILD_TIME_VAL: Option<&str> = option_env!("RPC_URL");
pub const CHAIN_ID: &str = "CHAIN_ID";
const CHAIN_ID_BUILD_TIME_VAL: Option<&str> = option_env!("CHAIN_ID");
pub const DONATION_TOKEN_ADDRESS: &str = "DONATION_TOKEN_ADDRESS";
const DONATION_TOKEN_ADDRESS_BUILD_TIME_VAL: Option<&str> = option_env!("DONATION_TOKEN_ADDRESS");
pub const DONATION_TOKEN_DECIMALS: &str = "DONATION_TOKEN_DECIMALS";
pub const DONATION_TOKEN_SYMBOL: &str = "DONATION_TOKEN_SYMBOL";
pub const EXPLORER_URL: &str = "EXPLORER_URL";

const DEFAULT_TOKEN_DECIMALS: u8 = 6;
const DEFAULT_TOKEN_SYMBOL: &str = "USDC";
const TOKEN_DISPLAY_DECIMALS: u8 = 2;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to get EVM network: {0}")]
    FailedToGetNetwork(String),
}

/// Create a custom `Network` from the given values.
pub fn get_network(
    rpc_url: &str,
    chain_id: &str,
    token_address: &str,
    token_decimals: Option<&str>,
    token_symbol: Option<&str>,
    explorer_url: Option<&str>,
) -> Result<Network, Error> {
    let rpc_url_http = reqwest::Url::parse(rpc_url)
        .map_err(|err| Error::FailedToGetNetwork(format!("invalid {RPC_URL} {rpc_url:?}: {err}")))?;
    let chain_id = chain_id.trim().parse::<u64>().map_err(|err| {
        Error::FailedToGetNetwork(format!("invalid {CHAIN_ID} {chain_id:?}: {err}"))
    })?;
    let contract = Address::from_str(token_address.trim()).map_err(|err| {
        Error::FailedToGetNetwork(format!(
            "invalid {DONATION_TOKEN_ADDRESS} {token_address:?}: {err}"
        ))
    })?;
    let decimals = match token_decimals {
        Some(decimals) => decimals.trim().parse::<u8>().map_err(|err| {
            Error::FailedToGetNetwork(format!(
                "invalid {DONATION_TOKEN_DECIMALS} {decimals:?}: {err}"
            ))
        })?,
        None => DEFAULT_TOKEN_DECIMALS,
    };
    let symbol = token_symbol.map(str::trim).unwrap_or(DEFAULT_TOKEN_SYMBOL);
    // Balances are keyed by symbol, so the token must not shadow the native currency.
    let native = &*crate::CUSTOM_NATIVE_TOKEN;
    if symbol.is_empty()
        || std::iter::once(&native.symbol)
            .chain(&native.aliases)
            .any(|native_symbol| native_symbol.eq_ignore_ascii_case(symbol))
    {
        return Err(Error::FailedToGetNetwork(format!(
            "invalid {DONATION_TOKEN_SYMBOL} {symbol:?}: must be set and differ from the native {}",
            native.symbol
        )));
    }

    Ok(Network::Custom(CustomNetwork::new(
        rpc_url_http,
        chain_id,
        TokenDescriptor::erc20(
            contract,
            symbol,
            decimals,
            TOKEN_DISPLAY_DECIMALS.min(decimals),
        ),
        explorer_url.map(|url| url.trim_end_matches('/').to_string()),
    )))
}

/// Get the `Network` from environment variables.
///
/// `DONATE_NETWORK` picks a built-in network; a complete custom configuration is used otherwise,
/// and Sepolia when neither is present.
pub fn get_network_from_env() -> Result<Network, Error> {
    if let Ok(name) = env::var(DONATE_NETWORK) {
        return match name.as_str() {
            "sepolia" => {
                info!("Using Sepolia as {DONATE_NETWORK} is set to 'sepolia'");
                Ok(Network::Sepolia)
            }
            "custom" => custom_network_from_env()?.ok_or_else(|| {
                error!("{DONATE_NETWORK} is 'custom' but the custom network is incomplete");
                Error::FailedToGetNetwork(format!(
                    "missing env var, make sure to set all of: {RPC_URL}, {CHAIN_ID}, {DONATION_TOKEN_ADDRESS}"
                ))
            }),
            other => Err(Error::FailedToGetNetwork(format!(
                "unknown network {other:?} in {DONATE_NETWORK}"
            ))),
        };
    }

    match custom_network_from_env()? {
        Some(network) => {
            info!("Using custom EVM network from environment variables");
            Ok(network)
        }
        None => {
            debug!("No network configured, defaulting to Sepolia");
            Ok(Network::default())
        }
    }
}

fn custom_network_from_env() -> Result<Option<Network>, Error> {
    let vars = [
        env::var(RPC_URL)
            .ok()
            .or_else(|| RPC_URL_BUILD_TIME_VAL.map(|s| s.to_string())),
        env::var(CHAIN_ID)
            .ok()
            .or_else(|| CHAIN_ID_BUILD_TIME_VAL.map(|s| s.to_string())),
        env::var(DONATION_TOKEN_ADDRESS)
            .ok()
            .or_else(|| DONATION_TOKEN_ADDRESS_BUILD_TIME_VAL.map(|s| s.to_string())),
    ];

    let [Some(rpc_url), Some(chain_id), Some(token_address)] = vars else {
        if vars.iter().any(Option::is_some) {
            warn!(
                "Ignoring partial custom network, make sure to set all of: {RPC_URL}, {CHAIN_ID}, {DONATION_TOKEN_ADDRESS}"
            );
        }
        return Ok(None);
    };

    let decimals = env::var(DONATION_TOKEN_DECIMALS).ok();
    let symbol = env::var(DONATION_TOKEN_SYMBOL).ok();
    let explorer = env::var(EXPLORER_URL).ok();
    get_network(
        &rpc_url,
        &chain_id,
        &token_address,
        decimals.as_deref(),
        symbol.as_deref(),
        explorer.as_deref(),
    )
    .map(Some)
}

#[allow(clippy::type_complexity)]
pub(crate) fn http_provider(
    rpc_url: reqwest::Url,
) -> FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    ReqwestProvider,
    Http<Client>,
    Ethereum,
> {
    ProviderBuilder::new()
        .with_recommended_fillers()
        .on_http(rpc_url)
}
