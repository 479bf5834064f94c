// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod normalize;
mod watcher;

pub use normalize::{normalize, try_normalize, RawBalance, NATIVE_DECIMALS};
pub use watcher::BalanceWatcher;

use crate::amount::DecimalAmount;
use crate::chain::NetworkIdentifier;
use crate::session::{SessionError, TokenBalanceEntry, TokenBalanceFeed, TokenBalances, WalletSession};
use crate::token::TokenDescriptor;
use crate::Network;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Where a balance reading came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    PrimarySource,
    FallbackSource,
    DefaultZero,
}

impl Display for Provenance {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Provenance::PrimarySource => write!(f, "primary source"),
            Provenance::FallbackSource => write!(f, "fallback source"),
            Provenance::DefaultZero => write!(f, "default"),
        }
    }
}

/// A balance for one token, already rounded to the token's display precision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceReading {
    pub symbol: String,
    pub amount: DecimalAmount,
    pub display_decimals: u8,
    pub provenance: Provenance,
}

impl BalanceReading {
    fn new(token: &TokenDescriptor, amount: DecimalAmount, provenance: Provenance) -> Self {
        Self {
            symbol: token.symbol.clone(),
            amount: amount.round_dp(token.display_decimals),
            display_decimals: token.display_decimals,
            provenance,
        }
    }

    fn zero(token: &TokenDescriptor) -> Self {
        Self::new(token, DecimalAmount::zero(), Provenance::DefaultZero)
    }

    /// The amount with exactly the display number of fractional digits, e.g. `1.5000`.
    pub fn display(&self) -> String {
        self.amount.format_fixed(self.display_decimals)
    }
}

impl Display for BalanceReading {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {}", self.display(), self.symbol)
    }
}

/// Balances keyed by token symbol. A new snapshot supersedes the previous one entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BalanceSnapshot {
    readings: BTreeMap<String, BalanceReading>,
    pub is_loading: bool,
}

impl BalanceSnapshot {
    pub fn get(&self, symbol: &str) -> Option<&BalanceReading> {
        self.readings.get(symbol)
    }

    /// The display-rounded balance of a token; zero when no reading exists.
    pub fn available(&self, token: &TokenDescriptor) -> DecimalAmount {
        self.get(&token.symbol)
            .map(|reading| reading.amount)
            .unwrap_or_default()
    }

    pub fn readings(&self) -> impl Iterator<Item = &BalanceReading> {
        self.readings.values()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn insert(&mut self, reading: BalanceReading) {
        let _ = self.readings.insert(reading.symbol.clone(), reading);
    }
}

/// Produces balances for the native currency and the donation token.
#[derive(Clone, Debug)]
pub struct BalanceResolver {
    network: NetworkIdentifier,
    native: TokenDescriptor,
    token: TokenDescriptor,
}

impl BalanceResolver {
    pub fn new(network: NetworkIdentifier, native: TokenDescriptor, token: TokenDescriptor) -> Self {
        Self {
            network,
            native,
            token,
        }
    }

    pub fn for_network(network: &Network) -> Self {
        Self::new(
            network.chain(),
            network.native_token().clone(),
            network.donation_token().clone(),
        )
    }

    pub fn native_token(&self) -> &TokenDescriptor {
        &self.native
    }

    pub fn donation_token(&self) -> &TokenDescriptor {
        &self.token
    }

    /// Resolve both balances. Never fails: every source failure degrades to the next source,
    /// and finally to zero.
    pub async fn resolve(
        &self,
        session: &dyn WalletSession,
        feed: &dyn TokenBalanceFeed,
    ) -> BalanceSnapshot {
        let account = session.address();
        debug!("Resolving balances of {account:?} on {}", self.network);

        let (direct_read, feed_read) =
            tokio::join!(session.balance(), feed.token_balances(account, &self.network));

        let feed = feed_read.unwrap_or_else(|err| {
            warn!("Token balance feed failed for {account:?}: {err}");
            TokenBalances::default()
        });

        let mut snapshot = BalanceSnapshot {
            is_loading: feed.is_loading,
            ..Default::default()
        };
        snapshot.insert(self.resolve_native(direct_read, &feed.balances));
        snapshot.insert(self.resolve_token(&feed.balances));

        debug!(
            "Resolved balances: {}",
            snapshot
                .readings()
                .map(|reading| format!("{reading} ({})", reading.provenance))
                .collect::<Vec<_>>()
                .join(", ")
        );
        snapshot
    }

    /// Direct read first, then a symbol scan of the feed, then zero.
    fn resolve_native(
        &self,
        direct_read: Result<RawBalance, SessionError>,
        entries: &[TokenBalanceEntry],
    ) -> BalanceReading {
        match direct_read {
            Ok(raw) => match try_normalize(&raw) {
                Some(amount) => {
                    return BalanceReading::new(&self.native, amount, Provenance::PrimarySource)
                }
                None => warn!("Direct {} balance read was malformed: {raw:?}", self.native.symbol),
            },
            Err(err) => warn!("Direct {} balance read failed: {err}", self.native.symbol),
        }

        match entries
            .iter()
            .find(|entry| self.native.answers_to_symbol(&entry.symbol))
        {
            Some(entry) => BalanceReading::new(
                &self.native,
                normalize(&entry.balance),
                Provenance::FallbackSource,
            ),
            None => BalanceReading::zero(&self.native),
        }
    }

    /// The donation token is only ever read from the feed, matched by contract address.
    fn resolve_token(&self, entries: &[TokenBalanceEntry]) -> BalanceReading {
        let matching = entries.iter().find(|entry| {
            entry
                .address
                .as_deref()
                .is_some_and(|address| self.token.has_contract_address(address))
        });

        match matching {
            Some(entry) => BalanceReading::new(
                &self.token,
                normalize(&entry.balance),
                Provenance::PrimarySource,
            ),
            None => BalanceReading::zero(&self.token),
        }
    }
}
