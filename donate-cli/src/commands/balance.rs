// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::utils::format_wallet_address;
use color_eyre::eyre::{Context, Result};
use donate_evm::balance::{BalanceSnapshot, Provenance};
use donate_evm::{DonationClient, Network};

pub async fn show(client: &DonationClient, json: bool) -> Result<()> {
    let snapshot = client.resolve_balances().await;

    if json {
        let json =
            serde_json::to_string_pretty(&snapshot).wrap_err("Failed to serialise balances")?;
        println!("{json}");
        return Ok(());
    }

    let network = client.network();
    let address = client.session().address();
    println!(
        "Balances of {} on {}:",
        format_wallet_address(&address.to_string()),
        network.name()
    );
    print_snapshot(&snapshot);
    if let Some(url) = network.address_url(&address) {
        println!("View the wallet at {url}");
    }
    print_faucets(network, &snapshot);
    Ok(())
}

pub fn print_snapshot(snapshot: &BalanceSnapshot) {
    for reading in snapshot.readings() {
        match reading.provenance {
            Provenance::PrimarySource => println!("  {reading}"),
            provenance => println!("  {reading} ({provenance})"),
        }
    }
}

/// Point at the faucets of any token the wallet has none of.
fn print_faucets(network: &Network, snapshot: &BalanceSnapshot) {
    let faucets = [
        (network.native_token(), network.native_faucet_url()),
        (network.donation_token(), network.token_faucet_url()),
    ];
    for (token, faucet) in faucets {
        if let Some(url) = faucet {
            if snapshot.available(token).is_zero() {
                println!("Get test {} from {url}", token.symbol);
            }
        }
    }
}
