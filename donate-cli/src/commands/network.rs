// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::utils::format_wallet_address;
use color_eyre::eyre::{Context, Result};
use color_eyre::Section;
use donate_evm::reconcile::Reconciled;
use donate_evm::DonationClient;

pub async fn check(client: &DonationClient) -> Result<()> {
    let network = client.network();
    let token = network.donation_token();
    println!("Network: {} ({})", network.name(), network.chain());
    println!("RPC endpoint: {}", network.rpc_url());
    if let Some(contract) = token.contract {
        println!("Donation token: {} at {contract}", token.symbol);
    }
    if let Some(explorer) = network.explorer_url() {
        println!("Explorer: {explorer}");
    }

    let address = client.session().address().to_string();
    match client.reconcile_network().await {
        Ok(Reconciled::AlreadyOnNetwork) => {
            println!("Wallet {} is on {}", format_wallet_address(&address), network.name());
        }
        Ok(Reconciled::Switched) => {
            println!(
                "Wallet {} was switched to {}",
                format_wallet_address(&address),
                network.name()
            );
        }
        Err(err) => {
            error!("Wallet {address} is not on {}: {err}", network.name());
            let message = err.user_message(&network.name());
            return Err(err)
                .wrap_err(message)
                .with_suggestion(|| "make sure RPC_URL points at a node of the donation network");
        }
    }

    Ok(())
}
