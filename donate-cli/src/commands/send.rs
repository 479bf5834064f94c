// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::utils::{format_transaction_hash, format_wallet_address};
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Section;
use donate_evm::common::TxHash;
use donate_evm::transfer::{Error, TransferOutcome, TransferRequest, TransferState};
use donate_evm::{DonationClient, Network};
use tokio::sync::watch;

pub async fn send(client: &DonationClient, amount: &str, recipient: &str) -> Result<()> {
    let network = client.network();
    let symbol = &network.donation_token().symbol;
    println!(
        "Sending {amount} {symbol} to {} on {}...",
        format_wallet_address(recipient),
        network.name()
    );

    let states = client.transfer_state();
    let (outcome, announced) = tokio::join!(
        client.submit_transfer(TransferRequest::new(amount, recipient)),
        report_progress(states, network),
    );

    match outcome {
        TransferOutcome::Confirmed(confirmed) => {
            if !announced {
                print_transaction(network, &confirmed.tx_hash);
            }
            println!(
                "Donation of {} {symbol} to {} confirmed",
                confirmed.amount,
                format_wallet_address(&confirmed.recipient.to_string())
            );
            info!("Donation confirmed in transaction {}", confirmed.tx_hash);
            Ok(())
        }
        TransferOutcome::Failed { tx_hash, error } => {
            if let Some(tx_hash) = tx_hash {
                if !announced {
                    print_transaction(network, &tx_hash);
                }
                println!("Check the transaction above before trying again");
            }
            Err(failure(network, error))
        }
        TransferOutcome::Rejected(error) => Err(failure(network, error)),
    }
}

/// Print the transaction as soon as it is broadcast. Returns whether it was printed.
async fn report_progress(mut states: watch::Receiver<TransferState>, network: &Network) -> bool {
    let mut announced = false;
    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        match state {
            TransferState::NetworkCheck => println!("Checking the wallet network..."),
            TransferState::Submitting => println!("Waiting for the wallet to sign..."),
            TransferState::AwaitingConfirmation { tx_hash } => {
                print_transaction(network, &tx_hash);
                println!("Waiting for confirmation...");
                announced = true;
            }
            state if state.is_terminal() => break,
            _ => {}
        }
    }
    announced
}

fn print_transaction(network: &Network, tx_hash: &TxHash) {
    println!(
        "Transaction: {}",
        format_transaction_hash(&tx_hash.to_string())
    );
    if let Some(url) = network.transaction_url(tx_hash) {
        println!("View it at {url}");
    }
}

fn failure(network: &Network, error: Error) -> Report {
    let report = match &error {
        Error::Network(network_error) => eyre!(network_error.user_message(&network.name())),
        error => eyre!(error.to_string()),
    };

    match (error, network.token_faucet_url()) {
        (Error::InsufficientBalance { .. }, Some(faucet)) => report.with_suggestion(|| {
            format!("get test {} from {faucet}", network.donation_token().symbol)
        }),
        _ => report,
    }
}
