// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::balance::print_snapshot;
use crate::utils::format_wallet_address;
use color_eyre::eyre::{Context, Result};
use donate_evm::balance::BalanceSnapshot;
use donate_evm::DonationClient;
use std::time::Duration;

pub async fn watch(client: &DonationClient, interval: Duration) -> Result<()> {
    let watcher = client.watch_balances(Some(interval));
    let mut snapshots = watcher.subscribe();
    let mut last_printed: Option<BalanceSnapshot> = None;

    println!(
        "Watching the balances of {} every {}s, press Ctrl-C to stop",
        format_wallet_address(&client.session().address().to_string()),
        interval.as_secs()
    );

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("Balance watcher stopped");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                // only print settled snapshots that differ from the previous one
                if snapshot.is_loading || last_printed.as_ref() == Some(&snapshot) {
                    continue;
                }
                println!("Balances:");
                print_snapshot(&snapshot);
                last_printed = Some(snapshot);
            }
            signal = tokio::signal::ctrl_c() => {
                signal.wrap_err("Failed to listen for Ctrl-C")?;
                println!("Stopped watching balances");
                break;
            }
        }
    }

    Ok(())
}
