// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod balance;
mod network;
mod send;
mod watch;

use clap::Subcommand;
use color_eyre::Result;
use std::time::Duration;

use crate::opt::Opt;

#[derive(Subcommand, Debug)]
pub enum SubCmd {
    /// Show the donation network and check the wallet is connected to it.
    Network,

    /// Show the wallet's native and donation token balances.
    Balance {
        /// Print the balances as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Send a donation.
    Send {
        /// The address of the recipient.
        #[arg(long)]
        to: String,
        /// The amount of the donation token to send, e.g. 25.50
        #[arg(long)]
        amount: String,
    },

    /// Print the balances every time they change, until Ctrl-C is pressed.
    Watch {
        /// Seconds between balance reads.
        #[arg(long, default_value = "15", value_parser = |t: &str| -> Result<Duration> { Ok(t.parse().map(Duration::from_secs)?) })]
        interval: Duration,
    },
}

pub async fn handle_subcommand(opt: Opt) -> Result<()> {
    let client = crate::access::network::connect(opt.settle_delay).await?;

    match opt.command {
        SubCmd::Network => network::check(&client).await,
        SubCmd::Balance { json } => balance::show(&client, json).await,
        SubCmd::Send { to, amount } => send::send(&client, &amount, &to).await,
        SubCmd::Watch { interval } => watch::watch(&client, interval).await,
    }
}
