// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::balance::{BalanceResolver, BalanceSnapshot, BalanceWatcher};
use crate::reconcile::{reconcile, NetworkError, Reconciled};
use crate::session::{TokenBalanceFeed, WalletSession};
use crate::transfer::{TransferOutcome, TransferRequest, TransferState, TransferSubmitter};
use crate::Network;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Everything a presentation layer needs to show balances and send donations.
pub struct DonationClient {
    network: Network,
    session: Arc<dyn WalletSession>,
    sessions: watch::Sender<Option<Arc<dyn WalletSession>>>,
    feed: Arc<dyn TokenBalanceFeed>,
    resolver: BalanceResolver,
    submitter: TransferSubmitter,
}

impl DonationClient {
    pub fn new(
        network: Network,
        session: Arc<dyn WalletSession>,
        feed: Arc<dyn TokenBalanceFeed>,
    ) -> Self {
        let (sessions, _) = watch::channel(Some(Arc::clone(&session)));
        Self {
            resolver: BalanceResolver::for_network(&network),
            submitter: TransferSubmitter::new(network.clone()),
            network,
            session,
            sessions,
            feed,
        }
    }

    /// Override how long to wait after the wallet accepts a network switch.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.submitter = self.submitter.with_settle_delay(settle_delay);
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn session(&self) -> &Arc<dyn WalletSession> {
        &self.session
    }

    pub async fn reconcile_network(&self) -> Result<Reconciled, NetworkError> {
        reconcile(self.session.as_ref(), &self.network.chain()).await
    }

    pub async fn resolve_balances(&self) -> BalanceSnapshot {
        self.resolver
            .resolve(self.session.as_ref(), self.feed.as_ref())
            .await
    }

    /// Keep balances up to date in the background, optionally polling at `interval`.
    pub fn watch_balances(&self, interval: Option<Duration>) -> BalanceWatcher {
        BalanceWatcher::spawn(
            self.resolver.clone(),
            self.sessions.subscribe(),
            Arc::clone(&self.feed),
            interval,
        )
    }

    /// Send a donation, checking it against freshly resolved balances.
    ///
    /// Must not be called again while [`TransferState::is_busy`].
    pub async fn submit_transfer(&self, request: TransferRequest) -> TransferOutcome {
        let snapshot = self.resolve_balances().await;
        self.submitter
            .submit(self.session.as_ref(), &snapshot, request)
            .await
    }

    pub fn transfer_state(&self) -> watch::Receiver<TransferState> {
        self.submitter.subscribe()
    }

    pub fn pending_request(&self) -> Option<TransferRequest> {
        self.submitter.pending_request()
    }
}
