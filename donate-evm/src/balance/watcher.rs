// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{BalanceResolver, BalanceSnapshot};
use crate::session::{TokenBalanceFeed, WalletSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

/// Re-resolves balances whenever the session changes, a refresh is requested or the polling
/// interval elapses, and publishes every snapshot.
///
/// Dropping the watcher stops it.
pub struct BalanceWatcher {
    snapshots: watch::Receiver<BalanceSnapshot>,
    refresh: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl BalanceWatcher {
    /// `sessions` carries the current wallet session; `None` means signed out.
    pub fn spawn(
        resolver: BalanceResolver,
        sessions: watch::Receiver<Option<Arc<dyn WalletSession>>>,
        feed: Arc<dyn TokenBalanceFeed>,
        interval: Option<Duration>,
    ) -> Self {
        let (sender, snapshots) = watch::channel(BalanceSnapshot::default());
        let refresh = Arc::new(Notify::new());
        let handle = tokio::spawn(run(
            resolver,
            sessions,
            feed,
            interval,
            sender,
            Arc::clone(&refresh),
        ));

        Self {
            snapshots,
            refresh,
            handle,
        }
    }

    /// Ask for a new cycle, e.g. because the feed's underlying data changed.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn subscribe(&self) -> watch::Receiver<BalanceSnapshot> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> BalanceSnapshot {
        self.snapshots.borrow().clone()
    }
}

impl Drop for BalanceWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    resolver: BalanceResolver,
    mut sessions: watch::Receiver<Option<Arc<dyn WalletSession>>>,
    feed: Arc<dyn TokenBalanceFeed>,
    interval: Option<Duration>,
    snapshots: watch::Sender<BalanceSnapshot>,
    refresh: Arc<Notify>,
) {
    loop {
        let session = sessions.borrow_and_update().clone();
        match session {
            Some(session) => {
                snapshots.send_modify(|snapshot| snapshot.is_loading = true);
                let snapshot = resolver.resolve(session.as_ref(), feed.as_ref()).await;
                let _ = snapshots.send_replace(snapshot);
            }
            None => {
                debug!("No wallet session, clearing balances");
                let _ = snapshots.send_replace(BalanceSnapshot::default());
            }
        }

        tokio::select! {
            changed = sessions.changed() => {
                if changed.is_err() {
                    debug!("Wallet session source closed, stopping balance watcher");
                    break;
                }
                debug!("Wallet session changed, refreshing balances");
            }
            _ = refresh.notified() => debug!("Balance refresh requested"),
            _ = tick(interval) => trace!("Balance polling interval elapsed"),
        }
    }
}

async fn tick(interval: Option<Duration>) {
    match interval {
        Some(interval) => tokio::time::sleep(interval).await,
        None => std::future::pending().await,
    }
}
