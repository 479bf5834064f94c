// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::chain::NetworkIdentifier;
use crate::session::WalletSession;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Wallet session cannot switch networks")]
    SwitchUnavailable,
    #[error("Network switch was not completed: {0}")]
    SwitchFailed(String),
    #[error("Signing client targets {actual}, expected {expected}")]
    WrongChainAfterSwitch {
        expected: NetworkIdentifier,
        actual: NetworkIdentifier,
    },
}

impl NetworkError {
    /// Every network failure asks the user for the same manual action.
    pub fn user_message(&self, network_name: &str) -> String {
        format!("Please switch to {network_name} network before sending donation")
    }
}

/// How the session ended up on the required network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    AlreadyOnNetwork,
    /// A switch was requested and accepted; the wallet may still be settling.
    Switched,
}

/// Make sure the session is on `required`, asking the wallet to switch when it is not.
///
/// Idempotent. After [`Reconciled::Switched`] the caller must re-verify the chain before any
/// network-sensitive action.
pub async fn reconcile(
    session: &dyn WalletSession,
    required: &NetworkIdentifier,
) -> Result<Reconciled, NetworkError> {
    let active = session.active_network();
    if active
        .as_deref()
        .is_some_and(|active| required.matches_raw(active))
    {
        debug!("Wallet is already on {required}");
        return Ok(Reconciled::AlreadyOnNetwork);
    }

    info!("Wallet reports network {active:?}, requesting a switch to {required}");
    if !session.can_switch_network() {
        warn!("Wallet session has no network switch capability");
        return Err(NetworkError::SwitchUnavailable);
    }

    session
        .switch_network(required)
        .await
        .inspect_err(|err| error!("Network switch to {required} failed: {err}"))
        .map_err(|err| NetworkError::SwitchFailed(err.to_string()))?;

    info!("Wallet accepted the switch to {required}");
    Ok(Reconciled::Switched)
}
