// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod error;

pub use error::{Error, Result, ValidationError, DEFAULT_FAILURE_MESSAGE};

use crate::amount::{parse_units, DecimalAmount};
use crate::balance::BalanceSnapshot;
use crate::chain::NetworkIdentifier;
use crate::common::{Address, TxHash};
use crate::contract::erc20;
use crate::reconcile::{reconcile, NetworkError, Reconciled};
use crate::session::{ReadClient, SigningClient, WalletSession};
use crate::token::TokenDescriptor;
use crate::Network;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// How long a wallet is given to settle after accepting a network switch.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1500);

const MISSING_CLIENTS_MESSAGE: &str = "Failed to get wallet client or public client";

/// What the user asked to send, as entered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub amount: String,
    pub recipient: String,
}

impl TransferRequest {
    pub fn new(amount: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            recipient: recipient.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedTransfer {
    pub tx_hash: TxHash,
    pub amount: DecimalAmount,
    pub recipient: Address,
    pub explorer_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    Confirmed(ConfirmedTransfer),
    /// Failed after validation. The hash is kept whenever the transaction was broadcast.
    Failed {
        tx_hash: Option<TxHash>,
        error: Error,
    },
    /// Refused before anything was signed.
    Rejected(Error),
}

impl TransferOutcome {
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            TransferOutcome::Confirmed(confirmed) => Some(confirmed.tx_hash),
            TransferOutcome::Failed { tx_hash, .. } => *tx_hash,
            TransferOutcome::Rejected(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            TransferOutcome::Confirmed(_) => None,
            TransferOutcome::Failed { error, .. } | TransferOutcome::Rejected(error) => Some(error),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TransferState {
    #[default]
    Idle,
    Validating,
    NetworkCheck,
    Submitting,
    AwaitingConfirmation {
        tx_hash: TxHash,
    },
    Confirmed(ConfirmedTransfer),
    Failed {
        tx_hash: Option<TxHash>,
        error: Error,
    },
    Rejected(Error),
}

impl TransferState {
    /// While busy, no second transfer may be started.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            TransferState::Submitting | TransferState::AwaitingConfirmation { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferState::Confirmed(_) | TransferState::Failed { .. } | TransferState::Rejected(_)
        )
    }
}

impl From<TransferOutcome> for TransferState {
    fn from(outcome: TransferOutcome) -> Self {
        match outcome {
            TransferOutcome::Confirmed(confirmed) => TransferState::Confirmed(confirmed),
            TransferOutcome::Failed { tx_hash, error } => TransferState::Failed { tx_hash, error },
            TransferOutcome::Rejected(error) => TransferState::Rejected(error),
        }
    }
}

/// A request that passed validation.
#[derive(Clone, Copy, Debug)]
struct ValidTransfer {
    amount: DecimalAmount,
    recipient: Address,
}

/// Drives one donation from user input to a confirmed or failed transaction.
///
/// Callers must not start a second [`TransferSubmitter::submit`] while [`TransferState::is_busy`].
pub struct TransferSubmitter {
    network: Network,
    settle_delay: Duration,
    state: watch::Sender<TransferState>,
    pending: Mutex<Option<TransferRequest>>,
}

impl TransferSubmitter {
    pub fn new(network: Network) -> Self {
        let (state, _) = watch::channel(TransferState::Idle);
        Self {
            network,
            settle_delay: DEFAULT_SETTLE_DELAY,
            state,
            pending: Mutex::new(None),
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn state(&self) -> TransferState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransferState> {
        self.state.subscribe()
    }

    /// The request being worked on, kept after a failure so it can be retried.
    pub fn pending_request(&self) -> Option<TransferRequest> {
        self.pending.lock().ok().and_then(|pending| pending.clone())
    }

    fn token(&self) -> &TokenDescriptor {
        self.network.donation_token()
    }

    fn publish(&self, state: TransferState) {
        debug!("Transfer state: {state:?}");
        let _ = self.state.send_replace(state);
    }

    fn set_pending(&self, request: Option<TransferRequest>) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = request;
        }
    }

    /// Validate, reconcile the network, submit and wait for the receipt.
    ///
    /// `snapshot` is the balance the user was shown; a stale snapshot surfaces as a failure at
    /// submission time rather than blocking here.
    pub async fn submit(
        &self,
        session: &dyn WalletSession,
        snapshot: &BalanceSnapshot,
        request: TransferRequest,
    ) -> TransferOutcome {
        self.set_pending(Some(request.clone()));

        let outcome = self.run(session, snapshot, &request).await;
        match &outcome {
            TransferOutcome::Confirmed(confirmed) => {
                info!(
                    "Donation of {} {} confirmed in {:?}",
                    confirmed.amount,
                    self.token().symbol,
                    confirmed.tx_hash
                );
                self.set_pending(None);
            }
            TransferOutcome::Failed { tx_hash, error } => {
                error!("Donation failed (tx: {tx_hash:?}): {error}")
            }
            TransferOutcome::Rejected(error) => warn!("Donation rejected: {error}"),
        }
        self.publish(outcome.clone().into());
        outcome
    }

    async fn run(
        &self,
        session: &dyn WalletSession,
        snapshot: &BalanceSnapshot,
        request: &TransferRequest,
    ) -> TransferOutcome {
        self.publish(TransferState::Validating);
        let transfer = match self.validate(request, snapshot) {
            Ok(transfer) => transfer,
            Err(err) => return TransferOutcome::Rejected(err),
        };

        self.publish(TransferState::NetworkCheck);
        let (signer, reader) = match self.check_network(session).await {
            Ok(clients) => clients,
            Err(outcome) => return outcome,
        };

        self.publish(TransferState::Submitting);
        let tx_hash = match self.broadcast(signer.as_ref(), &transfer).await {
            Ok(tx_hash) => tx_hash,
            Err(error) => {
                return TransferOutcome::Failed {
                    tx_hash: None,
                    error,
                }
            }
        };

        info!("Donation broadcast with tx_hash: {tx_hash:?}");
        self.publish(TransferState::AwaitingConfirmation { tx_hash });

        match reader.await_receipt(tx_hash).await {
            Ok(receipt) if receipt.is_success() => TransferOutcome::Confirmed(ConfirmedTransfer {
                tx_hash,
                amount: transfer.amount,
                recipient: transfer.recipient,
                explorer_url: self.network.transaction_url(&tx_hash),
            }),
            Ok(receipt) => {
                warn!("Receipt for {tx_hash:?} reports {:?}", receipt.status);
                TransferOutcome::Failed {
                    tx_hash: Some(tx_hash),
                    error: Error::OnChainFailure,
                }
            }
            Err(err) => TransferOutcome::Failed {
                tx_hash: Some(tx_hash),
                error: Error::unknown(err),
            },
        }
    }

    fn validate(&self, request: &TransferRequest, snapshot: &BalanceSnapshot) -> Result<ValidTransfer> {
        let token = self.token();

        let amount = DecimalAmount::from_str(&request.amount)
            .map_err(|_| ValidationError::InvalidAmount(request.amount.clone()))?;
        if amount.is_zero() {
            return Err(ValidationError::NonPositiveAmount.into());
        }
        if amount.fractional_digits() > token.decimals {
            return Err(ValidationError::ExcessivePrecision {
                decimals: token.decimals,
            }
            .into());
        }

        let recipient = request.recipient.trim();
        if recipient.is_empty() {
            return Err(ValidationError::MissingRecipient.into());
        }
        let recipient = Address::from_str(recipient)
            .map_err(|_| ValidationError::InvalidRecipient(request.recipient.clone()))?;

        let available = snapshot.available(token);
        if amount > available {
            return Err(Error::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        Ok(ValidTransfer { amount, recipient })
    }

    /// Reconcile, then confirm the read client's own chain id. Both checks always run.
    async fn check_network(
        &self,
        session: &dyn WalletSession,
    ) -> std::result::Result<(Arc<dyn SigningClient>, Arc<dyn ReadClient>), TransferOutcome> {
        let expected = self.network.chain();

        match reconcile(session, &expected).await {
            Ok(Reconciled::AlreadyOnNetwork) => {}
            Ok(Reconciled::Switched) => {
                debug!("Waiting {:?} for the wallet to settle", self.settle_delay);
                tokio::time::sleep(self.settle_delay).await;
            }
            Err(err) => return Err(TransferOutcome::Rejected(err.into())),
        }

        let (Some(signer), Some(reader)) = (session.signing_client(), session.read_client()) else {
            error!("{MISSING_CLIENTS_MESSAGE}");
            return Err(TransferOutcome::Failed {
                tx_hash: None,
                error: Error::unknown(MISSING_CLIENTS_MESSAGE),
            });
        };

        let chain_id = reader.chain_id().await.map_err(|err| {
            error!("Could not read the signing chain id: {err}");
            TransferOutcome::Failed {
                tx_hash: None,
                error: Error::unknown(err),
            }
        })?;
        let actual = NetworkIdentifier::new(chain_id);
        if actual != expected {
            return Err(TransferOutcome::Rejected(
                NetworkError::WrongChainAfterSwitch { expected, actual }.into(),
            ));
        }

        Ok((signer, reader))
    }

    async fn broadcast(&self, signer: &dyn SigningClient, transfer: &ValidTransfer) -> Result<TxHash> {
        let token = self.token();
        let contract = token
            .contract
            .ok_or_else(|| Error::unknown(format!("{} has no contract address", token.symbol)))?;
        let raw_amount = parse_units(&transfer.amount.to_string(), token.decimals)
            .map_err(Error::unknown)?;

        debug!(
            "Transferring raw amt of {}: {raw_amount} to {:?}",
            token.symbol, transfer.recipient
        );
        let call = erc20::transfer_call(contract, transfer.recipient, raw_amount);
        signer
            .submit_contract_call(call)
            .await
            .inspect_err(|err| error!("Error submitting transfer to {:?}: {err}", transfer.recipient))
            .map_err(Error::submission)
    }
}
