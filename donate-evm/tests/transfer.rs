// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod common;

use crate::common::{events, Event, FakeFeed, FakeWallet, RECIPIENT, TX_HASH};
use assert_matches::assert_matches;
use donate_evm::amount::DecimalAmount;
use donate_evm::chain::NetworkIdentifier;
use donate_evm::reconcile::NetworkError;
use donate_evm::session::ReceiptStatus;
use donate_evm::transfer::{Error, TransferOutcome, TransferRequest, TransferState};
use donate_evm::{DonationClient, Network};
use eyre::Result;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

fn client(wallet: &FakeWallet, feed: FakeFeed) -> Arc<DonationClient> {
    Arc::new(
        DonationClient::new(Network::Sepolia, wallet.session.clone(), Arc::new(feed))
            .with_settle_delay(Duration::ZERO),
    )
}

#[tokio::test]
async fn transfer_exposes_the_hash_before_confirmation() -> Result<()> {
    let wallet = FakeWallet::on_sepolia();
    let client = client(&wallet, FakeFeed::with_usdc("100.00"));
    let mut states = client.transfer_state();

    let submission = tokio::spawn({
        let client = Arc::clone(&client);
        async move {
            client
                .submit_transfer(TransferRequest::new("25.50", RECIPIENT))
                .await
        }
    });

    let awaiting = tokio::time::timeout(
        Duration::from_secs(5),
        states.wait_for(|state| matches!(state, TransferState::AwaitingConfirmation { .. })),
    )
    .await??
    .clone();
    assert_eq!(awaiting, TransferState::AwaitingConfirmation { tx_hash: TX_HASH });
    assert!(awaiting.is_busy());

    wallet
        .receipt
        .send(ReceiptStatus::Success)
        .map_err(|_| eyre::eyre!("receipt receiver dropped"))?;
    let outcome = submission.await?;

    let confirmed = assert_matches!(outcome, TransferOutcome::Confirmed(confirmed) => confirmed);
    assert_eq!(confirmed.tx_hash, TX_HASH);
    assert_eq!(confirmed.amount, DecimalAmount::from_str("25.50")?);
    assert_eq!(client.pending_request(), None);
    assert_matches!(events(&wallet.log).as_slice(), [Event::Submit(_)]);
    Ok(())
}

#[tokio::test]
async fn transfer_switches_before_spending_and_aborts_on_a_diverging_signer() -> Result<()> {
    // The wallet flag follows the switch, but the signing client stays on mainnet.
    let wallet = FakeWallet::new("eip155:1", true, 1);
    let client = client(&wallet, FakeFeed::with_usdc("100.00"));

    let outcome = client
        .submit_transfer(TransferRequest::new("1", RECIPIENT))
        .await;

    assert_eq!(
        outcome,
        TransferOutcome::Rejected(Error::Network(NetworkError::WrongChainAfterSwitch {
            expected: NetworkIdentifier::new(11155111),
            actual: NetworkIdentifier::new(1),
        }))
    );
    assert_eq!(
        events(&wallet.log),
        vec![Event::Switch(NetworkIdentifier::new(11155111))]
    );
    assert_eq!(
        client.pending_request(),
        Some(TransferRequest::new("1", RECIPIENT))
    );
    Ok(())
}

#[tokio::test]
async fn transfer_switches_before_spending_when_the_signer_follows() -> Result<()> {
    let wallet = FakeWallet::new("0x1", true, 11155111);
    let client = client(&wallet, FakeFeed::with_usdc("100.00"));
    wallet
        .receipt
        .send(ReceiptStatus::Success)
        .map_err(|_| eyre::eyre!("receipt receiver dropped"))?;

    let outcome = client
        .submit_transfer(TransferRequest::new("10", RECIPIENT))
        .await;

    assert_matches!(outcome, TransferOutcome::Confirmed(_));
    assert_matches!(
        events(&wallet.log).as_slice(),
        [Event::Switch(network), Event::Submit(_)] if network.chain_id() == 11155111
    );
    Ok(())
}

#[tokio::test]
async fn transfer_uses_fresh_balances_for_the_insufficiency_check() -> Result<()> {
    let wallet = FakeWallet::on_sepolia();
    let feed = Arc::new(FakeFeed::with_usdc("100.00"));
    let client = DonationClient::new(
        Network::Sepolia,
        wallet.session.clone(),
        Arc::clone(&feed) as Arc<dyn donate_evm::session::TokenBalanceFeed>,
    );

    let ten = DecimalAmount::from_str("10")?;
    feed.set_usdc("10.00");
    let outcome = client
        .submit_transfer(TransferRequest::new("25.50", RECIPIENT))
        .await;

    assert_matches!(
        outcome,
        TransferOutcome::Rejected(Error::InsufficientBalance { available, .. })
            if available == ten
    );
    assert!(events(&wallet.log).is_empty());
    Ok(())
}

#[tokio::test]
async fn transfer_reports_an_on_chain_failure_with_its_hash() -> Result<()> {
    let wallet = FakeWallet::on_sepolia();
    let client = client(&wallet, FakeFeed::with_usdc("100.00"));
    wallet
        .receipt
        .send(ReceiptStatus::Reverted)
        .map_err(|_| eyre::eyre!("receipt receiver dropped"))?;

    let outcome = client
        .submit_transfer(TransferRequest::new("100", RECIPIENT))
        .await;

    assert_eq!(
        outcome,
        TransferOutcome::Failed {
            tx_hash: Some(TX_HASH),
            error: Error::OnChainFailure,
        }
    );
    assert_matches!(
        &*client.transfer_state().borrow(),
        TransferState::Failed { tx_hash: Some(hash), .. } if *hash == TX_HASH
    );
    Ok(())
}
