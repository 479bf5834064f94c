// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::amount::DecimalAmount;
use crate::reconcile::NetworkError;

/// Shown when a failure carries no message of its own.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to send donation. Please try again.";

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A request that never reaches the network.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0:?} is not a valid amount")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Amount has more than {decimals} decimal places")]
    ExcessivePrecision { decimals: u8 },
    #[error("A recipient address is required")]
    MissingRecipient,
    #[error("{0:?} is not a valid recipient address")]
    InvalidRecipient(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: DecimalAmount,
        available: DecimalAmount,
    },
    /// Signing or broadcast was refused, e.g. the user declined in their wallet.
    #[error("{0}")]
    Submission(String),
    #[error("Transaction failed on chain")]
    OnChainFailure,
    #[error("{0}")]
    Unknown(String),
}

impl Error {
    /// A submission failure carrying `message` verbatim, or the generic message when it is empty.
    pub(crate) fn submission(message: impl ToString) -> Self {
        Error::Submission(or_default_message(message))
    }

    pub(crate) fn unknown(message: impl ToString) -> Self {
        Error::Unknown(or_default_message(message))
    }
}

fn or_default_message(message: impl ToString) -> String {
    let message = message.to_string();
    if message.trim().is_empty() {
        DEFAULT_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_messages_fall_back_to_the_generic_one() {
        assert_eq!(
            Error::submission("").to_string(),
            "Failed to send donation. Please try again."
        );
        assert_eq!(Error::unknown("  ").to_string(), DEFAULT_FAILURE_MESSAGE);
        assert_eq!(
            Error::submission("User denied transaction signature.").to_string(),
            "User denied transaction signature."
        );
    }
}
