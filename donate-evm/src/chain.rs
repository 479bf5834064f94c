// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The CAIP-2 namespace used for EVM chains.
pub const EIP155_NAMESPACE: &str = "eip155";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Could not parse chain identifier {0:?}")]
    InvalidChainId(String),
}

/// Canonical identifier of an EVM network.
///
/// Two identifiers are equal iff their chain ids are equal; the textual encodings a wallet may
/// report (`11155111`, `eip155:11155111`, `0xaa36a7`) all parse to the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkIdentifier {
    chain_id: u64,
}

impl NetworkIdentifier {
    pub const fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Parse any of the decimal, namespaced or hexadecimal encodings.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let value = raw.trim();
        let invalid = || Error::InvalidChainId(raw.to_string());

        let chain_id = if let Some(reference) = value.strip_prefix(EIP155_NAMESPACE) {
            let reference = reference.strip_prefix(':').ok_or_else(invalid)?;
            parse_decimal(reference).ok_or_else(invalid)?
        } else if let Some(hex) = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
        {
            if hex.is_empty() {
                return Err(invalid());
            }
            u64::from_str_radix(hex, 16).map_err(|_| invalid())?
        } else {
            parse_decimal(value).ok_or_else(invalid)?
        };

        Ok(Self::new(chain_id))
    }

    /// Whether a raw, wallet-reported network string refers to this chain.
    ///
    /// Unparsable input never matches.
    pub fn matches_raw(&self, raw: &str) -> bool {
        Self::parse(raw).is_ok_and(|other| other == *self)
    }

    pub fn to_decimal_string(&self) -> String {
        self.chain_id.to_string()
    }

    /// The CAIP-2 form, e.g. `eip155:11155111`.
    pub fn to_namespaced(&self) -> String {
        format!("{EIP155_NAMESPACE}:{}", self.chain_id)
    }

    /// The `0x`-prefixed lowercase hexadecimal form, as used by `wallet_switchEthereumChain`.
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

fn parse_decimal(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

impl From<u64> for NetworkIdentifier {
    fn from(chain_id: u64) -> Self {
        Self::new(chain_id)
    }
}

impl FromStr for NetworkIdentifier {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Display for NetworkIdentifier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_namespaced())
    }
}
