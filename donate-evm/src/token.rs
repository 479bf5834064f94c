// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::Address;

/// One fungible token on one network.
///
/// The native currency is described by a descriptor without a contract address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub contract: Option<Address>,
    /// On-chain precision: the number of implied fractional digits of a raw amount.
    pub decimals: u8,
    /// Fractional digits shown to the user.
    pub display_decimals: u8,
    pub symbol: String,
    /// Other symbols a balance feed may report this token under.
    pub aliases: Vec<String>,
}

impl TokenDescriptor {
    pub fn native(symbol: &str, decimals: u8, display_decimals: u8, aliases: &[&str]) -> Self {
        Self {
            contract: None,
            decimals,
            display_decimals,
            symbol: symbol.to_string(),
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        }
    }

    pub fn erc20(contract: Address, symbol: &str, decimals: u8, display_decimals: u8) -> Self {
        Self {
            contract: Some(contract),
            decimals,
            display_decimals,
            symbol: symbol.to_string(),
            aliases: vec![],
        }
    }

    pub fn is_native(&self) -> bool {
        self.contract.is_none()
    }

    /// Whether a feed-reported symbol names this token.
    pub fn answers_to_symbol(&self, symbol: &str) -> bool {
        self.symbol == symbol || self.aliases.iter().any(|alias| alias == symbol)
    }

    /// Case-insensitive exact match against a feed-reported contract address.
    pub fn has_contract_address(&self, address: &str) -> bool {
        match self.contract {
            Some(contract) => contract.to_string().eq_ignore_ascii_case(address.trim()),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn contract_address_match_ignores_case() {
        let usdc = TokenDescriptor::erc20(
            address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
            "USDC",
            6,
            2,
        );

        assert!(usdc.has_contract_address("0x1c7d4b196cb0c7b01d743fbc6116a902379c7238"));
        assert!(usdc.has_contract_address("0x1C7D4B196CB0C7B01D743FBC6116A902379C7238"));
        assert!(!usdc.has_contract_address("0x1c7d4b196cb0c7b01d743fbc6116a902379c7239"));
        assert!(!usdc.has_contract_address("1c7d4b196cb0c7b01d743fbc6116a902379c7238"));
    }

    #[test]
    fn native_token_matches_its_aliases_only() {
        let eth = TokenDescriptor::native("ETH", 18, 4, &["SepoliaETH", "SEP"]);

        assert!(eth.is_native());
        assert!(eth.answers_to_symbol("ETH"));
        assert!(eth.answers_to_symbol("SEP"));
        assert!(!eth.answers_to_symbol("eth"));
        assert!(!eth.has_contract_address("0x0000000000000000000000000000000000000000"));
    }
}
