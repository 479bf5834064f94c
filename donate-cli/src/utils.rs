// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

/// `0x1c7D...7238`
pub fn format_wallet_address(address: &str) -> String {
    shorten(address, 6, 4)
}

/// `0x8d5b1e...805d8e`
pub fn format_transaction_hash(tx_hash: &str) -> String {
    shorten(tx_hash, 8, 6)
}

fn shorten(text: &str, start_len: usize, end_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= start_len + end_len {
        return text.to_string();
    }

    let start: String = chars[..start_len].iter().collect();
    let end: String = chars[chars.len() - end_len..].iter().collect();
    format!("{start}...{end}")
}
