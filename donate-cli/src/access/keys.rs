// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::eyre::{Context, Result};
use color_eyre::Section;
use std::env::{self, VarError};

const SECRET_KEY_ENV: &str = "SECRET_KEY";

/// EVM wallet private key
pub fn get_secret_key() -> Result<String> {
    parse_secret_key(env::var(SECRET_KEY_ENV))
}

fn parse_secret_key(value: Result<String, VarError>) -> Result<String> {
    value
        .map(|key| key.trim().to_string())
        .wrap_err("The secret key is required to perform this action")
        .with_suggestion(|| format!("make sure you've provided the {SECRET_KEY_ENV} env var"))
        .with_suggestion(|| {
            "the secret key should be a hex encoded string of your evm wallet private key"
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrounding_whitespace_is_trimmed() -> Result<()> {
        assert_eq!(parse_secret_key(Ok(" 0xabc\n".to_string()))?, "0xabc");
        Ok(())
    }

    #[test]
    fn a_missing_key_is_reported() {
        let report = parse_secret_key(Err(VarError::NotPresent));
        assert!(matches!(report, Err(err) if err.to_string().contains("secret key is required")));
    }
}
