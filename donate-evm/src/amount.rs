// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::U256;
use serde::{Serialize, Serializer};
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The largest number of fractional digits whose power of ten fits in a U256.
const MAX_SCALE: u8 = 76;

/// Specialisation of `std::Result`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Failed to parse amount: {0}")]
    InvalidAmount(String),
    #[error("The amount would exceed the maximum value")]
    ExcessiveValue,
}

fn pow10(exponent: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exponent))
}

/// An exact, unsigned decimal number: `mantissa / 10^scale`.
///
/// Values are kept in canonical form (no trailing fractional zeros), so two amounts are equal
/// exactly when their numeric values are equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DecimalAmount {
    mantissa: U256,
    scale: u8,
}

impl DecimalAmount {
    /// Type safe representation of zero.
    pub const fn zero() -> Self {
        Self {
            mantissa: U256::ZERO,
            scale: 0,
        }
    }

    fn canonical(mut mantissa: U256, mut scale: u8) -> Self {
        let ten = U256::from(10u64);
        while scale > 0 && !mantissa.is_zero() && (mantissa % ten).is_zero() {
            mantissa /= ten;
            scale -= 1;
        }
        if mantissa.is_zero() {
            scale = 0;
        }
        Self { mantissa, scale }
    }

    /// Interpret a raw smallest-unit value carrying `decimals` implied fractional digits.
    pub fn from_units(raw: U256, decimals: u8) -> Result<Self> {
        if decimals > MAX_SCALE {
            return Err(Error::ExcessiveValue);
        }
        Ok(Self::canonical(raw, decimals))
    }

    /// Convert a float through its shortest round-trip decimal text.
    ///
    /// Returns `None` for NaN, infinities and negative values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if value == 0.0 {
            return Some(Self::zero());
        }
        if !value.is_finite() || value.is_sign_negative() {
            return None;
        }
        // f64's Display never uses exponent notation.
        value.to_string().parse().ok()
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Number of significant fractional digits.
    pub fn fractional_digits(&self) -> u8 {
        self.scale
    }

    /// Round half-up to at most `places` fractional digits.
    pub fn round_dp(&self, places: u8) -> Self {
        if self.scale <= places {
            return *self;
        }
        let divisor = pow10(self.scale - places);
        let quotient = self.mantissa / divisor;
        let remainder = self.mantissa % divisor;
        let quotient = if remainder >= divisor - remainder {
            quotient + U256::from(1u64)
        } else {
            quotient
        };
        Self::canonical(quotient, places)
    }

    /// Render with exactly `places` fractional digits, rounding half-up.
    pub fn format_fixed(&self, places: u8) -> String {
        let rounded = self.round_dp(places);
        let (integer, fraction) = rounded.split_digits();
        if places == 0 {
            return integer;
        }
        let padding = "0".repeat(usize::from(places) - fraction.len());
        format!("{integer}.{fraction}{padding}")
    }

    fn split_digits(&self) -> (String, String) {
        let divisor = pow10(self.scale);
        let integer = (self.mantissa / divisor).to_string();
        if self.scale == 0 {
            return (integer, String::new());
        }
        let remainder = (self.mantissa % divisor).to_string();
        let leading = "0".repeat(usize::from(self.scale) - remainder.len());
        (integer, format!("{leading}{remainder}"))
    }
}

impl FromStr for DecimalAmount {
    type Err = Error;

    fn from_str(value_str: &str) -> Result<Self> {
        let trimmed = value_str.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if integer.is_empty() && fraction.is_empty() {
            return Err(Error::InvalidAmount(format!(
                "no digits found in {value_str:?}"
            )));
        }
        if !integer.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(Error::InvalidAmount(format!(
                "{value_str:?} is not a plain decimal number"
            )));
        }

        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > usize::from(MAX_SCALE) {
            return Err(Error::ExcessiveValue);
        }

        let digits = format!("{integer}{fraction}");
        let mantissa = if digits.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(&digits, 10).map_err(|_| Error::ExcessiveValue)?
        };

        Ok(Self::canonical(mantissa, fraction.len() as u8))
    }
}

impl Display for DecimalAmount {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let (integer, fraction) = self.split_digits();
        if fraction.is_empty() {
            write!(formatter, "{integer}")
        } else {
            write!(formatter, "{integer}.{fraction}")
        }
    }
}

/// Serialized as its decimal text, so no precision is lost in JSON.
impl Serialize for DecimalAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl PartialOrd for DecimalAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        let lhs = self.mantissa.checked_mul(pow10(scale - self.scale));
        let rhs = other.mantissa.checked_mul(pow10(scale - other.scale));
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            // Only the side that was scaled up can overflow, and it is then the larger one.
            (None, _) => Ordering::Greater,
            (_, None) => Ordering::Less,
        }
    }
}

/// Convert a decimal amount into the token's fixed-point integer representation.
///
/// The text is split at the decimal point, the fractional part is right-padded with zeros (or
/// truncated) to exactly `decimals` digits, and both parts are concatenated into one base-10
/// integer. No floating point arithmetic is involved.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256> {
    let value = value.trim();
    let (integer, fraction) = value.split_once('.').unwrap_or((value, ""));

    if integer.is_empty() && fraction.is_empty() {
        return Err(Error::InvalidAmount(format!("no digits found in {value:?}")));
    }
    if !integer.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(Error::InvalidAmount(format!(
            "{value:?} is not a plain decimal number"
        )));
    }

    let decimals = usize::from(decimals);
    if fraction.len() > decimals {
        debug!("Truncating {value} to {decimals} fractional digits");
    }
    let mut padded: String = fraction.chars().take(decimals).collect();
    padded.push_str(&"0".repeat(decimals - padded.len()));

    let digits = format!("{integer}{padded}");
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(&digits, 10).map_err(|_| Error::ExcessiveValue)
}

/// Convert a raw fixed-point token amount into a decimal amount.
pub fn format_units(raw: U256, decimals: u8) -> Result<DecimalAmount> {
    DecimalAmount::from_units(raw, decimals)
}
