// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::amount::DecimalAmount;
use crate::common::U256;
use serde_json::Value;
use std::str::FromStr;

/// Precision of the native currency's smallest unit (wei).
pub const NATIVE_DECIMALS: u8 = 18;

/// How deep a structured value may nest its raw value.
const MAX_NESTING: usize = 1;

/// A balance exactly as an upstream source reported it.
#[derive(Clone, Debug, PartialEq)]
pub enum RawBalance {
    /// Decimal text such as `"42.10"`.
    Text(String),
    Number(f64),
    /// An integer count of the native currency's smallest unit.
    SmallestUnit(U256),
    /// A value carrying a pre-formatted decimal string and/or a raw value.
    Structured {
        formatted: Option<String>,
        value: Option<Box<RawBalance>>,
    },
    /// Null, booleans, arrays and other shapes no source should send.
    Unrecognised,
}

impl RawBalance {
    pub fn structured(formatted: Option<&str>, value: Option<RawBalance>) -> Self {
        RawBalance::Structured {
            formatted: formatted.map(str::to_string),
            value: value.map(Box::new),
        }
    }
}

impl From<Value> for RawBalance {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RawBalance::Text(text),
            Value::Number(number) => number
                .as_f64()
                .map(RawBalance::Number)
                .unwrap_or(RawBalance::Unrecognised),
            Value::Object(mut object) => {
                let formatted = match object.remove("formatted") {
                    Some(Value::String(formatted)) => Some(formatted),
                    _ => None,
                };
                let value = object
                    .remove("value")
                    .filter(|value| !value.is_null())
                    .map(|value| Box::new(RawBalance::from(value)));
                RawBalance::Structured { formatted, value }
            }
            Value::Null | Value::Bool(_) | Value::Array(_) => RawBalance::Unrecognised,
        }
    }
}

/// Converge any raw shape to a decimal amount, or `None` when the value is malformed.
pub fn try_normalize(raw: &RawBalance) -> Option<DecimalAmount> {
    normalize_nested(raw, 0)
}

/// Like [`try_normalize`], but malformed values become zero instead of an error.
pub fn normalize(raw: &RawBalance) -> DecimalAmount {
    try_normalize(raw).unwrap_or_else(|| {
        debug!("Treating unparsable balance {raw:?} as zero");
        DecimalAmount::zero()
    })
}

fn normalize_nested(raw: &RawBalance, depth: usize) -> Option<DecimalAmount> {
    match raw {
        RawBalance::Text(text) => parse_text(text),
        RawBalance::Number(number) => DecimalAmount::from_f64(*number),
        RawBalance::SmallestUnit(wei) => DecimalAmount::from_units(*wei, NATIVE_DECIMALS).ok(),
        RawBalance::Structured { formatted, value } => {
            // A pre-formatted string wins; the raw value is not consulted.
            if let Some(formatted) = formatted.as_deref().filter(|f| !f.trim().is_empty()) {
                return parse_text(formatted);
            }
            if depth >= MAX_NESTING {
                return None;
            }
            value
                .as_deref()
                .and_then(|value| normalize_nested(value, depth + 1))
        }
        RawBalance::Unrecognised => None,
    }
}

/// Plain decimals are parsed exactly; anything else a float parser accepts (e.g. `1e3`) goes
/// through its float value.
fn parse_text(text: &str) -> Option<DecimalAmount> {
    DecimalAmount::from_str(text).ok().or_else(|| {
        text.trim()
            .parse::<f64>()
            .ok()
            .and_then(DecimalAmount::from_f64)
    })
}
