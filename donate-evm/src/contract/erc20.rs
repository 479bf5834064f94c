// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::{Address, Amount};
use crate::session::ContractCall;
use alloy::sol;
use alloy::sol_types::SolCall;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
);

/// Build the standard `transfer(address,uint256)` call moving `amount` raw units of `token`.
pub fn transfer_call(token: Address, recipient: Address, amount: Amount) -> ContractCall {
    let call = IERC20::transferCall {
        to: recipient,
        amount,
    };
    ContractCall {
        to: token,
        function: IERC20::transferCall::SIGNATURE.to_string(),
        calldata: call.abi_encode().into(),
    }
}
