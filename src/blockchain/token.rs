//! ERC-20 token contract binding.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// The two ERC-20 functions the service uses.
    interface ITransferToken {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Token contract handle: address plus the trusted decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenContract {
    pub address: Address,
    pub decimals: u8,
}

impl TokenContract {
    pub fn new(address: Address, decimals: u8) -> Self {
        Self { address, decimals }
    }

    /// ABI-encoded `transfer(to, amount)` call data.
    pub fn transfer_calldata(&self, to: Address, amount: U256) -> Bytes {
        Bytes::from(ITransferToken::transferCall { to, amount }.abi_encode())
    }

    /// Raw `balanceOf(owner)` via `eth_call`.
    pub async fn balance_of(&self, rpc: &dyn ChainRpc, owner: Address) -> BlockchainResult<U256> {
        let call = ITransferToken::balanceOfCall { account: owner };
        let request = TransactionRequest::default()
            .with_to(self.address)
            .with_input(call.abi_encode());

        let result = rpc.call(request).await?;

        ITransferToken::balanceOfCall::abi_decode_returns(&result)
            .map_err(|e| BlockchainError::Decode(format!("balanceOf: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_transfer_calldata_layout() {
        let token = TokenContract::new(address!("69eFD833288605f320d77eB2aB99DDE62919BbC1"), 2);
        let to = address!("742d35Cc6634C0532925a3b8D44268D9c8c16c99");
        let data = token.transfer_calldata(to, U256::from(100u64));

        // selector + two 32-byte words
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(&data[16..36], to.as_slice());
        assert_eq!(data[67], 100);

        let decoded = ITransferToken::transferCall::abi_decode(&data).unwrap();
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.amount, U256::from(100u64));
    }

    #[test]
    fn test_balance_of_selector() {
        assert_eq!(ITransferToken::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
    }
}
