//! Read-only token balance lookup.

use alloy::primitives::Address;

use crate::context::ChainContext;
use crate::error::{ServiceError, ServiceResult};
use crate::transfer::types::BalanceReport;
use crate::transfer::validation::{from_base_units, parse_address};

/// Validated balance lookup. The address is echoed back as the client wrote it.
#[derive(Debug, Clone)]
pub struct BalanceQuery {
    pub owner: Address,
    pub requested: String,
}

impl BalanceQuery {
    pub fn parse(address: &str) -> ServiceResult<Self> {
        let owner = parse_address(address)
            .ok_or_else(|| ServiceError::validation("invalid Ethereum address"))?;
        Ok(Self {
            owner,
            requested: address.to_string(),
        })
    }

    /// Token balance of the owner, in raw and display units.
    pub async fn execute(self, chain: &ChainContext) -> ServiceResult<BalanceReport> {
        let raw = chain
            .token
            .balance_of(chain.rpc.as_ref(), self.owner)
            .await
            .map_err(ServiceError::Rpc)?;

        tracing::debug!(address = %self.owner, raw_balance = %raw, "Balance fetched");

        Ok(BalanceReport {
            address: self.requested,
            balance: from_base_units(raw, chain.token.decimals),
            raw_balance: raw.to_string(),
            decimals: chain.token.decimals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_bad_address() {
        let err = BalanceQuery::parse("0x1234").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_parse_keeps_client_spelling() {
        let query = BalanceQuery::parse("0x742d35cc6634c0532925a3b8d44268d9c8c16c99").unwrap();
        assert_eq!(query.requested, "0x742d35cc6634c0532925a3b8d44268d9c8c16c99");
    }
}
