//! Errors surfaced at the HTTP boundary.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::transfer::types::Amount;

/// Every failure a request can end in. Each one is terminal for the request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed signing key / chain settings.
    #[error("service is not configured: {0}")]
    Configuration(String),

    /// Bad client input.
    #[error("{0}")]
    Validation(String),

    /// Sender holds fewer tokens than requested. Nothing was sent.
    #[error("insufficient balance")]
    InsufficientBalance { available: f64, requested: Amount },

    /// Read-only chain access failed.
    #[error("failed to fetch token balance")]
    Rpc(#[source] BlockchainError),

    /// Building, broadcasting or mining a transfer failed.
    ///
    /// `token_tx` is set when the token leg was already mined.
    #[error("failed to send token transaction")]
    Transaction {
        #[source]
        source: BlockchainError,
        token_tx: Option<TxHash>,
    },
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transaction(source: BlockchainError) -> Self {
        Self::Transaction {
            source,
            token_tx: None,
        }
    }

    /// Underlying message reported in the `details` field.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Configuration(message) => Some(message.clone()),
            Self::Rpc(source) | Self::Transaction { source, .. } => Some(source.to_string()),
            Self::Validation(_) | Self::InsufficientBalance { .. } => None,
        }
    }

    /// Whether the client is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InsufficientBalance { .. })
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
