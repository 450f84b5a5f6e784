//! Typed HTTP client for the token transfer API.

pub mod client;

pub use client::{
    BalanceResponse, ClientError, ErrorResponse, EthTransfer, HealthResponse, TokenTransfer,
    TransferApiClient, TransferResponse,
};
