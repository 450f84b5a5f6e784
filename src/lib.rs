//! Token Transfer API
//!
//! HTTP service that reports ERC-20 balances and sends token transfers, each
//! followed by a small native-currency transfer to the same recipient.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (middleware, handlers)
//!                        │
//!                        ▼
//!                     transfer (validation, balance query, transfer pipeline)
//!                        │
//!                        ▼
//!                     context (memoized signer + chain bootstrap)
//!                        │
//!                        ▼
//!                     blockchain (ChainRpc, wallet, token ABI, nonces, receipts)
//!                        │
//!                        ▼
//!                     RPC node
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```

// Core subsystems
pub mod blockchain;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod transfer;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use context::AppContext;
pub use error::ServiceError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
