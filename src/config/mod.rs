//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML) + .env + process environment
//!     → loader.rs (parse, deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc to the app context
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so the service runs from environment alone
//! - The private key never comes from a file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BlockchainConfig, InitMode, ListenerConfig, ObservabilityConfig, RuntimeConfig, ServiceConfig,
    SignerConfig, TimeoutConfig, TokenSettings,
};
