//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, pipeline, RPC client produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (pretty locally, JSON in production)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! Request IDs are attached by the HTTP layer and show up in every span.

pub mod logging;
pub mod metrics;
