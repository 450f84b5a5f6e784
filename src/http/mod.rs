//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (middleware stack, routing)
//!     → request.rs (request ID assigned and propagated)
//!     → handlers.rs (extract input, call transfer/balance, shape JSON)
//!     → response.rs (ServiceError → status code + JSON error body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ErrorBody;
pub use server::HttpServer;
