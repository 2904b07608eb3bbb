//! Infrastructure Layer
//!
//! Cross-cutting concerns: outbound HTTP client and shutdown coordination.

pub mod http_client;
pub mod shutdown;

pub use http_client::{build_http_client, USER_AGENT};
pub use shutdown::{shutdown_signal, ShutdownController};
