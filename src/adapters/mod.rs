//! Adapters
//!
//! Inbound: the axum HTTP surface. Outbound: upstream API clients and the
//! in-memory location cache.

pub mod inbound;
pub mod outbound;
