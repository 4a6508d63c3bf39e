//! Florascope HTTP gateway.
//!
//! Accepts a photo upload on `POST /api` and answers with the provider's raw
//! text and the record interpreted from it.

pub mod error;
pub mod health_api;
pub mod identify;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
