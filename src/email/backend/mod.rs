//! Email backend implementations.
//!
//! - **brevo**: transactional-email HTTP API (production)
//! - **console**: log-only backend (development)

pub mod brevo;
pub mod console;
