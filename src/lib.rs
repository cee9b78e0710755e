//! quotefeed: newsletter delivery for a personal quote collection
//!
//! The service resolves newsletter recipients from a profile store, selects a
//! bounded set of quotes per recipient through a fallback chain, composes a
//! fixed HTML email, delivers it through a transactional-email HTTP API, and
//! writes one audit log row per delivery attempt. Aggregate counts are
//! returned to the HTTP caller that triggered the batch.
//!
//! # Architecture
//!
//! - [`routes`] - HTTP trigger endpoints (batch send, welcome email, health)
//! - [`newsletter`] - the selection/composition/delivery pipeline
//! - [`store`] - narrow async traits over the relational store, plus the
//!   Postgres implementation
//! - [`email`] - email message type, sender trait, and provider backends
//!
//! Delivery is triggered externally (one HTTP request per invocation); the
//! service never schedules sends on its own and performs no work at startup
//! beyond binding the listener.

pub mod config;
pub mod email;
pub mod error;
pub mod health;
pub mod newsletter;
pub mod routes;
pub mod state;
pub mod store;

// In-memory stores and a recording email sender, shared by unit and
// integration tests.
pub mod testing;
