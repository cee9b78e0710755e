//! Outbound email: message type, sender trait, and provider backends.
//!
//! The newsletter pipeline composes an [`Email`] and hands it to an
//! [`EmailSender`]. Two backends are provided:
//!
//! - [`BrevoBackend`]: the transactional-email HTTP API used in production
//! - [`ConsoleBackend`]: logs messages instead of sending them (development)
//!
//! Tests use the recording sender in [`crate::testing`].

mod backend;
mod error;
mod message;
mod sender;

pub use backend::brevo::BrevoBackend;
pub use backend::console::ConsoleBackend;
pub use error::EmailError;
pub use message::{Email, Mailbox};
pub use sender::{EmailSender, MessageId};
