//! Typed client for the pinbus GPIO daemon.
//!
//! One blocking request-reply exchange per call; replies arrive in command
//! order on a connection, so no correlation ids are needed.

pub mod client;
pub mod error;

pub use client::PinClient;
pub use error::{ClientError, Result};
