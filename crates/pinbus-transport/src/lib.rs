//! Unix domain socket transport for the pinbus GPIO daemon.
//!
//! Provides the listening socket ([`UnixDomainSocket`]), the connected
//! stream type ([`PinStream`]), and the exact-length transfer primitives
//! ([`send_exact`]/[`recv_exact`]) every protocol exchange is built on.
//!
//! No partial transfers ever reach callers: an exchange either moves the
//! requested byte count or fails with an error that marks the connection
//! dead.

pub mod error;
pub mod exact;

#[cfg(unix)]
pub mod stream;
#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use exact::{recv_exact, send_exact, MAX_TRANSIENT_RETRIES};

#[cfg(unix)]
pub use stream::PinStream;
#[cfg(unix)]
pub use uds::UnixDomainSocket;
