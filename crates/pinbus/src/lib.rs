//! Local GPIO control daemon over a Unix domain socket.
//!
//! One server process owns the pins; unprivileged clients drive them
//! through a small binary command protocol. Trust is the filesystem ACL on
//! the socket path; there is no further authentication.
//!
//! # Crate Structure
//!
//! - [`transport`] — Unix domain socket transport and exact-length I/O
//! - [`proto`] — wire protocol codec (command/reply frames)
//! - [`gpio`] — hardware capability interface and simulated backend
//! - [`server`] — connection multiplexer and command dispatcher
//! - [`client`] — typed blocking client

/// Re-export transport types.
pub mod transport {
    pub use pinbus_transport::*;
}

/// Re-export protocol types.
pub mod proto {
    pub use pinbus_proto::*;
}

/// Re-export the capability interface and backends.
pub mod gpio {
    pub use pinbus_gpio::*;
}

/// Re-export the daemon core.
pub mod server {
    pub use pinbus_server::*;
}

/// Re-export the client.
pub mod client {
    pub use pinbus_client::*;
}
