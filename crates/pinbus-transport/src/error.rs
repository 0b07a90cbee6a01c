use std::path::PathBuf;

/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind to the specified socket path.
    #[error("failed to bind to {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to connect to the specified socket path.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// An I/O error occurred on the stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// The peer closed the connection.
    #[error("peer closed the connection")]
    PeerClosed,

    /// An exact-length transfer gave up after repeated transient failures.
    #[error("{op} gave up after {retries} transient would-block retries")]
    RetriesExhausted { op: &'static str, retries: u32 },
}

impl TransportError {
    /// Whether this error means the connection is dead and must be evicted.
    ///
    /// Everything except setup errors (bind/connect/path) is fatal to the
    /// individual connection it occurred on.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            TransportError::Io(_)
                | TransportError::PeerClosed
                | TransportError::RetriesExhausted { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
