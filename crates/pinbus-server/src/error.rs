use pinbus_proto::ProtoError;
use pinbus_transport::TransportError;

/// Errors fatal to the whole server.
///
/// Per-connection failures never appear here; they cost the offending
/// connection its table slot and nothing else.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Setting up or accepting on the listening socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The readiness wait itself failed; the server cannot continue.
    #[error("readiness wait failed: {0}")]
    Poll(nix::errno::Errno),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Failure during one request-reply exchange; always resolved by evicting
/// the connection it occurred on.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DispatchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Proto(#[from] ProtoError),
}
