use pinbus_proto::{ProtoError, ReplyKind};
use pinbus_transport::TransportError;

/// Errors that can occur on the client side of an exchange.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connecting to or talking over the socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server's reply could not be decoded.
    #[error(transparent)]
    Proto(#[from] ProtoError),

    /// The server did not recognize the command kind.
    #[error("server replied undefined-command")]
    UndefinedCommand,

    /// The reply kind does not match the command that was sent.
    #[error("unexpected reply kind: expected {expected:?}, got {got:?}")]
    UnexpectedReply { expected: ReplyKind, got: ReplyKind },
}

pub type Result<T> = std::result::Result<T, ClientError>;
