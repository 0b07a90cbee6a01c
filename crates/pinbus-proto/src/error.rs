/// Errors that can occur during protocol encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The declared payload size does not match the size the command kind requires.
    #[error("payload size mismatch for {kind}: got {got} bytes, expected {expected}")]
    PayloadSizeMismatch {
        kind: &'static str,
        got: usize,
        expected: usize,
    },

    /// The pin mode value is not one of the defined modes.
    #[error("invalid pin mode value {0}")]
    InvalidPinMode(u32),

    /// The pull bias value is not one of the defined biases.
    #[error("invalid pull bias value {0}")]
    InvalidPinPud(u32),

    /// The reply kind value is not recognized.
    #[error("unknown reply kind {0}")]
    UnknownReplyKind(u32),

    /// A payload cannot be decoded for an unrecognized command kind.
    #[error("cannot decode payload for unknown command kind {0}")]
    UnknownCommandKind(u32),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
