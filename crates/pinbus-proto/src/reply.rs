use crate::error::{ProtoError, Result};

/// Reply kind tag carried in the reply head.
///
/// Each command kind has a mirrored reply kind; `UndefinedCommand` is the
/// terminal tag for commands the server does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    SetPinMode,
    SetPinPud,
    DeinitPin,
    Read,
    Write,
    SetPwm,
    UndefinedCommand,
}

impl ReplyKind {
    pub fn from_wire(raw: u32) -> Result<Self> {
        match raw {
            1024 => Ok(ReplyKind::SetPinMode),
            1025 => Ok(ReplyKind::SetPinPud),
            1026 => Ok(ReplyKind::DeinitPin),
            1027 => Ok(ReplyKind::Read),
            1028 => Ok(ReplyKind::Write),
            1029 => Ok(ReplyKind::SetPwm),
            1030 => Ok(ReplyKind::UndefinedCommand),
            other => Err(ProtoError::UnknownReplyKind(other)),
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            ReplyKind::SetPinMode => 1024,
            ReplyKind::SetPinPud => 1025,
            ReplyKind::DeinitPin => 1026,
            ReplyKind::Read => 1027,
            ReplyKind::Write => 1028,
            ReplyKind::SetPwm => 1029,
            ReplyKind::UndefinedCommand => 1030,
        }
    }
}

/// Reply payload variants.
///
/// `Read` carries the logic level separately from the status so an I/O error
/// can never be confused with a low read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPayload {
    Status(i32),
    ReadResult { status: i32, level: u32 },
    Empty,
}

impl ReplyPayload {
    /// Exact encoded payload size for this variant.
    pub fn payload_size(&self) -> u16 {
        match self {
            ReplyPayload::Status(_) => 4,
            ReplyPayload::ReadResult { .. } => 8,
            ReplyPayload::Empty => 0,
        }
    }
}

/// Fixed-size reply head preceding every reply payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHead {
    pub kind: ReplyKind,
    pub payload_size: u16,
}
