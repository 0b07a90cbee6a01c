use bytes::{Buf, BufMut, BytesMut};

use crate::command::{CommandHead, CommandKind, CommandOp, PinMode, PinPud, PwmConfig};
use crate::error::{ProtoError, Result};
use crate::reply::{ReplyHead, ReplyKind, ReplyPayload};

/// Command head: kind (4) + payload size (2) + pin (2) = 8 bytes.
pub const COMMAND_HEAD_SIZE: usize = 8;

/// Reply head: kind (4) + payload size (2) = 6 bytes.
pub const REPLY_HEAD_SIZE: usize = 6;

/// Encode a command frame (head + payload) into `dst`.
///
/// Wire format:
/// ```text
/// ┌────────────┬──────────────┬──────────┬──────────────────────┐
/// │ Kind       │ Payload size │ Pin      │ Payload              │
/// │ (4B LE)    │ (2B LE)      │ (2B LE)  │ (payload-size bytes) │
/// └────────────┴──────────────┴──────────┴──────────────────────┘
/// ```
pub fn encode_command(pin: u16, op: &CommandOp, dst: &mut BytesMut) {
    let payload_size = op.payload_size();
    dst.reserve(COMMAND_HEAD_SIZE + payload_size as usize);
    dst.put_u32_le(op.kind().to_wire());
    dst.put_u16_le(payload_size);
    dst.put_u16_le(pin);

    match op {
        CommandOp::SetPinMode(mode) => dst.put_u32_le(mode.to_wire()),
        CommandOp::SetPinPud(pud) => dst.put_u32_le(pud.to_wire()),
        CommandOp::DeinitPin | CommandOp::Read => {}
        CommandOp::Write(value) => dst.put_u32_le(*value),
        CommandOp::SetPwm(cfg) => {
            dst.put_u32_le(cfg.frequency);
            dst.put_u32_le(cfg.range);
            dst.put_u32_le(cfg.duty);
        }
    }
}

/// Decode a command head from exactly [`COMMAND_HEAD_SIZE`] bytes.
///
/// Never fails: an unrecognized kind value becomes [`CommandKind::Unknown`]
/// and the declared payload size is preserved so the caller can keep the
/// stream framed.
pub fn decode_command_head(buf: &[u8; COMMAND_HEAD_SIZE]) -> CommandHead {
    let mut buf = &buf[..];
    let kind = CommandKind::from_wire(buf.get_u32_le());
    let payload_size = buf.get_u16_le();
    let pin = buf.get_u16_le();
    CommandHead {
        kind,
        payload_size,
        pin,
    }
}

/// Decode the payload bytes of a command into a typed operation.
///
/// `payload` must be exactly the declared payload; a length that does not
/// match the size the kind requires is a deterministic error, as is an
/// out-of-range mode or bias value.
pub fn decode_command_op(kind: CommandKind, payload: &[u8]) -> Result<CommandOp> {
    match kind {
        CommandKind::SetPinMode => {
            let raw = expect_u32(payload, "SetPinMode")?;
            Ok(CommandOp::SetPinMode(PinMode::from_wire(raw)?))
        }
        CommandKind::SetPinPud => {
            let raw = expect_u32(payload, "SetPinPud")?;
            Ok(CommandOp::SetPinPud(PinPud::from_wire(raw)?))
        }
        CommandKind::DeinitPin => {
            expect_empty(payload, "DeinitPin")?;
            Ok(CommandOp::DeinitPin)
        }
        CommandKind::Read => {
            expect_empty(payload, "Read")?;
            Ok(CommandOp::Read)
        }
        CommandKind::Write => Ok(CommandOp::Write(expect_u32(payload, "Write")?)),
        CommandKind::SetPwm => {
            if payload.len() != 12 {
                return Err(ProtoError::PayloadSizeMismatch {
                    kind: "SetPwm",
                    got: payload.len(),
                    expected: 12,
                });
            }
            let mut buf = payload;
            Ok(CommandOp::SetPwm(PwmConfig {
                frequency: buf.get_u32_le(),
                range: buf.get_u32_le(),
                duty: buf.get_u32_le(),
            }))
        }
        CommandKind::Unknown(raw) => Err(ProtoError::UnknownCommandKind(raw)),
    }
}

/// Encode a reply frame (head + payload) into `dst`.
///
/// Wire format:
/// ```text
/// ┌────────────┬──────────────┬──────────────────────┐
/// │ Kind       │ Payload size │ Payload              │
/// │ (4B LE)    │ (2B LE)      │ (payload-size bytes) │
/// └────────────┴──────────────┴──────────────────────┘
/// ```
pub fn encode_reply(kind: ReplyKind, payload: &ReplyPayload, dst: &mut BytesMut) {
    let payload_size = payload.payload_size();
    dst.reserve(REPLY_HEAD_SIZE + payload_size as usize);
    dst.put_u32_le(kind.to_wire());
    dst.put_u16_le(payload_size);

    match payload {
        ReplyPayload::Status(status) => dst.put_i32_le(*status),
        ReplyPayload::ReadResult { status, level } => {
            dst.put_i32_le(*status);
            dst.put_u32_le(*level);
        }
        ReplyPayload::Empty => {}
    }
}

/// Decode a reply head from exactly [`REPLY_HEAD_SIZE`] bytes.
pub fn decode_reply_head(buf: &[u8; REPLY_HEAD_SIZE]) -> Result<ReplyHead> {
    let mut buf = &buf[..];
    let kind = ReplyKind::from_wire(buf.get_u32_le())?;
    let payload_size = buf.get_u16_le();
    Ok(ReplyHead { kind, payload_size })
}

/// Decode the payload bytes of a reply for the given kind.
pub fn decode_reply_payload(kind: ReplyKind, payload: &[u8]) -> Result<ReplyPayload> {
    match kind {
        ReplyKind::UndefinedCommand => {
            expect_empty(payload, "UndefinedCommand")?;
            Ok(ReplyPayload::Empty)
        }
        ReplyKind::Read => {
            if payload.len() != 8 {
                return Err(ProtoError::PayloadSizeMismatch {
                    kind: "Read reply",
                    got: payload.len(),
                    expected: 8,
                });
            }
            let mut buf = payload;
            Ok(ReplyPayload::ReadResult {
                status: buf.get_i32_le(),
                level: buf.get_u32_le(),
            })
        }
        _ => {
            if payload.len() != 4 {
                return Err(ProtoError::PayloadSizeMismatch {
                    kind: "status reply",
                    got: payload.len(),
                    expected: 4,
                });
            }
            let mut buf = payload;
            Ok(ReplyPayload::Status(buf.get_i32_le()))
        }
    }
}

fn expect_u32(payload: &[u8], kind: &'static str) -> Result<u32> {
    if payload.len() != 4 {
        return Err(ProtoError::PayloadSizeMismatch {
            kind,
            got: payload.len(),
            expected: 4,
        });
    }
    let mut buf = payload;
    Ok(buf.get_u32_le())
}

fn expect_empty(payload: &[u8], kind: &'static str) -> Result<()> {
    if !payload.is_empty() {
        return Err(ProtoError::PayloadSizeMismatch {
            kind,
            got: payload.len(),
            expected: 0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(pin: u16, op: CommandOp) -> (CommandHead, CommandOp) {
        let mut buf = BytesMut::new();
        encode_command(pin, &op, &mut buf);

        let head_bytes: [u8; COMMAND_HEAD_SIZE] = buf[..COMMAND_HEAD_SIZE].try_into().unwrap();
        let head = decode_command_head(&head_bytes);
        let payload = &buf[COMMAND_HEAD_SIZE..];
        assert_eq!(payload.len(), head.payload_size as usize);

        let decoded = decode_command_op(head.kind, payload).unwrap();
        (head, decoded)
    }

    #[test]
    fn command_roundtrip_all_kinds() {
        let ops = [
            CommandOp::SetPinMode(PinMode::OutputPushPull),
            CommandOp::SetPinPud(PinPud::PullDown),
            CommandOp::DeinitPin,
            CommandOp::Read,
            CommandOp::Write(1),
            CommandOp::SetPwm(PwmConfig {
                frequency: 1000,
                range: 256,
                duty: 128,
            }),
        ];

        for op in ops {
            let (head, decoded) = roundtrip(23, op);
            assert_eq!(head.pin, 23);
            assert_eq!(head.kind, op.kind());
            assert_eq!(decoded, op);
        }
    }

    #[test]
    fn command_head_wire_layout() {
        let mut buf = BytesMut::new();
        encode_command(0x0201, &CommandOp::Read, &mut buf);

        assert_eq!(buf.len(), COMMAND_HEAD_SIZE);
        // kind=4 LE, size=0 LE, pin=0x0201 LE
        assert_eq!(buf.as_ref(), &[4, 0, 0, 0, 0, 0, 0x01, 0x02]);
    }

    #[test]
    fn unknown_command_kind_is_preserved() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(999);
        buf.put_u16_le(0);
        buf.put_u16_le(7);

        let head_bytes: [u8; COMMAND_HEAD_SIZE] = buf[..].try_into().unwrap();
        let head = decode_command_head(&head_bytes);

        assert_eq!(head.kind, CommandKind::Unknown(999));
        assert_eq!(head.payload_size, 0);
        assert_eq!(head.pin, 7);
        assert!(matches!(
            decode_command_op(head.kind, &[]),
            Err(ProtoError::UnknownCommandKind(999))
        ));
    }

    #[test]
    fn payload_size_mismatch_is_rejected() {
        let err = decode_command_op(CommandKind::Write, &[1, 0]).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::PayloadSizeMismatch {
                got: 2,
                expected: 4,
                ..
            }
        ));

        let err = decode_command_op(CommandKind::Read, &[0]).unwrap_err();
        assert!(matches!(err, ProtoError::PayloadSizeMismatch { .. }));
    }

    #[test]
    fn out_of_range_mode_and_bias_are_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(42);
        assert!(matches!(
            decode_command_op(CommandKind::SetPinMode, buf.as_ref()),
            Err(ProtoError::InvalidPinMode(42))
        ));
        assert!(matches!(
            decode_command_op(CommandKind::SetPinPud, buf.as_ref()),
            Err(ProtoError::InvalidPinPud(42))
        ));
    }

    #[test]
    fn reply_status_roundtrip() {
        let mut buf = BytesMut::new();
        encode_reply(ReplyKind::SetPinMode, &ReplyPayload::Status(-19), &mut buf);

        let head_bytes: [u8; REPLY_HEAD_SIZE] = buf[..REPLY_HEAD_SIZE].try_into().unwrap();
        let head = decode_reply_head(&head_bytes).unwrap();
        assert_eq!(head.kind, ReplyKind::SetPinMode);
        assert_eq!(head.payload_size, 4);

        let payload = decode_reply_payload(head.kind, &buf[REPLY_HEAD_SIZE..]).unwrap();
        assert_eq!(payload, ReplyPayload::Status(-19));
    }

    #[test]
    fn reply_read_result_keeps_level_and_status_separate() {
        let mut buf = BytesMut::new();
        encode_reply(
            ReplyKind::Read,
            &ReplyPayload::ReadResult {
                status: 0,
                level: 0,
            },
            &mut buf,
        );

        let head_bytes: [u8; REPLY_HEAD_SIZE] = buf[..REPLY_HEAD_SIZE].try_into().unwrap();
        let head = decode_reply_head(&head_bytes).unwrap();
        assert_eq!(head.payload_size, 8);

        // A low level with success status decodes unambiguously.
        let payload = decode_reply_payload(head.kind, &buf[REPLY_HEAD_SIZE..]).unwrap();
        assert_eq!(
            payload,
            ReplyPayload::ReadResult {
                status: 0,
                level: 0
            }
        );
    }

    #[test]
    fn reply_undefined_command_is_empty() {
        let mut buf = BytesMut::new();
        encode_reply(ReplyKind::UndefinedCommand, &ReplyPayload::Empty, &mut buf);
        assert_eq!(buf.len(), REPLY_HEAD_SIZE);

        let head_bytes: [u8; REPLY_HEAD_SIZE] = buf[..].try_into().unwrap();
        let head = decode_reply_head(&head_bytes).unwrap();
        assert_eq!(head.kind, ReplyKind::UndefinedCommand);
        assert_eq!(head.payload_size, 0);
        assert_eq!(
            decode_reply_payload(head.kind, &[]).unwrap(),
            ReplyPayload::Empty
        );
    }

    #[test]
    fn unknown_reply_kind_is_an_error() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(2048);
        buf.put_u16_le(0);

        let head_bytes: [u8; REPLY_HEAD_SIZE] = buf[..].try_into().unwrap();
        assert!(matches!(
            decode_reply_head(&head_bytes),
            Err(ProtoError::UnknownReplyKind(2048))
        ));
    }
}
