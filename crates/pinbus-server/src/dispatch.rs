use std::io::{Read, Write};

use bytes::BytesMut;
use tracing::debug;

use pinbus_gpio::GpioBackend;
use pinbus_proto::{
    decode_command_head, decode_command_op, encode_reply, CommandKind, CommandOp, ReplyKind,
    ReplyPayload, COMMAND_HEAD_SIZE,
};
use pinbus_transport::{recv_exact, send_exact};

use crate::error::DispatchError;

/// Serve one command from a readable connection: read a full frame, run
/// the matching backend operation, send the framed reply.
///
/// The declared payload is always consumed, recognized kind or not, so the
/// stream never desynchronizes. Any error returned here means the
/// connection must be evicted. A backend failure is not an error; it
/// travels back to the client as a negative status in a normal reply.
pub(crate) fn serve_command<S: Read + Write>(
    stream: &mut S,
    backend: &mut dyn GpioBackend,
) -> Result<(), DispatchError> {
    let mut head_buf = [0u8; COMMAND_HEAD_SIZE];
    recv_exact(stream, &mut head_buf)?;
    let head = decode_command_head(&head_buf);

    let mut payload = vec![0u8; head.payload_size as usize];
    if !payload.is_empty() {
        recv_exact(stream, &mut payload)?;
    }

    let (kind, reply) = match head.kind {
        CommandKind::Unknown(raw) => {
            debug!(raw, pin = head.pin, "undefined command");
            (ReplyKind::UndefinedCommand, ReplyPayload::Empty)
        }
        kind => execute(head.pin, decode_command_op(kind, &payload)?, backend),
    };

    let mut buf = BytesMut::new();
    encode_reply(kind, &reply, &mut buf);
    send_exact(stream, &buf)?;
    Ok(())
}

fn execute(
    pin: u16,
    op: CommandOp,
    backend: &mut dyn GpioBackend,
) -> (ReplyKind, ReplyPayload) {
    match op {
        CommandOp::SetPinMode(mode) => {
            debug!(pin, ?mode, "set pin mode");
            (
                ReplyKind::SetPinMode,
                ReplyPayload::Status(backend.set_mode(pin, mode)),
            )
        }
        CommandOp::SetPinPud(pud) => {
            debug!(pin, ?pud, "set pull bias");
            (
                ReplyKind::SetPinPud,
                ReplyPayload::Status(backend.set_pud(pin, pud)),
            )
        }
        CommandOp::DeinitPin => {
            debug!(pin, "deinit pin");
            (
                ReplyKind::DeinitPin,
                ReplyPayload::Status(backend.deinit(pin)),
            )
        }
        CommandOp::Read => {
            let (level, status) = backend.read(pin);
            debug!(pin, level, status, "read pin");
            (
                ReplyKind::Read,
                ReplyPayload::ReadResult {
                    status,
                    level: level.into(),
                },
            )
        }
        CommandOp::Write(value) => {
            debug!(pin, value, "write pin");
            // Only the low byte of the wire value carries the logic level.
            (
                ReplyKind::Write,
                ReplyPayload::Status(backend.write(pin, (value & 0xFF) as u8)),
            )
        }
        CommandOp::SetPwm(cfg) => {
            debug!(
                pin,
                frequency = cfg.frequency,
                range = cfg.range,
                duty = cfg.duty,
                "set pwm"
            );
            (
                ReplyKind::SetPwm,
                ReplyPayload::Status(backend.set_pwm(pin, cfg.frequency, cfg.range, cfg.duty)),
            )
        }
    }
}
