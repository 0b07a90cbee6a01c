use std::path::Path;
use std::time::Duration;

use bytes::BytesMut;
use tracing::debug;

use pinbus_proto::{
    decode_reply_head, decode_reply_payload, encode_command, CommandOp, PinMode, PinPud,
    PwmConfig, ReplyKind, ReplyPayload, REPLY_HEAD_SIZE,
};
use pinbus_transport::{recv_exact, send_exact, PinStream, UnixDomainSocket};

use crate::error::{ClientError, Result};

/// Default per-exchange I/O timeout.
const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A connection to the pinbus daemon.
///
/// Every method performs one framed request-reply exchange and returns the
/// backend's status (plus the level, for [`PinClient::read`]). A negative
/// status is a hardware-level rejection, not an error on the connection.
pub struct PinClient {
    stream: PinStream,
}

impl PinClient {
    /// Connect to the daemon socket with the default I/O timeout.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        Self::connect_with_timeout(path, Some(DEFAULT_IO_TIMEOUT))
    }

    /// Connect with an explicit per-exchange timeout (`None` = wait forever).
    pub fn connect_with_timeout(
        path: impl AsRef<Path>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let stream = UnixDomainSocket::connect(path)?;
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
        Ok(Self { stream })
    }

    /// Configure the electrical mode of `pin`.
    pub fn set_mode(&mut self, pin: u16, mode: PinMode) -> Result<i32> {
        self.status_request(pin, CommandOp::SetPinMode(mode), ReplyKind::SetPinMode)
    }

    /// Configure the idle-state bias resistor of `pin`.
    pub fn set_pud(&mut self, pin: u16, pud: PinPud) -> Result<i32> {
        self.status_request(pin, CommandOp::SetPinPud(pud), ReplyKind::SetPinPud)
    }

    /// Return `pin` to its power-on state.
    pub fn deinit(&mut self, pin: u16) -> Result<i32> {
        self.status_request(pin, CommandOp::DeinitPin, ReplyKind::DeinitPin)
    }

    /// Read the logic level of `pin`. Returns `(level, status)`; the level
    /// is only meaningful when the status is zero.
    pub fn read(&mut self, pin: u16) -> Result<(u8, i32)> {
        let (kind, payload) = self.request(pin, CommandOp::Read, ReplyKind::Read)?;
        match payload {
            ReplyPayload::ReadResult { status, level } => Ok(((level & 0xFF) as u8, status)),
            ReplyPayload::Status(_) | ReplyPayload::Empty => Err(ClientError::UnexpectedReply {
                expected: ReplyKind::Read,
                got: kind,
            }),
        }
    }

    /// Drive `pin` to the given logic level (nonzero = high).
    pub fn write(&mut self, pin: u16, level: u8) -> Result<i32> {
        self.status_request(pin, CommandOp::Write(level.into()), ReplyKind::Write)
    }

    /// Configure PWM output on `pin`.
    pub fn set_pwm(&mut self, pin: u16, cfg: PwmConfig) -> Result<i32> {
        self.status_request(pin, CommandOp::SetPwm(cfg), ReplyKind::SetPwm)
    }

    fn status_request(&mut self, pin: u16, op: CommandOp, expected: ReplyKind) -> Result<i32> {
        let (kind, payload) = self.request(pin, op, expected)?;
        match payload {
            ReplyPayload::Status(status) => Ok(status),
            ReplyPayload::ReadResult { .. } | ReplyPayload::Empty => {
                Err(ClientError::UnexpectedReply {
                    expected,
                    got: kind,
                })
            }
        }
    }

    fn request(
        &mut self,
        pin: u16,
        op: CommandOp,
        expected: ReplyKind,
    ) -> Result<(ReplyKind, ReplyPayload)> {
        let mut buf = BytesMut::new();
        encode_command(pin, &op, &mut buf);
        send_exact(&mut self.stream, &buf)?;

        let mut head_buf = [0u8; REPLY_HEAD_SIZE];
        recv_exact(&mut self.stream, &mut head_buf)?;
        let head = decode_reply_head(&head_buf)?;

        let mut payload = vec![0u8; head.payload_size as usize];
        if !payload.is_empty() {
            recv_exact(&mut self.stream, &mut payload)?;
        }
        let payload = decode_reply_payload(head.kind, &payload)?;

        debug!(pin, kind = ?head.kind, "reply received");

        if head.kind == ReplyKind::UndefinedCommand {
            return Err(ClientError::UndefinedCommand);
        }
        if head.kind != expected {
            return Err(ClientError::UnexpectedReply {
                expected,
                got: head.kind,
            });
        }
        Ok((head.kind, payload))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::thread;

    use pinbus_proto::{
        decode_command_head, decode_command_op, encode_reply, CommandKind, COMMAND_HEAD_SIZE,
    };

    use super::*;

    fn make_sock_path(tag: &str) -> PathBuf {
        let dir = PathBuf::from(format!(
            "/tmp/pinbus-client-{}-{}-{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir.join("daemon.sock")
    }

    /// Accept one connection, read one command, send the given reply.
    fn one_shot_responder(
        sock_path: &Path,
        reply_kind: ReplyKind,
        reply_payload: ReplyPayload,
    ) -> thread::JoinHandle<(CommandHeadCheck, CommandOp)> {
        let listener = UnixDomainSocket::bind(sock_path).expect("responder should bind");
        thread::spawn(move || {
            let mut stream = listener.accept().expect("responder should accept");

            let mut head_buf = [0u8; COMMAND_HEAD_SIZE];
            recv_exact(&mut stream, &mut head_buf).expect("head should arrive");
            let head = decode_command_head(&head_buf);
            let mut payload = vec![0u8; head.payload_size as usize];
            if !payload.is_empty() {
                recv_exact(&mut stream, &mut payload).expect("payload should arrive");
            }
            let op = decode_command_op(head.kind, &payload).expect("command should decode");

            let mut buf = BytesMut::new();
            encode_reply(reply_kind, &reply_payload, &mut buf);
            send_exact(&mut stream, &buf).expect("reply should send");

            (
                CommandHeadCheck {
                    kind: head.kind,
                    pin: head.pin,
                },
                op,
            )
        })
    }

    struct CommandHeadCheck {
        kind: CommandKind,
        pin: u16,
    }

    #[test]
    fn write_sends_command_and_returns_status() {
        let sock_path = make_sock_path("write");
        let responder = one_shot_responder(&sock_path, ReplyKind::Write, ReplyPayload::Status(0));

        let mut client = PinClient::connect(&sock_path).expect("client should connect");
        let status = client.write(23, 1).expect("write should succeed");
        assert_eq!(status, 0);

        let (head, op) = responder.join().expect("responder should finish");
        assert_eq!(head.kind, CommandKind::Write);
        assert_eq!(head.pin, 23);
        assert_eq!(op, CommandOp::Write(1));

        if let Some(parent) = sock_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn read_returns_level_and_status_separately() {
        let sock_path = make_sock_path("read");
        let responder = one_shot_responder(
            &sock_path,
            ReplyKind::Read,
            ReplyPayload::ReadResult {
                status: 0,
                level: 1,
            },
        );

        let mut client = PinClient::connect(&sock_path).expect("client should connect");
        let (level, status) = client.read(4).expect("read should succeed");
        assert_eq!((level, status), (1, 0));

        responder.join().expect("responder should finish");
        if let Some(parent) = sock_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn negative_status_is_returned_not_an_error() {
        let sock_path = make_sock_path("status");
        let responder =
            one_shot_responder(&sock_path, ReplyKind::SetPwm, ReplyPayload::Status(-22));

        let mut client = PinClient::connect(&sock_path).expect("client should connect");
        let status = client
            .set_pwm(
                18,
                PwmConfig {
                    frequency: 1000,
                    range: 0,
                    duty: 0,
                },
            )
            .expect("exchange should succeed");
        assert_eq!(status, -22);

        responder.join().expect("responder should finish");
        if let Some(parent) = sock_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn undefined_command_reply_is_a_typed_error() {
        let sock_path = make_sock_path("undefined");
        let responder =
            one_shot_responder(&sock_path, ReplyKind::UndefinedCommand, ReplyPayload::Empty);

        let mut client = PinClient::connect(&sock_path).expect("client should connect");
        let err = client.write(23, 1).unwrap_err();
        assert!(matches!(err, ClientError::UndefinedCommand));

        responder.join().expect("responder should finish");
        if let Some(parent) = sock_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn mismatched_reply_kind_is_rejected() {
        let sock_path = make_sock_path("mismatch");
        let responder =
            one_shot_responder(&sock_path, ReplyKind::SetPinPud, ReplyPayload::Status(0));

        let mut client = PinClient::connect(&sock_path).expect("client should connect");
        let err = client.write(23, 1).unwrap_err();
        assert!(matches!(
            err,
            ClientError::UnexpectedReply {
                expected: ReplyKind::Write,
                got: ReplyKind::SetPinPud,
            }
        ));

        responder.join().expect("responder should finish");
        if let Some(parent) = sock_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn server_gone_surfaces_as_transport_error() {
        let sock_path = make_sock_path("gone");
        let listener = UnixDomainSocket::bind(&sock_path).expect("listener should bind");

        let mut client = PinClient::connect(&sock_path).expect("client should connect");
        let stream = listener.accept().expect("listener should accept");
        drop(stream);
        drop(listener);

        let err = client.write(23, 1).unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));

        if let Some(parent) = sock_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }
}
