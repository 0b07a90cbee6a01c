use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, TransportError};

/// Upper bound on consecutive would-block retries inside an exact transfer.
///
/// On a blocking socket with a read/write timeout each retry re-arms the
/// timeout, so this constant bounds the worst-case stall of one transfer to
/// `MAX_TRANSIENT_RETRIES * timeout` instead of spinning forever.
pub const MAX_TRANSIENT_RETRIES: u32 = 4;

/// Write all of `buf` to `dst` or fail.
///
/// Never returns with a partial transfer: `Interrupted` is always retried,
/// `WouldBlock`/`TimedOut` up to [`MAX_TRANSIENT_RETRIES`] times, and any
/// other error (including the peer closing) surfaces as a transport error
/// the caller treats as connection-dead.
pub fn send_exact<W: Write>(dst: &mut W, buf: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    let mut transient = 0u32;

    while offset < buf.len() {
        match dst.write(&buf[offset..]) {
            Ok(0) => return Err(TransportError::PeerClosed),
            Ok(n) => {
                offset += n;
                transient = 0;
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err)
                if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut =>
            {
                transient += 1;
                if transient > MAX_TRANSIENT_RETRIES {
                    return Err(TransportError::RetriesExhausted {
                        op: "send",
                        retries: MAX_TRANSIENT_RETRIES,
                    });
                }
            }
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    loop {
        match dst.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
}

/// Fill all of `buf` from `src` or fail.
///
/// Same retry policy as [`send_exact`]; a zero-length read is a graceful
/// close and surfaces as [`TransportError::PeerClosed`].
pub fn recv_exact<R: Read>(src: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut offset = 0usize;
    let mut transient = 0u32;

    while offset < buf.len() {
        match src.read(&mut buf[offset..]) {
            Ok(0) => return Err(TransportError::PeerClosed),
            Ok(n) => {
                offset += n;
                transient = 0;
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err)
                if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut =>
            {
                transient += 1;
                if transient > MAX_TRANSIENT_RETRIES {
                    return Err(TransportError::RetriesExhausted {
                        op: "recv",
                        retries: MAX_TRANSIENT_RETRIES,
                    });
                }
            }
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    Ok(())
}
