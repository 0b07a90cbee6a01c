//! Wire protocol for the pinbus GPIO daemon.
//!
//! Pure data-shape logic: command/reply kinds, frame heads, typed payload
//! variants, and encode/decode functions. No I/O happens here; the server
//! and client layer exact socket transfers on top of these functions.
//!
//! All integer fields are little-endian on the wire, both directions.

pub mod codec;
pub mod command;
pub mod error;
pub mod reply;

pub use codec::{
    decode_command_head, decode_command_op, decode_reply_head, decode_reply_payload,
    encode_command, encode_reply, COMMAND_HEAD_SIZE, REPLY_HEAD_SIZE,
};
pub use command::{CommandHead, CommandKind, CommandOp, PinMode, PinPud, PwmConfig};
pub use error::{ProtoError, Result};
pub use reply::{ReplyHead, ReplyKind, ReplyPayload};
