//! Signed status codes returned by backend operations.
//!
//! Zero is success; failures are negative errno-style codes carried verbatim
//! in reply payloads so clients can distinguish failure causes.

/// Operation succeeded.
pub const OK: i32 = 0;

/// The pin is not part of the backend's supported set (`-ENODEV`).
pub const NO_SUCH_DEVICE: i32 = -19;

/// An argument is out of range (`-EINVAL`).
pub const INVALID_ARGUMENT: i32 = -22;

/// The requested mode or feature is not supported on this pin (`-ENOTSUP`).
pub const NOT_SUPPORTED: i32 = -95;
