use std::path::PathBuf;
use std::time::Duration;

/// Well-known socket path clients connect to by default.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/pinbus.sock";

/// Runtime configuration of the daemon.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the listening socket.
    pub socket_path: PathBuf,
    /// Maximum number of concurrently connected clients.
    pub max_clients: usize,
    /// Permission mode of the socket file. This is the trust boundary:
    /// the default admits every local user.
    pub socket_mode: u32,
    /// Per-stream read/write timeout bounding each exchange.
    pub io_timeout: Duration,
    /// Readiness-wait timeout; the loop observes the shutdown flag at
    /// this granularity.
    pub poll_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            max_clients: 16,
            socket_mode: 0o666,
            io_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(500),
        }
    }
}
