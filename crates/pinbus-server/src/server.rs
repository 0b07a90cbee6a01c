use std::os::fd::AsFd;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::{debug, info, warn};

use pinbus_gpio::GpioBackend;
use pinbus_transport::{PinStream, TransportError, UnixDomainSocket};

use crate::config::ServerConfig;
use crate::dispatch::serve_command;
use crate::error::{DispatchError, Result, ServerError};
use crate::table::ConnectionTable;

/// The daemon: listening socket, connection table, hardware backend, one
/// event loop.
///
/// Slot state machine: `Empty → Connected → (Readable → Dispatching →
/// Connected) | Closed`; a closed slot returns to empty and may be reused
/// by a later accept.
pub struct Server {
    socket: UnixDomainSocket,
    table: ConnectionTable<PinStream>,
    backend: Box<dyn GpioBackend>,
    config: ServerConfig,
    shutdown: Arc<AtomicBool>,
}

/// Cloneable handle that asks a running [`Server`] to stop.
///
/// The loop observes the flag on its next readiness tick, finishes the
/// in-flight dispatch, and returns from [`Server::run`].
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<AtomicBool>,
}

impl ServerHandle {
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl Server {
    /// Bind the listening socket and assemble the server around `backend`.
    ///
    /// A bind failure is fatal: the server cannot exist without its socket.
    pub fn bind(config: ServerConfig, backend: Box<dyn GpioBackend>) -> Result<Self> {
        let socket = UnixDomainSocket::bind_with_mode(&config.socket_path, config.socket_mode)?;
        let table = ConnectionTable::new(config.max_clients);
        Ok(Self {
            socket,
            table,
            backend,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    /// The path the server is listening on.
    pub fn path(&self) -> &Path {
        self.socket.path()
    }

    /// Run the event loop until a [`ServerHandle`] asks it to stop.
    ///
    /// Only a failure of the readiness wait itself ends the loop with an
    /// error; everything a client can cause is absorbed by evicting that
    /// client's connection.
    pub fn run(&mut self) -> Result<()> {
        info!(
            path = ?self.socket.path(),
            max_clients = self.config.max_clients,
            "pinbus server running"
        );

        while !self.shutdown.load(Ordering::SeqCst) {
            let Some((listener_ready, ready)) = self.poll_ready()? else {
                continue;
            };

            if listener_ready {
                self.accept_one();
            }

            for (idx, revents) in ready {
                if revents.intersects(PollFlags::POLLIN) {
                    self.serve_slot(idx);
                }
                if revents.intersects(error_mask()) {
                    if self.table.evict(idx).is_some() {
                        debug!(slot = idx, "peer hangup; slot freed");
                    }
                }
            }
        }

        info!("shutdown requested; stopping");
        Ok(())
    }

    /// The single suspension point: wait for readiness on the listener and
    /// every occupied slot.
    ///
    /// Returns `None` on a timeout tick or `EINTR`, so the caller re-checks
    /// the shutdown flag; any other poll failure is fatal.
    fn poll_ready(&self) -> Result<Option<(bool, Vec<(usize, PollFlags)>)>> {
        let mut pollfds = Vec::with_capacity(1 + self.config.max_clients);
        pollfds.push(PollFd::new(
            self.socket.listener().as_fd(),
            PollFlags::POLLIN,
        ));

        let mut slot_indices = Vec::with_capacity(self.config.max_clients);
        for (idx, stream) in self.table.occupied() {
            pollfds.push(PollFd::new(stream.as_fd(), client_interest()));
            slot_indices.push(idx);
        }

        match poll(&mut pollfds, poll_timeout(self.config.poll_interval)) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            Err(Errno::EINTR) => return Ok(None),
            Err(err) => return Err(ServerError::Poll(err)),
        }

        let listener_ready = pollfds[0]
            .revents()
            .unwrap_or(PollFlags::empty())
            .intersects(PollFlags::POLLIN);

        let ready = pollfds[1..]
            .iter()
            .zip(slot_indices)
            .filter_map(|(pollfd, idx)| {
                let revents = pollfd.revents().unwrap_or(PollFlags::empty());
                (!revents.is_empty()).then_some((idx, revents))
            })
            .collect();

        Ok(Some((listener_ready, ready)))
    }

    /// Accept exactly one pending connection per listener-readiness
    /// notification.
    ///
    /// A full table rejects deterministically: the connection is accepted
    /// at the socket layer and dropped immediately, so the peer observes
    /// EOF instead of a silently ignored session.
    fn accept_one(&mut self) {
        let stream = match self.socket.accept() {
            Ok(stream) => stream,
            Err(err) => {
                warn!(%err, "accept failed");
                return;
            }
        };

        if let Err(err) = stream
            .set_read_timeout(Some(self.config.io_timeout))
            .and_then(|()| stream.set_write_timeout(Some(self.config.io_timeout)))
        {
            warn!(%err, "failed to arm stream timeouts; dropping connection");
            return;
        }

        if let Some((uid, gid, pid)) = stream.peer_credentials() {
            debug!(uid, gid, pid, "client connected");
        }

        match self.table.insert(stream) {
            Some(idx) => debug!(slot = idx, active = self.table.active(), "client stored"),
            None => info!(
                max_clients = self.config.max_clients,
                "connection table full; rejecting client"
            ),
        }
    }

    /// Serve one command on a readable slot, evicting it on any failure.
    fn serve_slot(&mut self, idx: usize) {
        let Some(stream) = self.table.get_mut(idx) else {
            return;
        };

        match serve_command(stream, self.backend.as_mut()) {
            Ok(()) => {}
            Err(DispatchError::Transport(TransportError::PeerClosed)) => {
                debug!(slot = idx, "client disconnected");
                self.table.evict(idx);
            }
            Err(err) => {
                warn!(slot = idx, %err, "evicting connection");
                self.table.evict(idx);
            }
        }
    }
}

fn poll_timeout(interval: Duration) -> PollTimeout {
    // PollTimeout is millisecond-granular; ticks are capped at ~65s, which
    // only bounds how often an idle loop re-checks the shutdown flag.
    let millis = interval.as_millis().min(u128::from(u16::MAX)) as u16;
    PollTimeout::from(millis)
}

fn client_interest() -> PollFlags {
    #[cfg(target_os = "linux")]
    return PollFlags::POLLIN | PollFlags::from_bits_retain(libc::POLLRDHUP);
    #[cfg(not(target_os = "linux"))]
    return PollFlags::POLLIN;
}

fn error_mask() -> PollFlags {
    let mask = PollFlags::POLLERR | PollFlags::POLLHUP | PollFlags::POLLNVAL;
    #[cfg(target_os = "linux")]
    let mask = mask | PollFlags::from_bits_retain(libc::POLLRDHUP);
    mask
}
