//! ReceiveMessages: the inbound listener state machine and the shared log it
//! feeds.
//!
//! # Listener lifecycle
//!
//! ```text
//!            start(port)                    stop()
//! Stopped ───────────────►  Receiving  ───────────────► Stopped
//!    ▲  │                      │  ▲
//!    │  └── stop(): no-op      │  └── start(): no-op
//!    │                         │
//!    └── start fails ◄─────────┘ (never entered: state stays Stopped)
//! ```
//!
//! Starting a session clears the message log first, so every session starts
//! with an empty history.
//!
//! # Threads and channels (for beginners)
//!
//! Two background threads exist while `Receiving`:
//!
//! 1. The **acceptor** (owned by the [`InboundSource`] implementation) reads
//!    datagrams, decodes them, and pushes [`InboundMessage`]s into a bounded
//!    `tokio::sync::mpsc` channel.
//! 2. The **log pump** (owned by [`Listener`]) is the single consumer of that
//!    channel.  For each message it stamps the arrival time, adds it to the
//!    [`SharedMessageLog`], and then invokes the `on_message` callback.
//!
//! Because only the pump adds entries, and the operator's `clear` goes through
//! the same mutex, no two mutations of the log ever race.
//!
//! # Stop is best-effort
//!
//! [`Listener::stop`] clears the acceptor's `running` flag, calls the stream's
//! [`StopWaker`] if the source supplied one, and returns at once; it does not
//! wait for either thread.  A woken acceptor exits almost immediately (an
//! unwoken one within its read timeout), and the pump drains whatever was
//! already queued.  Callbacks for
//! messages that were in flight may therefore still fire shortly after `stop`
//! returns, and on a quick stop/start those late messages can land in the new
//! session's log.  Callers that repaint from the callback should tolerate this.

use std::fmt;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use osc_core::{MessageLog, ReceivedMessage};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::error::{parse_port, TransportError, ValidationError};

/// Error type for [`Listener::start`].
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
}

/// Whether the listener currently owns a bound socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Stopped,
    Receiving,
}

/// One decoded datagram: the address plus its rendered values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub address: String,
    pub values: String,
}

/// Called once by [`Listener::stop`] after the running flag is cleared, to
/// unblock an acceptor that is waiting for input.
pub type StopWaker = Box<dyn FnOnce() + Send>;

/// What an [`InboundSource`] hands back once it is bound.
pub struct InboundStream {
    /// The address actually bound (useful when port 0 was requested).
    pub local_addr: SocketAddr,
    pub receiver: mpsc::Receiver<InboundMessage>,
    pub waker: Option<StopWaker>,
}

impl fmt::Debug for InboundStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundStream")
            .field("local_addr", &self.local_addr)
            .field("receiver", &self.receiver)
            .field("waker", &self.waker.is_some())
            .finish()
    }
}

/// Inbound OSC packet source.
#[cfg_attr(test, mockall::automock)]
pub trait InboundSource: Send + Sync {
    /// Binds `127.0.0.1:port` and starts an acceptor that keeps delivering
    /// messages while `running` is `true`.
    ///
    /// Datagrams that do not decode as OSC must be dropped, not delivered.
    fn open(&self, port: u16, running: Arc<AtomicBool>) -> Result<InboundStream, TransportError>;
}

// ── Shared message log ────────────────────────────────────────────────────────

/// Cloneable, thread-safe handle to the received-message log.
///
/// All clones refer to the same [`MessageLog`].  Every operation takes the
/// internal lock for its whole duration, so callers never see a half-applied
/// add or clear.
#[derive(Debug, Clone)]
pub struct SharedMessageLog {
    inner: Arc<Mutex<MessageLog>>,
}

impl SharedMessageLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MessageLog::new(max_entries))),
        }
    }

    /// Records a message that arrived now.
    pub fn add(&self, address: &str, values: &str) {
        self.lock().add(address, values);
    }

    pub fn push(&self, message: ReceivedMessage) {
        self.lock().push(message);
    }

    /// Empties the log; the received counter drops back to 0.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.lock().max_entries()
    }

    /// Messages whose address passes `pattern`, newest first.
    pub fn filtered_view(&self, pattern: &str) -> Vec<ReceivedMessage> {
        self.lock().filtered_view(pattern)
    }

    fn lock(&self) -> MutexGuard<'_, MessageLog> {
        // Callbacks run after the lock is released; a poisoned log is intact.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Listener ──────────────────────────────────────────────────────────────────

struct Session {
    running: Arc<AtomicBool>,
    local_addr: SocketAddr,
    waker: Option<StopWaker>,
}

/// Owns the inbound listener lifecycle.
///
/// All transitions take `&mut self`, so the owner serialises them.
pub struct Listener {
    source: Arc<dyn InboundSource>,
    log: SharedMessageLog,
    session: Option<Session>,
}

impl Listener {
    pub fn new(source: Arc<dyn InboundSource>, log: SharedMessageLog) -> Self {
        Self {
            source,
            log,
            session: None,
        }
    }

    pub fn state(&self) -> ListenerState {
        if self.session.is_some() {
            ListenerState::Receiving
        } else {
            ListenerState::Stopped
        }
    }

    /// The bound address while `Receiving`.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.session.as_ref().map(|s| s.local_addr)
    }

    /// The log this listener feeds.
    pub fn log(&self) -> &SharedMessageLog {
        &self.log
    }

    /// Starts receiving on `127.0.0.1:<port>`.
    ///
    /// `on_message` runs on the log pump thread after each message has been
    /// added to the log.  Calling `start` while already `Receiving` does
    /// nothing and returns the current state.
    ///
    /// # Errors
    ///
    /// - [`ListenerError::Validation`] if `port` is not a valid port number.
    ///   The log is left untouched.
    /// - [`ListenerError::Transport`] if the socket cannot be bound or the
    ///   threads cannot be spawned.  The log has already been cleared.
    ///
    /// The state is `Stopped` after any error.
    pub fn start<F>(&mut self, port: &str, on_message: F) -> Result<ListenerState, ListenerError>
    where
        F: FnMut(&ReceivedMessage) + Send + 'static,
    {
        if self.session.is_some() {
            debug!("start ignored: listener already receiving");
            return Ok(ListenerState::Receiving);
        }

        let port = parse_port(port)?;

        self.log.clear();

        let running = Arc::new(AtomicBool::new(true));
        let InboundStream {
            local_addr,
            receiver,
            waker,
        } = self.source.open(port, Arc::clone(&running))?;

        let log = self.log.clone();
        let spawned = std::thread::Builder::new()
            .name("osc-log-pump".to_string())
            .spawn(move || pump_loop(receiver, log, on_message));
        if let Err(source) = spawned {
            running.store(false, Ordering::Relaxed);
            if let Some(wake) = waker {
                wake();
            }
            return Err(TransportError::Spawn {
                name: "osc-log-pump",
                source,
            }
            .into());
        }

        info!("OSC receive started on {local_addr}");
        self.session = Some(Session {
            running,
            local_addr,
            waker,
        });
        Ok(ListenerState::Receiving)
    }

    /// Stops receiving.  A no-op while `Stopped`.
    ///
    /// Returns without waiting for the background threads; see the module
    /// docs for what that means for in-flight messages.
    pub fn stop(&mut self) -> ListenerState {
        if let Some(session) = self.session.take() {
            session.running.store(false, Ordering::Relaxed);
            if let Some(wake) = session.waker {
                wake();
            }
            info!("OSC receive stopped on {}", session.local_addr);
        }
        ListenerState::Stopped
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Single consumer of the inbound channel.  Exits once the acceptor drops its
/// sender.
fn pump_loop<F>(mut rx: mpsc::Receiver<InboundMessage>, log: SharedMessageLog, mut on_message: F)
where
    F: FnMut(&ReceivedMessage),
{
    while let Some(inbound) = rx.blocking_recv() {
        let message = ReceivedMessage::new(inbound.address, inbound.values);
        debug!("OSC received: {} [{}]", message.address, message.values);
        log.push(message.clone());
        on_message(&message);
    }
    debug!("log pump finished");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
