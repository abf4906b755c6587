//! Connection manager for the vehicle link
//!
//! Owns the connection lifecycle (Idle → Connecting → Connected →
//! Disconnected), the per-connection reader loop, the serialized write
//! path, and the command repeater. Exactly one connection is active at a
//! time: a new connect request supersedes whatever is live (last request
//! wins, never queued).
//!
//! The manager handles:
//! - Opening/closing the duplex stream via a `Connector`
//! - Spawning and tearing down the reader loop
//! - Serializing writes from the caller and the repeater
//! - Emitting events to the registered subscriber
//!
//! The manager does NOT handle:
//! - Retry/reconnect policy (the caller's job)
//! - Interpreting command or event text (the UI layer's job)
//!
//! # Example
//!
//! ```ignore
//! let link = LinkManager::new(TcpConnector::new());
//! let mut events = link.subscribe();
//!
//! link.connect(Target::new("192.168.1.50:9000")).await;
//! link.send("HORN").await;
//!
//! let hold = link.start_repeat("DRIVE-2", Duration::from_millis(500));
//! // ... gesture released:
//! hold.cancel();
//! link.send("DRIVE-1").await;
//! ```

mod events;
mod reader;
mod repeat;
mod state;

pub use events::LinkEvent;
pub use repeat::RepeatHandle;
pub use state::ConnectionState;

use crate::codec;
use crate::config::LinkConfig;
use crate::transport::{Connector, Duplex, Target};
use events::EventDispatcher;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, WriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// =============================================================================
// Active connection
// =============================================================================

/// The live link: stream halves and the reader task driving them
///
/// At most one exists per core. Dropping it closes the stream, which
/// makes any blocked read or write fail promptly instead of hanging.
struct ActiveConnection<S> {
    generation: u64,
    peer: String,
    /// Writer mutex: the caller task and the repeater task both send on
    /// the same connection; interleaved partial frames would corrupt the
    /// stream for the peer
    writer: Arc<tokio::sync::Mutex<WriteHalf<S>>>,
    reader_task: JoinHandle<()>,
}

// =============================================================================
// Shared core
// =============================================================================

/// State shared between the manager, the reader loop, and repeater tasks
pub(crate) struct LinkCore<S> {
    state: RwLock<ConnectionState>,
    active: Mutex<Option<ActiveConnection<S>>>,
    dispatcher: EventDispatcher,
}

impl<S: Duplex> LinkCore<S> {
    fn new(event_capacity: usize) -> Self {
        Self {
            state: RwLock::new(ConnectionState::Idle),
            active: Mutex::new(None),
            dispatcher: EventDispatcher::new(event_capacity),
        }
    }

    /// Write one framed command to the active connection
    ///
    /// Returns `false` with no event when there is no active connection;
    /// a write failure tears the connection down (one `Disconnected`).
    pub(crate) async fn send(&self, text: &str) -> bool {
        let Some((generation, writer)) = self.writer_snapshot() else {
            debug!(%text, "send with no active connection");
            return false;
        };

        let frame = match codec::encode(text.as_bytes()) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(%text, error = %e, "command not encodable");
                return false;
            }
        };

        let result = {
            let mut writer = writer.lock().await;
            match writer.write_all(&frame).await {
                Ok(()) => writer.flush().await,
                Err(e) => Err(e),
            }
        };

        match result {
            Ok(()) => {
                self.dispatcher.emit(
                    generation,
                    LinkEvent::MessageSent {
                        text: text.to_string(),
                    },
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "write failed, closing link");
                self.fail_connection(generation);
                false
            }
        }
    }

    fn writer_snapshot(&self) -> Option<(u64, Arc<tokio::sync::Mutex<WriteHalf<S>>>)> {
        let active = self.active.lock();
        active
            .as_ref()
            .map(|conn| (conn.generation, conn.writer.clone()))
    }

    /// Terminal teardown after a transport failure
    ///
    /// Invoked by the reader loop on any read error and by the write path
    /// on any write error. Emits exactly one `Disconnected` for the
    /// connection; a no-op when `generation` is no longer the active one
    /// (already superseded, failed, or explicitly disconnected).
    pub(crate) fn fail_connection(&self, generation: u64) {
        let conn = {
            let mut active = self.active.lock();
            match active.as_ref() {
                Some(conn) if conn.generation == generation => active.take(),
                _ => return,
            }
        };
        if let Some(conn) = conn {
            debug!(peer = %conn.peer, generation, "transport failure, connection closed");
            conn.reader_task.abort();
        }

        if self.dispatcher.current_generation() == generation {
            *self.state.write() = ConnectionState::Disconnected;
            self.dispatcher.emit(generation, LinkEvent::Disconnected);
            // Silence any send still holding a writer from this connection
            self.dispatcher.advance_generation();
        }
    }

    /// Drop the active connection without emitting anything
    ///
    /// Best-effort close with errors swallowed; used for supersession.
    fn teardown_current(&self) {
        let conn = self.active.lock().take();
        if let Some(conn) = conn {
            debug!(peer = %conn.peer, "superseding active connection");
            conn.reader_task.abort();
        }
    }
}

// =============================================================================
// Manager
// =============================================================================

/// Connection manager for the vehicle link
///
/// An explicitly owned instance: create it at session start, share it
/// (by reference or inside an `Arc`) with whichever component issues
/// requests, drop it at shutdown.
pub struct LinkManager<C: Connector> {
    connector: C,
    config: LinkConfig,
    core: Arc<LinkCore<C::Stream>>,
}

impl<C: Connector> LinkManager<C> {
    /// Create a manager with default configuration
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, LinkConfig::default())
    }

    /// Create a manager with explicit configuration
    pub fn with_config(connector: C, config: LinkConfig) -> Self {
        let core = Arc::new(LinkCore::new(config.event_capacity));
        Self {
            connector,
            config,
            core,
        }
    }

    /// Register the event subscriber, replacing any previous one
    ///
    /// Events produced while no subscriber is registered are dropped; so
    /// are events still queued for a replaced subscriber.
    pub fn subscribe(&self) -> mpsc::Receiver<LinkEvent> {
        self.core.dispatcher.subscribe()
    }

    /// Connect to a target, superseding any active connection
    ///
    /// Tears down an existing connection first (best effort, no events
    /// from it afterwards), then blocks until the connector resolves. On
    /// success starts the reader loop and emits `Connected`; on failure
    /// emits `ConnectFailed`. The returned flag mirrors the event.
    pub async fn connect(&self, target: Target) -> bool {
        // Invalidate the old connection's producers before touching it:
        // nothing from it may surface after this point.
        let generation = self.core.dispatcher.advance_generation();
        self.core.teardown_current();

        *self.core.state.write() = ConnectionState::Connecting {
            target: target.display_name().to_string(),
        };
        info!(%target, "connecting");

        match self.connector.connect(&target).await {
            Ok((peer, stream)) => {
                let (read_half, write_half) = tokio::io::split(stream);
                let writer = Arc::new(tokio::sync::Mutex::new(write_half));
                let reader_task =
                    tokio::spawn(reader::run(read_half, self.core.clone(), generation));

                {
                    let mut active = self.core.active.lock();
                    if self.core.dispatcher.current_generation() != generation {
                        // A newer connect superseded us while the stream
                        // was being opened; discard this one silently.
                        reader_task.abort();
                        return false;
                    }
                    *active = Some(ActiveConnection {
                        generation,
                        peer: peer.clone(),
                        writer,
                        reader_task,
                    });
                }

                info!(%peer, "connected");
                *self.core.state.write() = ConnectionState::Connected { peer: peer.clone() };
                self.core
                    .dispatcher
                    .emit(generation, LinkEvent::Connected { peer });
                true
            }
            Err(e) => {
                let peer = target.display_name().to_string();
                warn!(%target, error = %e, "connect failed");
                *self.core.state.write() = ConnectionState::Disconnected;
                self.core
                    .dispatcher
                    .emit(generation, LinkEvent::ConnectFailed { peer });
                false
            }
        }
    }

    /// Close the active connection
    ///
    /// Idempotent: a no-op (and no event) when nothing is connected.
    /// Otherwise emits `Disconnected` synchronously rather than relying
    /// on the reader loop noticing the local close.
    pub fn disconnect(&self) {
        let Some(conn) = self.core.active.lock().take() else {
            return;
        };

        info!(peer = %conn.peer, "disconnect requested");
        // Silence the dying reader loop and any in-flight send first
        let generation = self.core.dispatcher.advance_generation();
        conn.reader_task.abort();

        *self.core.state.write() = ConnectionState::Disconnected;
        self.core.dispatcher.emit(generation, LinkEvent::Disconnected);
    }

    /// Send one command frame
    ///
    /// `false` (no event, no panic) when there is no active connection or
    /// the write fails; `true` with a `MessageSent` event otherwise. The
    /// call returns once the frame is fully written. Safe to call
    /// concurrently with an active repeater.
    pub async fn send(&self, text: &str) -> bool {
        self.core.send(text).await
    }

    /// Start re-sending `text` every `interval` until cancelled
    ///
    /// Used for hold gestures; the first send happens immediately. The
    /// caller owns the handle and is responsible for cancelling it before
    /// starting the next gesture's repeat.
    pub fn start_repeat(&self, text: &str, interval: Duration) -> RepeatHandle {
        debug!(%text, ?interval, "starting repeat");
        let handle = RepeatHandle::new();
        tokio::spawn(repeat::run(
            self.core.clone(),
            text.to_string(),
            interval,
            handle.flag(),
        ));
        handle
    }

    /// Start a drive hold gesture at the configured drive interval
    pub fn start_drive_repeat(&self, text: &str) -> RepeatHandle {
        self.start_repeat(text, self.config.drive_repeat_interval())
    }

    /// Start a tilt/pan hold gesture at the configured tilt interval
    pub fn start_tilt_repeat(&self, text: &str) -> RepeatHandle {
        self.start_repeat(text, self.config.tilt_repeat_interval())
    }

    /// Current lifecycle state (observed; only the manager writes it)
    pub fn state(&self) -> ConnectionState {
        self.core.state.read().clone()
    }

    /// Peer name of the live connection, `None` when not connected
    pub fn peer_name(&self) -> Option<String> {
        self.core.state.read().peer_name().map(str::to_string)
    }
}
