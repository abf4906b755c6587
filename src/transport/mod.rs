//! Transport abstraction for the vehicle link
//!
//! Separates I/O concerns from protocol logic:
//! - **Connector**: How a duplex stream to the peer is opened (Bluetooth
//!   RFCOMM on the platform stack, TCP for development, in-memory pipes
//!   in tests)
//! - **Codec**: How frames are encoded/decoded (handled separately)
//!
//! A connector does NOT handle:
//! - Message framing (that's the codec's job)
//! - Connection lifecycle or supersession (that's the link manager's job)
//! - Reconnection logic (that's the caller's job)
//!
//! # Adding a new connector
//!
//! 1. Create `transport/my_connector.rs`
//! 2. Implement the `Connector` trait
//! 3. Add `pub mod my_connector;` here

pub mod tcp;

pub use tcp::TcpConnector;

use std::fmt;
use std::future::Future;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};

/// A connected bidirectional byte stream to the peer
///
/// Blanket-implemented for anything tokio can read and write. The link
/// core never assumes more than this: no seeking, no datagram boundaries,
/// no out-of-band signaling.
pub trait Duplex: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin + 'static> Duplex for T {}

/// Descriptor of the peer to connect to
///
/// `address` is connector-specific (a Bluetooth device address, a
/// `host:port` pair for TCP). `name` is the human-readable device name
/// when the platform knows it; the peer name reported in events falls
/// back to the address otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub address: String,
    pub name: Option<String>,
}

impl Target {
    /// Create a target from a bare address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    /// Create a target with a known device name
    pub fn named(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: Some(name.into()),
        }
    }

    /// Display name used as the peer name in events
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Trait for opening a duplex stream to a target
///
/// The connect call may block (await) as long as the underlying platform
/// does; the core imposes no timeout of its own. On success it returns
/// the peer name and the open stream; the stream is owned by the link
/// manager from then on and closed by dropping it.
pub trait Connector: Send + Sync + 'static {
    /// The stream type this connector produces
    type Stream: Duplex;

    /// Open a duplex stream to the target
    ///
    /// # Errors
    ///
    /// Any `io::Error` means the target was unreachable or the handshake
    /// failed; the link manager reports it as a `ConnectFailed` event.
    fn connect(
        &self,
        target: &Target,
    ) -> impl Future<Output = io::Result<(String, Self::Stream)>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display_name_prefers_device_name() {
        let target = Target::named("00:11:22:33:44:55", "aucovei-rover");
        assert_eq!(target.display_name(), "aucovei-rover");
    }

    #[test]
    fn test_target_display_name_falls_back_to_address() {
        let target = Target::new("192.168.1.50:9000");
        assert_eq!(target.display_name(), "192.168.1.50:9000");
    }

    #[test]
    fn test_target_display_format() {
        let named = Target::named("addr", "rover");
        assert_eq!(named.to_string(), "rover (addr)");
        assert_eq!(Target::new("addr").to_string(), "addr");
    }
}
