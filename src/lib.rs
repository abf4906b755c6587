//! rover-link - transport and command-dispatch core for a remote-controlled vehicle
//!
//! Drives a vehicle over a point-to-point byte stream (Bluetooth RFCOMM in
//! the field, TCP on the bench) using a minimal length-prefixed protocol:
//!
//! ```text
//! Frame := LEN(4 bytes, big-endian unsigned) || PAYLOAD(LEN bytes, UTF-8 text)
//! ```
//!
//! Components:
//! - [`codec`] - pure frame encode/decode
//! - [`transport`] - duplex stream abstraction and connectors
//! - [`link`] - connection manager, reader loop, event dispatcher, and the
//!   command repeater used to emulate held controls
//! - [`commands`] - the application command vocabulary (opaque to the core)
//!
//! The core accepts connect/disconnect/send requests and reports back
//! through a single-subscriber event channel; button layouts, screens, and
//! video display belong to the consuming UI layer. Reconnection policy is
//! also the caller's: the core never retries a connection or a frame.

pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod link;
pub mod transport;

pub use config::LinkConfig;
pub use error::{LinkError, Result};
pub use link::{ConnectionState, LinkEvent, LinkManager, RepeatHandle};
pub use transport::{Connector, Duplex, Target, TcpConnector};
