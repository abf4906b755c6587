//! TCP connector
//!
//! Stands in for the platform Bluetooth stack during development and in
//! integration tests: an RFCOMM socket and a TCP socket present the same
//! connected byte-stream surface, and the vehicle firmware exposes a TCP
//! bridge on its debug build. Target addresses are `host:port` pairs.

use super::{Connector, Target};
use std::io;
use tokio::net::TcpStream;
use tracing::debug;

/// Connector over `tokio::net::TcpStream`
#[derive(Debug, Clone, Default)]
pub struct TcpConnector;

impl TcpConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, target: &Target) -> io::Result<(String, TcpStream)> {
        debug!(address = %target.address, "opening TCP stream");
        let stream = TcpStream::connect(&target.address).await?;
        // Command frames are small and latency-sensitive
        stream.set_nodelay(true)?;
        Ok((target.display_name().to_string(), stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_refused_is_io_error() {
        // Port 1 is essentially never listening
        let connector = TcpConnector::new();
        let result = connector.connect(&Target::new("127.0.0.1:1")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connect_reports_peer_name() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let connector = TcpConnector::new();
        let target = Target::named(addr.to_string(), "rover");
        let (peer, _stream) = connector.connect(&target).await.unwrap();
        assert_eq!(peer, "rover");
    }
}
