//! Connection lifecycle state
//!
//! The link manager is the sole writer of this state; everything else
//! (UI layer, command repeater) only observes it.

use std::fmt;

/// State of the vehicle link
///
/// `Connecting` is exposed for observability even though the connect call
/// itself blocks; externally visible transitions are unchanged by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection has been attempted yet
    Idle,
    /// A connect attempt to `target` is in flight
    Connecting { target: String },
    /// Link to `peer` is up
    Connected { peer: String },
    /// A previous connection ended or a connect attempt failed
    Disconnected,
}

impl ConnectionState {
    /// Peer name of the live connection, `None` when not connected
    pub fn peer_name(&self) -> Option<&str> {
        match self {
            Self::Connected { peer } => Some(peer),
            _ => None,
        }
    }

    /// Whether a connection is currently up
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Connecting { target } => write!(f, "connecting to {}", target),
            Self::Connected { peer } => write!(f, "connected to {}", peer),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_name_only_when_connected() {
        let connected = ConnectionState::Connected {
            peer: "rover".into(),
        };
        assert_eq!(connected.peer_name(), Some("rover"));

        assert_eq!(ConnectionState::Idle.peer_name(), None);
        assert_eq!(ConnectionState::Disconnected.peer_name(), None);
        assert_eq!(
            ConnectionState::Connecting {
                target: "rover".into()
            }
            .peer_name(),
            None
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Idle.to_string(), "idle");
        assert_eq!(
            ConnectionState::Connected {
                peer: "rover".into()
            }
            .to_string(),
            "connected to rover"
        );
    }
}
