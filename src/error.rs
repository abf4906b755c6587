//! Centralized error types for the link core
//!
//! All link errors are represented by the `LinkError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, LinkError>`.
//!
//! Connection and transport failures are NOT part of this enum: they are
//! reported to the subscriber as events (`ConnectFailed`, `Disconnected`)
//! per the error-handling policy of the core.

use std::fmt;
use std::path::PathBuf;

/// All link errors
#[derive(Debug)]
pub enum LinkError {
    // === Protocol ===
    /// Frame payload length does not fit in the u32 length prefix
    FrameTooLarge { len: usize },

    // === IO ===
    /// File system operation failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Config ===
    /// Config file failed to parse
    ConfigParse { path: PathBuf, message: String },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameTooLarge { len } => {
                write!(f, "Frame payload too large for u32 prefix: {} bytes", len)
            }
            Self::Io { path, .. } => write!(f, "IO error: {}", path.display()),
            Self::ConfigParse { path, message } => {
                write!(f, "Cannot parse {}: {}", path.display(), message)
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
        }
    }
}

/// Alias for Result with LinkError
pub type Result<T> = std::result::Result<T, LinkError>;
