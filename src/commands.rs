//! Application-level command vocabulary
//!
//! Tokens carried as frame payload text, interpreted only by the vehicle
//! and the UI layer. The link core treats all payload text as opaque;
//! these constants exist so front ends do not hardcode strings.

// =============================================================================
// Drive
// =============================================================================

pub const DRIVE_STOP: &str = "DRIVE-1";
pub const DRIVE_FORWARD: &str = "DRIVE-2";
pub const DRIVE_REVERSE: &str = "DRIVE-3";
pub const DRIVE_LEFT: &str = "DRIVE-4";
pub const DRIVE_RIGHT: &str = "DRIVE-5";
pub const DRIVE_REVERSE_LEFT: &str = "DRIVE-10";
pub const DRIVE_REVERSE_RIGHT: &str = "DRIVE-11";
pub const DRIVE_AUTO_ON: &str = "DRIVE-AUTO";
pub const DRIVE_AUTO_OFF: &str = "DRIVE-AUTOOFF";

// =============================================================================
// Camera tilt/pan
// =============================================================================

pub const TILT_UP: &str = "TILT-1";
pub const TILT_DOWN: &str = "TILT-2";
pub const PAN_LEFT: &str = "TILT-3";
pub const PAN_RIGHT: &str = "TILT-4";
pub const PAN_TILT_CENTER: &str = "TILT-5";

// =============================================================================
// Camera and accessories
// =============================================================================

pub const CAMERA_ON: &str = "CAM-1";
pub const CAMERA_OFF: &str = "CAM-0";
pub const CAMERA_LED_ON: &str = "CAMERA-LED-ON";
pub const CAMERA_LED_OFF: &str = "CAMERA-LED-OFF";
pub const HORN: &str = "HORN";
pub const SPEED_SLOW: &str = "SPEEDSLOW";
pub const SPEED_NORMAL: &str = "SPEEDNORMAL";

// =============================================================================
// Peer events
// =============================================================================

/// Prefix of the peer event announcing the secondary video endpoint
pub const HOST_IP_PREFIX: &str = "hostip:";

/// Extract the video endpoint address from a `hostip:<addr>` peer event
///
/// Returns `None` for any other message text.
pub fn host_ip(text: &str) -> Option<&str> {
    text.strip_prefix(HOST_IP_PREFIX).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_ip_extracts_address() {
        assert_eq!(host_ip("hostip:10.0.0.5"), Some("10.0.0.5"));
        assert_eq!(host_ip("hostip: 192.168.100.57 "), Some("192.168.100.57"));
    }

    #[test]
    fn test_host_ip_ignores_commands() {
        assert_eq!(host_ip("HORN"), None);
        assert_eq!(host_ip("DRIVE-2"), None);
        assert_eq!(host_ip(""), None);
    }
}
