//! Crate-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Wire format
// =============================================================================

/// Length of the big-endian u32 frame header
pub const FRAME_HEADER_LEN: usize = 4;

// =============================================================================
// Timing - Command repetition
// =============================================================================

/// Interval between repeated drive commands while a button is held (milliseconds)
pub const DRIVE_REPEAT_INTERVAL_MS: u64 = 500;

/// Interval between repeated tilt/pan commands while a button is held (milliseconds)
pub const TILT_REPEAT_INTERVAL_MS: u64 = 1000;

// =============================================================================
// Buffers
// =============================================================================

/// Capacity of the subscriber event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
