//! Length-prefixed frame codec
//!
//! The wire format is minimal:
//!
//! ```text
//! Frame := LEN(4 bytes, big-endian unsigned) || PAYLOAD(LEN bytes)
//! ```
//!
//! No escaping, checksum, or versioning. The payload carries a UTF-8
//! command/event string, opaque to this layer. An empty payload is a
//! legal frame.
//!
//! The codec is pure: it never touches the stream. Short reads at the
//! header or payload boundary are detected by the reader loop and are
//! terminal for the connection: the format has no resynchronization
//! mechanism, so a broken frame boundary is unrecoverable.

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::FRAME_HEADER_LEN;
use crate::error::{LinkError, Result};

/// Encode a payload as a length-prefixed frame
///
/// # Errors
///
/// Returns `FrameTooLarge` if the payload length does not fit in the
/// u32 prefix.
pub fn encode(payload: &[u8]) -> Result<Bytes> {
    let len = u32::try_from(payload.len()).map_err(|_| LinkError::FrameTooLarge {
        len: payload.len(),
    })?;

    let mut frame = BytesMut::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.put_u32(len);
    frame.put_slice(payload);
    Ok(frame.freeze())
}

/// Parse the length prefix from a frame header
pub fn decode_header(header: [u8; FRAME_HEADER_LEN]) -> u32 {
    u32::from_be_bytes(header)
}

/// Decode a payload to text
///
/// Payload encoding is pinned to UTF-8. Invalid sequences are replaced
/// rather than treated as a transport failure: the wire format carries no
/// corruption signal, and a replacement character is more useful to the
/// consumer than a dropped connection.
pub fn decode_text(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_prefixes_length() {
        let frame = encode(b"HORN").unwrap();
        assert_eq!(frame.as_ref(), &[0, 0, 0, 4, b'H', b'O', b'R', b'N']);
    }

    #[test]
    fn test_encode_empty_payload_is_legal() {
        let frame = encode(b"").unwrap();
        assert_eq!(frame.as_ref(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_header_big_endian() {
        assert_eq!(decode_header([0, 0, 0, 4]), 4);
        assert_eq!(decode_header([0, 0, 1, 0]), 256);
        assert_eq!(decode_header([0xFF, 0xFF, 0xFF, 0xFF]), u32::MAX);
    }

    #[test]
    fn test_decode_text_utf8() {
        assert_eq!(decode_text(b"hostip:10.0.0.5"), "hostip:10.0.0.5");
    }

    #[test]
    fn test_decode_text_invalid_utf8_is_lossy() {
        let text = decode_text(&[b'D', 0xFF, b'R']);
        assert!(text.starts_with('D'));
        assert!(text.ends_with('R'));
    }

    proptest! {
        #[test]
        fn prop_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let frame = encode(&payload).unwrap();
            let mut header = [0u8; FRAME_HEADER_LEN];
            header.copy_from_slice(&frame[..FRAME_HEADER_LEN]);
            prop_assert_eq!(decode_header(header) as usize, payload.len());
            prop_assert_eq!(&frame[FRAME_HEADER_LEN..], payload.as_slice());
        }
    }
}
