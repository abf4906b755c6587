//! Reader loop - inbound frame pump for one connection
//!
//! Runs as a dedicated task per connection. Each iteration reads exactly
//! 4 header bytes, then exactly the declared payload length, and emits
//! `MessageReceived`. Any stream error or short read is terminal: the
//! protocol has no resynchronization mechanism, so a broken frame
//! boundary always ends the connection. The loop performs teardown and
//! emits (via the shared core) exactly one `Disconnected` on exit.

use super::{LinkCore, LinkEvent};
use crate::codec;
use crate::constants::FRAME_HEADER_LEN;
use crate::transport::Duplex;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, ReadHalf};
use tracing::{debug, trace};

pub(super) async fn run<S: Duplex>(
    mut reader: ReadHalf<S>,
    core: Arc<LinkCore<S>>,
    generation: u64,
) {
    loop {
        let mut header = [0u8; FRAME_HEADER_LEN];
        if let Err(e) = reader.read_exact(&mut header).await {
            debug!(generation, error = %e, "stream ended at header boundary");
            break;
        }

        let len = codec::decode_header(header) as usize;
        let mut payload = vec![0u8; len];
        if let Err(e) = reader.read_exact(&mut payload).await {
            debug!(generation, declared = len, error = %e, "stream ended at payload boundary");
            break;
        }

        let text = codec::decode_text(&payload);
        trace!(generation, %text, "frame received");
        core.dispatcher.emit(generation, LinkEvent::MessageReceived { text });
    }

    // Terminal: tear down this connection if it is still the active one.
    // A superseded or explicitly disconnected link produces no event here.
    core.fail_connection(generation);
}
