use bytes::BytesMut;
use rayipc_frame::{decode_frame, Frame, FrameError, MessageType};
use rayipc_value::{decode_with, DecodeOptions};
use tracing::{trace, warn};

use crate::correlator::Correlator;
use crate::error::ClientError;

/// Accumulates socket bytes and cuts them into frames.
///
/// Chunks may end anywhere, including inside a header. A frame is released
/// only once its header and full payload are buffered. If the buffer ever
/// fails to start with a valid header it is cleared, so stale bytes can not
/// be misread as the next frame.
#[derive(Debug)]
pub struct InboundBuffer {
    buf: BytesMut,
    max_payload: usize,
}

impl InboundBuffer {
    pub fn new(max_payload: usize) -> Self {
        Self::with_initial(BytesMut::new(), max_payload)
    }

    /// Start from bytes already read, such as the tail of the handshake reply.
    pub fn with_initial(buf: BytesMut, max_payload: usize) -> Self {
        Self { buf, max_payload }
    }

    /// Append a chunk received from the socket.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Direct access for `read_buf`-style reads.
    pub fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }

    /// Take the next complete frame, if one is buffered.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        match decode_frame(&mut self.buf, self.max_payload) {
            Ok(frame) => Ok(frame),
            Err(err) => {
                self.buf.clear();
                Err(err)
            }
        }
    }

    /// Dispatch every complete frame to the correlator.
    ///
    /// Response payloads are decoded and resolve the pending request. Other
    /// message types are not expected from the server and are skipped.
    /// Returns the number of frames consumed.
    pub(crate) fn dispatch(
        &mut self,
        correlator: &Correlator,
        options: DecodeOptions,
    ) -> Result<usize, FrameError> {
        let mut count = 0;
        while let Some(frame) = self.next_frame()? {
            count += 1;
            match frame.kind() {
                Ok(MessageType::Response) => {
                    let reply = decode_with(&frame.payload, options).map_err(ClientError::from);
                    if !correlator.resolve(reply) {
                        trace!(
                            payload_len = frame.payload.len(),
                            "response with no pending request dropped"
                        );
                    }
                }
                Ok(kind) => trace!(%kind, "ignoring inbound frame"),
                Err(err) => warn!(%err, "ignoring inbound frame"),
            }
        }
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
