use std::time::Duration;

use rayipc_frame::{FrameConfig, DEFAULT_MAX_PAYLOAD, PROTOCOL_VERSION};
use rayipc_value::DecodeOptions;

/// Default deadline for TCP connect plus handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Default deadline for one `execute` round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Configuration for a [`Connection`](crate::Connection).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline for TCP connect and handshake together.
    pub connect_timeout: Duration,
    /// Deadline used by [`Connection::execute`](crate::Connection::execute).
    pub request_timeout: Duration,
    /// Version byte sent in the handshake and expected back.
    pub protocol_version: u8,
    /// Largest inbound or outbound payload accepted.
    pub max_payload_size: usize,
    /// Response decoding options.
    pub decode: DecodeOptions,
    /// Disable Nagle's algorithm on the socket.
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            protocol_version: PROTOCOL_VERSION,
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            decode: DecodeOptions::default(),
            nodelay: true,
        }
    }
}

impl ClientConfig {
    pub(crate) fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            max_payload_size: self.max_payload_size,
            ..FrameConfig::default()
        }
    }
}
