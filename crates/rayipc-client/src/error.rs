use rayipc_frame::FrameError;
use rayipc_value::DecodeError;

/// Errors that can occur in client operations.
///
/// Server-reported evaluation errors are not here: they arrive as
/// `Ok(Value::Error { .. })`.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// TCP connect failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// Socket write failed.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing error. A bad magic prefix also closes the connection.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The response payload could not be decoded. The connection stays usable.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The server did not accept the handshake.
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    /// Connect or execute exceeded its deadline.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The connection closed, or was closed, while the operation was in flight.
    #[error("disconnected: {0}")]
    Disconnected(String),

    /// The operation needs a connected client.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called on a client that is not disconnected.
    #[error("already connected or connecting")]
    AlreadyConnected,

    /// A newer `execute` call took over the pending-response slot.
    #[error("request superseded by a newer execute call")]
    Superseded,
}

impl ClientError {
    /// True for deadline expiry, as opposed to transport or protocol failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }

    /// True when the connection went away under the operation.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ClientError::Disconnected(_) | ClientError::NotConnected)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
