/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame header does not start with the protocol magic.
    ///
    /// Byte alignment of the stream is unknown after this, so it is fatal
    /// for the connection that produced it.
    #[error("invalid frame magic 0x{found:08X} (expected 0xCEFADEFA)")]
    InvalidMagic { found: u32 },

    /// The header declares a negative payload length.
    #[error("negative payload length {0}")]
    NegativeLength(i64),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: u64, max: usize },

    /// The header carries a message type this protocol does not define.
    #[error("unknown message type {0}")]
    UnknownMessageType(u8),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
