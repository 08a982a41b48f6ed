//! Fixed-header message framing for the rayipc database wire protocol.
//!
//! Every message on the socket is framed with a 16-byte header:
//! - A 4-byte magic prefix (`0xCEFADEFA`, little-endian) for stream sanity checks
//! - Version, flags and endianness bytes
//! - A 1-byte message type (async request, sync request, response)
//! - An 8-byte little-endian signed payload length
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod message;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, FrameHeader, DEFAULT_MAX_PAYLOAD,
    ENDIAN_LITTLE, HEADER_SIZE, MAGIC, PROTOCOL_VERSION,
};
pub use error::{FrameError, Result};
pub use message::MessageType;
pub use reader::FrameReader;
pub use writer::FrameWriter;

#[cfg(feature = "async")]
pub use async_codec::FrameCodec;
