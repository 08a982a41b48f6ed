use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{FrameError, Result};
use crate::message::MessageType;

/// Frame header: magic (4) + version (1) + flags (1) + endianness (1)
/// + message type (1) + payload length (8) = 16 bytes.
pub const HEADER_SIZE: usize = 16;

/// Magic prefix, read as a little-endian `u32` (`FA DE FA CE` on the wire).
pub const MAGIC: u32 = 0xCEFA_DEFA;

/// Protocol version written into every outbound header and sent in the handshake.
pub const PROTOCOL_VERSION: u8 = 1;

/// Endianness byte for little-endian payloads, the only layout in use.
pub const ENDIAN_LITTLE: u8 = 0;

/// Default maximum payload size: 256 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 256 * 1024 * 1024;

/// Parsed fixed-size frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Protocol version of the sender.
    pub version: u8,
    /// Reserved flags, `0` today.
    pub flags: u8,
    /// Payload byte order, see [`ENDIAN_LITTLE`].
    pub endianness: u8,
    /// Raw message type byte. Use [`FrameHeader::kind`] to interpret it.
    pub message_type: u8,
    /// Declared payload length in bytes.
    pub payload_len: i64,
}

impl FrameHeader {
    /// Header for an outbound frame of the given kind.
    pub fn new(kind: MessageType, payload_len: usize) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            flags: 0,
            endianness: ENDIAN_LITTLE,
            message_type: kind.as_u8(),
            payload_len: payload_len as i64,
        }
    }

    /// Parse a header from the front of `src`.
    ///
    /// Returns `Ok(None)` when fewer than [`HEADER_SIZE`] bytes are present.
    /// Does not check that the payload itself has arrived.
    pub fn parse(src: &[u8]) -> Result<Option<Self>> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let mut buf = &src[..HEADER_SIZE];
        let magic = buf.get_u32_le();
        if magic != MAGIC {
            return Err(FrameError::InvalidMagic { found: magic });
        }

        let version = buf.get_u8();
        let flags = buf.get_u8();
        let endianness = buf.get_u8();
        let message_type = buf.get_u8();
        let payload_len = buf.get_i64_le();

        if payload_len < 0 {
            return Err(FrameError::NegativeLength(payload_len));
        }

        Ok(Some(Self {
            version,
            flags,
            endianness,
            message_type,
            payload_len,
        }))
    }

    /// Interpret the message type byte.
    pub fn kind(&self) -> Result<MessageType> {
        MessageType::try_from(self.message_type)
    }

    /// Write this header into `dst`.
    pub fn write_to(&self, dst: &mut BytesMut) {
        dst.put_u32_le(MAGIC);
        dst.put_u8(self.version);
        dst.put_u8(self.flags);
        dst.put_u8(self.endianness);
        dst.put_u8(self.message_type);
        dst.put_i64_le(self.payload_len);
    }
}

/// A framed message.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The parsed header.
    pub header: FrameHeader,
    /// The message payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new outbound frame.
    pub fn new(kind: MessageType, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        Self {
            header: FrameHeader::new(kind, payload.len()),
            payload,
        }
    }

    /// Interpret the message type of this frame.
    pub fn kind(&self) -> Result<MessageType> {
        self.header.kind()
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Append header and payload to `dst`.
///
/// ```text
/// offset  0        4    5    6    7    8               16
///         | magic  | ver| flg| end| typ| payload len   | payload ...
///         | u32 LE | u8 | u8 | u8 | u8 | i64 LE        |
/// ```
pub fn encode_frame(kind: MessageType, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = i64::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len() as u64,
        max: i64::MAX as usize,
    })?;

    dst.reserve(HEADER_SIZE + payload.len());
    FrameHeader {
        payload_len: len,
        ..FrameHeader::new(kind, 0)
    }
    .write_to(dst);
    dst.put_slice(payload);
    Ok(())
}

/// Split one complete frame off the front of `src`.
///
/// `Ok(None)` means more bytes are needed; `src` is left untouched apart
/// from reserving room for the rest of the frame. A header declaring more
/// than `max_payload` bytes is an error before any payload is buffered.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Frame>> {
    let Some(header) = FrameHeader::parse(src)? else {
        return Ok(None);
    };

    // parse() rejects negative lengths.
    let declared = header.payload_len as u64;
    let payload_len = match usize::try_from(declared) {
        Ok(len) if len <= max_payload => len,
        _ => {
            return Err(FrameError::PayloadTooLarge {
                size: declared,
                max: max_payload,
            })
        }
    };

    let missing = (HEADER_SIZE + payload_len).saturating_sub(src.len());
    if missing > 0 {
        src.reserve(missing);
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();
    trace!(
        message_type = header.message_type,
        payload_len,
        "frame decoded"
    );

    Ok(Some(Frame { header, payload }))
}

/// Limits shared by the blocking reader/writer and the async `FrameCodec`.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest payload accepted in either direction.
    pub max_payload_size: usize,
    /// Socket read timeout applied by [`FrameReader::from_tcp`](crate::FrameReader::from_tcp).
    pub read_timeout: Option<std::time::Duration>,
    /// Socket write timeout applied by [`FrameWriter::from_tcp`](crate::FrameWriter::from_tcp).
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
