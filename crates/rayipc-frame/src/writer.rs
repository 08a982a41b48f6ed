use std::io::{self, ErrorKind, Write};
use std::net::TcpStream;

use bytes::BytesMut;

use crate::codec::{encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::message::MessageType;

/// Blocking frame sink.
///
/// Every call writes its bytes completely and flushes before returning.
pub struct FrameWriter<W> {
    sink: W,
    scratch: BytesMut,
    config: FrameConfig,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, FrameConfig::default())
    }

    pub fn with_config(sink: W, config: FrameConfig) -> Self {
        Self {
            sink,
            scratch: BytesMut::new(),
            config,
        }
    }

    /// Frame `payload` as `kind` and write it.
    pub fn send(&mut self, kind: MessageType, payload: &[u8]) -> Result<()> {
        let max = self.config.max_payload_size;
        if payload.len() > max {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len() as u64,
                max,
            });
        }

        self.scratch.clear();
        encode_frame(kind, payload, &mut self.scratch)?;
        let encoded = self.scratch.split();
        self.write_raw(&encoded)
    }

    /// Write an existing frame. Only its kind and payload are used; the
    /// header is rebuilt.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.kind()?, &frame.payload)
    }

    /// Write bytes outside any frame, such as a handshake reply.
    pub fn write_raw(&mut self, mut bytes: &[u8]) -> Result<()> {
        while !bytes.is_empty() {
            match self.sink.write(bytes) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => bytes = &bytes[n..],
                Err(err) => retry_or_fail(err)?,
            }
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.sink.flush() {
                Ok(()) => return Ok(()),
                Err(err) => retry_or_fail(err)?,
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl FrameWriter<TcpStream> {
    /// Wrap a socket, applying `config.write_timeout` to it.
    pub fn from_tcp(stream: TcpStream, config: FrameConfig) -> Result<Self> {
        stream.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(stream, config))
    }
}

fn retry_or_fail(err: io::Error) -> Result<()> {
    if err.kind() == ErrorKind::Interrupted {
        Ok(())
    } else {
        Err(FrameError::Io(err))
    }
}
