use std::io::{ErrorKind, Read};
use std::net::TcpStream;

use bytes::BytesMut;

use crate::codec::{decode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const READ_CHUNK: usize = 8 * 1024;

/// Blocking frame source.
///
/// Short reads are absorbed: [`read_frame`](Self::read_frame) returns only
/// whole frames. The unframed handshake bytes can be taken first with
/// [`read_raw`](Self::read_raw) without losing any frame data that arrived
/// alongside them.
pub struct FrameReader<R> {
    source: R,
    pending: BytesMut,
    config: FrameConfig,
}

impl<R: Read> FrameReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_config(source, FrameConfig::default())
    }

    pub fn with_config(source: R, config: FrameConfig) -> Self {
        Self {
            source,
            pending: BytesMut::with_capacity(READ_CHUNK),
            config,
        }
    }

    /// Take exactly `n` bytes that are not part of any frame.
    pub fn read_raw(&mut self, n: usize) -> Result<Vec<u8>> {
        while self.pending.len() < n {
            self.pull()?;
        }
        Ok(self.pending.split_to(n).to_vec())
    }

    /// Block until one complete frame is available.
    ///
    /// EOF, whether between frames or inside one, is
    /// [`FrameError::ConnectionClosed`].
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            match decode_frame(&mut self.pending, self.config.max_payload_size)? {
                Some(frame) => return Ok(frame),
                None => self.pull()?,
            }
        }
    }

    /// Bytes received but not yet handed out.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Append at least one byte from the source to `pending`.
    fn pull(&mut self) -> Result<()> {
        let filled = self.pending.len();
        self.pending.resize(filled + READ_CHUNK, 0);

        let outcome = loop {
            match self.source.read(&mut self.pending[filled..]) {
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                other => break other,
            }
        };

        match outcome {
            Ok(0) => {
                self.pending.truncate(filled);
                Err(FrameError::ConnectionClosed)
            }
            Ok(n) => {
                self.pending.truncate(filled + n);
                Ok(())
            }
            Err(err) => {
                self.pending.truncate(filled);
                Err(FrameError::Io(err))
            }
        }
    }
}

impl FrameReader<TcpStream> {
    /// Wrap a socket, applying `config.read_timeout` to it.
    pub fn from_tcp(stream: TcpStream, config: FrameConfig) -> Result<Self> {
        stream.set_read_timeout(config.read_timeout)?;
        Ok(Self::with_config(stream, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};
    use std::net::TcpListener;
    use std::time::Duration;

    use bytes::BufMut;

    use super::*;
    use crate::codec::{encode_frame, FrameHeader};
    use crate::message::MessageType;

    fn wire(frames: &[(MessageType, &[u8])]) -> Vec<u8> {
        let mut out = BytesMut::new();
        for (kind, payload) in frames {
            encode_frame(*kind, payload, &mut out).unwrap();
        }
        out.to_vec()
    }

    /// Yields one byte per call, with an `Interrupted` error before each.
    struct Trickle {
        bytes: Vec<u8>,
        pos: usize,
        interrupt_next: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt_next = !self.interrupt_next;
            if self.interrupt_next {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            match self.bytes.get(self.pos) {
                Some(byte) if !buf.is_empty() => {
                    buf[0] = *byte;
                    self.pos += 1;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn frames_come_out_in_order() {
        let bytes = wire(&[
            (MessageType::Sync, b"a"),
            (MessageType::Async, b""),
            (MessageType::Response, b"\x7e"),
        ]);
        let mut reader = FrameReader::new(Cursor::new(bytes));

        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"a");
        assert!(reader.read_frame().unwrap().payload.is_empty());
        assert_eq!(
            reader.read_frame().unwrap().kind().unwrap(),
            MessageType::Response
        );
        assert!(matches!(
            reader.read_frame().unwrap_err(),
            FrameError::ConnectionClosed
        ));
    }

    #[test]
    fn trickled_interrupted_input_still_assembles() {
        let mut reader = FrameReader::new(Trickle {
            bytes: wire(&[(MessageType::Response, b"\xfc\x02\x00\x00\x00")]),
            pos: 0,
            interrupt_next: false,
        });

        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.payload.as_ref(), b"\xfc\x02\x00\x00\x00");
        assert_eq!(reader.buffered(), 0);
    }

    #[test]
    fn handshake_prefix_shares_a_read_with_the_first_frame() {
        let mut bytes = vec![1u8, 0];
        bytes.extend(wire(&[(MessageType::Sync, b"1+1")]));
        let mut reader = FrameReader::new(Cursor::new(bytes));

        assert_eq!(reader.read_raw(2).unwrap(), vec![1, 0]);
        assert!(reader.buffered() > 0);

        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.kind().unwrap(), MessageType::Sync);
        assert_eq!(frame.payload.as_ref(), b"1+1");
    }

    #[test]
    fn eof_inside_payload_is_closed() {
        let mut bytes = BytesMut::new();
        FrameHeader::new(MessageType::Response, 32).write_to(&mut bytes);
        bytes.put_slice(b"short");

        let mut reader = FrameReader::new(Cursor::new(bytes.to_vec()));
        assert!(matches!(
            reader.read_frame().unwrap_err(),
            FrameError::ConnectionClosed
        ));
    }

    #[test]
    fn header_errors_surface() {
        let mut reader = FrameReader::new(Cursor::new(vec![0xAB; 16]));
        assert!(matches!(
            reader.read_frame().unwrap_err(),
            FrameError::InvalidMagic { .. }
        ));

        let mut big = BytesMut::new();
        FrameHeader::new(MessageType::Response, 4096).write_to(&mut big);
        let config = FrameConfig {
            max_payload_size: 64,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(Cursor::new(big.to_vec()), config);
        assert!(matches!(
            reader.read_frame().unwrap_err(),
            FrameError::PayloadTooLarge { size: 4096, max: 64 }
        ));
    }

    #[test]
    fn tcp_read_timeout_is_applied() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();

        let config = FrameConfig {
            read_timeout: Some(Duration::from_millis(20)),
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::from_tcp(server, config).unwrap();

        // Nothing is ever written.
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(_)), "{err}");
        drop(client);
    }
}
