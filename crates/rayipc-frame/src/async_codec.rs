use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, encode_frame, Frame, FrameConfig};
use crate::error::FrameError;

/// `tokio_util` codec over the 16-byte frame header.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    config: FrameConfig,
}

impl FrameCodec {
    /// Create a codec with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        decode_frame(src, self.config.max_payload_size)
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: item.payload.len() as u64,
                max: self.config.max_payload_size,
            });
        }
        encode_frame(item.kind()?, &item.payload, dst)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;
    use crate::message::MessageType;

    #[tokio::test]
    async fn framed_roundtrip() {
        let mut sink = FramedWrite::new(Vec::<u8>::new(), FrameCodec::default());
        sink.send(Frame::new(MessageType::Sync, &b"first"[..]))
            .await
            .unwrap();
        sink.send(Frame::new(MessageType::Async, &b"second"[..]))
            .await
            .unwrap();
        let wire = sink.into_inner();

        let mut stream = FramedRead::new(wire.as_slice(), FrameCodec::default());
        let f1 = stream.next().await.unwrap().unwrap();
        let f2 = stream.next().await.unwrap().unwrap();

        assert_eq!(f1.kind().unwrap(), MessageType::Sync);
        assert_eq!(f1.payload.as_ref(), b"first");
        assert_eq!(f2.kind().unwrap(), MessageType::Async);
        assert_eq!(f2.payload.as_ref(), b"second");
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn encoder_enforces_max_payload() {
        let mut codec = FrameCodec::with_config(FrameConfig {
            max_payload_size: 2,
            ..FrameConfig::default()
        });
        let mut dst = BytesMut::new();
        let err = codec
            .encode(Frame::new(MessageType::Sync, &b"1+1"[..]), &mut dst)
            .unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 3, max: 2 }));
        assert!(dst.is_empty());
    }
}
