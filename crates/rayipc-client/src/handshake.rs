use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ClientError, Result};

const HANDSHAKE_READ_CAPACITY: usize = 8 * 1024;

/// Perform the client side of the connection handshake.
///
/// Writes `[version, 0]` and waits for exactly one read. The first byte of
/// that read must equal `version`. Anything after it is already frame data
/// and is returned so the caller can seed its inbound buffer.
///
/// No deadline is applied here; callers race this against their own timer.
pub async fn handshake_client<S>(stream: &mut S, version: u8) -> Result<BytesMut>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(&[version, 0]).await?;
    stream.flush().await?;

    let mut buf = BytesMut::with_capacity(HANDSHAKE_READ_CAPACITY);
    let read = stream.read_buf(&mut buf).await?;
    if read == 0 {
        return Err(ClientError::Disconnected(
            "connection closed during handshake".to_string(),
        ));
    }

    let answer = buf[0];
    if answer != version {
        return Err(ClientError::HandshakeFailed(format!(
            "server answered version {answer}, expected {version}"
        )));
    }

    buf.advance(1);
    Ok(buf)
}
