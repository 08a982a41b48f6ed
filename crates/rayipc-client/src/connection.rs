use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use futures_util::SinkExt;
use rayipc_frame::{Frame, FrameCodec, FrameError, MessageType};
use rayipc_value::{encode_statement, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedWrite;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::correlator::Correlator;
use crate::error::{ClientError, Result};
use crate::handshake::handshake_client;
use crate::inbound::InboundBuffer;

type FrameSink = FramedWrite<OwnedWriteHalf, FrameCodec>;

/// Lifecycle of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Handshaking,
    Connected,
}

impl ConnectionState {
    pub fn name(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Handshaking => "handshaking",
            ConnectionState::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An established socket: the write half and the task draining the read half.
#[derive(Debug)]
struct Session {
    writer: tokio::sync::Mutex<FrameSink>,
    reader: JoinHandle<()>,
    peer_addr: SocketAddr,
    epoch: u64,
}

impl Session {
    async fn send(&self, frame: Frame) -> Result<()> {
        let mut sink = self.writer.lock().await;
        sink.send(frame).await.map_err(write_error)
    }
}

#[derive(Debug)]
struct Lifecycle {
    state: ConnectionState,
    /// Bumped by every connect and disconnect. Work started under an older
    /// epoch must not change the state.
    epoch: u64,
    session: Option<Arc<Session>>,
}

#[derive(Debug)]
struct Inner {
    config: ClientConfig,
    lifecycle: Mutex<Lifecycle>,
    correlator: Correlator,
}

impl Inner {
    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, epoch: u64, state: ConnectionState) {
        let mut life = self.lifecycle();
        if life.epoch == epoch {
            life.state = state;
        }
    }

    fn session(&self) -> Result<Arc<Session>> {
        let life = self.lifecycle();
        match (&life.state, &life.session) {
            (ConnectionState::Connected, Some(session)) => Ok(Arc::clone(session)),
            _ => Err(ClientError::NotConnected),
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        let life = self.lifecycle();
        life.epoch == epoch && life.state == ConnectionState::Connected
    }

    /// Called by the reader task when its socket is done.
    ///
    /// Only the live session may flip the state or fail the pending request;
    /// returns false for a reader left over from an earlier one.
    fn session_ended(&self, epoch: u64, reason: ClientError) -> bool {
        let mut life = self.lifecycle();
        if life.epoch != epoch || life.state != ConnectionState::Connected {
            return false;
        }
        life.state = ConnectionState::Disconnected;
        life.session = None;
        // Under the lifecycle lock, so a reopen can not claim the slot first.
        self.correlator.fail(reason);
        true
    }

    /// A write into a session that has since been torn down is reported as
    /// a disconnect rather than whatever the dead socket returned.
    fn write_failed(&self, epoch: u64, err: ClientError) -> ClientError {
        if self.is_current(epoch) {
            err
        } else {
            ClientError::Disconnected("connection closed while writing".to_string())
        }
    }
}

/// Puts the state back to disconnected if an `open` ends without
/// installing a session, including when its future is dropped mid-way.
struct OpenAttempt<'a> {
    inner: &'a Inner,
    epoch: u64,
    installed: bool,
}

impl Drop for OpenAttempt<'_> {
    fn drop(&mut self) {
        if !self.installed {
            self.inner.set_state(self.epoch, ConnectionState::Disconnected);
        }
    }
}

/// A client connection to a rayipc server.
///
/// One synchronous request may be outstanding at a time; see
/// [`execute`](Self::execute). Share a connection between tasks with an
/// `Arc`.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> rayipc_client::Result<()> {
/// use rayipc_client::Connection;
///
/// let conn = Connection::connect("127.0.0.1", 5000).await?;
/// let value = conn.execute("1+1").await?;
/// println!("{value}");
/// conn.disconnect().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Connection {
    inner: Arc<Inner>,
}

impl Connection {
    /// Create a disconnected client.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                lifecycle: Mutex::new(Lifecycle {
                    state: ConnectionState::Disconnected,
                    epoch: 0,
                    session: None,
                }),
                correlator: Correlator::default(),
            }),
        }
    }

    /// Connect with default configuration.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_with_config(host, port, &ClientConfig::default()).await
    }

    /// Connect with custom configuration.
    pub async fn connect_with_config(host: &str, port: u16, config: &ClientConfig) -> Result<Self> {
        let conn = Self::new(config.clone());
        conn.open(host, port).await?;
        Ok(conn)
    }

    /// Connect this client, racing TCP connect and handshake against
    /// `connect_timeout`.
    ///
    /// Valid only while disconnected. After a [`disconnect`](Self::disconnect)
    /// the same client can be opened again.
    pub async fn open(&self, host: &str, port: u16) -> Result<()> {
        let epoch = {
            let mut life = self.inner.lifecycle();
            if life.state != ConnectionState::Disconnected {
                return Err(ClientError::AlreadyConnected);
            }
            life.epoch = life.epoch.wrapping_add(1);
            life.state = ConnectionState::Connecting;
            life.epoch
        };
        let mut attempt = OpenAttempt {
            inner: &self.inner,
            epoch,
            installed: false,
        };

        let addr = format!("{host}:{port}");
        let timeout = self.inner.config.connect_timeout;
        let started = Instant::now();

        let outcome = tokio::time::timeout(timeout, self.establish(&addr, epoch)).await;
        let (stream, leftover, peer_addr) = match outcome {
            Ok(Ok(established)) => established,
            Ok(Err(err)) => {
                debug!(%addr, %err, "connect failed");
                return Err(err);
            }
            Err(_) => {
                debug!(%addr, ?timeout, "connect timed out");
                return Err(ClientError::Timeout(timeout));
            }
        };

        let (read_half, write_half) = stream.into_split();
        let sink = FramedWrite::new(
            write_half,
            FrameCodec::with_config(self.inner.config.frame_config()),
        );
        let inbound = InboundBuffer::with_initial(leftover, self.inner.config.max_payload_size);

        let mut life = self.inner.lifecycle();
        if life.epoch != epoch || life.state != ConnectionState::Handshaking {
            return Err(ClientError::Disconnected(
                "disconnected while connecting".to_string(),
            ));
        }
        // Spawned under the lock so the task can not observe a half-set session.
        let reader = tokio::spawn(read_loop(Arc::clone(&self.inner), read_half, inbound, epoch));
        life.session = Some(Arc::new(Session {
            writer: tokio::sync::Mutex::new(sink),
            reader,
            peer_addr,
            epoch,
        }));
        life.state = ConnectionState::Connected;
        attempt.installed = true;
        drop(life);

        debug!(%addr, %peer_addr, elapsed = ?started.elapsed(), "connected");
        Ok(())
    }

    async fn establish(
        &self,
        addr: &str,
        epoch: u64,
    ) -> Result<(TcpStream, BytesMut, SocketAddr)> {
        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ClientError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        if self.inner.config.nodelay {
            stream.set_nodelay(true)?;
        }
        let peer_addr = stream.peer_addr()?;

        self.inner.set_state(epoch, ConnectionState::Handshaking);
        let leftover = handshake_client(&mut stream, self.inner.config.protocol_version).await?;
        trace!(leftover = leftover.len(), "handshake accepted");
        Ok((stream, leftover, peer_addr))
    }

    /// Close the connection.
    ///
    /// The state flips to disconnected immediately and any pending request
    /// fails with [`ClientError::Disconnected`]. Safe to call at any time.
    pub async fn disconnect(&self) {
        let session = {
            let mut life = self.inner.lifecycle();
            life.epoch = life.epoch.wrapping_add(1);
            life.state = ConnectionState::Disconnected;
            life.session.take()
        };

        self.inner
            .correlator
            .fail(ClientError::Disconnected("disconnected by client".to_string()));

        if let Some(session) = session {
            session.reader.abort();
            // A stalled write holds the lock; the socket then closes when
            // that request lets go of the session.
            match session.writer.try_lock() {
                Ok(mut sink) => {
                    if let Err(err) = sink.get_mut().shutdown().await {
                        trace!(%err, "socket shutdown failed");
                    }
                }
                Err(_) => trace!("writer busy, socket closes on release"),
            }
            debug!(peer_addr = %session.peer_addr, "disconnected");
        }
    }

    /// Whether the connection is currently established.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lifecycle().state
    }

    /// Remote address, while connected.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.inner.session().ok().map(|s| s.peer_addr)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Send a statement and wait for its response, using the configured
    /// request timeout.
    ///
    /// A server-side evaluation error is returned as `Ok(Value::Error { .. })`.
    pub async fn execute(&self, statement: &str) -> Result<Value> {
        self.execute_with_timeout(statement, self.inner.config.request_timeout)
            .await
    }

    /// Send a statement and wait at most `timeout` for its response.
    ///
    /// Starting another `execute` before this one resolves fails this one
    /// with [`ClientError::Superseded`].
    pub async fn execute_with_timeout(&self, statement: &str, timeout: Duration) -> Result<Value> {
        let session = self.inner.session()?;
        let ticket = self.inner.correlator.begin();
        let generation = ticket.generation;
        if !self.inner.is_current(session.epoch) {
            // Closed before the slot was claimed, so nobody failed it.
            self.inner.correlator.cancel(generation);
            return Err(ClientError::Disconnected("connection closed".to_string()));
        }

        let frame = Frame::new(MessageType::Sync, encode_statement(statement));
        trace!(generation, len = frame.payload.len(), "sending sync request");

        let mut reply = ticket.reply;
        let round_trip = async {
            // The slot can settle while the write is still stuck.
            tokio::select! {
                biased;
                settled = &mut reply => return settled.unwrap_or_else(abandoned),
                sent = session.send(frame) => {
                    if let Err(err) = sent {
                        return Err(self.inner.write_failed(session.epoch, err));
                    }
                }
            }
            reply.await.unwrap_or_else(abandoned)
        };

        match tokio::time::timeout(timeout, round_trip).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                self.inner.correlator.cancel(generation);
                Err(err)
            }
            Err(_) => {
                self.inner.correlator.cancel(generation);
                debug!(generation, ?timeout, "request timed out");
                Err(ClientError::Timeout(timeout))
            }
        }
    }

    /// Send a statement without waiting for any response.
    ///
    /// Resolves once the frame has been written.
    pub async fn execute_async(&self, statement: &str) -> Result<()> {
        let session = self.inner.session()?;
        let frame = Frame::new(MessageType::Async, encode_statement(statement));
        trace!(len = frame.payload.len(), "sending async request");
        session
            .send(frame)
            .await
            .map_err(|err| self.inner.write_failed(session.epoch, err))
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let session = self.inner.lifecycle().session.take();
        if let Some(session) = session {
            session.reader.abort();
        }
    }
}

fn abandoned(_: oneshot::error::RecvError) -> Result<Value> {
    Err(ClientError::Disconnected("request abandoned".to_string()))
}

fn write_error(err: FrameError) -> ClientError {
    match err {
        FrameError::Io(io) => ClientError::Io(io),
        other => ClientError::Frame(other),
    }
}

async fn read_loop(
    inner: Arc<Inner>,
    mut read_half: OwnedReadHalf,
    mut inbound: InboundBuffer,
    epoch: u64,
) {
    let reason = loop {
        if let Err(err) = inbound.dispatch(&inner.correlator, inner.config.decode) {
            warn!(%err, "unrecoverable framing error, closing connection");
            break ClientError::Frame(err);
        }

        match read_half.read_buf(inbound.buffer_mut()).await {
            Ok(0) => {
                debug!("connection closed by peer");
                break ClientError::Disconnected("connection closed by peer".to_string());
            }
            Ok(n) => trace!(bytes = n, buffered = inbound.len(), "read"),
            Err(err) => {
                debug!(%err, "read failed");
                break ClientError::Io(err);
            }
        }
    };

    // State flips before the failure is delivered, so a woken caller sees it.
    if !inner.session_ended(epoch, reason) {
        trace!(epoch, "reader outlived its session");
    }
}
