//! Async client for the rayipc database wire protocol.
//!
//! A [`Connection`] opens a TCP socket, performs the two-byte version
//! handshake, and then exchanges framed messages: statements go out as
//! sync or async frames, values come back as response frames.
//!
//! The protocol has no request ids. A connection therefore tracks a single
//! pending synchronous request, and a second [`Connection::execute`] issued
//! before the first resolves takes its place.

pub mod config;
pub mod connection;
mod correlator;
pub mod error;
pub mod handshake;
pub mod inbound;

pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
pub use connection::{Connection, ConnectionState};
pub use error::{ClientError, Result};
pub use handshake::handshake_client;
pub use inbound::InboundBuffer;
