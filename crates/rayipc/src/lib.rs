//! Client library for the rayipc database wire protocol.
//!
//! # Crate Structure
//!
//! - [`frame`]: 16-byte header framing, blocking and `tokio_util` codecs
//! - [`value`]: typed values and the binary value codec
//! - [`client`]: async connection with handshake and request correlation
//!   (behind the default `client` feature)

/// Re-export frame types.
pub mod frame {
    pub use rayipc_frame::*;
}

/// Re-export value types.
pub mod value {
    pub use rayipc_value::*;
}

/// Re-export client types (requires `client` feature).
#[cfg(feature = "client")]
pub mod client {
    pub use rayipc_client::*;
}

pub use rayipc_value::Value;

#[cfg(feature = "client")]
pub use rayipc_client::{ClientConfig, ClientError, Connection, ConnectionState};
