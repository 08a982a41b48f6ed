use std::fmt;
use std::io;

use rayipc_client::ClientError;
use rayipc_frame::FrameError;

// Exit codes follow the sysexits / coreutils conventions where one exists.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::UnexpectedEof => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::PayloadTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Connect { source, .. } | ClientError::Io(source) => {
            io_error(context, source)
        }
        ClientError::Frame(err) => frame_error(context, err),
        ClientError::Decode(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        ClientError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        ClientError::HandshakeFailed(_) | ClientError::Disconnected(_) => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rayipc_value::{DecodeError, TypeTag};

    use super::*;

    #[test]
    fn timeouts_map_to_124() {
        let err = client_error("exec", ClientError::Timeout(Duration::from_secs(1)));
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn refused_connect_is_a_transport_error() {
        let err = client_error(
            "connect failed",
            ClientError::Connect {
                addr: "127.0.0.1:1".into(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.starts_with("connect failed: "));
    }

    #[test]
    fn bad_payloads_are_data_errors() {
        let err = client_error(
            "exec",
            ClientError::Decode(DecodeError::Unsupported(TypeTag::Lambda)),
        );
        assert_eq!(err.code, DATA_INVALID);

        let err = frame_error(
            "exec",
            FrameError::PayloadTooLarge {
                size: 10,
                max: 1,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn bad_magic_is_a_transport_error() {
        let err = client_error("exec", ClientError::Frame(FrameError::InvalidMagic { found: 0 }));
        assert_eq!(err.code, TRANSPORT_ERROR);
    }

    #[test]
    fn misuse_is_internal() {
        assert_eq!(client_error("exec", ClientError::Superseded).code, INTERNAL);
    }
}
