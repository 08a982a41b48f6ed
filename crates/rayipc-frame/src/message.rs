//! Message type codes carried in byte 7 of the frame header.
//!
//! The client only ever emits [`MessageType::Async`] and [`MessageType::Sync`]
//! and only ever interprets [`MessageType::Response`].

use std::fmt;

use crate::error::FrameError;

/// Kind of message a frame carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Fire-and-forget request; the server sends no response.
    Async = 0,
    /// Synchronous request; the server answers with one response frame.
    Sync = 1,
    /// Response to a synchronous request.
    Response = 2,
}

impl MessageType {
    /// Wire byte for this message type.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            MessageType::Async => "ASYNC",
            MessageType::Sync => "SYNC",
            MessageType::Response => "RESPONSE",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MessageType::Async),
            1 => Ok(MessageType::Sync),
            2 => Ok(MessageType::Response),
            other => Err(FrameError::UnknownMessageType(other)),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
