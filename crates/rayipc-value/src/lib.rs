//! Typed value model and binary value codec for the rayipc wire protocol.
//!
//! Every payload carried by a frame is one [`Value`], led by a single type
//! byte. Negative type bytes are atoms, positive ones vectors, and a handful
//! of fixed codes mark lists, tables, dictionaries, nulls and errors.
//!
//! The client only ever sends statement text ([`encode_statement`]); richer
//! values flow from server to client and are read with [`decode`].

pub mod decode;
pub mod encode;
pub mod error;
pub mod render;
pub mod tag;
pub mod value;

pub use decode::{decode, decode_prefix, decode_with, DecodeOptions, MAX_DEPTH};
pub use encode::{encode_statement, encode_value};
pub use error::{DecodeError, Result};
pub use tag::TypeTag;
pub use value::{Column, Dict, Guid, Table, Value, Vector};
