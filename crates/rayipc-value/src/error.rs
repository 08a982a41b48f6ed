use crate::tag::TypeTag;

/// Errors that abort decoding of a payload.
///
/// None of these are recoverable per field: the rest of the payload is
/// discarded. Frame boundaries are unaffected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The type byte is not a known tag.
    #[error("unknown type tag {tag} at offset {offset}")]
    UnknownTag { tag: i8, offset: usize },

    /// A known tag the client cannot decode, such as a lambda.
    #[error("unsupported {0} value")]
    Unsupported(TypeTag),

    /// The payload ended inside a value.
    #[error("unexpected end of payload at offset {offset} (needed {needed} bytes, {available} left)")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// An element count was negative.
    #[error("negative length {length} at offset {offset}")]
    NegativeLength { length: i64, offset: usize },

    /// Nesting exceeded the decoder's depth limit.
    #[error("value nesting deeper than {0} levels")]
    TooDeep(usize),

    /// Structurally valid bytes that do not form the expected shape.
    #[error("malformed {kind}: {reason}")]
    Malformed { kind: TypeTag, reason: String },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
