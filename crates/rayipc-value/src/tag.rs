//! Wire type tags.
//!
//! Scalar kinds occupy codes 1-12. On the wire a positive code is a vector of
//! that kind and the negated code is a single atom. Compound and special
//! values use the fixed codes at the top of the range.

use std::fmt;

/// Every type code the codec knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    List,
    Bool,
    U8,
    I16,
    I32,
    I64,
    Symbol,
    Date,
    Time,
    Timestamp,
    F64,
    Guid,
    Char,
    Table,
    Dict,
    Lambda,
    Null,
    Error,
}

impl TypeTag {
    /// Wire code (the vector form for scalar kinds).
    pub const fn code(self) -> u8 {
        match self {
            TypeTag::List => 0,
            TypeTag::Bool => 1,
            TypeTag::U8 => 2,
            TypeTag::I16 => 3,
            TypeTag::I32 => 4,
            TypeTag::I64 => 5,
            TypeTag::Symbol => 6,
            TypeTag::Date => 7,
            TypeTag::Time => 8,
            TypeTag::Timestamp => 9,
            TypeTag::F64 => 10,
            TypeTag::Guid => 11,
            TypeTag::Char => 12,
            TypeTag::Table => 98,
            TypeTag::Dict => 99,
            TypeTag::Lambda => 100,
            TypeTag::Null => 126,
            TypeTag::Error => 127,
        }
    }

    /// Look up a non-negative wire code.
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => TypeTag::List,
            1 => TypeTag::Bool,
            2 => TypeTag::U8,
            3 => TypeTag::I16,
            4 => TypeTag::I32,
            5 => TypeTag::I64,
            6 => TypeTag::Symbol,
            7 => TypeTag::Date,
            8 => TypeTag::Time,
            9 => TypeTag::Timestamp,
            10 => TypeTag::F64,
            11 => TypeTag::Guid,
            12 => TypeTag::Char,
            98 => TypeTag::Table,
            99 => TypeTag::Dict,
            100 => TypeTag::Lambda,
            126 => TypeTag::Null,
            127 => TypeTag::Error,
            _ => return None,
        })
    }

    /// Wire byte for a single atom of this kind.
    ///
    /// Only meaningful for scalar kinds.
    pub const fn atom_code(self) -> u8 {
        (self.code() as i8).wrapping_neg() as u8
    }

    /// True for kinds that have both an atom and a vector form.
    pub const fn is_scalar(self) -> bool {
        matches!(self.code(), 1..=12)
    }

    /// Encoded width of one element, for fixed-width scalar kinds.
    pub const fn width(self) -> Option<usize> {
        match self {
            TypeTag::Bool | TypeTag::U8 | TypeTag::Char => Some(1),
            TypeTag::I16 => Some(2),
            TypeTag::I32 | TypeTag::Date | TypeTag::Time => Some(4),
            TypeTag::I64 | TypeTag::Timestamp | TypeTag::F64 => Some(8),
            TypeTag::Guid => Some(16),
            _ => None,
        }
    }

    /// Lower-case type name.
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::List => "list",
            TypeTag::Bool => "bool",
            TypeTag::U8 => "u8",
            TypeTag::I16 => "i16",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::Symbol => "symbol",
            TypeTag::Date => "date",
            TypeTag::Time => "time",
            TypeTag::Timestamp => "timestamp",
            TypeTag::F64 => "f64",
            TypeTag::Guid => "guid",
            TypeTag::Char => "char",
            TypeTag::Table => "table",
            TypeTag::Dict => "dict",
            TypeTag::Lambda => "lambda",
            TypeTag::Null => "null",
            TypeTag::Error => "error",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip_through_lookup() {
        for code in 0..=u8::MAX {
            if let Some(tag) = TypeTag::from_code(code) {
                assert_eq!(tag.code(), code);
            }
        }
        assert_eq!(TypeTag::from_code(13), None);
        assert_eq!(TypeTag::from_code(128), None);
    }

    #[test]
    fn atom_codes_are_negated() {
        assert_eq!(TypeTag::I32.atom_code() as i8, -4);
        assert_eq!(TypeTag::Char.atom_code(), 0xF4);
        assert!(TypeTag::Guid.is_scalar());
        assert!(!TypeTag::Table.is_scalar());
        assert!(!TypeTag::List.is_scalar());
    }
}
