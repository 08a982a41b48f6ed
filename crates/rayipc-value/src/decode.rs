use bytes::Buf;

use crate::error::{DecodeError, Result};
use crate::tag::TypeTag;
use crate::value::{Column, Dict, Guid, Table, Value, Vector};

/// Null sentinel for dates and times.
pub const NULL_I32: i32 = i32::MIN;

/// Null sentinel for timestamps.
pub const NULL_I64: i64 = i64::MIN;

/// Deepest nesting of lists, tables, dicts and errors the decoder accepts.
pub const MAX_DEPTH: usize = 64;

/// Decoder behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject tables whose columns disagree on length or count, and dicts
    /// whose keys and values differ in length. Off by default: the producer
    /// is trusted to keep these aligned.
    pub strict: bool,
}

/// Decode one value from a payload with default options.
pub fn decode(payload: &[u8]) -> Result<Value> {
    decode_with(payload, DecodeOptions::default())
}

/// Decode one value from a payload.
///
/// Bytes after the first complete value are ignored.
pub fn decode_with(payload: &[u8], options: DecodeOptions) -> Result<Value> {
    decode_prefix(payload, options).map(|(value, _)| value)
}

/// Decode one value and report how many bytes it occupied.
pub fn decode_prefix(payload: &[u8], options: DecodeOptions) -> Result<(Value, usize)> {
    let mut decoder = Decoder {
        src: payload,
        rest: payload,
        options,
    };
    let value = decoder.value(0)?;
    Ok((value, decoder.position()))
}

fn nullable_i32(raw: i32) -> Option<i32> {
    (raw != NULL_I32).then_some(raw)
}

fn nullable_i64(raw: i64) -> Option<i64> {
    (raw != NULL_I64).then_some(raw)
}

/// Cursor over an immutable payload.
struct Decoder<'a> {
    src: &'a [u8],
    rest: &'a [u8],
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {
    fn position(&self) -> usize {
        self.src.len() - self.rest.len()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.rest.remaining() < needed {
            return Err(DecodeError::UnexpectedEof {
                offset: self.position(),
                needed,
                available: self.rest.remaining(),
            });
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.rest.get_u8())
    }

    fn i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.rest.get_i8())
    }

    fn i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.rest.get_i16_le())
    }

    fn i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.rest.get_i32_le())
    }

    fn i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(self.rest.get_i64_le())
    }

    fn f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        Ok(self.rest.get_f64_le())
    }

    fn guid(&mut self) -> Result<Guid> {
        let mut raw = [0u8; 16];
        raw.copy_from_slice(self.take(16)?);
        Ok(Guid(raw))
    }

    /// NUL-terminated UTF-8 run, as used by symbols.
    fn cstr(&mut self) -> Result<String> {
        let end = self
            .rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnexpectedEof {
                offset: self.position(),
                needed: self.rest.len() + 1,
                available: self.rest.len(),
            })?;
        let text = String::from_utf8_lossy(&self.rest[..end]).into_owned();
        self.rest.advance(end + 1);
        Ok(text)
    }

    /// Signed 8-byte element count.
    fn count(&mut self) -> Result<usize> {
        let offset = self.position();
        let length = self.i64()?;
        usize::try_from(length).map_err(|_| DecodeError::NegativeLength { length, offset })
    }

    /// Capacity hint that cannot exceed what the payload could hold.
    fn capacity(&self, count: usize) -> usize {
        count.min(self.rest.len())
    }

    fn value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep(MAX_DEPTH));
        }

        let offset = self.position();
        let raw = self.i8()?;

        if raw < 0 {
            return match TypeTag::from_code(raw.unsigned_abs()) {
                Some(tag) if tag.is_scalar() => self.atom(tag),
                _ => Err(DecodeError::UnknownTag { tag: raw, offset }),
            };
        }

        match TypeTag::from_code(raw as u8) {
            Some(TypeTag::List) => self.list(depth),
            Some(TypeTag::Char) => self.string(),
            Some(TypeTag::Table) => self.table(depth),
            Some(TypeTag::Dict) => self.dict(depth),
            Some(TypeTag::Null) => Ok(Value::Null),
            Some(TypeTag::Error) => self.error(depth),
            Some(TypeTag::Lambda) => Err(DecodeError::Unsupported(TypeTag::Lambda)),
            Some(tag) => self.vector(tag),
            None => Err(DecodeError::UnknownTag { tag: raw, offset }),
        }
    }

    fn atom(&mut self, tag: TypeTag) -> Result<Value> {
        Ok(match tag {
            TypeTag::Bool => Value::Bool(self.u8()? != 0),
            TypeTag::U8 => Value::U8(self.u8()?),
            TypeTag::I16 => Value::I16(self.i16()?),
            TypeTag::I32 => Value::I32(self.i32()?),
            TypeTag::I64 => Value::I64(self.i64()?),
            TypeTag::F64 => Value::F64(self.f64()?),
            TypeTag::Char => Value::Char(self.u8()?),
            TypeTag::Symbol => Value::Symbol(self.cstr()?),
            TypeTag::Date => Value::Date(nullable_i32(self.i32()?)),
            TypeTag::Time => Value::Time(nullable_i32(self.i32()?)),
            TypeTag::Timestamp => Value::Timestamp(nullable_i64(self.i64()?)),
            TypeTag::Guid => Value::Guid(self.guid()?),
            other => return Err(DecodeError::Unsupported(other)),
        })
    }

    fn string(&mut self) -> Result<Value> {
        let _attrs = self.u8()?;
        let len = self.count()?;
        let bytes = self.take(len)?;
        Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }

    fn list(&mut self, depth: usize) -> Result<Value> {
        let _attrs = self.u8()?;
        let len = self.count()?;
        let mut items = Vec::with_capacity(self.capacity(len));
        for _ in 0..len {
            items.push(self.value(depth + 1)?);
        }
        Ok(Value::List(items))
    }

    fn vector(&mut self, tag: TypeTag) -> Result<Value> {
        let _attrs = self.u8()?;
        let len = self.count()?;

        if tag == TypeTag::Symbol {
            let mut symbols = Vec::with_capacity(self.capacity(len));
            for _ in 0..len {
                symbols.push(self.cstr()?);
            }
            return Ok(Value::Vector(Vector::Symbol(symbols)));
        }

        let Some(width) = tag.width() else {
            return Err(DecodeError::Unsupported(tag));
        };
        let total = len.checked_mul(width).ok_or(DecodeError::UnexpectedEof {
            offset: self.position(),
            needed: usize::MAX,
            available: self.rest.len(),
        })?;
        let mut bytes = self.take(total)?;

        let vector = match tag {
            TypeTag::Bool => Vector::Bool(bytes.iter().map(|&b| b != 0).collect()),
            TypeTag::U8 => Vector::U8(bytes.to_vec()),
            TypeTag::I16 => Vector::I16((0..len).map(|_| bytes.get_i16_le()).collect()),
            TypeTag::I32 => Vector::I32((0..len).map(|_| bytes.get_i32_le()).collect()),
            TypeTag::I64 => Vector::I64((0..len).map(|_| bytes.get_i64_le()).collect()),
            TypeTag::F64 => Vector::F64((0..len).map(|_| bytes.get_f64_le()).collect()),
            TypeTag::Date => {
                Vector::Date((0..len).map(|_| nullable_i32(bytes.get_i32_le())).collect())
            }
            TypeTag::Time => {
                Vector::Time((0..len).map(|_| nullable_i32(bytes.get_i32_le())).collect())
            }
            TypeTag::Timestamp => Vector::Timestamp(
                (0..len)
                    .map(|_| nullable_i64(bytes.get_i64_le()))
                    .collect(),
            ),
            TypeTag::Guid => Vector::Guid(
                bytes
                    .chunks_exact(16)
                    .map(|chunk| {
                        let mut raw = [0u8; 16];
                        raw.copy_from_slice(chunk);
                        Guid(raw)
                    })
                    .collect(),
            ),
            other => return Err(DecodeError::Unsupported(other)),
        };
        Ok(Value::Vector(vector))
    }

    fn table(&mut self, depth: usize) -> Result<Value> {
        let _attrs = self.u8()?;

        let names = match self.value(depth + 1)? {
            Value::Vector(Vector::Symbol(names)) => names,
            other => {
                return Err(DecodeError::Malformed {
                    kind: TypeTag::Table,
                    reason: format!(
                        "column names must be a symbol vector, got {}",
                        other.type_name()
                    ),
                })
            }
        };

        let data = match self.value(depth + 1)? {
            Value::List(data) => data,
            other => {
                return Err(DecodeError::Malformed {
                    kind: TypeTag::Table,
                    reason: format!("columns must be a list, got {}", other.type_name()),
                })
            }
        };

        if self.options.strict {
            check_table_shape(&names, &data)?;
        }

        let columns = names
            .into_iter()
            .zip(data)
            .map(|(name, data)| Column {
                name,
                type_name: data.type_name(),
                data,
            })
            .collect();
        Ok(Value::Table(Table { columns }))
    }

    fn dict(&mut self, depth: usize) -> Result<Value> {
        let _attrs = self.u8()?;
        let keys = self.value(depth + 1)?;
        let values = self.value(depth + 1)?;

        if self.options.strict && keys.len() != values.len() {
            return Err(DecodeError::Malformed {
                kind: TypeTag::Dict,
                reason: format!(
                    "{} keys but {} values",
                    describe_len(keys.len()),
                    describe_len(values.len())
                ),
            });
        }

        Ok(Value::Dict(Dict::new(keys, values)))
    }

    fn error(&mut self, depth: usize) -> Result<Value> {
        let code = self.u8()?;
        let message = match self.value(depth + 1)? {
            Value::String(message) => message,
            other => other.to_string(),
        };
        Ok(Value::Error { code, message })
    }
}

fn check_table_shape(names: &[String], data: &[Value]) -> Result<()> {
    if names.len() != data.len() {
        return Err(DecodeError::Malformed {
            kind: TypeTag::Table,
            reason: format!("{} column names but {} columns", names.len(), data.len()),
        });
    }

    let mut rows = None;
    for (name, column) in names.iter().zip(data) {
        let Some(len) = column.len() else {
            return Err(DecodeError::Malformed {
                kind: TypeTag::Table,
                reason: format!("column '{name}' is a {} atom", column.type_name()),
            });
        };
        match rows {
            None => rows = Some(len),
            Some(expected) if expected != len => {
                return Err(DecodeError::Malformed {
                    kind: TypeTag::Table,
                    reason: format!("column '{name}' has {len} rows, expected {expected}"),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn describe_len(len: Option<usize>) -> String {
    len.map_or_else(|| "atom".to_string(), |n| n.to_string())
}

#[cfg(test)]
mod tests {
    use bytes::{BufMut, BytesMut};

    use super::*;

    fn vector_header(buf: &mut BytesMut, tag: TypeTag, len: i64) {
        buf.put_u8(tag.code());
        buf.put_u8(0);
        buf.put_i64_le(len);
    }

    fn symbols(buf: &mut BytesMut, names: &[&str]) {
        vector_header(buf, TypeTag::Symbol, names.len() as i64);
        for name in names {
            buf.put_slice(name.as_bytes());
            buf.put_u8(0);
        }
    }

    #[test]
    fn decodes_i32_atom() {
        assert_eq!(decode(&[0xFC, 0x02, 0x00, 0x00, 0x00]).unwrap(), Value::I32(2));
    }

    #[test]
    fn null_consumes_only_its_tag() {
        let (value, used) = decode_prefix(&[0x7E, 0xFF, 0xFF], DecodeOptions::default()).unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(used, 1);
    }

    #[test]
    fn decodes_error_with_string_message() {
        let payload = [
            0x7F, 0x05, 0x0C, 0x00, 0x03, 0, 0, 0, 0, 0, 0, 0, b'b', b'a', b'd',
        ];
        assert_eq!(
            decode(&payload).unwrap(),
            Value::Error {
                code: 5,
                message: "bad".to_string()
            }
        );
    }

    #[test]
    fn error_with_non_string_message_is_stringified() {
        let payload = [0x7F, 0x01, 0xFA, b'o', b'o', b'p', b's', 0x00];
        assert_eq!(
            decode(&payload).unwrap(),
            Value::Error {
                code: 1,
                message: "oops".to_string()
            }
        );
    }

    #[test]
    fn decodes_scalar_atoms() {
        assert_eq!(decode(&[0xFF, 0x01]).unwrap(), Value::Bool(true));
        assert_eq!(decode(&[0xFE, 0xC8]).unwrap(), Value::U8(200));
        assert_eq!(decode(&[0xFD, 0xFE, 0xFF]).unwrap(), Value::I16(-2));
        assert_eq!(decode(&[0xF4, b'x']).unwrap(), Value::Char(b'x'));
        assert_eq!(
            decode(&[0xFA, b'a', b'b', 0x00]).unwrap(),
            Value::Symbol("ab".into())
        );

        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::I64.atom_code());
        buf.put_i64_le(-42);
        assert_eq!(decode(&buf).unwrap(), Value::I64(-42));

        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::F64.atom_code());
        buf.put_f64_le(1.5);
        assert_eq!(decode(&buf).unwrap(), Value::F64(1.5));

        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::Guid.atom_code());
        buf.put_slice(&[0x11; 16]);
        assert_eq!(decode(&buf).unwrap(), Value::Guid(Guid([0x11; 16])));
    }

    #[test]
    fn temporal_sentinels_decode_to_null() {
        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::Date.atom_code());
        buf.put_i32_le(i32::MIN);
        assert_eq!(decode(&buf).unwrap(), Value::Date(None));

        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::Time.atom_code());
        buf.put_i32_le(i32::MIN);
        assert_eq!(decode(&buf).unwrap(), Value::Time(None));

        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::Timestamp.atom_code());
        buf.put_i64_le(i64::MIN);
        assert_eq!(decode(&buf).unwrap(), Value::Timestamp(None));

        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::Date, 3);
        buf.put_i32_le(0);
        buf.put_i32_le(i32::MIN);
        buf.put_i32_le(i32::MIN + 1);
        assert_eq!(
            decode(&buf).unwrap(),
            Value::Vector(Vector::Date(vec![Some(0), None, Some(i32::MIN + 1)]))
        );

        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::Timestamp, 2);
        buf.put_i64_le(i64::MIN);
        buf.put_i64_le(1_000);
        assert_eq!(
            decode(&buf).unwrap(),
            Value::Vector(Vector::Timestamp(vec![None, Some(1_000)]))
        );
    }

    #[test]
    fn decodes_fixed_width_vectors() {
        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::I16, 2);
        buf.put_i16_le(7);
        buf.put_i16_le(-7);
        assert_eq!(
            decode(&buf).unwrap(),
            Value::Vector(Vector::I16(vec![7, -7]))
        );

        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::Bool, 3);
        buf.put_slice(&[1, 0, 2]);
        assert_eq!(
            decode(&buf).unwrap(),
            Value::Vector(Vector::Bool(vec![true, false, true]))
        );

        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::U8, 3);
        buf.put_slice(&[0, 0, 9]);
        assert_eq!(
            decode(&buf).unwrap(),
            Value::Vector(Vector::U8(vec![0, 0, 9]))
        );

        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::I32, 3);
        buf.put_i32_le(1);
        buf.put_i32_le(-1);
        buf.put_i32_le(i32::MAX);
        assert_eq!(
            decode(&buf).unwrap(),
            Value::Vector(Vector::I32(vec![1, -1, i32::MAX]))
        );
    }

    #[test]
    fn decodes_f64_vector_with_nan() {
        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::F64, 3);
        buf.put_f64_le(-2.25);
        buf.put_f64_le(f64::NAN);
        buf.put_f64_le(0.0);

        let Value::Vector(Vector::F64(items)) = decode(&buf).unwrap() else {
            panic!("expected an f64 vector");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], -2.25);
        assert!(items[1].is_nan());
        assert_eq!(items[2], 0.0);
    }

    #[test]
    fn decodes_time_vector_with_null() {
        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::Time, 3);
        buf.put_i32_le(0);
        buf.put_i32_le(i32::MIN);
        buf.put_i32_le(86_399_999);
        assert_eq!(
            decode(&buf).unwrap(),
            Value::Vector(Vector::Time(vec![Some(0), None, Some(86_399_999)]))
        );
    }

    #[test]
    fn decodes_guid_vector() {
        let first: [u8; 16] = std::array::from_fn(|i| i as u8);
        let second = [0xEE; 16];

        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::Guid, 2);
        buf.put_slice(&first);
        buf.put_slice(&second);
        assert_eq!(
            decode(&buf).unwrap(),
            Value::Vector(Vector::Guid(vec![Guid(first), Guid(second)]))
        );

        // Second element cut short.
        let mut short = BytesMut::new();
        vector_header(&mut short, TypeTag::Guid, 2);
        short.put_slice(&first);
        short.put_slice(&second[..8]);
        assert!(matches!(
            decode(&short),
            Err(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn empty_and_nul_bearing_content_keeps_length() {
        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::I64, 0);
        assert_eq!(decode(&buf).unwrap(), Value::Vector(Vector::I64(vec![])));

        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::Char, 3);
        buf.put_slice(b"a\0b");
        assert_eq!(decode(&buf).unwrap(), Value::String("a\0b".into()));
    }

    #[test]
    fn decodes_heterogeneous_list() {
        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::List, 3);
        buf.put_u8(TypeTag::I32.atom_code());
        buf.put_i32_le(1);
        buf.put_u8(TypeTag::Null.code());
        symbols(&mut buf, &["a", "b"]);

        assert_eq!(
            decode(&buf).unwrap(),
            Value::List(vec![
                Value::I32(1),
                Value::Null,
                Value::Vector(Vector::Symbol(vec!["a".into(), "b".into()])),
            ])
        );
    }

    #[test]
    fn decodes_table_with_column_types() {
        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::Table.code());
        buf.put_u8(0);
        symbols(&mut buf, &["id", "sym"]);
        vector_header(&mut buf, TypeTag::List, 2);
        vector_header(&mut buf, TypeTag::I64, 2);
        buf.put_i64_le(10);
        buf.put_i64_le(20);
        symbols(&mut buf, &["x", "y"]);

        let Value::Table(table) = decode(&buf).unwrap() else {
            panic!("expected table");
        };
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[0].name, "id");
        assert_eq!(table.columns[0].type_name, "i64");
        assert_eq!(table.columns[1].type_name, "symbol");
        assert_eq!(
            table.columns[1].data,
            Value::Vector(Vector::Symbol(vec!["x".into(), "y".into()]))
        );
    }

    fn ragged_table() -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::Table.code());
        buf.put_u8(0);
        symbols(&mut buf, &["a", "b"]);
        vector_header(&mut buf, TypeTag::List, 2);
        vector_header(&mut buf, TypeTag::I32, 2);
        buf.put_i32_le(1);
        buf.put_i32_le(2);
        vector_header(&mut buf, TypeTag::I32, 1);
        buf.put_i32_le(3);
        buf
    }

    #[test]
    fn ragged_table_is_trusted_by_default() {
        let Value::Table(table) = decode(&ragged_table()).unwrap() else {
            panic!("expected table");
        };
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[1].data.len(), Some(1));
    }

    #[test]
    fn strict_mode_rejects_ragged_table() {
        let err = decode_with(&ragged_table(), DecodeOptions { strict: true }).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Malformed {
                kind: TypeTag::Table,
                ..
            }
        ));
    }

    #[test]
    fn table_keys_must_be_symbols() {
        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::Table.code());
        buf.put_u8(0);
        buf.put_u8(TypeTag::Null.code());
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::Malformed {
                kind: TypeTag::Table,
                ..
            })
        ));
    }

    fn uneven_dict() -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u8(TypeTag::Dict.code());
        buf.put_u8(0);
        symbols(&mut buf, &["a", "b"]);
        vector_header(&mut buf, TypeTag::I32, 1);
        buf.put_i32_le(1);
        buf
    }

    #[test]
    fn dict_parity_checked_only_in_strict_mode() {
        let Value::Dict(dict) = decode(&uneven_dict()).unwrap() else {
            panic!("expected dict");
        };
        assert_eq!(dict.keys.len(), Some(2));
        assert_eq!(dict.values.len(), Some(1));

        let err = decode_with(&uneven_dict(), DecodeOptions { strict: true }).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Malformed {
                kind: TypeTag::Dict,
                ..
            }
        ));
    }

    #[test]
    fn unknown_tags_abort() {
        assert_eq!(
            decode(&[0x2A]).unwrap_err(),
            DecodeError::UnknownTag { tag: 42, offset: 0 }
        );
        assert_eq!(
            decode(&[0x80]).unwrap_err(),
            DecodeError::UnknownTag {
                tag: -128,
                offset: 0
            }
        );
        assert_eq!(
            decode(&[0x9E]).unwrap_err(),
            DecodeError::UnknownTag { tag: -98, offset: 0 }
        );
        assert_eq!(
            decode(&[100]).unwrap_err(),
            DecodeError::Unsupported(TypeTag::Lambda)
        );
    }

    #[test]
    fn unknown_tag_inside_list_reports_offset() {
        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::List, 2);
        buf.put_u8(TypeTag::Null.code());
        buf.put_u8(50);
        assert_eq!(
            decode(&buf).unwrap_err(),
            DecodeError::UnknownTag { tag: 50, offset: 11 }
        );
    }

    #[test]
    fn truncated_payloads_fail() {
        assert!(matches!(
            decode(&[0xFC, 0x02, 0x00]),
            Err(DecodeError::UnexpectedEof { offset: 1, .. })
        ));
        assert!(matches!(decode(&[]), Err(DecodeError::UnexpectedEof { .. })));
        assert!(matches!(
            decode(&[0xFA, b'a']),
            Err(DecodeError::UnexpectedEof { .. })
        ));

        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::I64, i64::MAX);
        assert!(matches!(decode(&buf), Err(DecodeError::UnexpectedEof { .. })));
    }

    #[test]
    fn negative_counts_fail() {
        let mut buf = BytesMut::new();
        vector_header(&mut buf, TypeTag::I32, -1);
        assert_eq!(
            decode(&buf).unwrap_err(),
            DecodeError::NegativeLength {
                length: -1,
                offset: 2
            }
        );
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let mut buf = BytesMut::new();
        for _ in 0..=MAX_DEPTH + 1 {
            vector_header(&mut buf, TypeTag::List, 1);
        }
        buf.put_u8(TypeTag::Null.code());
        assert_eq!(decode(&buf).unwrap_err(), DecodeError::TooDeep(MAX_DEPTH));
    }
}
