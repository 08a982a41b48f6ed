use bytes::{BufMut, Bytes, BytesMut};

use crate::decode::{NULL_I32, NULL_I64};
use crate::tag::TypeTag;
use crate::value::{Table, Value, Vector};

/// Serialize a statement for the server to evaluate.
///
/// Produces `12 | 0 | len (i64 LE) | utf8 bytes`.
pub fn encode_statement(statement: &str) -> Bytes {
    let mut dst = BytesMut::with_capacity(10 + statement.len());
    put_string(&mut dst, statement);
    dst.freeze()
}

/// Serialize any value in the wire format [`decode`](crate::decode) reads.
///
/// Null temporal values are written as their sentinels.
pub fn encode_value(value: &Value, dst: &mut BytesMut) {
    match value {
        Value::Null => dst.put_u8(TypeTag::Null.code()),
        Value::Bool(v) => {
            dst.put_u8(TypeTag::Bool.atom_code());
            dst.put_u8(u8::from(*v));
        }
        Value::U8(v) => {
            dst.put_u8(TypeTag::U8.atom_code());
            dst.put_u8(*v);
        }
        Value::I16(v) => {
            dst.put_u8(TypeTag::I16.atom_code());
            dst.put_i16_le(*v);
        }
        Value::I32(v) => {
            dst.put_u8(TypeTag::I32.atom_code());
            dst.put_i32_le(*v);
        }
        Value::I64(v) => {
            dst.put_u8(TypeTag::I64.atom_code());
            dst.put_i64_le(*v);
        }
        Value::F64(v) => {
            dst.put_u8(TypeTag::F64.atom_code());
            dst.put_f64_le(*v);
        }
        Value::Char(v) => {
            dst.put_u8(TypeTag::Char.atom_code());
            dst.put_u8(*v);
        }
        Value::String(s) => put_string(dst, s),
        Value::Symbol(s) => {
            dst.put_u8(TypeTag::Symbol.atom_code());
            put_cstr(dst, s);
        }
        Value::Date(v) => {
            dst.put_u8(TypeTag::Date.atom_code());
            dst.put_i32_le(v.unwrap_or(NULL_I32));
        }
        Value::Time(v) => {
            dst.put_u8(TypeTag::Time.atom_code());
            dst.put_i32_le(v.unwrap_or(NULL_I32));
        }
        Value::Timestamp(v) => {
            dst.put_u8(TypeTag::Timestamp.atom_code());
            dst.put_i64_le(v.unwrap_or(NULL_I64));
        }
        Value::Guid(g) => {
            dst.put_u8(TypeTag::Guid.atom_code());
            dst.put_slice(&g.0);
        }
        Value::Vector(v) => put_vector(dst, v),
        Value::List(items) => {
            put_header(dst, TypeTag::List, items.len());
            for item in items {
                encode_value(item, dst);
            }
        }
        Value::Table(table) => put_table(dst, table),
        Value::Dict(dict) => {
            dst.put_u8(TypeTag::Dict.code());
            dst.put_u8(0);
            encode_value(&dict.keys, dst);
            encode_value(&dict.values, dst);
        }
        Value::Error { code, message } => {
            dst.put_u8(TypeTag::Error.code());
            dst.put_u8(*code);
            put_string(dst, message);
        }
    }
}

fn put_header(dst: &mut BytesMut, tag: TypeTag, len: usize) {
    dst.put_u8(tag.code());
    dst.put_u8(0);
    dst.put_i64_le(len as i64);
}

fn put_string(dst: &mut BytesMut, s: &str) {
    put_header(dst, TypeTag::Char, s.len());
    dst.put_slice(s.as_bytes());
}

fn put_cstr(dst: &mut BytesMut, s: &str) {
    dst.put_slice(s.as_bytes());
    dst.put_u8(0);
}

fn put_vector(dst: &mut BytesMut, vector: &Vector) {
    put_header(dst, vector.tag(), vector.len());
    match vector {
        Vector::Bool(v) => v.iter().for_each(|b| dst.put_u8(u8::from(*b))),
        Vector::U8(v) => dst.put_slice(v),
        Vector::I16(v) => v.iter().for_each(|x| dst.put_i16_le(*x)),
        Vector::I32(v) => v.iter().for_each(|x| dst.put_i32_le(*x)),
        Vector::I64(v) => v.iter().for_each(|x| dst.put_i64_le(*x)),
        Vector::F64(v) => v.iter().for_each(|x| dst.put_f64_le(*x)),
        Vector::Symbol(v) => v.iter().for_each(|s| put_cstr(dst, s)),
        Vector::Date(v) | Vector::Time(v) => v
            .iter()
            .for_each(|x| dst.put_i32_le(x.unwrap_or(NULL_I32))),
        Vector::Timestamp(v) => v
            .iter()
            .for_each(|x| dst.put_i64_le(x.unwrap_or(NULL_I64))),
        Vector::Guid(v) => v.iter().for_each(|g| dst.put_slice(&g.0)),
    }
}

fn put_table(dst: &mut BytesMut, table: &Table) {
    dst.put_u8(TypeTag::Table.code());
    dst.put_u8(0);

    put_header(dst, TypeTag::Symbol, table.columns.len());
    for column in &table.columns {
        put_cstr(dst, &column.name);
    }

    put_header(dst, TypeTag::List, table.columns.len());
    for column in &table.columns {
        encode_value(&column.data, dst);
    }
}
