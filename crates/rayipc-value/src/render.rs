//! Human-readable and JSON renderings of [`Value`].
//!
//! Dates render as `YYYY.MM.DD`, times as `HH:MM:SS.mmm`, timestamps as
//! `YYYY.MM.DDDhh:mm:ss.nnnnnnnnn`. Null temporals render as `0Nd`, `0Nt`
//! and `0Np` in text and as JSON `null`.

use std::fmt::{self, Write as _};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::value::{Column, Dict, Guid, Table, Value, Vector};

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

fn epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2000, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// Render a day offset from 2000-01-01.
pub fn format_date(days: i32) -> String {
    epoch()
        .and_then(|e| e.date().checked_add_signed(TimeDelta::try_days(days.into())?))
        .map(|d| d.format("%Y.%m.%d").to_string())
        .unwrap_or_else(|| format!("{days}d"))
}

/// Render milliseconds since midnight. Values outside one day keep counting hours.
pub fn format_time(millis: i32) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let ms = i64::from(millis).abs();
    format!(
        "{sign}{:02}:{:02}:{:02}.{:03}",
        ms / MS_PER_HOUR,
        ms % MS_PER_HOUR / MS_PER_MINUTE,
        ms % MS_PER_MINUTE / MS_PER_SECOND,
        ms % MS_PER_SECOND
    )
}

/// Render nanoseconds since 2000-01-01T00:00:00.
pub fn format_timestamp(nanos: i64) -> String {
    epoch()
        .and_then(|e| e.checked_add_signed(TimeDelta::nanoseconds(nanos)))
        .map(|t| t.format("%Y.%m.%dD%H:%M:%S%.9f").to_string())
        .unwrap_or_else(|| format!("{nanos}ns"))
}

fn opt_date(v: Option<i32>) -> String {
    v.map_or_else(|| "0Nd".to_string(), format_date)
}

fn opt_time(v: Option<i32>) -> String {
    v.map_or_else(|| "0Nt".to_string(), format_time)
}

fn opt_timestamp(v: Option<i64>) -> String {
    v.map_or_else(|| "0Np".to_string(), format_timestamp)
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        for i in 0..self.len() {
            if i > 0 {
                f.write_char(' ')?;
            }
            if let Some(item) = self.get(i) {
                write!(f, "{item}")?;
            }
        }
        f.write_char(']')
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.column_names().collect();
        write!(f, "{}", names.join(" | "))?;
        for row in 0..self.row_count() {
            f.write_char('\n')?;
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    f.write_str(" | ")?;
                }
                match column.data.get(row) {
                    Some(cell) => write!(f, "{cell}")?,
                    None => f.write_str("")?,
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        if entries.is_empty() {
            return write!(f, "{{{} -> {}}}", self.keys, self.values);
        }
        f.write_char('{')?;
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_char('}')
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Char(v) => f.write_char(char::from(*v)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => f.write_str(s),
            Value::Date(v) => f.write_str(&opt_date(*v)),
            Value::Time(v) => f.write_str(&opt_time(*v)),
            Value::Timestamp(v) => f.write_str(&opt_timestamp(*v)),
            Value::Guid(g) => write!(f, "{g}"),
            Value::Vector(v) => write!(f, "{v}"),
            Value::List(items) => {
                f.write_char('(')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(';')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(')')
            }
            Value::Table(t) => write!(f, "{t}"),
            Value::Dict(d) => write!(f, "{d}"),
            Value::Error { code, message } => write!(f, "error({code}): {message}"),
        }
    }
}

impl Serialize for Vector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Vector::Bool(v) => v.serialize(serializer),
            Vector::U8(v) => v.serialize(serializer),
            Vector::I16(v) => v.serialize(serializer),
            Vector::I32(v) => v.serialize(serializer),
            Vector::I64(v) => v.serialize(serializer),
            Vector::F64(v) => v.serialize(serializer),
            Vector::Symbol(v) => v.serialize(serializer),
            Vector::Date(v) => serializer.collect_seq(v.iter().map(|d| (*d).map(format_date))),
            Vector::Time(v) => serializer.collect_seq(v.iter().map(|t| (*t).map(format_time))),
            Vector::Timestamp(v) => {
                serializer.collect_seq(v.iter().map(|t| (*t).map(format_timestamp)))
            }
            Vector::Guid(v) => serializer.collect_seq(v.iter().map(Guid::to_hex)),
        }
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Column", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", self.type_name)?;
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Char(v) => serializer.serialize_char(char::from(*v)),
            Value::String(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Date(v) => (*v).map(format_date).serialize(serializer),
            Value::Time(v) => (*v).map(format_time).serialize(serializer),
            Value::Timestamp(v) => (*v).map(format_timestamp).serialize(serializer),
            Value::Guid(g) => serializer.serialize_str(&g.to_hex()),
            Value::Vector(v) => v.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Table(t) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("columns", &t.columns)?;
                map.end()
            }
            Value::Dict(d) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("keys", d.keys.as_ref())?;
                map.serialize_entry("values", d.values.as_ref())?;
                map.end()
            }
            Value::Error { code, message } => {
                let mut state = serializer.serialize_struct("Error", 2)?;
                state.serialize_field("code", code)?;
                state.serialize_field("error", message)?;
                state.end()
            }
        }
    }
}
