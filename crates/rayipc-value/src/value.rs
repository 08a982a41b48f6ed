use crate::tag::TypeTag;

/// A 16-byte GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid(pub [u8; 16]);

impl Guid {
    /// Lowercase hex rendering, 32 characters.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(32);
        for byte in self.0 {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }
}

/// A homogeneous vector of one scalar kind.
///
/// Temporal elements are `None` where the wire carried the null sentinel.
/// Character vectors never appear here; they decode to [`Value::String`].
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Bool(Vec<bool>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Symbol(Vec<String>),
    Date(Vec<Option<i32>>),
    Time(Vec<Option<i32>>),
    Timestamp(Vec<Option<i64>>),
    Guid(Vec<Guid>),
}

impl Vector {
    /// Scalar kind of the elements.
    pub fn tag(&self) -> TypeTag {
        match self {
            Vector::Bool(_) => TypeTag::Bool,
            Vector::U8(_) => TypeTag::U8,
            Vector::I16(_) => TypeTag::I16,
            Vector::I32(_) => TypeTag::I32,
            Vector::I64(_) => TypeTag::I64,
            Vector::F64(_) => TypeTag::F64,
            Vector::Symbol(_) => TypeTag::Symbol,
            Vector::Date(_) => TypeTag::Date,
            Vector::Time(_) => TypeTag::Time,
            Vector::Timestamp(_) => TypeTag::Timestamp,
            Vector::Guid(_) => TypeTag::Guid,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Vector::Bool(v) => v.len(),
            Vector::U8(v) => v.len(),
            Vector::I16(v) => v.len(),
            Vector::I32(v) => v.len(),
            Vector::I64(v) => v.len(),
            Vector::F64(v) => v.len(),
            Vector::Symbol(v) => v.len(),
            Vector::Date(v) | Vector::Time(v) => v.len(),
            Vector::Timestamp(v) => v.len(),
            Vector::Guid(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index` as an atom.
    pub fn get(&self, index: usize) -> Option<Value> {
        Some(match self {
            Vector::Bool(v) => Value::Bool(*v.get(index)?),
            Vector::U8(v) => Value::U8(*v.get(index)?),
            Vector::I16(v) => Value::I16(*v.get(index)?),
            Vector::I32(v) => Value::I32(*v.get(index)?),
            Vector::I64(v) => Value::I64(*v.get(index)?),
            Vector::F64(v) => Value::F64(*v.get(index)?),
            Vector::Symbol(v) => Value::Symbol(v.get(index)?.clone()),
            Vector::Date(v) => Value::Date(*v.get(index)?),
            Vector::Time(v) => Value::Time(*v.get(index)?),
            Vector::Timestamp(v) => Value::Timestamp(*v.get(index)?),
            Vector::Guid(v) => Value::Guid(*v.get(index)?),
        })
    }
}

/// One table column with the type resolved from its own leading tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub type_name: &'static str,
    pub data: Value,
}

/// Column-oriented table.
///
/// Column lengths are whatever the producer sent; see
/// [`DecodeOptions::strict`](crate::DecodeOptions::strict) for validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Row count, taken from the first column.
    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .and_then(|column| column.data.len())
            .unwrap_or(0)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Parallel keys and values. Positional alignment is the producer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Dict {
    pub keys: Box<Value>,
    pub values: Box<Value>,
}

impl Dict {
    pub fn new(keys: Value, values: Value) -> Self {
        Self {
            keys: Box::new(keys),
            values: Box::new(values),
        }
    }

    /// Key/value pairs up to the shorter side.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        let len = self
            .keys
            .len()
            .unwrap_or(1)
            .min(self.values.len().unwrap_or(1));
        (0..len)
            .filter_map(|i| Some((self.keys.get(i)?, self.values.get(i)?)))
            .collect()
    }
}

/// Every datum that crosses the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    U8(u8),
    I16(i16),
    I32(i32),
    I64(i64),
    F64(f64),
    Char(u8),
    String(String),
    Symbol(String),
    /// Days since 2000-01-01. `None` is the null date.
    Date(Option<i32>),
    /// Milliseconds since midnight. `None` is the null time.
    Time(Option<i32>),
    /// Nanoseconds since 2000-01-01T00:00:00. `None` is the null timestamp.
    Timestamp(Option<i64>),
    Guid(Guid),
    Vector(Vector),
    List(Vec<Value>),
    Table(Table),
    Dict(Dict),
    /// Evaluation error reported by the server. This is a successful decode,
    /// not a transport failure.
    Error { code: u8, message: String },
}

impl Value {
    /// Resolved type name, as recorded for table columns.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => TypeTag::Null.name(),
            Value::Bool(_) => TypeTag::Bool.name(),
            Value::U8(_) => TypeTag::U8.name(),
            Value::I16(_) => TypeTag::I16.name(),
            Value::I32(_) => TypeTag::I32.name(),
            Value::I64(_) => TypeTag::I64.name(),
            Value::F64(_) => TypeTag::F64.name(),
            Value::Char(_) => TypeTag::Char.name(),
            Value::String(_) => "string",
            Value::Symbol(_) => TypeTag::Symbol.name(),
            Value::Date(_) => TypeTag::Date.name(),
            Value::Time(_) => TypeTag::Time.name(),
            Value::Timestamp(_) => TypeTag::Timestamp.name(),
            Value::Guid(_) => TypeTag::Guid.name(),
            Value::Vector(v) => v.tag().name(),
            Value::List(_) => TypeTag::List.name(),
            Value::Table(_) => TypeTag::Table.name(),
            Value::Dict(_) => TypeTag::Dict.name(),
            Value::Error { .. } => TypeTag::Error.name(),
        }
    }

    /// True for `Null` and for temporal atoms carrying the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Date(None) | Value::Time(None) | Value::Timestamp(None)
        )
    }

    /// True for a server-reported evaluation error.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error { .. })
    }

    /// Element count for vectors, lists and strings; row count for tables.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Vector(v) => Some(v.len()),
            Value::List(items) => Some(items.len()),
            Value::String(s) => Some(s.len()),
            Value::Table(t) => Some(t.row_count()),
            Value::Dict(d) => d.keys.len(),
            _ => None,
        }
    }

    /// Element `index` of a vector, list or string.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Value::Vector(v) => v.get(index),
            Value::List(items) => items.get(index).cloned(),
            Value::String(s) => s.as_bytes().get(index).map(|b| Value::Char(*b)),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::U8(v) => Some(i64::from(*v)),
            Value::I16(v) => Some(i64::from(*v)),
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_text_accessors() {
        assert_eq!(Value::U8(200).as_i64(), Some(200));
        assert_eq!(Value::I16(-3).as_i64(), Some(-3));
        assert_eq!(Value::I64(i64::MIN).as_i64(), Some(i64::MIN));
        assert_eq!(Value::F64(1.0).as_i64(), None);

        assert_eq!(Value::Symbol("sym".into()).as_str(), Some("sym"));
        assert_eq!(Value::String("text".into()).as_str(), Some("text"));
        assert_eq!(Value::Char(b'c').as_str(), None);
    }

    #[test]
    fn guid_hex_is_lowercase() {
        let mut raw = [0u8; 16];
        raw[0] = 0xAB;
        raw[15] = 0x0F;
        assert_eq!(Guid(raw).to_hex(), "ab00000000000000000000000000000f");
    }

    #[test]
    fn table_row_count_comes_from_first_column() {
        let table = Table {
            columns: vec![
                Column {
                    name: "a".into(),
                    type_name: "i64",
                    data: Value::Vector(Vector::I64(vec![1, 2, 3])),
                },
                Column {
                    name: "b".into(),
                    type_name: "symbol",
                    data: Value::Vector(Vector::Symbol(vec!["x".into()])),
                },
            ],
        };
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(table.column("b").is_some());
    }

    #[test]
    fn dict_entries_stop_at_shorter_side() {
        let dict = Dict::new(
            Value::Vector(Vector::Symbol(vec!["a".into(), "b".into()])),
            Value::Vector(Vector::I32(vec![1])),
        );
        assert_eq!(
            dict.entries(),
            vec![(Value::Symbol("a".into()), Value::I32(1))]
        );
    }

    #[test]
    fn null_temporal_atoms_are_null() {
        assert!(Value::Date(None).is_null());
        assert!(Value::Timestamp(None).is_null());
        assert!(!Value::Date(Some(i32::MIN + 1)).is_null());
        assert!(!Value::I64(i64::MIN).is_null());
    }
}
