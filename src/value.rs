//! Dynamic candidate values and their diagnostic rendering.
//!
//! Matchers compare against [`Value`], a closed tagged representation of the
//! kinds of data a test assertion realistically sees. Concrete Rust values
//! enter through [`ToValue`], which the equality operators call implicitly.
//! The `Display` impl here is the rendering used verbatim inside failure
//! messages, so it is exact and stable rather than merely informative.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use itertools::Itertools;
use jiff::Timestamp;

/// A dynamic value compared against an [`AnyValue`](crate::AnyValue) matcher.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The absence of a value. `Option::None` converts to this.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A byte-string. Built with [`Value::bytes`]; `Vec<u8>` converts to a
    /// list of ints instead.
    Bytes(Vec<u8>),
    List(Vec<Value>),
    /// String-keyed map. `BTreeMap` keeps the rendering sorted.
    Map(BTreeMap<String, Value>),
    /// A point in time, as recorded by mock call logs.
    Timestamp(Timestamp),
}

/// The runtime kind of a [`Value`].
///
/// There is no kind for the absence of a value; absence is expressed at the
/// type-expression level by [`TypeSpec::None`](crate::TypeSpec::None). A
/// `Bool` is not an `Int`: Rust has no bool/integer subtyping, so no numeric
/// promotion happens during the type check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Map,
    Timestamp,
}

impl ValueKind {
    /// Lowercase name used in type expressions and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::Bytes => "bytes",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Timestamp => "timestamp",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<ValueKind> {
        let kind = match name {
            "bool" => ValueKind::Bool,
            "int" => ValueKind::Int,
            "float" => ValueKind::Float,
            "str" => ValueKind::Str,
            "bytes" => ValueKind::Bytes,
            "list" => ValueKind::List,
            "map" => ValueKind::Map,
            "timestamp" => ValueKind::Timestamp,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Builds a byte-string value from anything that views as bytes.
    pub fn bytes(bytes: impl AsRef<[u8]>) -> Value {
        Value::Bytes(bytes.as_ref().to_vec())
    }

    /// Builds a list value, converting each item.
    pub fn list<T: ToValue>(items: impl IntoIterator<Item = T>) -> Value {
        Value::List(items.into_iter().map(|item| item.to_value()).collect())
    }

    /// The runtime kind, or `None` for the absence value.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::None => None,
            Value::Bool(_) => Some(ValueKind::Bool),
            Value::Int(_) => Some(ValueKind::Int),
            Value::Float(_) => Some(ValueKind::Float),
            Value::Str(_) => Some(ValueKind::Str),
            Value::Bytes(_) => Some(ValueKind::Bytes),
            Value::List(_) => Some(ValueKind::List),
            Value::Map(_) => Some(ValueKind::Map),
            Value::Timestamp(_) => Some(ValueKind::Timestamp),
        }
    }

    /// Name of the runtime type, as spelled in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.name(),
            None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Cross-kind partial ordering used by the bound constraints.
    ///
    /// Ints and floats compare against each other through `f64`; strings,
    /// bytes and timestamps compare within their own kind. Everything else
    /// (and NaN) is incomparable. This is deliberately not `PartialOrd`:
    /// `Int(5)` and `Float(5.0)` compare `Equal` here without being `==`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Length for the kinds that have one: chars of a `Str`, bytes of a
    /// `Bytes`, elements of a `List`, entries of a `Map`.
    pub(crate) fn length(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Bytes(bytes) => Some(bytes.len()),
            Value::List(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            // `{:?}` keeps the decimal point on round floats (`3.0`), which
            // keeps floats distinguishable from ints in failure messages.
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "'{}'", s.escape_debug()),
            Value::Bytes(bytes) => write!(f, "b'{}'", bytes.escape_ascii()),
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Map(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| format!("'{}': {}", key.escape_debug(), value))
                    .join(", ");
                write!(f, "{{{}}}", entries)
            }
            Value::Timestamp(ts) => write!(f, "{}", ts),
        }
    }
}

/// By-reference conversion into a [`Value`] candidate.
///
/// The equality operators take candidates by reference, so conversion is by
/// reference too. Implemented for the primitives assertions actually use,
/// plus `Option` (the absence-sentinel mapping), `Vec`/slices (lists) and
/// string-keyed maps.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<'a, T: ToValue + ?Sized> ToValue for &'a T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! int_to_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }
        }
    )+};
}

// Candidate integers are modeled as `i64`; wider types convert explicitly
// at the call site.
int_to_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::None,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(|item| item.to_value()).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_value()))
                .collect(),
        )
    }
}

impl<T: ToValue> ToValue for HashMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use std::collections::{BTreeMap, HashMap};

    use super::{ToValue, Value, ValueKind};

    #[track_caller]
    fn renders(value: Value, expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn rendering() {
        renders(Value::None, "None");
        renders(Value::Bool(true), "true");
        renders(Value::Bool(false), "false");
        renders(Value::Int(5), "5");
        renders(Value::Int(-10), "-10");
        renders(Value::Float(3.14), "3.14");
        renders(Value::Float(3.0), "3.0");
        renders(Value::Float(f64::NAN), "NaN");
        renders(Value::Str("hello".into()), "'hello'");
        renders(Value::Str("it's".into()), "'it\\'s'");
        renders(Value::bytes(b"hi"), "b'hi'");
        renders(Value::bytes([0xffu8]), "b'\\xff'");
        renders(Value::list([1, 2, 3]), "[1, 2, 3]");
        renders(Value::list(["a", "b"]), "['a', 'b']");
        renders(Value::List(vec![]), "[]");
    }

    #[test]
    fn map_rendering_is_sorted() {
        let mut entries = BTreeMap::new();
        entries.insert("b".to_string(), Value::Int(2));
        entries.insert("a".to_string(), Value::Str("x".into()));
        renders(Value::Map(entries), "{'a': 'x', 'b': 2}");
        renders(Value::Map(BTreeMap::new()), "{}");
    }

    #[test]
    fn timestamp_rendering() {
        let ts: jiff::Timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
        renders(Value::Timestamp(ts), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn kinds_and_names() {
        assert_eq!(Value::None.kind(), None);
        assert_eq!(Value::None.type_name(), "none");
        assert_eq!(Value::Int(1).kind(), Some(ValueKind::Int));
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Bool(true).kind(), Some(ValueKind::Bool));
        assert_eq!(Value::bytes(b"x").type_name(), "bytes");
        assert_eq!(ValueKind::Timestamp.to_string(), "timestamp");
        assert_eq!(ValueKind::from_name("map"), Some(ValueKind::Map));
        assert_eq!(ValueKind::from_name("integer"), None);
    }

    #[test]
    fn conversions() {
        assert_eq!(42i32.to_value(), Value::Int(42));
        assert_eq!(42u8.to_value(), Value::Int(42));
        assert_eq!(2.5f64.to_value(), Value::Float(2.5));
        assert_eq!(false.to_value(), Value::Bool(false));
        assert_eq!("hi".to_value(), Value::Str("hi".into()));
        assert_eq!("hi".to_string().to_value(), Value::Str("hi".into()));
        assert_eq!(None::<i32>.to_value(), Value::None);
        assert_eq!(Some(7).to_value(), Value::Int(7));
        assert_eq!(Some("x").to_value(), Value::Str("x".into()));
        // `Vec<u8>` is a list of ints, not a byte-string.
        assert_eq!(
            vec![1u8, 2u8].to_value(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            vec!["a"].to_value(),
            Value::List(vec![Value::Str("a".into())])
        );
        let reference = &5i64;
        assert_eq!(reference.to_value(), Value::Int(5));

        let mut map = BTreeMap::new();
        map.insert("k".to_string(), 1);
        assert_eq!(
            map.to_value(),
            Value::Map(BTreeMap::from([("k".to_string(), Value::Int(1))]))
        );

        // Hash maps land in key order regardless of insertion order.
        let mut unordered = HashMap::new();
        unordered.insert("b".to_string(), 2);
        unordered.insert("a".to_string(), 1);
        unordered.insert("c".to_string(), 3);
        assert_eq!(
            unordered.to_value(),
            Value::Map(BTreeMap::from([
                ("a".to_string(), Value::Int(1)),
                ("b".to_string(), Value::Int(2)),
                ("c".to_string(), Value::Int(3)),
            ]))
        );
        assert_eq!(unordered.to_value().to_string(), "{'a': 1, 'b': 2, 'c': 3}");
    }

    #[test]
    fn comparisons() {
        let cmp = |a: Value, b: Value| a.compare(&b);
        assert_eq!(cmp(Value::Int(5), Value::Int(10)), Some(Ordering::Less));
        assert_eq!(cmp(Value::Int(5), Value::Float(5.0)), Some(Ordering::Equal));
        assert_eq!(
            cmp(Value::Float(5.5), Value::Int(5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            cmp(Value::Str("b".into()), Value::Str("a".into())),
            Some(Ordering::Greater)
        );
        assert_eq!(
            cmp(Value::bytes(b"a"), Value::bytes(b"b")),
            Some(Ordering::Less)
        );
        assert_eq!(cmp(Value::Int(5), Value::Str("5".into())), None);
        assert_eq!(cmp(Value::Float(f64::NAN), Value::Float(1.0)), None);
        assert_eq!(cmp(Value::Bool(true), Value::Bool(false)), None);
        assert_eq!(cmp(Value::None, Value::None), None);

        let early: jiff::Timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
        let late: jiff::Timestamp = "2025-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(
            cmp(Value::Timestamp(early), Value::Timestamp(late)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn lengths() {
        assert_eq!(Value::Str("hué".into()).length(), Some(3));
        assert_eq!(Value::bytes(b"hello").length(), Some(5));
        assert_eq!(Value::list([1, 2]).length(), Some(2));
        assert_eq!(Value::Map(BTreeMap::new()).length(), Some(0));
        assert_eq!(Value::Int(5).length(), None);
        assert_eq!(Value::None.length(), None);
    }
}
