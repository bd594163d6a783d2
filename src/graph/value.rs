use bytes::Bytes;
use std::cmp::Ordering;
use std::fmt;

use super::ObjectHandle;

/// Child key of a graph object
///
/// Integer keys order numerically and precede every string key, so index
/// mappings built from sequences keep their source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Int(a), Key::Int(b)) => a.cmp(b),
            (Key::Str(a), Key::Str(b)) => a.cmp(b),
            (Key::Int(_), Key::Str(_)) => Ordering::Less,
            (Key::Str(_), Key::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Int(i as i64)
    }
}

/// A field value: either a primitive scalar or a handle to another object
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Raw byte string. Decoded as UTF-8 when it lands in metadata.
    Bytes(Bytes),
    Object(ObjectHandle),
}

impl Value {
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Value::Bytes(data.into())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Key form used to sort the elements of set-like containers
    pub fn sort_key(&self) -> Option<Key> {
        match self {
            Value::Bool(b) => Some(Key::Int(i64::from(*b))),
            Value::Int(i) => Some(Key::Int(*i)),
            Value::Text(s) => Some(Key::Str(s.clone())),
            Value::Bytes(b) => Some(Key::Str(String::from_utf8_lossy(b).into_owned())),
            Value::None | Value::Float(_) | Value::Object(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ObjectHandle> for Value {
    fn from(obj: ObjectHandle) -> Self {
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_keys_sort_numerically() {
        let mut keys = vec![Key::Int(10), Key::Int(2), Key::Int(1)];
        keys.sort();
        assert_eq!(keys, vec![Key::Int(1), Key::Int(2), Key::Int(10)]);
    }

    #[test]
    fn test_integer_keys_precede_strings() {
        let mut keys = vec![Key::from("a"), Key::Int(5), Key::from("0")];
        keys.sort();
        assert_eq!(keys, vec![Key::Int(5), Key::from("0"), Key::from("a")]);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::Int(42).to_string(), "42");
        assert_eq!(Key::from("index_html").to_string(), "index_html");
    }

    #[test]
    fn test_sort_key_of_scalars() {
        assert_eq!(Value::from(true).sort_key(), Some(Key::Int(1)));
        assert_eq!(Value::bytes(&b"abc"[..]).sort_key(), Some(Key::from("abc")));
        assert_eq!(Value::None.sort_key(), None);
    }
}
