//! Structured cache keys.

use std::fmt;

/// One element of a [`QueryKey`].
///
/// Maps keep their pairs sorted by name so that two filter objects with
/// the same content produce equal keys regardless of construction order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Map(Vec<(String, KeyPart)>),
}

impl KeyPart {
    pub fn map(pairs: impl IntoIterator<Item = (String, KeyPart)>) -> Self {
        let mut pairs: Vec<(String, KeyPart)> = pairs.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs.dedup_by(|a, b| a.0 == b.0);
        KeyPart::Map(pairs)
    }
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<&String> for KeyPart {
    fn from(value: &String) -> Self {
        KeyPart::Str(value.clone())
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<i32> for KeyPart {
    fn from(value: i32) -> Self {
        KeyPart::Int(i64::from(value))
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        KeyPart::Int(i64::from(value))
    }
}

impl From<bool> for KeyPart {
    fn from(value: bool) -> Self {
        KeyPart::Bool(value)
    }
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(KeyPart::Null)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Null => f.write_str("null"),
            KeyPart::Bool(b) => write!(f, "{}", b),
            KeyPart::Int(i) => write!(f, "{}", i),
            KeyPart::Str(s) => write!(f, "{:?}", s),
            KeyPart::Map(pairs) => {
                f.write_str("{")?;
                for (i, (name, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{:?}:{}", name, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Ordered tuple identifying one cache entry, e.g. `["assets", {"branchId": 3}]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn from_parts(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new key with `part` appended.
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    /// Element-wise prefix match. The empty key is a prefix of every key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn matches_any(&self, prefixes: &[QueryKey]) -> bool {
        prefixes.iter().any(|p| self.starts_with(p))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", part)?;
        }
        f.write_str("]")
    }
}

/// Builds a [`QueryKey`]. Braced groups become sorted maps.
///
/// ```
/// use assetdesk_query::query_key;
/// let key = query_key!["assets", {"branchId" => 3}];
/// assert_eq!(key.to_string(), r#"["assets",{"branchId":3}]"#);
/// ```
#[macro_export]
macro_rules! query_key {
    (@acc [$($out:expr),*]) => {
        $crate::QueryKey::from_parts(::std::vec![$($out),*])
    };
    (@acc [$($out:expr),*] { $($name:expr => $value:expr),* $(,)? } $(, $($rest:tt)*)?) => {
        $crate::query_key!(@acc [$($out,)* $crate::KeyPart::map(::std::vec![
            $((::std::string::ToString::to_string(&$name), $crate::KeyPart::from($value))),*
        ])] $($($rest)*)?)
    };
    (@acc [$($out:expr),*] $part:expr $(, $($rest:tt)*)?) => {
        $crate::query_key!(@acc [$($out,)* $crate::KeyPart::from($part)] $($($rest)*)?)
    };
    ($($input:tt)*) => {
        $crate::query_key!(@acc [] $($input)*)
    };
}
