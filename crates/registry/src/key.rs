//! Method keys

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a (type, method) pair, formatted as `"{TypeName}.{MethodName}"`.
///
/// Two instances of the same type share a key, so their samples land in the
/// same series. Distinct types never collide because the type name is part
/// of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodKey(String);

impl MethodKey {
    /// Build a key from a type name and a method name.
    pub fn new(type_name: &str, method: &str) -> Self {
        Self(format!("{}.{}", type_name, method))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Type name portion (everything before the last `.`).
    ///
    /// Keys created from a bare string with no `.` return the whole key.
    pub fn type_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Method name portion (everything after the last `.`).
    pub fn method_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => "",
        }
    }

    /// Consume the key, returning the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MethodKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MethodKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MethodKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MethodKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&MethodKey> for MethodKey {
    fn from(key: &MethodKey) -> Self {
        key.clone()
    }
}
