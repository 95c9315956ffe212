//! Qualified and resolved names.
//!
//! [`QName`] is the `prefix:local` pair exactly as written in source.
//! [`DataName`] is what a `QName` resolves to once the scope chain has had a
//! chance to apply `xmlns` bindings: `(local, prefix, namespace_uri)`.

use std::fmt;

use crate::error::{DeserializationError, Position};

/// A qualified name as parsed from source: `prefix:local`, prefix possibly empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: String,
    pub local: String,
}

impl QName {
    pub fn new(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            local: local.into(),
        }
    }

    /// Parses `s` as `prefix:local`. More than one `:` or an empty string is
    /// a parse error.
    pub fn parse(s: &str, position: Position) -> Result<Self, DeserializationError> {
        if s.is_empty() {
            return Err(DeserializationError::new("invalid name", position));
        }
        let mut parts = s.split(':');
        let first = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => Ok(QName::new("", first)),
            (Some(second), None) => Ok(QName::new(first, second)),
            (Some(_), Some(_)) => Err(DeserializationError::new("invalid name", position)),
        }
    }

    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_prefix() {
            write!(f, "{}:{}", self.prefix, self.local)
        } else {
            write!(f, "{}", self.local)
        }
    }
}

/// A resolved name: local part, source prefix, and the namespace URI the
/// scope chain resolved that prefix to (empty string if unbound).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataName {
    pub local: String,
    pub prefix: String,
    pub namespace_uri: String,
}

impl DataName {
    pub fn new(
        local: impl Into<String>,
        prefix: impl Into<String>,
        namespace_uri: impl Into<String>,
    ) -> Self {
        Self {
            local: local.into(),
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
        }
    }

    /// A `DataName` with no prefix/namespace, used for the "strip the
    /// unknown prefix" recovery path.
    pub fn local_only(local: impl Into<String>) -> Self {
        Self::new(local, "", "")
    }
}

impl fmt::Display for DataName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{}:{}", self.prefix, self.local)
        }
    }
}
