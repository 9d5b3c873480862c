//! Identifier names for declarations, members and parameters.

use std::borrow::Borrow;
use std::fmt;

/// An immutable identifier.
///
/// Names are compared by content. `Name` implements `Borrow<str>` so name
/// indexes can be queried with plain `&str` keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Box<str>);

impl Name {
    /// The reserved symbol naming the undefined scope. Never resolvable.
    pub const RESERVED: &'static str = "#";

    /// Create a name from any string-like value.
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Name(name.into())
    }

    /// The reserved `#` name.
    pub fn reserved() -> Self {
        Name::new(Self::RESERVED)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_reserved(&self) -> bool {
        &*self.0 == Self::RESERVED
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Name::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Name::new(name)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_name() {
        assert!(Name::reserved().is_reserved());
        assert!(!Name::from("x").is_reserved());
    }

    #[test]
    fn borrowed_lookup_matches_owned() {
        let mut names = rustc_hash::FxHashMap::default();
        names.insert(Name::from("hp"), 1);
        assert_eq!(names.get("hp"), Some(&1));
        assert_eq!(names.get("mp"), None);
    }
}
