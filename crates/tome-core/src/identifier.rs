//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for qualified names and
//! signatures in the documentation model.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner. Renderers
/// running on worker threads only ever resolve existing symbols.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// Qualified names are built with [`Id::create_nested`], which joins segments
/// with `.` the way package and member paths are written in source.
///
/// # Examples
///
/// ```
/// use tome_core::identifier::Id;
///
/// let package = Id::new("com.example");
/// let class = package.create_nested(Id::new("Widget"));
/// assert_eq!(class, "com.example.Widget");
///
/// // The unnamed root package does not contribute a segment
/// let root = Id::new("");
/// assert_eq!(root.create_nested(Id::new("Main")), "Main");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        let symbol = interner().get_or_intern(name);
        Self(symbol)
    }

    /// Creates a nested ID by combining parent ID and child ID with a `.` separator.
    ///
    /// An empty parent (the root package) yields the child unchanged.
    ///
    /// # Arguments
    ///
    /// * `child_id` - The child identifier to append.
    pub fn create_nested(&self, child_id: Id) -> Self {
        let mut interner = interner();
        let parent_str = interner
            .resolve(self.0)
            .expect("Parent ID should exist in interner");
        let child_str = interner
            .resolve(child_id.0)
            .expect("Child ID should exist in interner");
        let nested_name = if parent_str.is_empty() {
            child_str.to_string()
        } else {
            format!("{parent_str}.{child_str}")
        };
        let symbol = interner.get_or_intern(&nested_name);
        Self(symbol)
    }

    /// Returns `true` if this is the empty identifier.
    pub fn is_empty(&self) -> bool {
        self == ""
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("Widget");
        let id2 = Id::new("Widget");
        let id3 = Id::new("Gadget");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "Widget");
    }

    #[test]
    fn test_create_nested() {
        let package = Id::new("com.example");
        let nested1 = package.create_nested(Id::new("Widget"));
        let nested2 = package.create_nested(Id::new("Gadget"));

        assert_ne!(nested1, nested2);
        assert_eq!(nested1, "com.example.Widget");
        assert_eq!(nested2, "com.example.Gadget");
    }

    #[test]
    fn test_create_nested_from_root_package() {
        let root = Id::new("");
        assert!(root.is_empty());
        assert_eq!(root.create_nested(Id::new("Main")), "Main");
    }

    #[test]
    fn test_deep_nesting() {
        let level3 = Id::new("p")
            .create_nested(Id::new("Outer"))
            .create_nested(Id::new("Inner"))
            .create_nested(Id::new("run"));

        assert_eq!(level3, "p.Outer.Inner.run");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{}", id), "display_test");
    }

    #[test]
    fn test_serialize_as_string() {
        let id = Id::new("p.C");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p.C\"");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str_ref() {
        let id = Id::new("Component");
        let name = String::from("Component");
        assert!(id == name.as_str());
        assert!(id != "Element");
    }
}
