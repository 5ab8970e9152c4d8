//! Ordered collection keyed by element name.
//!
//! [`NamedSet`] is used both as owning storage (an object's properties, the
//! schemas of a batch) and as a borrowed view during traversal
//! (`NamedSet<&Property>`). Whatever it holds, no two elements share a name.
//!
//! # Examples
//!
//! ```
//! use structgen_core::{Named, NamedSet};
//!
//! struct Tag(&'static str);
//!
//! impl Named for Tag {
//!     fn name(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! let mut set = NamedSet::new();
//! set.safe_insert(Tag("a")).unwrap();
//! set.safe_insert(Tag("b")).unwrap();
//! assert!(set.safe_insert(Tag("a")).is_err());
//! assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Anything that can be stored in a [`NamedSet`].
pub trait Named {
    /// The key under which the element is stored.
    fn name(&self) -> &str;
}

impl<T: Named + ?Sized> Named for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Returned when an insert would break name uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate key: {0}")]
pub struct DuplicateKey(pub String);

/// Insertion-ordered set of uniquely named elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSet<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for NamedSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Named> NamedSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if an element with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Looks an element up by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.items[i])
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Element names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Named::name)
    }

    /// Consumes the set, returning the elements in insertion order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Adds an element, replacing a same-named one in place.
    ///
    /// Returns the replaced element, if any.
    pub fn insert(&mut self, element: T) -> Option<T> {
        match self.index.get(element.name()) {
            Some(&i) => Some(std::mem::replace(&mut self.items[i], element)),
            None => {
                self.index.insert(element.name().to_string(), self.items.len());
                self.items.push(element);
                None
            }
        }
    }

    /// Adds an element, failing if its name is already taken.
    pub fn safe_insert(&mut self, element: T) -> Result<(), DuplicateKey> {
        if self.contains(element.name()) {
            return Err(DuplicateKey(element.name().to_string()));
        }
        self.insert(element);
        Ok(())
    }

    /// Adds every element of `other`, failing on the first name collision.
    ///
    /// Collisions are checked against both the current contents and the
    /// incoming elements themselves. On failure the set is left untouched.
    pub fn safe_insert_all(
        &mut self,
        other: impl IntoIterator<Item = T>,
    ) -> Result<(), DuplicateKey> {
        let incoming: Vec<T> = other.into_iter().collect();
        let mut seen: HashSet<&str> = HashSet::new();
        for element in &incoming {
            let name = element.name();
            if self.contains(name) || !seen.insert(name) {
                return Err(DuplicateKey(name.to_string()));
            }
        }
        for element in incoming {
            self.insert(element);
        }
        Ok(())
    }
}

impl<T: Named> FromIterator<T> for NamedSet<T> {
    /// Collects with overwrite semantics; later duplicates replace earlier ones.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = NamedSet::new();
        for element in iter {
            set.insert(element);
        }
        set
    }
}

impl<T> IntoIterator for NamedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a NamedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
