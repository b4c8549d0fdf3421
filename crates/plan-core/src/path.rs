//! Location of a value inside the input being validated

use crate::value::Key;
use std::fmt;

/// Ordered list of keys from the root of the input to the current value.
///
/// Validators receive the path of the value they inspect and stamp it on
/// every error they raise; the depth of an error is the length of its path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Key>);

impl Path {
    /// The empty path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// New path extended by one key; `self` is left untouched
    pub fn join(&self, key: impl Into<Key>) -> Self {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend(self.0.iter().cloned());
        keys.push(key.into());
        Self(keys)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    /// Final key, if any
    pub fn last(&self) -> Option<&Key> {
        self.0.last()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for key in &self.0 {
            match key {
                Key::Index(i) => write!(f, "[{}]", i)?,
                Key::Name(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Self(keys)
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_empty() {
        let root = Path::root();
        assert!(root.is_empty());
        assert_eq!(root.to_string(), "$");
    }

    #[test]
    fn test_join_does_not_mutate() {
        let base = Path::root().join("items");
        let child = base.join(0usize);
        assert_eq!(base.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.last(), Some(&Key::Index(0)));
    }

    #[test]
    fn test_display() {
        let path = Path::root().join("items").join(0usize).join("id");
        assert_eq!(path.to_string(), "$.items[0].id");
    }
}
