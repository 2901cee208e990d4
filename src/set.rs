use itertools::Itertools;
use std::fmt;

/// An insertion-ordered set whose members are de-duplicated by `==`.
///
/// Membership is a linear scan. Signatures and redundancy results are small,
/// and equality on types and patterns is semantic rather than hashable.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    values: Vec<T>,
}

impl<T> OrderedSet<T> {
    pub fn new() -> Self {
        Self { values: vec![] }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.values.first()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Inserts `value` unless an equal member exists. Returns whether it was
    /// inserted.
    pub fn add(&mut self, value: T) -> bool {
        if self.contains(&value) {
            false
        } else {
            self.values.push(value);
            true
        }
    }

    /// Union in place, keeping the order of first insertion.
    pub fn add_set(&mut self, other: Self) {
        for value in other.values {
            self.add(value);
        }
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.values.iter().all(|v| other.contains(v))
    }
}

impl<T: PartialEq + Clone> OrderedSet<T> {
    /// Members of `self` that are not in `other`, in `self`'s order.
    pub fn subtract(&self, other: &Self) -> Self {
        self.values
            .iter()
            .filter(|v| !other.contains(v))
            .cloned()
            .collect()
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: PartialEq> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: fmt::Display> fmt::Display for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.values.iter().join(", "))
    }
}
