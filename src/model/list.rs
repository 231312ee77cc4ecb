// src/model/list.rs
//! Ordered lists of dimensions or values with the lookups scrapers use all
//! the time: by key, by identity, by position, by label.

use std::ops::Index;
use std::rc::Rc;

use crate::error::{Error, Result};

/// Something stored in a [`List`].
pub trait Listed {
    /// Used in "no such ..." messages.
    const KIND: &'static str;

    /// The string a list is searched by (dimension id, or value payload).
    fn key(&self) -> &str;

    fn label(&self) -> Option<&str>;
}

impl<T: Listed> Listed for Rc<T> {
    const KIND: &'static str = T::KIND;

    fn key(&self) -> &str {
        (**self).key()
    }

    fn label(&self) -> Option<&str> {
        (**self).label()
    }
}

/// One lookup, whatever the caller happens to hold.
#[derive(Debug)]
pub enum Lookup<'k, T> {
    Key(&'k str),
    Ref(&'k T),
    Index(usize),
}

impl<'k, T> From<&'k str> for Lookup<'k, T> {
    fn from(key: &'k str) -> Self {
        Lookup::Key(key)
    }
}

impl<'k, T> From<&'k String> for Lookup<'k, T> {
    fn from(key: &'k String) -> Self {
        Lookup::Key(key.as_str())
    }
}

impl<T> From<usize> for Lookup<'_, T> {
    fn from(ix: usize) -> Self {
        Lookup::Index(ix)
    }
}

#[derive(Clone, Debug)]
pub struct List<T> {
    items: Vec<T>,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Listed> List<T> {
    pub fn by_key(&self, key: &str) -> Result<&T> {
        self.items
            .iter()
            .find(|x| x.key() == key)
            .ok_or_else(|| no_such::<T>(key))
    }

    pub fn by_key_mut(&mut self, key: &str) -> Result<&mut T> {
        self.items
            .iter_mut()
            .find(|x| x.key() == key)
            .ok_or_else(|| no_such::<T>(key))
    }

    /// The entry that *is* `item` (identity, not equality).
    pub fn by_ref(&self, item: &T) -> Result<&T> {
        self.items
            .iter()
            .find(|x| std::ptr::eq(*x, item))
            .ok_or_else(|| no_such::<T>(item.key()))
    }

    pub fn at_index(&self, ix: usize) -> Result<&T> {
        self.items
            .get(ix)
            .ok_or_else(|| no_such::<T>(&ix.to_string()))
    }

    pub fn get<'k>(&self, key: impl Into<Lookup<'k, T>>) -> Result<&T>
    where
        T: 'k,
    {
        match key.into() {
            Lookup::Key(k) => self.by_key(k),
            Lookup::Ref(r) => self.by_ref(r),
            Lookup::Index(i) => self.at_index(i),
        }
    }

    /// First entry with this label, if any.
    pub fn get_by_label(&self, label: &str) -> Option<&T> {
        self.items.iter().find(|x| x.label() == Some(label))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|x| x.key() == key)
    }
}

impl<T> Index<usize> for List<T> {
    type Output = T;

    fn index(&self, ix: usize) -> &T {
        &self.items[ix]
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

fn no_such<T: Listed>(key: &str) -> Error {
    Error::NoSuchItem(format!("{} `{}`", T::KIND, key))
}
