use std::io::Result as IOResult;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops;
use std::path::Path;
use std::slice::Iter;
use std::usize::MAX as USIZE_MAX;
use std::vec::IntoIter;

use io::{FileOpen, Read};

pub mod conll;

#[derive(Debug, Clone)]
pub struct Dataset<T> {
    items: Vec<T>,
}

impl<T> Dataset<T> {
    pub fn new() -> Self {
        Dataset { items: vec![] }
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Dataset { items: items }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Dataset { items: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> Iter<T> {
        self.items.iter()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Dataset::new()
    }
}

impl<T> FromIterator<T> for Dataset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Dataset::from_items(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Dataset<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Dataset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> ops::Deref for Dataset<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> ops::Index<usize> for Dataset<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        ops::Index::index(&self.items, index)
    }
}

impl<T> ops::IndexMut<usize> for Dataset<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        ops::IndexMut::index_mut(&mut self.items, index)
    }
}

pub trait Load {
    type Item;

    fn load<P: AsRef<Path>>(&mut self, file: P) -> IOResult<Dataset<Self::Item>> {
        self.load_until(file, USIZE_MAX)
    }

    fn load_until<P: AsRef<Path>>(&mut self, file: P, size: usize)
        -> IOResult<Dataset<Self::Item>>;
}

/// Loads whole files through any openable reader.
pub struct Loader<R> {
    _reader: PhantomData<R>,
}

impl<R> Loader<R> {
    pub fn new() -> Self {
        Loader { _reader: PhantomData }
    }
}

impl<R> Default for Loader<R> {
    fn default() -> Self {
        Loader::new()
    }
}

impl<T, R: FileOpen + Read<Item = T>> Load for Loader<R> {
    type Item = T;

    fn load_until<P: AsRef<Path>>(&mut self, file: P, size: usize) -> IOResult<Dataset<T>> {
        let mut reader = R::open(file)?;
        let mut buf = vec![];
        reader.read_upto(size, &mut buf)?;
        Ok(Dataset::from_items(buf))
    }
}
