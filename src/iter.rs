use std::iter::FusedIterator;

use crate::tree::{Node, OptNode};

/// A key-value pair produced by a borrowing traversal.
pub type Entry<'a, K, V> = (&'a K, &'a V);

/// A lazy, in-order iterator over the entries of a
/// [`SortedMap`](crate::SortedMap).
///
/// Only the path from the root to the next entry is kept, in a stack.  Each
/// call to `next` computes exactly one entry, so the walk never runs ahead of
/// the caller, and abandoning the iterator simply drops the stack.
pub struct Stream<'a, K, V> {
    work: Vec<&'a Node<K, V>>,
    len: usize,
}

impl<'a, K, V> Stream<'a, K, V> {
    pub(crate) fn new(root: &'a OptNode<K, V>, len: usize) -> Self {
        let mut stream = Stream {
            work: Vec::new(),
            len,
        };
        stream.push_left_spine(root.as_deref());
        stream
    }

    fn push_left_spine(&mut self, mut curr: Option<&'a Node<K, V>>) {
        while let Some(n) = curr {
            self.work.push(n);
            curr = n.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Stream<'a, K, V> {
    type Item = Entry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.work.pop()?;
        self.len -= 1;
        self.push_left_spine(n.right.as_deref());
        Some((&n.key, &n.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for Stream<'_, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for Stream<'_, K, V> {}

impl<K, V> Clone for Stream<'_, K, V> {
    fn clone(&self) -> Self {
        Stream {
            work: self.work.clone(),
            len: self.len,
        }
    }
}

/// An owning, in-order iterator over the entries of a
/// [`SortedMap`](crate::SortedMap).
///
/// Nodes are taken apart as they are visited; whatever has not been visited
/// when the iterator is dropped is dropped with it.
pub struct IntoIter<K, V> {
    work: Vec<Box<Node<K, V>>>,
    len: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: OptNode<K, V>, len: usize) -> Self {
        let mut iter = IntoIter {
            work: Vec::new(),
            len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut curr: OptNode<K, V>) {
        while let Some(mut n) = curr {
            curr = n.left.take();
            self.work.push(n);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut n = self.work.pop()?;
        self.len -= 1;
        self.push_left_spine(n.right.take());
        Some(n.into_entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}
