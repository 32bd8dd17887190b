use std::fmt::{Debug, Formatter};

use crate::compare::{Comparator, Natural};
use crate::error::{InvariantViolation, StreamError};
use crate::iter::{Entry, IntoIter, Stream};
use crate::stream::ChannelStream;
use crate::tree::{self, OptNode};

#[cfg(test)]
macro_rules! chk_map {
    ( $x:expr ) => {{
        if let Err(e) = $x.check() {
            panic!("{e}");
        }
    }};
}

#[cfg(not(test))]
macro_rules! chk_map {
    ( $x:expr ) => {{
        let _ = &$x;
    }};
}

/// A map from keys to values sorted by key.
///
/// Internally, the map is an [AVL tree](https://en.wikipedia.org/wiki/AVL_tree)
/// of uniquely owned nodes.  Lookups, insertions and deletions take time
/// logarithmic in the number of entries.  Deletion splits the tree around the
/// key and merges the two halves back together, so a deletion rebuilds the
/// search path even when the key is absent.
///
/// The order of the keys is decided by the comparator `C`, fixed when the map
/// is built.  [`SortedMap::new`] uses the keys' own [`Ord`] implementation;
/// [`SortedMap::with_comparator`] accepts any [`Comparator`], including a
/// closure.  A key type with neither cannot be used with the map at all.
///
/// # Examples
/// ```
/// use sorted_map::SortedMap;
///
/// let mut m = SortedMap::new();
/// for k in [10, 1, 2, 7, 5, 12, 11, 15, 4] {
///     m.set(k, k * 2);
/// }
///
/// let keys: Vec<_> = m.entries().into_iter().map(|(k, _)| *k).collect();
/// assert_eq!(keys, [1, 2, 4, 5, 7, 10, 11, 12, 15]);
/// assert_eq!(m.get(&7), Some(&14));
/// ```
#[derive(Clone)]
pub struct SortedMap<K, V, C = Natural> {
    len: usize,
    root: OptNode<K, V>,
    cmp: C,
}

impl<K: Ord, V> SortedMap<K, V> {
    /// Creates a new, empty map ordered by `K`'s [`Ord`] implementation.
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    /// let m: SortedMap<usize, usize> = SortedMap::new();
    /// assert!(m.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C> SortedMap<K, V, C> {
    /// Drops all elements from the map.
    pub fn clear(&mut self) {
        self.len = 0;
        self.root = None;
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the comparator that orders the map's keys.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns every entry of the map, sorted by key.
    ///
    /// The whole traversal runs before this returns.  Use
    /// [`stream`](#method.stream) to visit entries one at a time instead.
    ///
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let m = SortedMap::from([(2, 'b'), (1, 'a')]);
    /// assert_eq!(m.entries(), vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    pub fn entries(&self) -> Vec<Entry<'_, K, V>> {
        let mut entries = Vec::with_capacity(self.len);
        tree::for_each(&self.root, &mut |e| entries.push(e));
        entries
    }

    /// Returns a lazy iterator over the map's entries, sorted by key.
    ///
    /// Entries are computed one per call to `next`.  Dropping the iterator
    /// part way through is free.
    ///
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let m = SortedMap::from([(0, 1), (1, 2), (2, 3)]);
    /// for (i, (k, v)) in m.stream().enumerate() {
    ///     assert_eq!(&i, k);
    ///     assert_eq!(&(i + 1), v);
    /// }
    /// ```
    pub fn stream(&self) -> Stream<'_, K, V> {
        Stream::new(&self.root, self.len)
    }

    /// Same as [`stream`](#method.stream); named to match the standard
    /// collections.
    pub fn iter(&self) -> Stream<'_, K, V> {
        self.stream()
    }

    /// Produces an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.stream().map(|e| e.0)
    }

    /// Produces an iterator over the values of the map, ordered by their
    /// associated keys.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.stream().map(|e| e.1)
    }

    /// Returns the key-value pair for the least key in the map.
    ///
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let m = SortedMap::from([(2, 0), (1, 0)]);
    /// assert_eq!(m.first_key_value(), Some((&1, &0)));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root
            .as_deref()
            .map(tree::find_min)
            .map(|n| (&n.key, &n.val))
    }

    /// Returns the key-value pair for the greatest key in the map.
    ///
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let m = SortedMap::from([(2, 0), (1, 0)]);
    /// assert_eq!(m.last_key_value(), Some((&2, &0)));
    /// ```
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root
            .as_deref()
            .map(tree::find_max)
            .map(|n| (&n.key, &n.val))
    }

    /// Moves the map onto a background thread and streams its entries back,
    /// in key order, one per request.
    ///
    /// The producer thread never computes an entry before it is asked for.
    /// Dropping the returned stream early stops the thread and drops the
    /// entries that were not delivered.
    ///
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let m = SortedMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let mut stream = m.into_stream()?;
    /// assert_eq!(stream.next(), Some((1, "a")));
    /// drop(stream); // the producer exits
    /// # Ok::<(), sorted_map::StreamError>(())
    /// ```
    pub fn into_stream(self) -> Result<ChannelStream<K, V>, StreamError>
    where
        K: Send + 'static,
        V: Send + 'static,
    {
        ChannelStream::spawn(IntoIter::new(self.root, self.len))
    }
}

impl<K, V, C: Comparator<K>> SortedMap<K, V, C> {
    /// Creates a new, empty map ordered by `cmp`.
    ///
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let mut m = SortedMap::with_comparator(|a: &&str, b: &&str| {
    ///     a.len().cmp(&b.len()).then(a.cmp(b))
    /// });
    /// m.set("ccc", 3);
    /// m.set("a", 1);
    /// m.set("bb", 2);
    /// assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["a", "bb", "ccc"]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        SortedMap {
            len: 0,
            root: None,
            cmp,
        }
    }

    /// Returns a reference to the value associated with key.
    ///
    /// # Example
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let mut m = SortedMap::new();
    /// m.set(0, 100);
    ///
    /// assert_eq!(m.get(&0), Some(&100));
    /// assert_eq!(m.get(&1), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        tree::find(&self.root, key, &self.cmp).map(|n| &n.val)
    }

    /// Returns the stored key and its value for the given key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        tree::find(&self.root, key, &self.cmp).map(|n| (&n.key, &n.val))
    }

    /// Returns a mutable reference to the value associated with key.
    ///
    /// # Example
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let mut m = SortedMap::new();
    /// m.set(1, 7);
    ///
    /// if let Some(v) = m.get_mut(&1) {
    ///     *v = 2;
    /// }
    /// assert_eq!(m.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        tree::find_mut(&mut self.root, key, &self.cmp)
    }

    /// Tests if the map contains an entry for the given key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Associates value with key.
    ///
    /// If the key was already present its value is overwritten in place and
    /// the old value is returned; the number of entries only grows when the
    /// key is new.
    ///
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let mut m = SortedMap::new();
    /// assert_eq!(m.set(0, "a"), None);
    /// assert_eq!(m.set(0, "b"), Some("a"));
    /// assert_eq!(m.len(), 1);
    /// assert_eq!(m.get(&0), Some(&"b"));
    /// ```
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let (root, old_v) =
            tree::insert(self.root.take(), key, value, &self.cmp);
        self.root = Some(root);
        self.len += old_v.is_none() as usize;
        chk_map!(self);
        old_v
    }

    /// Removes key from the map and returns its value.
    ///
    /// Deleting an absent key leaves the entries and the count untouched.
    ///
    /// # Examples
    /// ```
    /// use sorted_map::SortedMap;
    ///
    /// let mut m = SortedMap::new();
    /// m.set(1, 2);
    /// m.set(2, 3);
    /// assert_eq!(m.delete(&2), Some(3));
    /// assert_eq!(m.delete(&2), None);
    /// assert_eq!(m.len(), 1);
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let (root, orig_kv) = tree::remove(self.root.take(), key, &self.cmp);
        self.root = root;
        self.len -= orig_kv.is_some() as usize;
        chk_map!(self);
        orig_kv.map(|e| e.1)
    }

    /// Verifies the structure of the map: keys strictly increasing under the
    /// comparator, every node balanced, cached heights correct, and the count
    /// matching the number of nodes.
    ///
    /// A map built through the public API always passes.
    pub fn check(&self) -> Result<(), InvariantViolation> {
        let actual = tree::check(&self.root, &self.cmp)?;
        if actual != self.len {
            return Err(InvariantViolation::BadCount {
                tracked: self.len,
                actual,
            });
        }
        Ok(())
    }
}

impl<K: Debug, V: Debug, C> Debug for SortedMap<K, V, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.stream()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for SortedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.stream().eq(other.stream())
    }
}

impl<K: Eq, V: Eq, C> Eq for SortedMap<K, V, C> {}

impl<K, V, C: Comparator<K> + Default> Default for SortedMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K>> std::ops::Index<&K> for SortedMap<K, V, C> {
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        match self.get(key) {
            Some(v) => v,
            None => panic!("Key not found in SortedMap"),
        }
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for SortedMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for SortedMap<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = SortedMap::default();
        m.extend(iter);
        m
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for SortedMap<K, V> {
    fn from(vs: [(K, V); N]) -> Self {
        SortedMap::from_iter(vs)
    }
}

impl<'a, K, V, C> IntoIterator for &'a SortedMap<K, V, C> {
    type Item = Entry<'a, K, V>;
    type IntoIter = Stream<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.stream()
    }
}

impl<K, V, C> IntoIterator for SortedMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root, self.len)
    }
}
