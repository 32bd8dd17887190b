use std::cmp::Ordering;

/// A three-way comparison used to order the keys of a
/// [`SortedMap`](crate::SortedMap).
///
/// A map fixes its comparator for its whole lifetime.  The comparator must
/// define a total order over every key stored in the map; an inconsistent
/// comparator does not cause undefined behavior, but lookups and traversal
/// order become meaningless.
///
/// Closures of type `Fn(&K, &K) -> Ordering` implement `Comparator<K>`, so a
/// map can be built from a plain function or closure.
///
/// # Examples
/// ```
/// use sorted_map::SortedMap;
///
/// let mut m = SortedMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// m.set(1, "one");
/// m.set(2, "two");
/// assert_eq!(m.entries(), vec![(&2, &"two"), (&1, &"one")]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their own [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
