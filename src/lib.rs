//! # An ordered map backed by an AVL tree
//!
//! `sorted-map` provides [`SortedMap`], a map whose entries are kept sorted by
//! key in a height-balanced binary search tree.  Lookup, insertion and
//! deletion all take logarithmic time.  Deletion is done by splitting the
//! tree around the key and merging the two halves back together.
//!
//! Keys are ordered either by their own [`Ord`] implementation or by a
//! [`Comparator`] supplied when the map is built.  The choice is part of the
//! map's type, so a key without any ordering is rejected by the compiler.
//!
//! Entries can be read three ways, all in key order:
//!  - [`SortedMap::entries`] collects every entry eagerly,
//!  - [`SortedMap::stream`] walks the tree lazily, one entry per `next`,
//!  - [`SortedMap::into_stream`] hands the tree to a producer thread that
//!    delivers one entry per request and stops when the consumer goes away.

mod compare;
pub use compare::{Comparator, Natural};

mod error;
pub use error::{InvariantViolation, StreamError};

mod iter;
pub use iter::{Entry, IntoIter, Stream};

mod map;
pub use map::SortedMap;

mod stream;
pub use stream::ChannelStream;

#[cfg(feature = "serde")]
mod serde;

mod tree;
