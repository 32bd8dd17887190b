//! Error types for sorted-map

use thiserror::Error;

/// A broken structural invariant found by [`SortedMap::check`].
///
/// None of these can be produced through the public API; they exist to make
/// engine defects loud in tests and debug builds.
///
/// [`SortedMap::check`]: crate::SortedMap::check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly greater than the key visited before it.
    #[error("keys out of order at in-order position {position}")]
    Unordered { position: usize },

    /// A node's subtree heights differ by more than one.
    #[error("balance factor {factor} at in-order position {position}")]
    Unbalanced { position: usize, factor: i8 },

    /// A node's cached height disagrees with its children.
    #[error("stored height {stored} but children give {computed} at in-order position {position}")]
    BadHeight {
        position: usize,
        stored: i8,
        computed: i8,
    },

    /// The tracked element count disagrees with the number of nodes.
    #[error("map tracks {tracked} entries but the tree holds {actual}")]
    BadCount { tracked: usize, actual: usize },
}

/// Errors from the producer-thread stream.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The operating system refused to start the producer thread.
    #[error("failed to spawn stream producer: {0}")]
    Spawn(#[from] std::io::Error),

    /// The producer thread panicked while walking the tree.
    #[error("stream producer panicked")]
    ProducerPanicked,
}
