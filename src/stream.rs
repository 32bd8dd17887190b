//! A traversal that runs on its own producer thread.
//!
//! The producer owns the tree and walks it in key order.  The consumer asks
//! for each entry over a zero-capacity demand channel and the producer answers
//! over a zero-capacity entry channel, so at most one entry is in flight and
//! none is taken off the tree before it is requested.  Dropping the consumer
//! disconnects both channels; the producer sees the disconnect, drops the rest
//! of the tree and exits, and the drop joins it.
use std::iter::FusedIterator;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace, warn};

use crate::error::StreamError;
use crate::iter::IntoIter;

const PRODUCER_THREAD_NAME: &str = "sorted-map-stream";

struct Link<K, V> {
    demand: SyncSender<()>,
    entries: Receiver<(K, V)>,
}

/// An in-order stream of owned entries produced by a background thread.
///
/// Created by [`SortedMap::into_stream`](crate::SortedMap::into_stream).
pub struct ChannelStream<K, V> {
    link: Option<Link<K, V>>,
    producer: Option<JoinHandle<()>>,
    remaining: usize,
}

impl<K, V> ChannelStream<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    pub(crate) fn spawn(walk: IntoIter<K, V>) -> Result<Self, StreamError> {
        let (demand_tx, demand_rx) = mpsc::sync_channel(0);
        let (entry_tx, entry_rx) = mpsc::sync_channel(0);
        let remaining = walk.len();

        let producer = thread::Builder::new()
            .name(PRODUCER_THREAD_NAME.into())
            .spawn(move || produce(walk, demand_rx, entry_tx))?;

        debug!(entries = remaining, "spawned stream producer");

        Ok(ChannelStream {
            link: Some(Link {
                demand: demand_tx,
                entries: entry_rx,
            }),
            producer: Some(producer),
            remaining,
        })
    }
}

impl<K, V> ChannelStream<K, V> {
    /// Stops the producer, waits for it to exit, and reports whether it
    /// panicked.
    ///
    /// Dropping the stream does the same but discards the outcome.
    pub fn finish(mut self) -> Result<(), StreamError> {
        self.link = None;
        match self.producer.take() {
            Some(handle) => {
                handle.join().map_err(|_| StreamError::ProducerPanicked)
            }
            None => Ok(()),
        }
    }
}

fn produce<K, V>(
    mut walk: IntoIter<K, V>,
    demand: Receiver<()>,
    entries: SyncSender<(K, V)>,
) {
    let mut sent = 0usize;

    while demand.recv().is_ok() {
        let Some(entry) = walk.next() else {
            trace!(sent, "stream producer exhausted");
            return;
        };

        if entries.send(entry).is_err() {
            break;
        }
        sent += 1;
    }

    debug!(sent, unsent = walk.len(), "stream producer cancelled");
}

impl<K, V> Iterator for ChannelStream<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.link.as_ref()?;

        let entry = match link.demand.send(()) {
            Ok(()) => link.entries.recv().ok(),
            Err(_) => None,
        };

        match entry {
            Some(entry) => {
                self.remaining -= 1;
                Some(entry)
            }

            None => {
                // the producer is gone; no more entries can arrive
                self.link = None;
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for ChannelStream<K, V> {}

impl<K, V> FusedIterator for ChannelStream<K, V> {}

impl<K, V> Drop for ChannelStream<K, V> {
    fn drop(&mut self) {
        self.link = None;
        if let Some(handle) = self.producer.take() {
            if handle.join().is_err() {
                warn!("stream producer panicked");
            }
        }
    }
}
