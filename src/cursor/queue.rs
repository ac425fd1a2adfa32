//! Blocking-queue-backed source
//!
//! A producer thread pushes elements (and finally a designated sentinel) into
//! a [`BlockingQueue`]; the consuming cursor blocks in `pull` until an element
//! arrives. Elements are observed in FIFO order.
//!
//! There is no cancellation path into the producer. A consumer that stops
//! pulling leaves the remaining elements queued, and a producer blocked on a
//! full bounded queue stays blocked until the consumer side is dropped.
//! If every producer handle is dropped before the sentinel is pushed, a
//! blocked consumer fails with [`SequenceError::WaitInterrupted`] instead of
//! treating the disconnect as a normal end.

use crossbeam_channel::{Receiver, Sender};

use super::{Pull, Source};
use crate::{Result, SequenceError};

/// Capacity configuration for a [`BlockingQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueConfig {
    /// Maximum number of queued elements; `None` means unbounded.
    pub capacity: Option<usize>,
}

impl QueueConfig {
    /// Queue that never blocks the producer.
    pub fn unbounded() -> Self {
        Self { capacity: None }
    }

    /// Queue holding at most `capacity` elements.
    pub fn bounded(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SequenceError::InvalidConfiguration(
                "queue capacity must be > 0".to_string(),
            ));
        }
        Ok(Self {
            capacity: Some(capacity),
        })
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Thread-safe FIFO queue shared between producers and one consuming cursor.
#[derive(Debug)]
pub struct BlockingQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> BlockingQueue<T> {
    /// Create an unbounded queue.
    pub fn new() -> Self {
        Self::with_config(QueueConfig::unbounded())
    }

    /// Create a queue from a validated configuration.
    pub fn with_config(config: QueueConfig) -> Self {
        let (sender, receiver) = match config.capacity {
            Some(capacity) => crossbeam_channel::bounded(capacity),
            None => crossbeam_channel::unbounded(),
        };
        Self { sender, receiver }
    }

    /// Handle for pushing elements from another thread.
    pub fn producer(&self) -> QueueProducer<T> {
        QueueProducer {
            sender: self.sender.clone(),
        }
    }

    /// Number of elements currently queued.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the queue currently holds no elements.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Turn the queue into a consuming source ending at `sentinel`.
    ///
    /// The queue's own producer handle is released here, so only handles
    /// obtained through [`BlockingQueue::producer`] keep the queue alive.
    pub fn into_source(self, sentinel: T) -> QueueSource<T> {
        QueueSource::new(self.receiver, sentinel)
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer-side handle of a [`BlockingQueue`].
#[derive(Debug)]
pub struct QueueProducer<T> {
    sender: Sender<T>,
}

impl<T> Clone for QueueProducer<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> QueueProducer<T> {
    /// Enqueue an element, blocking while a bounded queue is full.
    pub fn push(&self, value: T) -> Result<()> {
        self.sender
            .send(value)
            .map_err(|_| SequenceError::source_failure("queue consumer disconnected"))
    }

    /// Enqueue the sentinel and release this handle.
    pub fn finish(self, sentinel: T) -> Result<()> {
        self.push(sentinel)
    }
}

/// Consuming source over a blocking queue, terminated by a sentinel value.
#[derive(Debug)]
pub struct QueueSource<T> {
    receiver: Receiver<T>,
    sentinel: T,
    finished: bool,
}

impl<T> QueueSource<T> {
    /// Consume from `receiver` until `sentinel` is observed.
    pub fn new(receiver: Receiver<T>, sentinel: T) -> Self {
        Self {
            receiver,
            sentinel,
            finished: false,
        }
    }
}

impl<T: Clone> QueueSource<T> {
    /// Detached handle that can drain the queue after this source has been
    /// moved into a pipeline.
    pub fn drain_handle(&self) -> QueueDrain<T> {
        QueueDrain {
            receiver: self.receiver.clone(),
            sentinel: self.sentinel.clone(),
        }
    }
}

impl<T: Clone> Clone for QueueSource<T> {
    /// Clones share the same queue; elements taken by one are gone for all.
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
            sentinel: self.sentinel.clone(),
            finished: false,
        }
    }
}

impl<T: PartialEq> QueueSource<T> {
    /// Empty the queue without blocking, excluding the sentinel.
    pub fn drain_remaining(&self) -> Vec<T> {
        drain(&self.receiver, &self.sentinel)
    }
}

impl<T: PartialEq> Source for QueueSource<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Pull<T>> {
        if self.finished {
            return Ok(Pull::End);
        }
        match self.receiver.recv() {
            Ok(value) if value == self.sentinel => {
                tracing::debug!("queue cursor observed sentinel");
                self.finished = true;
                Ok(Pull::End)
            }
            Ok(value) => Ok(Pull::Value(value)),
            Err(_) => {
                tracing::debug!("queue producers disconnected before sentinel");
                self.finished = true;
                Err(SequenceError::WaitInterrupted)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (0, None)
        }
    }
}

/// Detached drain handle for a queue consumed by a [`QueueSource`].
#[derive(Debug, Clone)]
pub struct QueueDrain<T> {
    receiver: Receiver<T>,
    sentinel: T,
}

impl<T: PartialEq> QueueDrain<T> {
    /// Empty the queue without blocking, excluding the sentinel.
    pub fn drain_remaining(&self) -> Vec<T> {
        drain(&self.receiver, &self.sentinel)
    }
}

fn drain<T: PartialEq>(receiver: &Receiver<T>, sentinel: &T) -> Vec<T> {
    let drained: Vec<T> = receiver
        .try_iter()
        .filter(|value| value != sentinel)
        .collect();
    tracing::debug!(count = drained.len(), "drained queue");
    drained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use std::thread;

    #[test]
    fn test_sentinel_terminates_in_fifo_order() {
        let queue = BlockingQueue::new();
        let producer = queue.producer();
        let handle = thread::spawn(move || {
            for word in ["a", "b"] {
                producer.push(word.to_string()).unwrap();
            }
            producer.finish(String::new()).unwrap();
        });

        let mut cursor = Cursor::new(queue.into_source(String::new()));
        assert_eq!(cursor.drain_to_vec().unwrap(), vec!["a", "b"]);
        handle.join().unwrap();
    }

    #[test]
    fn test_drain_after_partial_consumption() {
        let queue = BlockingQueue::new();
        let producer = queue.producer();
        for value in [1, 2, 3, 4] {
            producer.push(value).unwrap();
        }
        producer.finish(-1).unwrap();

        let mut source = queue.into_source(-1);
        assert_eq!(source.pull().unwrap(), Pull::Value(1));
        assert_eq!(source.drain_remaining(), vec![2, 3, 4]);
    }

    #[test]
    fn test_disconnect_is_an_interrupted_wait() {
        let queue = BlockingQueue::<i32>::new();
        let producer = queue.producer();
        producer.push(5).unwrap();
        drop(producer);

        let mut source = queue.into_source(-1);
        assert_eq!(source.pull(), Ok(Pull::Value(5)));
        assert_eq!(source.pull(), Err(SequenceError::WaitInterrupted));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(QueueConfig::bounded(0).is_err());
        assert_eq!(QueueConfig::bounded(4).unwrap().capacity, Some(4));
    }
}
