#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::thread::{self, JoinHandle};

use seqlane::cursor::QueueSource;
use seqlane::{ActiveSequence, BlockingQueue, Pull, QueueConfig};

/// Spawn a producer that pushes `values` and then `sentinel`.
pub fn produce<T>(
    values: Vec<T>,
    sentinel: T,
    config: QueueConfig,
) -> (QueueSource<T>, JoinHandle<()>)
where
    T: Clone + PartialEq + Send + 'static,
{
    let queue = BlockingQueue::with_config(config);
    let producer = queue.producer();
    let source = queue.into_source(sentinel.clone());
    let handle = thread::spawn(move || {
        for value in values {
            producer.push(value).expect("consumer alive");
        }
        producer.finish(sentinel).expect("consumer alive");
    });
    (source, handle)
}

/// Generator over `0..limit` that records how many times it was pulled.
pub fn counted_range(limit: i64) -> (ActiveSequence<i64>, Rc<Cell<usize>>) {
    let pulls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulls);
    let mut next = 0;
    let seq = ActiveSequence::from_generator(move || {
        counter.set(counter.get() + 1);
        if next >= limit {
            return Ok(Pull::End);
        }
        next += 1;
        Ok(Pull::Value(next - 1))
    });
    (seq, pulls)
}
