//! Supplier-backed source
//!
//! The generator function returns `Ok(Pull::End)` to finish normally and
//! `Err(..)` only for genuine failures. After either outcome the generator is
//! never invoked again.

use super::{Pull, Source};
use crate::Result;

/// Source that calls a producing function once per pull.
pub struct GeneratorSource<F> {
    generator: F,
    finished: bool,
}

impl<T, F> GeneratorSource<F>
where
    F: FnMut() -> Result<Pull<T>>,
{
    /// Wrap a generator returning explicit [`Pull`] signals.
    pub fn new(generator: F) -> Self {
        Self {
            generator,
            finished: false,
        }
    }
}

/// Endless generator from an infallible producer.
pub fn repeat_with<T, G>(mut producer: G) -> GeneratorSource<impl FnMut() -> Result<Pull<T>>>
where
    G: FnMut() -> T,
{
    GeneratorSource::new(move || Ok(Pull::Value(producer())))
}

impl<T, F> Source for GeneratorSource<F>
where
    F: FnMut() -> Result<Pull<T>>,
{
    type Item = T;

    fn pull(&mut self) -> Result<Pull<T>> {
        if self.finished {
            return Ok(Pull::End);
        }
        match (self.generator)() {
            Ok(Pull::Value(value)) => Ok(Pull::Value(value)),
            Ok(Pull::End) => {
                self.finished = true;
                Ok(Pull::End)
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }
}

impl<F> std::fmt::Debug for GeneratorSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorSource")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::SequenceError;

    #[test]
    fn test_end_signal_terminates() {
        let mut n = 0;
        let source = GeneratorSource::new(move || {
            n += 1;
            Ok(if n <= 3 { Pull::Value(n) } else { Pull::End })
        });
        let mut cursor = Cursor::new(source);
        assert_eq!(cursor.drain_to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_repeat_with_never_ends() {
        let mut counter = 0;
        let mut source = repeat_with(move || {
            counter += 2;
            counter
        });
        for expected in [2, 4, 6, 8] {
            assert_eq!(source.pull().unwrap(), Pull::Value(expected));
        }
    }

    #[test]
    fn test_none_is_a_legal_element() {
        let mut calls = 0;
        let source = GeneratorSource::new(move || {
            calls += 1;
            Ok(match calls {
                1 => Pull::Value(None),
                2 => Pull::Value(Some(7)),
                _ => Pull::End,
            })
        });
        let mut cursor = Cursor::new(source);
        assert_eq!(cursor.drain_to_vec().unwrap(), vec![None, Some(7)]);
    }

    #[test]
    fn test_failure_is_distinct_from_end() {
        let mut source = GeneratorSource::new(|| -> Result<Pull<i32>> {
            Err(SequenceError::generator_failure("disk on fire"))
        });
        assert_eq!(
            source.pull(),
            Err(SequenceError::Generator("disk on fire".to_string()))
        );
        // A failed generator is not invoked again.
        assert_eq!(source.pull(), Ok(Pull::End));
    }
}
