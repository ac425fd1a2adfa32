//! Equality, hashing and rendering over whole sequences
//!
//! Sequence hash: `h = 31 * h + hash(element)` with wrapping `i32`
//! arithmetic, seeded with 1, where an absent (`None`) element hashes to 0.
//! So `[]` hashes to 1, `[None]` to 31 and `[1, 2]` to 994.

use std::fmt::{self, Write as _};

use crate::cursor::{Pull, Source};
use crate::sequence::stages::Zip;
use crate::sequence::AlignmentOption;
use crate::{Result, SequenceError};

/// Element hash compatible with the polynomial sequence hash.
pub trait SeqHash {
    /// 32-bit hash of this element.
    fn seq_hash(&self) -> i32;
}

macro_rules! impl_seq_hash_narrow {
    ($($t:ty),*) => {
        $(impl SeqHash for $t {
            fn seq_hash(&self) -> i32 {
                *self as i32
            }
        })*
    };
}

macro_rules! impl_seq_hash_wide {
    ($($t:ty),*) => {
        $(impl SeqHash for $t {
            fn seq_hash(&self) -> i32 {
                let bits = *self as u64;
                (bits ^ (bits >> 32)) as i32
            }
        })*
    };
}

impl_seq_hash_narrow!(i8, i16, i32, u8, u16, u32, char);
impl_seq_hash_wide!(i64, u64, isize, usize);

impl SeqHash for bool {
    fn seq_hash(&self) -> i32 {
        if *self {
            1231
        } else {
            1237
        }
    }
}

impl SeqHash for f64 {
    fn seq_hash(&self) -> i32 {
        let bits = self.to_bits();
        (bits ^ (bits >> 32)) as i32
    }
}

impl SeqHash for f32 {
    fn seq_hash(&self) -> i32 {
        self.to_bits() as i32
    }
}

impl SeqHash for str {
    fn seq_hash(&self) -> i32 {
        self.encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
    }
}

impl SeqHash for String {
    fn seq_hash(&self) -> i32 {
        self.as_str().seq_hash()
    }
}

impl<T: SeqHash> SeqHash for Option<T> {
    fn seq_hash(&self) -> i32 {
        self.as_ref().map_or(0, SeqHash::seq_hash)
    }
}

impl<T: SeqHash + ?Sized> SeqHash for &T {
    fn seq_hash(&self) -> i32 {
        (**self).seq_hash()
    }
}

impl<T: SeqHash> SeqHash for [T] {
    fn seq_hash(&self) -> i32 {
        self.iter().fold(1i32, |h, element| combine(h, element))
    }
}

impl<T: SeqHash> SeqHash for Vec<T> {
    fn seq_hash(&self) -> i32 {
        self.as_slice().seq_hash()
    }
}

fn combine<T: SeqHash + ?Sized>(hash: i32, element: &T) -> i32 {
    hash.wrapping_mul(31).wrapping_add(element.seq_hash())
}

/// Polynomial hash of every element of `source`.
pub fn sequence_hash<S>(mut source: S) -> Result<i32>
where
    S: Source,
    S::Item: SeqHash,
{
    let mut hash = 1i32;
    while let Pull::Value(element) = source.pull()? {
        hash = combine(hash, &element);
    }
    Ok(hash)
}

/// Same length and pairwise equal, compared under [`AlignmentOption::AllowUnpaired`].
///
/// Stops at the first differing or unpaired position.
pub fn sequences_equal<A, B>(left: A, right: B) -> Result<bool>
where
    A: Source,
    B: Source,
    A::Item: PartialEq<B::Item>,
{
    let mut pairs = Zip::new(left, right, AlignmentOption::AllowUnpaired);
    while let Pull::Value(pair) = pairs.pull()? {
        match pair {
            (Some(l), Some(r)) if l == r => continue,
            _ => return Ok(false),
        }
    }
    Ok(true)
}

/// `[a, b, c]` using each element's display form.
pub fn render<S>(source: S) -> Result<String>
where
    S: Source,
    S::Item: fmt::Display,
{
    render_with(source, |element, out| write!(out, "{element}"))
}

/// `[a, b, c]` using a custom element writer.
///
/// Stops at the first element the writer fails on.
pub fn render_with<S, F>(mut source: S, mut write_element: F) -> Result<String>
where
    S: Source,
    F: FnMut(&S::Item, &mut String) -> fmt::Result,
{
    let mut out = String::from("[");
    let mut index = 0;
    while let Pull::Value(element) = source.pull()? {
        if index > 0 {
            out.push_str(", ");
        }
        write_element(&element, &mut out).map_err(|_| SequenceError::Render(index))?;
        index += 1;
    }
    out.push(']');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::VecSource;
    use std::fmt::Write;

    #[test]
    fn test_hash_laws() {
        assert_eq!(sequence_hash(VecSource::new(Vec::<i32>::new())).unwrap(), 1);
        assert_eq!(sequence_hash(VecSource::new(vec![None::<i32>])).unwrap(), 31);
        assert_eq!(sequence_hash(VecSource::new(vec![1, 2])).unwrap(), 994);
    }

    #[test]
    fn test_string_hash_matches_polynomial() {
        // 'a' * 31 + 'b'
        assert_eq!("ab".seq_hash(), 97 * 31 + 98);
        assert_eq!(String::new().seq_hash(), 0);
    }

    #[test]
    fn test_unequal_lengths_are_unequal() {
        let equal = |a: Vec<i32>, b: Vec<i32>| {
            sequences_equal(VecSource::new(a), VecSource::new(b)).unwrap()
        };
        assert!(equal(vec![1, 2, 3], vec![1, 2, 3]));
        assert!(!equal(vec![1, 2, 3], vec![1, 2]));
        assert!(!equal(vec![1, 2], vec![1, 2, 3]));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(VecSource::new(vec![1, 2, 3])).unwrap(), "[1, 2, 3]");
        assert_eq!(render(VecSource::new(Vec::<i32>::new())).unwrap(), "[]");
        let source = VecSource::new(vec![Some(1), None]);
        let rendered = render_with(source, |element, out| match element {
            Some(v) => write!(out, "{v}"),
            None => out.write_str("null"),
        })
        .unwrap();
        assert_eq!(rendered, "[1, null]");
    }

    #[test]
    fn test_render_stops_on_writer_error() {
        let rendered = render_with(VecSource::new(vec![1, 2, 3]), |element, out| {
            if *element == 2 {
                Err(fmt::Error)
            } else {
                write!(out, "{element}")
            }
        });
        assert_eq!(rendered, Err(SequenceError::Render(1)));
    }
}
