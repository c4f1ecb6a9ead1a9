//! Set algebra over ascending key sequences
//!
//! These work on materialized sequences (e.g. from [`OrderedTree::to_ordered_set`]), not on the
//! structure of a tree. Inputs must be sorted in ascending order. Runs of equal keys within one
//! input are collapsed, so outputs never contain duplicates.
//!
//! [`OrderedTree::to_ordered_set`]: crate::OrderedTree::to_ordered_set

use std::cmp::Ordering;
use std::iter::{FusedIterator, Peekable};

/// Consumes every item at the front of `iter` that is equal to `key`
fn skip_equal<I>(iter: &mut Peekable<I>, key: &I::Item)
    where I: Iterator,
          I::Item: Ord,
{
    while iter.next_if(|item| item == key).is_some() {}
}

/// Compares the fronts of two sequences. An exhausted sequence compares greater than any key.
fn compare_fronts<I, J>(a: &mut Peekable<I>, b: &mut Peekable<J>) -> Option<Ordering>
    where I: Iterator,
          J: Iterator<Item = I::Item>,
          I::Item: Ord,
{
    match (a.peek(), b.peek()) {
        (None, None) => None,
        (Some(_), None) => Some(Ordering::Less),
        (None, Some(_)) => Some(Ordering::Greater),
        (Some(x), Some(y)) => Some(x.cmp(y)),
    }
}

/// A lazy iterator over the union of two ascending sequences
///
/// Created by [`Union::new`].
pub struct Union<I: Iterator, J: Iterator> {
    a: Peekable<I>,
    b: Peekable<J>,
}

impl<I, J> Union<I, J>
    where I: Iterator,
          J: Iterator<Item = I::Item>,
          I::Item: Ord,
{
    pub fn new<A, B>(a: A, b: B) -> Self
        where A: IntoIterator<IntoIter = I>,
              B: IntoIterator<IntoIter = J>,
    {
        Self {
            a: a.into_iter().peekable(),
            b: b.into_iter().peekable(),
        }
    }
}

impl<I, J> Iterator for Union<I, J>
    where I: Iterator,
          J: Iterator<Item = I::Item>,
          I::Item: Ord,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let key = match compare_fronts(&mut self.a, &mut self.b)? {
            Ordering::Less | Ordering::Equal => self.a.next()?,
            Ordering::Greater => self.b.next()?,
        };

        skip_equal(&mut self.a, &key);
        skip_equal(&mut self.b, &key);

        Some(key)
    }
}

impl<I, J> FusedIterator for Union<I, J>
    where I: FusedIterator,
          J: FusedIterator<Item = I::Item>,
          I::Item: Ord,
{}

/// A lazy iterator over the keys present in exactly one of two ascending sequences
///
/// Created by [`SymmetricDifference::new`].
pub struct SymmetricDifference<I: Iterator, J: Iterator> {
    a: Peekable<I>,
    b: Peekable<J>,
}

impl<I, J> SymmetricDifference<I, J>
    where I: Iterator,
          J: Iterator<Item = I::Item>,
          I::Item: Ord,
{
    pub fn new<A, B>(a: A, b: B) -> Self
        where A: IntoIterator<IntoIter = I>,
              B: IntoIterator<IntoIter = J>,
    {
        Self {
            a: a.into_iter().peekable(),
            b: b.into_iter().peekable(),
        }
    }
}

impl<I, J> Iterator for SymmetricDifference<I, J>
    where I: Iterator,
          J: Iterator<Item = I::Item>,
          I::Item: Ord,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match compare_fronts(&mut self.a, &mut self.b)? {
                Ordering::Less => {
                    let key = self.a.next()?;
                    skip_equal(&mut self.a, &key);
                    return Some(key);
                },

                Ordering::Greater => {
                    let key = self.b.next()?;
                    skip_equal(&mut self.b, &key);
                    return Some(key);
                },

                // Present in both, so in neither side of the difference
                Ordering::Equal => {
                    let key = self.a.next()?;
                    skip_equal(&mut self.a, &key);
                    skip_equal(&mut self.b, &key);
                },
            }
        }
    }
}

impl<I, J> FusedIterator for SymmetricDifference<I, J>
    where I: FusedIterator,
          J: FusedIterator<Item = I::Item>,
          I::Item: Ord,
{}

/// Returns every key present in `a` or `b`, ascending and without duplicates
///
/// # Examples
///
/// ```
/// use lab_collections::set_ops::union;
///
/// assert_eq!(union(&[1, 2, 3, 4, 5], &[4, 5, 6, 7, 8]), vec![1, 2, 3, 4, 5, 6, 7, 8]);
/// ```
pub fn union<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    Union::new(a, b).cloned().collect()
}

/// Returns every key present in exactly one of `a` and `b`, ascending and without duplicates
///
/// # Examples
///
/// ```
/// use lab_collections::set_ops::symmetric_difference;
///
/// assert_eq!(symmetric_difference(&[1, 2, 3, 4, 5], &[4, 5, 6, 7, 8]), vec![1, 2, 3, 6, 7, 8]);
/// ```
pub fn symmetric_difference<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    SymmetricDifference::new(a, b).cloned().collect()
}
