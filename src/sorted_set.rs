use std::cmp::Ordering;
use std::fmt;

use delegate::delegate;

/// Growable set of unsigned integers.
///
/// Values are appended in any order with [`SortedSet::push`]; [`SortedSet::sort`] brings
/// the set into ascending, duplicate-free order, which the set operations require.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedSet {
    inner: Vec<u32>,
}

impl SortedSet {
    delegate! {
        to self.inner {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
            pub fn first(&self) -> Option<&u32>;
            pub fn last(&self) -> Option<&u32>;
            pub fn as_slice(&self) -> &[u32];
        }
    }

    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    /// Appends `value` without restoring order.
    pub fn push(&mut self, value: u32) {
        self.inner.push(value);
    }

    /// Sorts ascending and drops duplicates.
    pub fn sort(&mut self) {
        self.inner.sort_unstable();
        self.inner.dedup();
    }

    pub fn contains(&self, value: u32) -> bool {
        self.inner.binary_search(&value).is_ok()
    }

    /// Values present in both sets. Both inputs must be sorted.
    pub fn intersect_sorted(&self, other: &SortedSet) -> SortedSet {
        let mut result = Vec::with_capacity(self.len().min(other.len()));

        let (mut left, mut right) = (self.inner.iter().peekable(), other.inner.iter().peekable());

        while let (Some(l), Some(r)) = (left.peek().map(|&&l| l), right.peek().map(|&&r| r)) {
            match l.cmp(&r) {
                Ordering::Less => {
                    left.next();
                },
                Ordering::Greater => {
                    right.next();
                },
                Ordering::Equal => {
                    result.push(l);
                    left.next();
                    right.next();
                },
            }
        }

        SortedSet { inner: result }
    }

    /// Values present in either set. Both inputs must be sorted.
    pub fn union_sorted(&self, other: &SortedSet) -> SortedSet {
        let mut result = Vec::with_capacity(self.len() + other.len());

        let (mut left, mut right) = (self.inner.iter().peekable(), other.inner.iter().peekable());

        loop {
            let next = match (left.peek().map(|&&l| l), right.peek().map(|&&r| r)) {
                (Some(l), Some(r)) => match l.cmp(&r) {
                    Ordering::Less => left.next(),
                    Ordering::Greater => right.next(),
                    Ordering::Equal => {
                        right.next();
                        left.next()
                    },
                },
                (Some(_), None) => left.next(),
                (None, Some(_)) => right.next(),
                (None, None) => break,
            };

            result.extend(next);
        }

        SortedSet { inner: result }
    }
}

impl FromIterator<u32> for SortedSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = SortedSet {
            inner: iter.into_iter().collect(),
        };

        set.sort();

        set
    }
}

impl<'s> IntoIterator for &'s SortedSet {
    type Item = &'s u32;
    type IntoIter = std::slice::Iter<'s, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl fmt::Display for SortedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.inner.iter();

        let Some(first) = iter.next() else {
            return write!(f, "[]");
        };

        write!(f, "[{}", first)?;

        for next in iter {
            write!(f, ", {}", next)?;
        }

        write!(f, "]")
    }
}
