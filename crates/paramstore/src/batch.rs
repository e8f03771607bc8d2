//! Partitioning and batching of bindings.
//!
//! Bindings are split into a plain group and a decrypt group, keeping
//! their relative order, and each group is fetched in contiguous batches
//! of at most the store's per-request limit.

use std::slice::ChunksMut;

/// Splits `items` into those failing `predicate` and those matching it.
///
/// Both groups keep the relative order they had in `items`.
///
/// ```rust
/// use paramstore::batch::partition_stable;
///
/// let (plain, decrypt) = partition_stable(vec![(0, true), (1, false), (2, true)], |x| x.1);
///
/// assert_eq!(plain, vec![(1, false)]);
/// assert_eq!(decrypt, vec![(0, true), (2, true)]);
/// ```
pub fn partition_stable<T, F>(items: Vec<T>, mut predicate: F) -> (Vec<T>, Vec<T>)
where
    F: FnMut(&T) -> bool,
{
    let (matching, failing): (Vec<T>, Vec<T>) = items.into_iter().partition(|item| predicate(item));

    (failing, matching)
}

/// Contiguous batches of at most `max` items, in order.
///
/// An empty slice yields no batch. A `max` of zero is treated as one.
pub fn batches<T>(items: &mut [T], max: usize) -> ChunksMut<'_, T> {
    items.chunks_mut(max.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_example() {
        let flags = vec![(0, true), (1, false), (2, true)];
        let (plain, decrypt) = partition_stable(flags, |(_, decrypt)| *decrypt);

        let plain: Vec<_> = plain.iter().map(|(i, _)| *i).collect();
        let decrypt: Vec<_> = decrypt.iter().map(|(i, _)| *i).collect();

        assert_eq!(plain, vec![1]);
        assert_eq!(decrypt, vec![0, 2]);
    }

    #[test]
    fn test_partition_all_one_side() {
        let (plain, decrypt) = partition_stable(vec![1, 2, 3], |_| false);
        assert_eq!(plain, vec![1, 2, 3]);
        assert!(decrypt.is_empty());
    }

    #[test]
    fn test_batch_sizes() {
        let mut items: Vec<usize> = (0..23).collect();
        let sizes: Vec<_> = batches(&mut items, 10).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![10, 10, 3]);

        let mut empty: Vec<usize> = Vec::new();
        assert_eq!(batches(&mut empty, 10).count(), 0);

        let mut exact: Vec<usize> = (0..10).collect();
        assert_eq!(batches(&mut exact, 10).count(), 1);
    }

    #[test]
    fn test_zero_max_is_one() {
        let mut items = vec![1, 2];
        assert_eq!(batches(&mut items, 0).count(), 2);
    }
}
