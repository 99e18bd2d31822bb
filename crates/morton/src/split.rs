use crate::dim::Dimension;
use crate::quadrant::Quadrant;

/// Given a sorted `range` whose elements all share a common ancestor at
/// level `level`, partitions it by `level + 1` child index.
///
/// Writes `Dim::CHILDREN + 1` cumulative offsets into `out`, such that
/// `out[k]..out[k+1]` is the sub-range of `range` occupied by child `k`
/// (in z-order) of the shared ancestor. `key` projects an element of
/// `range` down to the [`Quadrant`] used for the child-index bucketing,
/// so this works identically over plain quadrant slices and over slices
/// of `(Quadrant, Origin)` pairs.
///
/// `out.len()` must be exactly `Dim::CHILDREN + 1`.
pub fn split_at_level<Dim: Dimension, T>(
    range: &[T],
    level: u8,
    key: impl Fn(&T) -> &Quadrant<Dim>,
    out: &mut [usize],
) {
    debug_assert_eq!(out.len(), Dim::CHILDREN + 1);
    let child_level = level + 1;

    out[0] = 0;
    out[Dim::CHILDREN] = range.len();
    for k in 0..Dim::CHILDREN - 1 {
        let k = k as u8;
        out[k as usize + 1] = range.partition_point(|item| key(item).child_index(child_level) <= k);
    }
}

/// Convenience wrapper of [`split_at_level`] for plain quadrant slices.
pub fn split_quadrants_at_level<Dim: Dimension>(range: &[Quadrant<Dim>], level: u8, out: &mut [usize]) {
    split_at_level(range, level, |q| q, out);
}

/// Returns the largest index `i` such that `key(range[i]) <= bound` in
/// z-order, or `None` if no such index exists (including when `range`
/// is empty).
pub fn find_higher_bound<Dim: Dimension, T>(
    range: &[T],
    bound: &Quadrant<Dim>,
    key: impl Fn(&T) -> &Quadrant<Dim>,
) -> Option<usize> {
    let count = range.partition_point(|item| key(item) <= bound);
    count.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::Dim2;
    use crate::quadrant::len_at;
    use alloc::vec::Vec;

    fn leaves(coords: &[(i64, i64)], level: u8) -> Vec<Quadrant<Dim2>> {
        let mut v: Vec<_> = coords.iter().map(|&(x, y)| Quadrant::new_2d(x, y, level)).collect();
        v.sort();
        v
    }

    #[test]
    fn split_partitions_all_four_children() {
        let half = len_at(1);
        let leaves = leaves(
            &[(0, 0), (half, 0), (0, half), (half, half), (half + 1, half + 1)],
            2,
        );

        let mut out = [0usize; 5];
        split_quadrants_at_level(&leaves, 0, &mut out);

        assert_eq!(out[0], 0);
        assert_eq!(out[4], leaves.len());
        // Offsets must be non-decreasing (the core invariant).
        assert!(out.windows(2).all(|w| w[0] <= w[1]));

        // Each bucket only contains quadrants whose level-1 ancestor
        // has that child index.
        for k in 0..4u8 {
            for q in &leaves[out[k as usize]..out[k as usize + 1]] {
                assert_eq!(q.child_index(1), k);
            }
        }
    }

    #[test]
    fn split_reproduces_original_range_when_concatenated() {
        let half = len_at(1);
        let leaves = leaves(&[(0, 0), (half, 0), (0, half), (half, half)], 1);

        let mut out = [0usize; 5];
        split_quadrants_at_level(&leaves, 0, &mut out);

        let mut reassembled = Vec::new();
        for k in 0..4 {
            reassembled.extend_from_slice(&leaves[out[k]..out[k + 1]]);
        }
        assert_eq!(reassembled, leaves);
    }

    #[test]
    fn find_higher_bound_locates_predecessor() {
        let half = len_at(1);
        let leaves = leaves(&[(0, 0), (half, 0), (half, half)], 1);

        let key = Quadrant::<Dim2>::new_2d(half, 0, 1);
        let idx = find_higher_bound(&leaves, &key, |q| q).unwrap();
        assert_eq!(leaves[idx], key);

        let below_all = Quadrant::<Dim2>::new_2d(-1, 0, len_at(30).try_into().unwrap());
        assert_eq!(find_higher_bound(&leaves, &below_all, |q| q), None);
    }

    #[test]
    fn find_higher_bound_empty_range_is_none() {
        let empty: Vec<Quadrant<Dim2>> = Vec::new();
        let key = Quadrant::<Dim2>::new_2d(0, 0, 0);
        assert_eq!(find_higher_bound(&empty, &key, |q| q), None);
    }
}
