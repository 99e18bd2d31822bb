use alloc::vec;
use alloc::vec::Vec;

/// Builds `ghost_first[0..=num_trees]` from a ghost layer sorted by
/// `(owning_tree, morton)`: `ghost_first[t]..ghost_first[t + 1]` is the
/// sub-range of `ghosts` owned by tree `t`.
///
/// Uses a single guided pass rather than `num_trees` independent binary
/// searches: a cursor into `ghosts` only ever advances, so across the
/// whole table it moves at most `ghosts.len()` steps in total, giving
/// `O(num_trees + ghosts.len())` amortized instead of `O(num_trees log
/// ghosts.len())`.
pub fn build_ghost_first<T>(ghosts: &[T], num_trees: usize, tree_of: impl Fn(&T) -> usize) -> Vec<usize> {
    let g_len = ghosts.len();
    let mut ghost_first = vec![0usize; num_trees + 1];

    let mut cursor = 0usize;
    for t in 0..=num_trees {
        while cursor < g_len && tree_of(&ghosts[cursor]) < t {
            cursor += 1;
        }
        ghost_first[t] = cursor;
    }

    ghost_first
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(ghosts: &[usize], num_trees: usize) -> Vec<usize> {
        let mut out = vec![0usize; num_trees + 1];
        for t in 0..=num_trees {
            out[t] = ghosts.partition_point(|&gt| gt < t);
        }
        out
    }

    #[test]
    fn empty_ghost_layer_is_all_zero() {
        let ghosts: Vec<usize> = Vec::new();
        let result = build_ghost_first(&ghosts, 4, |&t| t);
        assert_eq!(result, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn matches_brute_force_on_varied_distribution() {
        let ghosts = vec![0, 0, 1, 1, 1, 3, 3, 5, 5, 5, 5];
        let expected = brute_force(&ghosts, 6);
        let actual = build_ghost_first(&ghosts, 6, |&t| t);
        assert_eq!(actual, expected);
    }

    #[test]
    fn single_tree_owns_everything() {
        let ghosts = vec![2, 2, 2];
        let result = build_ghost_first(&ghosts, 5, |&t| t);
        assert_eq!(result, vec![0, 0, 0, 3, 3, 3]);
    }

    #[test]
    fn ranges_are_monotonic_and_cover_all_ghosts() {
        let ghosts = vec![0, 1, 1, 2, 4, 4, 4, 7];
        let result = build_ghost_first(&ghosts, 8, |&t| t);
        assert!(result.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*result.first().unwrap(), 0);
        assert_eq!(*result.last().unwrap(), ghosts.len());
    }
}
