//! Face incidence resolution: the recursive cooperative descent over up
//! to two face-incident sides, emitting conforming and hanging face
//! callbacks.
//!
//! Bounded to at most one level of recursion in practice by the 2:1
//! balance invariant every caller is expected to uphold (a coarse
//! neighbor and its fine neighbors never differ by more than one
//! level), but written as true recursion rather than hardcoding that
//! assumption, so a caller that feeds in a deeper imbalance still gets
//! correct (if deeper) hanging decomposition instead of silently wrong
//! output.

use alloc::vec::Vec;

use morton::{split_at_level, Dimension, Quadrant};

use crate::callback::{FaceInfo, FaceSide, IncidenceFlags};
use crate::model::Origin;
use crate::topology::{face_children_codes, face_permutation};

/// One side's input to the face resolver: a caller-narrowed sub-slice of
/// that tree's merged local+ghost sequence, plus the fixed metadata that
/// does not change as the descent refines the slot.
#[derive(Clone, Copy)]
pub struct FaceSideInput<'a, Dim> {
    pub slot: &'a [(Quadrant<Dim>, Origin)],
    pub tree_id: usize,
    /// This side's own local face id, fixed for the whole call.
    pub face: u8,
}

/// Runs the face descent starting at `level` (the level both sides'
/// slots are currently narrowed to) and fires `cb` once per conforming
/// face or once per hanging sub-face.
///
/// `right` is ignored (and may duplicate `left`) when `outside_face` is
/// set: per the outside-face convention, `right = left` in every fired
/// callback.
pub fn face_iterate<'a, Dim, F>(
    level: u8,
    left: FaceSideInput<'a, Dim>,
    right: FaceSideInput<'a, Dim>,
    orientation: u8,
    intra_tree: bool,
    outside_face: bool,
    num_ghosts: usize,
    cb: &mut F,
) where
    Dim: Dimension,
    F: FnMut(FaceInfo<'a, Dim>),
{
    descend(level, left, right, orientation, intra_tree, outside_face, num_ghosts, false, cb);
}

#[allow(clippy::too_many_arguments)]
fn descend<'a, Dim, F>(
    level: u8,
    left: FaceSideInput<'a, Dim>,
    right: FaceSideInput<'a, Dim>,
    orientation: u8,
    intra_tree: bool,
    outside_face: bool,
    num_ghosts: usize,
    hanging: bool,
    cb: &mut F,
) where
    Dim: Dimension,
    F: FnMut(FaceInfo<'a, Dim>),
{
    let left_terminal = left.slot.len() <= 1;
    let right_terminal = outside_face || right.slot.len() <= 1;

    if left.slot.is_empty() || (!outside_face && right.slot.is_empty()) {
        // No participant reachable down this path; nothing to fire.
        return;
    }

    if left_terminal && right_terminal {
        fire(left, right, orientation, intra_tree, outside_face, hanging, num_ghosts, cb);
        return;
    }

    let half = Dim::CHILDREN / 2;

    let left_kids = if left_terminal {
        repeat_side(left, half)
    } else {
        split_face_children::<Dim>(left, level)
    };

    let right_kids = if outside_face {
        left_kids.clone()
    } else if right_terminal {
        repeat_side(right, half)
    } else {
        split_face_children::<Dim>(right, level)
    };

    let perm = face_permutation(half, orientation);

    for k in 0..half {
        let l = left_kids[k];
        let r = right_kids[perm[k]];
        descend(level + 1, l, r, orientation, intra_tree, outside_face, num_ghosts, true, cb);
    }
}

#[allow(clippy::too_many_arguments)]
fn fire<'a, Dim, F>(
    left: FaceSideInput<'a, Dim>,
    right: FaceSideInput<'a, Dim>,
    orientation: u8,
    intra_tree: bool,
    outside_face: bool,
    hanging: bool,
    num_ghosts: usize,
    cb: &mut F,
) where
    Dim: Dimension,
    F: FnMut(FaceInfo<'a, Dim>),
{
    let (lq, lo) = &left.slot[0];
    let left_side = FaceSide {
        quad: lq,
        tree_id: left.tree_id,
        tree_local_num: lo.tree_local_num(num_ghosts),
        outgoing_face: left.face,
    };

    let right_side = if outside_face {
        FaceSide {
            quad: lq,
            tree_id: left.tree_id,
            tree_local_num: lo.tree_local_num(num_ghosts),
            outgoing_face: left.face,
        }
    } else {
        let (rq, ro) = &right.slot[0];
        FaceSide {
            quad: rq,
            tree_id: right.tree_id,
            tree_local_num: ro.tree_local_num(num_ghosts),
            outgoing_face: right.face,
        }
    };

    let any_local = matches!(lo, Origin::Local(_))
        || (!outside_face && matches!(right.slot[0].1, Origin::Local(_)));
    debug_assert!(
        outside_face || !(matches!(lo, Origin::Ghost(_)) && matches!(right.slot[0].1, Origin::Ghost(_))),
        "a face incidence with no local perspective on either side should never reach the driver"
    );
    if !any_local {
        return;
    }

    let mut flags = IncidenceFlags::empty();
    if hanging {
        flags |= IncidenceFlags::HANGING;
    }
    if intra_tree {
        flags |= IncidenceFlags::INTRA_TREE;
    }
    if outside_face {
        flags |= IncidenceFlags::OUTSIDE_FACE;
    }

    cb(FaceInfo {
        flags,
        orientation,
        left: left_side,
        right: right_side,
    });
}

fn repeat_side<'a, Dim: Dimension>(side: FaceSideInput<'a, Dim>, count: usize) -> Vec<FaceSideInput<'a, Dim>> {
    let mut v = Vec::with_capacity(count);
    for _ in 0..count {
        v.push(side);
    }
    v
}

/// Splits `side`'s slot into `Dim::CHILDREN` buckets at `level + 1` and
/// keeps only the `Dim::CHILDREN / 2` buckets adjacent to `side.face`,
/// in ascending child-index order.
fn split_face_children<'a, Dim: Dimension>(side: FaceSideInput<'a, Dim>, level: u8) -> Vec<FaceSideInput<'a, Dim>> {
    let mut offsets = alloc::vec![0usize; Dim::CHILDREN + 1];
    split_at_level(side.slot, level, |(q, _)| q, &mut offsets);

    face_children_codes::<Dim>(side.face)
        .into_iter()
        .map(|code| FaceSideInput {
            slot: &side.slot[offsets[code as usize]..offsets[code as usize + 1]],
            tree_id: side.tree_id,
            face: side.face,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use morton::Dim2;

    #[test]
    fn conforming_outside_face_repeats_left_as_right() {
        let q = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let slot = [(q, Origin::Local(0))];
        let left = FaceSideInput {
            slot: &slot,
            tree_id: 0,
            face: 1,
        };

        let mut fired = Vec::new();
        face_iterate(0, left, left, 0, true, true, 0, &mut |info| fired.push(info));

        assert_eq!(fired.len(), 1);
        assert!(fired[0].flags.is_outside_face());
        assert!(!fired[0].flags.is_hanging());
        assert_eq!(fired[0].left.quad, fired[0].right.quad);
    }

    #[test]
    fn conforming_internal_face_between_two_trees() {
        let lq = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let rq = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let lslot = [(lq, Origin::Local(0))];
        let rslot = [(rq, Origin::Local(0))];

        let left = FaceSideInput {
            slot: &lslot,
            tree_id: 0,
            face: 1,
        };
        let right = FaceSideInput {
            slot: &rslot,
            tree_id: 1,
            face: 0,
        };

        let mut fired = Vec::new();
        face_iterate(0, left, right, 0, false, false, 0, &mut |info| fired.push(info));

        assert_eq!(fired.len(), 1);
        assert!(!fired[0].flags.is_outside_face());
        assert_eq!(fired[0].left.tree_id, 0);
        assert_eq!(fired[0].right.tree_id, 1);
    }

    #[test]
    fn hanging_face_fires_once_per_fine_child() {
        use morton::len_at;
        let half = len_at(1);

        let coarse = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let coarse_slot = [(coarse, Origin::Local(0))];

        let fine0 = Quadrant::<Dim2>::new_2d(0, 0, 1);
        let fine1 = Quadrant::<Dim2>::new_2d(0, half, 1);
        let fine_slot = [(fine0, Origin::Local(0)), (fine1, Origin::Local(1))];

        let left = FaceSideInput {
            slot: &coarse_slot,
            tree_id: 0,
            face: 1,
        };
        let right = FaceSideInput {
            slot: &fine_slot,
            tree_id: 1,
            face: 0,
        };

        let mut fired = Vec::new();
        face_iterate(0, left, right, 0, false, false, 0, &mut |info| fired.push(info));

        assert_eq!(fired.len(), 2);
        for info in &fired {
            assert!(info.flags.is_hanging());
            assert_eq!(info.left.quad, &coarse);
        }
        let fine_quads: Vec<_> = fired.iter().map(|i| *i.right.quad).collect();
        assert!(fine_quads.contains(&fine0));
        assert!(fine_quads.contains(&fine1));
    }
}
