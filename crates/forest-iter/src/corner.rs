//! Corner (2D: vertex) incidence resolution.
//!
//! A corner of the forest is shared by up to `Dim::CORNERS` sides, each
//! already narrowed by the driver/face/edge recursion down to the
//! sub-slice of its tree's merged local+ghost sequence that can possibly
//! touch this corner. This module picks, per side, the single deepest
//! quadrant that actually touches it (or decides the side has none), and
//! fires one callback if at least one participant is local.

use alloc::vec::Vec;

use morton::{find_higher_bound, len_at, Dimension, Quadrant, MAXLEVEL};

use crate::callback::{CornerInfo, CornerSide, IncidenceFlags};
use crate::model::Origin;

/// One side's input to the corner resolver.
pub struct CornerSideInput<'a, Dim> {
    /// This side's candidates, in Morton order, restricted to whatever
    /// sub-range the caller has already narrowed down to the corner's
    /// neighborhood.
    pub slot: &'a [(Quadrant<Dim>, Origin)],
    /// Which of the side's own `Dim::CORNERS` corners touches the shared vertex.
    pub corner_in_zorder: u8,
    pub tree_id: usize,
}

/// Resolves and fires one corner callback for `sides`, if any side has a
/// local participant. `ancestor` is the smallest quadrant known to
/// contain every candidate (used to build the synthetic search key and
/// to verify a tentative pick actually touches the corner).
pub fn corner_iterate<'a, Dim, F>(
    ancestor: &Quadrant<Dim>,
    sides: &[CornerSideInput<'a, Dim>],
    num_ghosts: usize,
    intra_tree: bool,
    cb: &mut F,
) where
    Dim: Dimension,
    F: FnMut(CornerInfo<'a, Dim>),
{
    if sides.iter().all(|s| s.slot.is_empty()) {
        return;
    }

    let mut resolved: Vec<CornerSide<'a, Dim>> = Vec::with_capacity(sides.len());
    let mut any_local = false;

    for side in sides {
        let mut accepted = None;
        if let Some((quad, origin)) = pick_corner_candidate(ancestor, side) {
            if corner_point_in_region(ancestor, quad, side.corner_in_zorder) {
                accepted = Some((quad, origin));
            }
        }

        match accepted {
            Some((quad, origin)) => {
                if matches!(origin, Origin::Local(_)) {
                    any_local = true;
                }
                resolved.push(CornerSide {
                    quad: Some(quad),
                    tree_id: side.tree_id,
                    tree_local_num: origin.tree_local_num(num_ghosts),
                    corner_in_zorder: side.corner_in_zorder,
                });
            }
            None => resolved.push(CornerSide {
                quad: None,
                tree_id: side.tree_id,
                tree_local_num: 0,
                corner_in_zorder: side.corner_in_zorder,
            }),
        }
    }

    if !any_local {
        return;
    }

    let mut flags = IncidenceFlags::empty();
    if intra_tree {
        flags |= IncidenceFlags::INTRA_TREE;
    }

    cb(CornerInfo { flags, sides: resolved });
}

fn pick_corner_candidate<'a, Dim: Dimension>(
    ancestor: &Quadrant<Dim>,
    side: &CornerSideInput<'a, Dim>,
) -> Option<(&'a Quadrant<Dim>, Origin)> {
    match side.slot {
        [] => None,
        [(q, o)] => Some((q, *o)),
        slot => {
            if side.corner_in_zorder == 0 {
                let (q, o) = &slot[0];
                Some((q, *o))
            } else if side.corner_in_zorder as usize == Dim::CORNERS - 1 {
                let (q, o) = slot.last().expect("slot has at least 2 entries here");
                Some((q, *o))
            } else {
                let key = synthetic_corner_key(ancestor, side.corner_in_zorder);
                let idx = match find_higher_bound(slot, &key, |(q, _)| q) {
                    Some(idx) => idx,
                    None => {
                        #[cfg(feature = "std")]
                        crate::diagnostics::report_missing_candidate("corner", side.tree_id, side.corner_in_zorder);
                        return None;
                    }
                };
                let (q, o) = &slot[idx];
                Some((q, *o))
            }
        }
    }
}

/// The key used to binary-search a side's slot for the candidate nearest
/// to `corner`: `ancestor`'s base coordinate, pushed out by `LEN(L) -
/// LEN(MAXLEVEL)` on the axes the corner's bit pattern selects, at full
/// `MAXLEVEL` resolution.
fn synthetic_corner_key<Dim: Dimension>(ancestor: &Quadrant<Dim>, corner: u8) -> Quadrant<Dim> {
    let shift = len_at(ancestor.level) - len_at(MAXLEVEL);
    let bump = |base: i64, bit: u8| if bit == 1 { base + shift } else { base };

    let x = bump(ancestor.x, corner & 1);
    let y = bump(ancestor.y, (corner >> 1) & 1);
    let z = if Dim::D == 3 {
        bump(ancestor.z, (corner >> 2) & 1)
    } else {
        ancestor.z
    };
    Quadrant::new(x, y, z, MAXLEVEL)
}

/// Whether `quad`'s own `corner` point still lies within `ancestor`'s
/// inclusive box — the check that rejects a binary-search pick that
/// landed on a neighboring, non-participating quadrant.
fn corner_point_in_region<Dim: Dimension>(ancestor: &Quadrant<Dim>, quad: &Quadrant<Dim>, corner: u8) -> bool {
    let (px, py, pz) = quad.corner_point(corner);
    let lo_x = ancestor.x;
    let hi_x = ancestor.x + ancestor.len();
    let lo_y = ancestor.y;
    let hi_y = ancestor.y + ancestor.len();

    let in_axis = |v, lo, hi| v >= lo && v <= hi;
    in_axis(px, lo_x, hi_x)
        && in_axis(py, lo_y, hi_y)
        && (Dim::D == 2 || in_axis(pz, ancestor.z, ancestor.z + ancestor.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use morton::Dim2;

    fn no_ghosts() -> usize {
        0
    }

    #[test]
    fn single_candidate_side_is_accepted_outright() {
        let ancestor = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let q = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let slot = [(q, Origin::Local(0))];
        let sides = [CornerSideInput {
            slot: &slot,
            corner_in_zorder: 3,
            tree_id: 0,
        }];

        let mut fired = Vec::new();
        corner_iterate(&ancestor, &sides, no_ghosts(), true, &mut |info| fired.push(info));

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].sides[0].quad, Some(&q));
    }

    #[test]
    fn empty_slots_never_fire() {
        let ancestor = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let empty: [(Quadrant<Dim2>, Origin); 0] = [];
        let sides = [CornerSideInput {
            slot: &empty,
            corner_in_zorder: 0,
            tree_id: 0,
        }];

        let mut fired = 0;
        corner_iterate(&ancestor, &sides, no_ghosts(), true, &mut |_| fired += 1);
        assert_eq!(fired, 0);
    }

    #[test]
    fn all_ghost_sides_never_fire() {
        let ancestor = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let q = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let slot = [(q, Origin::Ghost(0))];
        let sides = [CornerSideInput {
            slot: &slot,
            corner_in_zorder: 3,
            tree_id: 1,
        }];

        let mut fired = 0;
        corner_iterate(&ancestor, &sides, 1, false, &mut |_| fired += 1);
        assert_eq!(fired, 0);
    }

    #[test]
    fn corner_zero_picks_first_entry_of_multi_candidate_slot() {
        use morton::len_at;
        let ancestor = Quadrant::<Dim2>::new_2d(0, 0, 0);
        let half = len_at(1);
        let q0 = Quadrant::<Dim2>::new_2d(0, 0, 1);
        let q1 = Quadrant::<Dim2>::new_2d(half, 0, 1);
        let slot = [(q0, Origin::Local(0)), (q1, Origin::Local(1))];
        let sides = [CornerSideInput {
            slot: &slot,
            corner_in_zorder: 0,
            tree_id: 0,
        }];

        let mut fired = Vec::new();
        corner_iterate(&ancestor, &sides, 0, true, &mut |info| fired.push(info));
        assert_eq!(fired[0].sides[0].quad, Some(&q0));
    }
}
