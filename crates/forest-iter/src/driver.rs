//! The two public entry points (`iterate_2d`, `iterate_3d`) and the
//! per-tree descent that drives the face/edge/corner sub-iterators.
//!
//! Each call walks every local tree once (intra-tree descent: volume
//! callbacks plus internal face/edge/corner synthesis at every split),
//! then walks every tree's F/E/V slots once more for the inter-tree
//! passes, deduplicating each geometric incidence via an owner rule.

use alloc::vec::Vec;

use hashbrown::HashSet;
use morton::{split_at_level, Dim2, Dim3, Dimension, Quadrant};

use crate::callback::{CornerInfo, EdgeInfo, FaceInfo, VolumeInfo};
use crate::corner::{corner_iterate, CornerSideInput};
use crate::dim3::Dimension3;
use crate::edge::{edge_corners, edge_from_corners, edge_iterate, EdgeSideInput};
use crate::face::{face_iterate, FaceSideInput};
use crate::model::{Connectivity, Forest, GhostLayer, Origin};
use crate::topology::{corner_across_face, faces_touching_corner, opposite_corner};

/// Tags a tree's own local quadrants, in order, for the intra-tree
/// descent (no ghosts: a tree's interior never needs another rank's view
/// of it).
fn local_tree_slot<Dim: Dimension>(tree: &[Quadrant<Dim>]) -> Vec<(Quadrant<Dim>, Origin)> {
    tree.iter().enumerate().map(|(i, q)| (*q, Origin::Local(i))).collect()
}

/// Merges tree `t`'s local quadrants with the ghosts it owns into one
/// Morton-sorted `(Quadrant, Origin)` sequence, for the inter-tree passes.
fn merged_tree_slot<Dim: Dimension>(forest: &Forest<Dim>, ghost: &GhostLayer<Dim>, t: usize) -> Vec<(Quadrant<Dim>, Origin)> {
    let locals = &forest.trees[t];
    let ghosts = ghost.range_for_tree(t);
    let base = ghost.base_for_tree(t);

    let mut out = Vec::with_capacity(locals.len() + ghosts.len());
    let (mut i, mut j) = (0usize, 0usize);
    while i < locals.len() && j < ghosts.len() {
        if locals[i] <= ghosts[j] {
            out.push((locals[i], Origin::Local(i)));
            i += 1;
        } else {
            out.push((ghosts[j], Origin::Ghost(base + j)));
            j += 1;
        }
    }
    out.extend(locals[i..].iter().enumerate().map(|(k, q)| (*q, Origin::Local(i + k))));
    out.extend(ghosts[j..].iter().enumerate().map(|(k, q)| (*q, Origin::Ghost(base + j + k))));
    out
}

/// Fast path for `iterate_2d`/`iterate_3d` when only a volume callback is
/// given: walks local quadrants directly, skipping every allocation the
/// face/edge/corner descent would otherwise need.
fn quad_iterator<Dim: Dimension, QCB: FnMut(VolumeInfo<Dim>)>(forest: &Forest<Dim>, qcb: &mut QCB) {
    for (t, tree) in forest.trees.iter().enumerate() {
        for (i, q) in tree.iter().enumerate() {
            qcb(VolumeInfo {
                tree_id: t,
                tree_local_num: i as isize,
                quad: q,
            });
        }
    }
}

/// Which of a cell's own 12 local edge ids touches `corner` along `axis`:
/// the two bits of `corner` on the axes orthogonal to `axis` select one
/// of the four edges parallel to `axis`.
fn local_edge_along_axis(axis: u8, corner: u8) -> u8 {
    let [a0, a1] = match axis {
        0 => [1u8, 2u8],
        1 => [0, 2],
        _ => [0, 1],
    };
    let b0 = (corner >> a0) & 1;
    let b1 = (corner >> a1) & 1;
    axis * 4 + b0 + 2 * b1
}

/// The two faces of a cell touching edge `edge`: one per axis orthogonal
/// to the edge's own axis, inverting `local_edge_along_axis`.
fn faces_touching_edge(edge: u8) -> [u8; 2] {
    let axis = edge / 4;
    let rem = edge % 4;
    let b0 = rem & 1;
    let b1 = (rem >> 1) & 1;
    let [a0, a1] = match axis {
        0 => [1u8, 2u8],
        1 => [0, 2],
        _ => [0, 1],
    };
    [a0 * 2 + b0, a1 * 2 + b1]
}

/// The local edges of a cell with `corner` as one of their two endpoints.
fn edges_touching_corner(corner: u8) -> Vec<u8> {
    (0..12u8).filter(|&e| edge_corners(e).contains(&corner)).collect()
}

fn intra_tree_descend_2d<QCB, FCB, VCB>(
    level: u8,
    slot: &[(Quadrant<Dim2>, Origin)],
    tree_id: usize,
    qcb: &mut Option<QCB>,
    fcb: &mut Option<FCB>,
    vcb: &mut Option<VCB>,
) where
    QCB: FnMut(VolumeInfo<Dim2>),
    FCB: FnMut(FaceInfo<Dim2>),
    VCB: FnMut(CornerInfo<Dim2>),
{
    if slot.len() <= 1 {
        if let Some((q, Origin::Local(idx))) = slot.first() {
            if let Some(cb) = qcb {
                cb(VolumeInfo {
                    tree_id,
                    tree_local_num: *idx as isize,
                    quad: q,
                });
            }
        }
        return;
    }

    let mut offsets = alloc::vec![0usize; Dim2::CHILDREN + 1];
    split_at_level(slot, level, |(q, _)| q, &mut offsets);
    let children: Vec<&[(Quadrant<Dim2>, Origin)]> =
        (0..Dim2::CHILDREN).map(|k| &slot[offsets[k]..offsets[k + 1]]).collect();

    for &child in &children {
        intra_tree_descend_2d(level + 1, child, tree_id, qcb, fcb, vcb);
    }

    if let Some(cb) = fcb {
        for axis in 0..Dim2::D as u8 {
            for low in (0..Dim2::CHILDREN as u8).filter(|c| (c >> axis) & 1 == 0) {
                let high = low | (1 << axis);
                let left = FaceSideInput {
                    slot: children[low as usize],
                    tree_id,
                    face: axis * 2 + 1,
                };
                let right = FaceSideInput {
                    slot: children[high as usize],
                    tree_id,
                    face: axis * 2,
                };
                face_iterate(level + 1, left, right, 0, true, false, 0, cb);
            }
        }
    }

    if let Some(cb) = vcb {
        if let Some((first_q, _)) = slot.first() {
            let ancestor = first_q.ancestor_at(level);
            let sides: Vec<CornerSideInput<Dim2>> = (0..Dim2::CHILDREN as u8)
                .map(|code| CornerSideInput {
                    slot: children[code as usize],
                    corner_in_zorder: opposite_corner::<Dim2>(code),
                    tree_id,
                })
                .collect();
            corner_iterate(&ancestor, &sides, 0, true, cb);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn intra_tree_descend_3d<QCB, FCB, ECB, VCB>(
    level: u8,
    slot: &[(Quadrant<Dim3>, Origin)],
    tree_id: usize,
    qcb: &mut Option<QCB>,
    fcb: &mut Option<FCB>,
    ecb: &mut Option<ECB>,
    vcb: &mut Option<VCB>,
) where
    QCB: FnMut(VolumeInfo<Dim3>),
    FCB: FnMut(FaceInfo<Dim3>),
    ECB: FnMut(EdgeInfo<Dim3>),
    VCB: FnMut(CornerInfo<Dim3>),
{
    if slot.len() <= 1 {
        if let Some((q, Origin::Local(idx))) = slot.first() {
            if let Some(cb) = qcb {
                cb(VolumeInfo {
                    tree_id,
                    tree_local_num: *idx as isize,
                    quad: q,
                });
            }
        }
        return;
    }

    let mut offsets = alloc::vec![0usize; Dim3::CHILDREN + 1];
    split_at_level(slot, level, |(q, _)| q, &mut offsets);
    let children: Vec<&[(Quadrant<Dim3>, Origin)]> =
        (0..Dim3::CHILDREN).map(|k| &slot[offsets[k]..offsets[k + 1]]).collect();

    for &child in &children {
        intra_tree_descend_3d(level + 1, child, tree_id, qcb, fcb, ecb, vcb);
    }

    if let Some(cb) = fcb {
        for axis in 0..Dim3::D as u8 {
            for low in (0..Dim3::CHILDREN as u8).filter(|c| (c >> axis) & 1 == 0) {
                let high = low | (1 << axis);
                let left = FaceSideInput {
                    slot: children[low as usize],
                    tree_id,
                    face: axis * 2 + 1,
                };
                let right = FaceSideInput {
                    slot: children[high as usize],
                    tree_id,
                    face: axis * 2,
                };
                face_iterate(level + 1, left, right, 0, true, false, 0, cb);
            }
        }
    }

    if ecb.is_some() {
        for axis in 0..3u8 {
            for half in 0..2u8 {
                let sides: Vec<EdgeSideInput<Dim3>> = (0..Dim3::CHILDREN as u8)
                    .filter(|c| (c >> axis) & 1 == half)
                    .map(|code| EdgeSideInput {
                        slot: children[code as usize],
                        tree_id,
                        edge_in_zorder: local_edge_along_axis(axis, opposite_corner::<Dim3>(code)),
                    })
                    .collect();

                if let Some(cb) = ecb {
                    if let Some(vcb_inner) = vcb {
                        edge_iterate(level + 1, &sides, 0, true, cb, vcb_inner);
                    } else {
                        edge_iterate(level + 1, &sides, 0, true, cb, &mut |_: CornerInfo<Dim3>| {});
                    }
                }
            }
        }
    }

    if let Some(cb) = vcb {
        if let Some((first_q, _)) = slot.first() {
            let ancestor = first_q.ancestor_at(level);
            let sides: Vec<CornerSideInput<Dim3>> = (0..Dim3::CHILDREN as u8)
                .map(|code| CornerSideInput {
                    slot: children[code as usize],
                    corner_in_zorder: opposite_corner::<Dim3>(code),
                    tree_id,
                })
                .collect();
            corner_iterate(&ancestor, &sides, 0, true, cb);
        }
    }
}

fn inter_tree_faces<Dim, FCB>(
    connectivity: &Connectivity<Dim>,
    merged: &[Vec<(Quadrant<Dim>, Origin)>],
    num_ghosts: usize,
    fcb: &mut Option<FCB>,
) where
    Dim: Dimension,
    FCB: FnMut(FaceInfo<Dim>),
{
    if fcb.is_none() {
        return;
    }

    for t in 0..connectivity.num_trees() {
        for f in 0..connectivity.faces_per_tree() as u8 {
            match connectivity.face_neighbor(t, f) {
                Some(n) => {
                    if (t, f) >= (n.tree, n.face) {
                        let left = FaceSideInput {
                            slot: &merged[t],
                            tree_id: t,
                            face: f,
                        };
                        let right = FaceSideInput {
                            slot: &merged[n.tree],
                            tree_id: n.tree,
                            face: n.face,
                        };
                        if let Some(cb) = fcb {
                            face_iterate(0, left, right, n.orientation, false, false, num_ghosts, cb);
                        }
                    }
                }
                None => {
                    let side = FaceSideInput {
                        slot: &merged[t],
                        tree_id: t,
                        face: f,
                    };
                    if let Some(cb) = fcb {
                        face_iterate(0, side, side, 0, false, true, num_ghosts, cb);
                    }
                }
            }
        }
    }
}

/// Collects every `(tree, corner)` pair sharing the same geometric
/// corner as `(t, c)`: a BFS over face gluings (using `corner_across_face`
/// to carry the corner id across each hop), three dimensions' worth of
/// edge-to-corner composition (an edge registered as non-conforming also
/// ties together the corners at its two endpoints), and whatever this
/// tree's corner is explicitly registered to. Face-derived discovery
/// covers corners shared purely by face adjacency (no explicit
/// registration exists to name them); the edge and corner registrations
/// cover the non-conforming cases adjacency alone can't express.
fn collect_corner_group<Dim: Dimension>(connectivity: &Connectivity<Dim>, t: usize, c: u8) -> HashSet<(usize, u8)> {
    let mut seen = HashSet::new();
    let mut frontier = alloc::vec![(t, c)];
    seen.insert((t, c));

    while let Some((ct, cc)) = frontier.pop() {
        for face in faces_touching_corner::<Dim>(cc) {
            if let Some(n) = connectivity.face_neighbor(ct, face) {
                let other = corner_across_face::<Dim>(face, cc, n.face, n.orientation);
                if seen.insert((n.tree, other)) {
                    frontier.push((n.tree, other));
                }
            }
        }

        if Dim::D == 3 {
            for edge in edges_touching_corner(cc) {
                if let Some(slot) = connectivity.edge_registration_for(ct, edge) {
                    let position = edge_corners(edge)
                        .iter()
                        .position(|&x| x == cc)
                        .expect("cc is one of edge's own two endpoints by construction");
                    for tf in connectivity.registered_edges(slot) {
                        let other = edge_corners(tf.feature)[position];
                        if seen.insert((tf.tree, other)) {
                            frontier.push((tf.tree, other));
                        }
                    }
                }
            }
        }
    }

    if let Some(slot) = connectivity.corner_registration_for(t, c) {
        for tf in connectivity.registered_corners(slot) {
            seen.insert((tf.tree, tf.feature));
        }
    }

    seen
}

fn inter_tree_corners<Dim, VCB>(
    connectivity: &Connectivity<Dim>,
    merged: &[Vec<(Quadrant<Dim>, Origin)>],
    num_ghosts: usize,
    vcb: &mut Option<VCB>,
) where
    Dim: Dimension,
    VCB: FnMut(CornerInfo<Dim>),
{
    if vcb.is_none() {
        return;
    }

    for t in 0..connectivity.num_trees() {
        for c in 0..connectivity.corners_per_tree() as u8 {
            let group = collect_corner_group(connectivity, t, c);
            let owner = group.iter().copied().min().expect("group always contains (t, c)");
            if owner != (t, c) {
                continue;
            }

            let mut entries: Vec<(usize, u8)> = group.into_iter().collect();
            entries.sort_unstable();

            let ancestor = Quadrant::<Dim>::new(0, 0, 0, 0);
            let sides: Vec<CornerSideInput<Dim>> = entries
                .into_iter()
                .map(|(tree, corner)| CornerSideInput {
                    slot: &merged[tree],
                    corner_in_zorder: corner,
                    tree_id: tree,
                })
                .collect();

            if let Some(cb) = vcb {
                corner_iterate(&ancestor, &sides, num_ghosts, false, cb);
            }
        }
    }
}

/// Collects every `(tree, edge)` pair sharing the same geometric edge as
/// `(t, e)`: a BFS over the two faces touching the edge (carrying both
/// endpoint corners across each hop via `corner_across_face`, then
/// reading back the neighbor's own edge id from its endpoint pair)
/// unioned with whatever this tree's edge is explicitly registered to.
fn collect_edge_group(connectivity: &Connectivity<Dim3>, t: usize, e: u8) -> HashSet<(usize, u8)> {
    let mut seen = HashSet::new();
    let mut frontier = alloc::vec![(t, e)];
    seen.insert((t, e));

    while let Some((ct, ce)) = frontier.pop() {
        let [c0, c1] = edge_corners(ce);
        for face in faces_touching_edge(ce) {
            if let Some(n) = connectivity.face_neighbor(ct, face) {
                let nc0 = corner_across_face::<Dim3>(face, c0, n.face, n.orientation);
                let nc1 = corner_across_face::<Dim3>(face, c1, n.face, n.orientation);
                let ne = edge_from_corners(nc0, nc1);
                if seen.insert((n.tree, ne)) {
                    frontier.push((n.tree, ne));
                }
            }
        }
    }

    if let Some(slot) = connectivity.edge_registration_for(t, e) {
        for tf in connectivity.registered_edges(slot) {
            seen.insert((tf.tree, tf.feature));
        }
    }

    seen
}

fn inter_tree_edges_3d<ECB, VCB>(
    connectivity: &Connectivity<Dim3>,
    merged: &[Vec<(Quadrant<Dim3>, Origin)>],
    num_ghosts: usize,
    ecb: &mut Option<ECB>,
    vcb: &mut Option<VCB>,
) where
    ECB: FnMut(EdgeInfo<Dim3>),
    VCB: FnMut(CornerInfo<Dim3>),
{
    if ecb.is_none() {
        return;
    }

    for t in 0..connectivity.num_trees() {
        for e in 0..<Dim3 as Dimension3>::EDGES as u8 {
            let group = collect_edge_group(connectivity, t, e);
            let owner = group.iter().copied().min().expect("group always contains (t, e)");
            if owner != (t, e) {
                continue;
            }

            let mut entries: Vec<(usize, u8)> = group.into_iter().collect();
            entries.sort_unstable();

            let sides: Vec<EdgeSideInput<Dim3>> = entries
                .into_iter()
                .map(|(tree, edge)| EdgeSideInput {
                    slot: &merged[tree],
                    tree_id: tree,
                    edge_in_zorder: edge,
                })
                .collect();

            if let Some(cb) = ecb {
                if let Some(vcb_inner) = vcb {
                    edge_iterate(0, &sides, num_ghosts, false, cb, vcb_inner);
                } else {
                    edge_iterate(0, &sides, num_ghosts, false, cb, &mut |_: CornerInfo<Dim3>| {});
                }
            }
        }
    }
}

/// Traverses a 2D forest, invoking `qcb`/`fcb`/`vcb` once per volume,
/// face, and corner (vertex) incidence respectively. Any of the three
/// may be `None` to skip that callback kind entirely; when only `qcb` is
/// given, the fast `quad_iterator` path is taken instead of the full
/// descent.
pub fn iterate_2d<QCB, FCB, VCB>(
    forest: &Forest<Dim2>,
    ghost: &GhostLayer<Dim2>,
    connectivity: &Connectivity<Dim2>,
    mut qcb: Option<QCB>,
    mut fcb: Option<FCB>,
    mut vcb: Option<VCB>,
) where
    QCB: FnMut(VolumeInfo<Dim2>),
    FCB: FnMut(FaceInfo<Dim2>),
    VCB: FnMut(CornerInfo<Dim2>),
{
    if fcb.is_none() && vcb.is_none() {
        if let Some(cb) = qcb.as_mut() {
            quad_iterator(forest, cb);
        }
        return;
    }

    for t in 0..forest.num_trees() {
        let local = local_tree_slot(&forest.trees[t]);
        intra_tree_descend_2d(0, &local, t, &mut qcb, &mut fcb, &mut vcb);
    }

    let num_ghosts = ghost.len();
    let merged: Vec<_> = (0..forest.num_trees()).map(|t| merged_tree_slot(forest, ghost, t)).collect();

    inter_tree_faces(connectivity, &merged, num_ghosts, &mut fcb);
    inter_tree_corners(connectivity, &merged, num_ghosts, &mut vcb);
}

/// Traverses a 3D forest, invoking `qcb`/`fcb`/`ecb`/`vcb` once per
/// volume, face, edge, and corner incidence respectively. Same `None`
/// and fast-path rules as [`iterate_2d`].
pub fn iterate_3d<QCB, FCB, ECB, VCB>(
    forest: &Forest<Dim3>,
    ghost: &GhostLayer<Dim3>,
    connectivity: &Connectivity<Dim3>,
    mut qcb: Option<QCB>,
    mut fcb: Option<FCB>,
    mut ecb: Option<ECB>,
    mut vcb: Option<VCB>,
) where
    QCB: FnMut(VolumeInfo<Dim3>),
    FCB: FnMut(FaceInfo<Dim3>),
    ECB: FnMut(EdgeInfo<Dim3>),
    VCB: FnMut(CornerInfo<Dim3>),
{
    if fcb.is_none() && ecb.is_none() && vcb.is_none() {
        if let Some(cb) = qcb.as_mut() {
            quad_iterator(forest, cb);
        }
        return;
    }

    for t in 0..forest.num_trees() {
        let local = local_tree_slot(&forest.trees[t]);
        intra_tree_descend_3d(0, &local, t, &mut qcb, &mut fcb, &mut ecb, &mut vcb);
    }

    let num_ghosts = ghost.len();
    let merged: Vec<_> = (0..forest.num_trees()).map(|t| merged_tree_slot(forest, ghost, t)).collect();

    inter_tree_faces(connectivity, &merged, num_ghosts, &mut fcb);
    inter_tree_edges_3d(connectivity, &merged, num_ghosts, &mut ecb, &mut vcb);
    inter_tree_corners(connectivity, &merged, num_ghosts, &mut vcb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_forest_2d(n: usize) -> Forest<Dim2> {
        Forest::new((0..n).map(|_| alloc::vec![Quadrant::<Dim2>::new_2d(0, 0, 0)]).collect())
    }

    fn refined_forest_2d() -> Forest<Dim2> {
        use morton::len_at;
        let half = len_at(1);
        Forest::new(alloc::vec![alloc::vec![
            Quadrant::new_2d(0, 0, 1),
            Quadrant::new_2d(half, 0, 1),
            Quadrant::new_2d(0, half, 1),
            Quadrant::new_2d(half, half, 1),
        ]])
    }

    fn refined_forest_3d() -> Forest<Dim3> {
        use morton::len_at;
        let half = len_at(1);
        let mut leaves: Vec<Quadrant<Dim3>> = Vec::new();
        for &x in &[0, half] {
            for &y in &[0, half] {
                for &z in &[0, half] {
                    leaves.push(Quadrant::new(x, y, z, 1));
                }
            }
        }
        leaves.sort();
        Forest::new(alloc::vec![leaves])
    }

    // S1: single uniform Dim2 tree, level 0.
    #[test]
    fn s1_single_root_tree_fires_volume_and_outside_incidences() {
        let forest = root_forest_2d(1);
        let ghost = GhostLayer::empty(1);
        let connectivity = Connectivity::<Dim2>::unconnected(1);

        let mut volumes = 0;
        let mut faces = 0;
        let mut corners = 0;

        iterate_2d(
            &forest,
            &ghost,
            &connectivity,
            Some(|_: VolumeInfo<Dim2>| volumes += 1),
            Some(|info: FaceInfo<Dim2>| {
                assert!(info.flags.is_outside_face());
                faces += 1;
            }),
            Some(|_: CornerInfo<Dim2>| corners += 1),
        );

        assert_eq!(volumes, 1);
        assert_eq!(faces, 4);
        assert_eq!(corners, 4);
    }

    // S2: two Dim2 trees glued along one face.
    #[test]
    fn s2_two_trees_glued_on_one_face() {
        let forest = root_forest_2d(2);
        let ghost = GhostLayer::empty(2);
        let mut connectivity = Connectivity::<Dim2>::unconnected(2);
        connectivity.connect_faces(0, 1, 1, 0, 0);

        let mut volumes = 0;
        let mut shared_faces = 0;
        let mut outside_faces = 0;
        let mut shared_corners = 0;
        let mut outside_corners = 0;

        iterate_2d(
            &forest,
            &ghost,
            &connectivity,
            Some(|_: VolumeInfo<Dim2>| volumes += 1),
            Some(|info: FaceInfo<Dim2>| {
                if info.flags.is_outside_face() {
                    outside_faces += 1;
                } else {
                    shared_faces += 1;
                    assert_eq!(info.left.tree_id, 1);
                    assert_eq!(info.right.tree_id, 0);
                }
            }),
            Some(|info: CornerInfo<Dim2>| {
                if info.sides.len() == 2 {
                    shared_corners += 1;
                } else {
                    outside_corners += 1;
                }
            }),
        );

        assert_eq!(volumes, 2);
        assert_eq!(shared_faces, 1);
        assert_eq!(outside_faces, 6);
        assert_eq!(shared_corners, 2);
        assert_eq!(outside_corners, 4);
    }

    // S3: single Dim2 tree refined once (4 leaves).
    #[test]
    fn s3_single_tree_refined_once() {
        let forest = refined_forest_2d();
        let ghost = GhostLayer::empty(1);
        let connectivity = Connectivity::<Dim2>::unconnected(1);

        let mut volumes = 0;
        let mut internal_faces = 0;
        let mut outside_faces = 0;
        let mut internal_corner_participants = 0;

        iterate_2d(
            &forest,
            &ghost,
            &connectivity,
            Some(|_: VolumeInfo<Dim2>| volumes += 1),
            Some(|info: FaceInfo<Dim2>| {
                if info.flags.is_outside_face() {
                    outside_faces += 1;
                } else {
                    internal_faces += 1;
                    assert!(info.flags.is_intra_tree());
                }
            }),
            Some(|info: CornerInfo<Dim2>| {
                if info.flags.is_intra_tree() && info.sides.len() == 4 {
                    internal_corner_participants = info.sides.iter().filter(|s| s.quad.is_some()).count();
                }
            }),
        );

        assert_eq!(volumes, 4);
        assert_eq!(internal_faces, 4);
        assert_eq!(outside_faces, 8);
        assert_eq!(internal_corner_participants, 4);
    }

    // S4: single Dim2 tree, one coarse neighbor facing two fine children
    // of its sibling (a 2:1 hanging configuration).
    #[test]
    fn s4_hanging_configuration_fires_twice() {
        use morton::len_at;
        let half = len_at(1);
        let quarter = len_at(2);

        let mut leaves = alloc::vec![
            Quadrant::<Dim2>::new_2d(half, 0, 1),
            Quadrant::<Dim2>::new_2d(quarter, 0, 2),
            Quadrant::<Dim2>::new_2d(quarter, quarter, 2),
        ];
        leaves.sort();

        let forest = Forest::new(alloc::vec![leaves]);
        let ghost = GhostLayer::empty(1);
        let connectivity = Connectivity::<Dim2>::unconnected(1);

        let mut hanging_faces = 0;

        iterate_2d(
            &forest,
            &ghost,
            &connectivity,
            None::<fn(VolumeInfo<Dim2>)>,
            Some(|info: FaceInfo<Dim2>| {
                if info.flags.is_hanging() {
                    hanging_faces += 1;
                }
            }),
            None::<fn(CornerInfo<Dim2>)>,
        );

        assert_eq!(hanging_faces, 2);
    }

    // S5: Dim3 single tree refined once (8 leaves).
    #[test]
    fn s5_octree_refined_once() {
        let forest = refined_forest_3d();
        let ghost = GhostLayer::empty(1);
        let connectivity = Connectivity::<Dim3>::unconnected(1);

        let mut volumes = 0;
        let mut internal_faces = 0;
        let mut internal_edges = 0;
        let mut internal_corner_participants = 0;

        iterate_3d(
            &forest,
            &ghost,
            &connectivity,
            Some(|_: VolumeInfo<Dim3>| volumes += 1),
            Some(|info: FaceInfo<Dim3>| {
                if !info.flags.is_outside_face() {
                    internal_faces += 1;
                }
            }),
            Some(|info: EdgeInfo<Dim3>| {
                if info.flags.is_intra_tree() && !info.flags.is_hanging() {
                    internal_edges += 1;
                    assert_eq!(info.sides.iter().filter(|s| s.quad.is_some()).count(), 4);
                }
            }),
            Some(|info: CornerInfo<Dim3>| {
                if info.flags.is_intra_tree() && info.sides.len() == 8 {
                    internal_corner_participants = info.sides.iter().filter(|s| s.quad.is_some()).count();
                }
            }),
        );

        assert_eq!(volumes, 8);
        assert_eq!(internal_faces, 12);
        assert_eq!(internal_edges, 6);
        assert_eq!(internal_corner_participants, 8);
    }

    // S6: four Dim3 trees meeting along one registered non-conforming edge.
    // Every tree's other 11 edges have no face neighbor (the trees are
    // otherwise unconnected) and no registration, so each of those fires
    // its own single-sided "outside" edge callback exactly once too.
    #[test]
    fn s6_non_conforming_edge_registration_fires_once() {
        let forest = Forest::new((0..4).map(|_| alloc::vec![Quadrant::<Dim3>::new(0, 0, 0, 0)]).collect());
        let ghost = GhostLayer::empty(4);
        let mut connectivity = Connectivity::<Dim3>::unconnected(4);
        connectivity.register_edge(&[(0, 3), (1, 2), (2, 1), (3, 0)]);

        let mut shared_fired = 0;
        let mut shared_sides = 0;
        let mut outside_fired = 0;

        iterate_3d(
            &forest,
            &ghost,
            &connectivity,
            None::<fn(VolumeInfo<Dim3>)>,
            None::<fn(FaceInfo<Dim3>)>,
            Some(|info: EdgeInfo<Dim3>| {
                if info.sides.len() > 1 {
                    shared_fired += 1;
                    shared_sides = info.sides.len();
                } else {
                    outside_fired += 1;
                }
            }),
            None::<fn(CornerInfo<Dim3>)>,
        );

        assert_eq!(shared_fired, 1);
        assert_eq!(shared_sides, 4);
        assert_eq!(outside_fired, 4 * 12 - 4);
    }
}
