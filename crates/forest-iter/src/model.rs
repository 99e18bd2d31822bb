//! Read-only forest/ghost/connectivity containers the driver consumes.
//!
//! Building these from an actual mesh description (refinement,
//! coarsening, partitioning, the connectivity tables themselves) is out
//! of scope for this crate — see `SPEC_FULL.md` section 1. What lives
//! here is just the data the traversal reads, plus the minimal builder
//! methods a caller or test fixture needs to populate it by hand.

use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use hashbrown::HashMap;
use morton::{build_ghost_first, Dimension, Quadrant};

/// Tags one entry of a merged local+ghost side range (see
/// `SPEC_FULL.md`'s Open Question on `DescentCursors`) with where it
/// came from, so the sign of `tree_local_num` can be recovered without
/// keeping two separate cursors per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Index into the owning tree's local quadrant vector.
    Local(usize),
    /// Index into the ghost layer's flat quadrant vector.
    Ghost(usize),
}

impl Origin {
    /// The signed `tree_local_num` this origin reports to callbacks:
    /// non-negative for local, `index - num_ghosts` (negative) for
    /// ghost, matching the source's own convention.
    pub fn tree_local_num(self, num_ghosts: usize) -> isize {
        match self {
            Origin::Local(i) => i as isize,
            Origin::Ghost(i) => i as isize - num_ghosts as isize,
        }
    }
}

/// A distributed forest: one sorted (Morton order) quadrant sequence per
/// local tree. Sortedness is a precondition checked by `debug_assert!`,
/// never established by this crate (sorting a tree is out of scope).
#[derive(Debug, Clone)]
pub struct Forest<Dim: Dimension> {
    pub trees: Vec<Vec<Quadrant<Dim>>>,
}

impl<Dim: Dimension> Forest<Dim> {
    pub fn new(trees: Vec<Vec<Quadrant<Dim>>>) -> Self {
        let forest = Self { trees };
        forest.debug_assert_valid();
        forest
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    fn debug_assert_valid(&self) {
        debug_assert!(
            self.trees.iter().all(|t| t.windows(2).all(|w| w[0] < w[1])),
            "forest tree is not strictly sorted by morton order"
        );
    }
}

/// A single sorted sequence of quadrants owned by other ranks, annotated
/// by owning tree id and globally sorted by `(owning_tree, morton)`.
#[derive(Debug, Clone)]
pub struct GhostLayer<Dim: Dimension> {
    quads: Vec<Quadrant<Dim>>,
    owning_tree: Vec<usize>,
    ghost_first: Vec<usize>,
}

impl<Dim: Dimension> GhostLayer<Dim> {
    /// Builds a ghost layer from `(quadrant, owning_tree)` pairs already
    /// sorted by `(owning_tree, morton)`.
    pub fn build(entries: Vec<(Quadrant<Dim>, usize)>, num_trees: usize) -> Self {
        let owning_tree: Vec<usize> = entries.iter().map(|(_, t)| *t).collect();
        let quads: Vec<Quadrant<Dim>> = entries.into_iter().map(|(q, _)| q).collect();

        debug_assert!(
            owning_tree.windows(2).all(|w| w[0] <= w[1]),
            "ghost layer is not sorted by owning tree"
        );
        debug_assert!(
            (0..quads.len()).collect::<Vec<_>>().windows(2).all(|w| {
                let (a, b) = (w[0], w[1]);
                owning_tree[a] != owning_tree[b] || quads[a] < quads[b]
            }),
            "ghost layer is not sorted by morton order within a tree"
        );

        let ghost_first = build_ghost_first(&owning_tree, num_trees, |&t| t);
        Self {
            quads,
            owning_tree,
            ghost_first,
        }
    }

    /// Empty ghost layer for `num_trees` trees (the common no-neighbors-yet-known case).
    pub fn empty(num_trees: usize) -> Self {
        Self {
            quads: Vec::new(),
            owning_tree: Vec::new(),
            ghost_first: vec![0; num_trees + 1],
        }
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn owning_tree_of(&self, ghost_index: usize) -> usize {
        self.owning_tree[ghost_index]
    }

    /// The sub-range of ghosts owned by tree `t`.
    pub fn range_for_tree(&self, t: usize) -> &[Quadrant<Dim>] {
        &self.quads[self.ghost_first[t]..self.ghost_first[t + 1]]
    }

    /// The absolute index within [`Self::quads`] of `range_for_tree(t)`'s first element.
    pub fn base_for_tree(&self, t: usize) -> usize {
        self.ghost_first[t]
    }

    pub fn quads(&self) -> &[Quadrant<Dim>] {
        &self.quads
    }
}

/// A face neighbor: the neighbor tree, the neighbor's local face id, and
/// the orientation permutation between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceNeighbor {
    pub tree: usize,
    pub face: u8,
    pub orientation: u8,
}

/// One non-conforming edge/corner incidence: a tree and its local
/// edge/corner id, with an orientation byte recording how that tree's
/// edge/corner endpoints line up with the canonical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeFeature {
    pub tree: usize,
    pub feature: u8,
}

/// Read-only tables describing how tree root cubes are glued.
///
/// `tree_to_tree`/`tree_to_face`/`face_orientation` are always present.
/// The edge tables are only meaningful for `Dim3` and are left empty for
/// `Dim2` (2D has no edges distinct from corners). `tree_to_corner`
/// serves both the 2D "vertex" and 3D "corner" case, since `V == C` in
/// both.
#[derive(Debug, Clone)]
pub struct Connectivity<Dim: Dimension> {
    num_trees: usize,
    faces_per_tree: usize,
    corners_per_tree: usize,
    tree_to_face_neighbor: Vec<Vec<FaceNeighbor>>,

    /// Non-conforming edge registrations: `edge_to_tree[i]` for
    /// `i in ett_offset[e]..ett_offset[e + 1]` lists every `(tree, edge)`
    /// explicitly glued to logical edge `e`.
    edge_to_tree: Vec<TreeFeature>,
    ett_offset: Vec<usize>,

    /// Non-conforming corner registrations, same shape as the edge tables.
    corner_to_tree: Vec<TreeFeature>,
    ctt_offset: Vec<usize>,

    /// Reverse lookup from a participating `(tree, local edge)` to its
    /// registration slot, populated as entries are registered.
    edge_index: HashMap<(usize, u8), usize>,
    /// Reverse lookup from a participating `(tree, local corner)` to its
    /// registration slot.
    corner_index: HashMap<(usize, u8), usize>,

    _dim: PhantomData<Dim>,
}

impl<Dim: Dimension> Connectivity<Dim> {
    /// A forest of `num_trees` disconnected trees: every face is an
    /// outside face, no edges or corners are registered as non-conforming.
    pub fn unconnected(num_trees: usize) -> Self {
        Self {
            num_trees,
            faces_per_tree: Dim::FACES,
            corners_per_tree: Dim::CORNERS,
            tree_to_face_neighbor: vec![Vec::new(); num_trees],
            edge_to_tree: Vec::new(),
            ett_offset: vec![0],
            corner_to_tree: Vec::new(),
            ctt_offset: vec![0],
            edge_index: HashMap::new(),
            corner_index: HashMap::new(),
            _dim: PhantomData,
        }
    }

    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Glues face `f1` of `t1` to face `f2` of `t2` with the given
    /// orientation, symmetrically. Faces left unglued remain outside
    /// faces.
    pub fn connect_faces(&mut self, t1: usize, f1: u8, t2: usize, f2: u8, orientation: u8) {
        self.set_face_neighbor(t1, f1, FaceNeighbor {
            tree: t2,
            face: f2,
            orientation,
        });
        self.set_face_neighbor(t2, f2, FaceNeighbor {
            tree: t1,
            face: f1,
            orientation,
        });
    }

    fn set_face_neighbor(&mut self, t: usize, f: u8, neighbor: FaceNeighbor) {
        let row = &mut self.tree_to_face_neighbor[t];
        if row.len() <= f as usize {
            row.resize(self.faces_per_tree, FaceNeighbor {
                tree: t,
                face: f,
                orientation: 0,
            });
        }
        row[f as usize] = neighbor;
    }

    /// The neighbor of face `f` of tree `t`: `Some` when glued to another
    /// (tree, face) pair (which may be the same tree, a different face —
    /// still a real interior incidence), `None` when `f` is an outside face.
    pub fn face_neighbor(&self, t: usize, f: u8) -> Option<FaceNeighbor> {
        self.tree_to_face_neighbor
            .get(t)
            .and_then(|row| row.get(f as usize))
            .filter(|n| !(n.tree == t && n.face == f))
            .copied()
    }

    /// Registers a non-conforming edge shared by `entries` (each a
    /// `(tree, local_edge)` pair). Must be called with edges not already
    /// covered purely by the face-sharing relationships (see the driver's
    /// edge pass, which unions both sources).
    pub fn register_edge(&mut self, entries: &[(usize, u8)]) {
        debug_assert_eq!(*self.ett_offset.last().unwrap(), self.edge_to_tree.len());
        let slot = self.ett_offset.len() - 1;
        for &(tree, feature) in entries {
            self.edge_to_tree.push(TreeFeature { tree, feature });
            self.edge_index.insert((tree, feature), slot);
        }
        self.ett_offset.push(self.edge_to_tree.len());
    }

    pub fn registered_edges(&self, edge_slot: usize) -> &[TreeFeature] {
        &self.edge_to_tree[self.ett_offset[edge_slot]..self.ett_offset[edge_slot + 1]]
    }

    pub fn num_registered_edges(&self) -> usize {
        self.ett_offset.len() - 1
    }

    /// The registration slot `(tree, edge)` participates in, if any.
    pub fn edge_registration_for(&self, tree: usize, edge: u8) -> Option<usize> {
        self.edge_index.get(&(tree, edge)).copied()
    }

    /// Registers a non-conforming corner shared by `entries`, same shape
    /// as [`Self::register_edge`].
    pub fn register_corner(&mut self, entries: &[(usize, u8)]) {
        debug_assert_eq!(*self.ctt_offset.last().unwrap(), self.corner_to_tree.len());
        let slot = self.ctt_offset.len() - 1;
        for &(tree, feature) in entries {
            self.corner_to_tree.push(TreeFeature { tree, feature });
            self.corner_index.insert((tree, feature), slot);
        }
        self.ctt_offset.push(self.corner_to_tree.len());
    }

    pub fn registered_corners(&self, corner_slot: usize) -> &[TreeFeature] {
        &self.corner_to_tree[self.ctt_offset[corner_slot]..self.ctt_offset[corner_slot + 1]]
    }

    pub fn num_registered_corners(&self) -> usize {
        self.ctt_offset.len() - 1
    }

    /// The registration slot `(tree, corner)` participates in, if any.
    pub fn corner_registration_for(&self, tree: usize, corner: u8) -> Option<usize> {
        self.corner_index.get(&(tree, corner)).copied()
    }

    pub fn corners_per_tree(&self) -> usize {
        self.corners_per_tree
    }

    pub fn faces_per_tree(&self) -> usize {
        self.faces_per_tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morton::Dim2;

    #[test]
    fn unconnected_forest_has_no_face_neighbors() {
        let conn = Connectivity::<Dim2>::unconnected(3);
        for t in 0..3 {
            for f in 0..Dim2::FACES as u8 {
                assert_eq!(conn.face_neighbor(t, f), None);
            }
        }
    }

    #[test]
    fn connect_faces_is_symmetric() {
        let mut conn = Connectivity::<Dim2>::unconnected(2);
        conn.connect_faces(0, 1, 1, 3, 0);

        assert_eq!(conn.face_neighbor(0, 1), Some(FaceNeighbor {
            tree: 1,
            face: 3,
            orientation: 0
        }));
        assert_eq!(conn.face_neighbor(1, 3), Some(FaceNeighbor {
            tree: 0,
            face: 1,
            orientation: 0
        }));
        assert_eq!(conn.face_neighbor(0, 0), None);
    }

    #[test]
    fn origin_tree_local_num_convention() {
        assert_eq!(Origin::Local(5).tree_local_num(10), 5);
        assert_eq!(Origin::Ghost(3).tree_local_num(10), -7);
    }
}
