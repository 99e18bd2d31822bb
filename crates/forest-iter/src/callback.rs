//! Callback payload types: what the driver hands to `qcb`/`fcb`/`ecb`/`vcb`.

use morton::Quadrant;

bitflags::bitflags! {
    /// The three orthogonal booleans every non-volume callback carries,
    /// packed the way the teacher packs its own node state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IncidenceFlags: u8 {
        /// Set when this callback is one of several covering a hanging
        /// (non-conforming, 2:1) incidence rather than a single
        /// conforming one.
        const HANGING = 1;
        /// Set when every participating side belongs to the same tree.
        const INTRA_TREE = 1 << 1;
        /// Set for a face with no neighbor tree (a literal root face).
        const OUTSIDE_FACE = 1 << 2;
    }
}

impl IncidenceFlags {
    pub const fn is_hanging(self) -> bool {
        self.contains(Self::HANGING)
    }

    pub const fn is_intra_tree(self) -> bool {
        self.contains(Self::INTRA_TREE)
    }

    pub const fn is_outside_face(self) -> bool {
        self.contains(Self::OUTSIDE_FACE)
    }
}

/// A volume (leaf quadrant) callback payload.
#[derive(Debug, Clone, Copy)]
pub struct VolumeInfo<'a, Dim> {
    pub tree_id: usize,
    pub tree_local_num: isize,
    pub quad: &'a Quadrant<Dim>,
}

/// One side of a face incidence.
#[derive(Debug, Clone, Copy)]
pub struct FaceSide<'a, Dim> {
    pub quad: &'a Quadrant<Dim>,
    pub tree_id: usize,
    pub tree_local_num: isize,
    pub outgoing_face: u8,
}

/// A face callback payload. `right` equals `left` (same side, same
/// quadrant reference) for an outside face — see
/// [`IncidenceFlags::OUTSIDE_FACE`].
#[derive(Debug, Clone, Copy)]
pub struct FaceInfo<'a, Dim> {
    pub flags: IncidenceFlags,
    pub orientation: u8,
    pub left: FaceSide<'a, Dim>,
    pub right: FaceSide<'a, Dim>,
}

/// One side of an edge incidence. `quad` is `None` for a side with no
/// participating leaf at this edge (possible only transiently during
/// descent, never in a fired callback per the coverage guarantee).
#[derive(Debug, Clone, Copy)]
pub struct EdgeSide<'a, Dim> {
    pub quad: Option<&'a Quadrant<Dim>>,
    pub tree_id: usize,
    pub tree_local_num: isize,
    pub edge_in_zorder: u8,
}

/// An edge callback payload (three dimensions only).
#[derive(Debug, Clone)]
pub struct EdgeInfo<'a, Dim> {
    pub flags: IncidenceFlags,
    pub common_corner: [u8; 2],
    pub sides: alloc::vec::Vec<EdgeSide<'a, Dim>>,
}

/// One side of a corner incidence. `quad` is `None` for a side with no
/// participating leaf.
#[derive(Debug, Clone, Copy)]
pub struct CornerSide<'a, Dim> {
    pub quad: Option<&'a Quadrant<Dim>>,
    pub tree_id: usize,
    pub tree_local_num: isize,
    pub corner_in_zorder: u8,
}

/// A corner (2D: vertex) callback payload.
#[derive(Debug, Clone)]
pub struct CornerInfo<'a, Dim> {
    pub flags: IncidenceFlags,
    pub sides: alloc::vec::Vec<CornerSide<'a, Dim>>,
}
