/// Compile-time dimension tag shared by every generic piece of the
/// traversal: a quadtree cell (`Dim2`) has 4 children and 4 faces, an
/// octree cell (`Dim3`) has 8 children and 6 faces, and the bit-interleaving
/// / child-index arithmetic in [`crate::quadrant`] and [`crate::split`] is
/// written once against this trait instead of twice against copy-pasted
/// 2D/3D modules.
pub trait Dimension: Copy + Eq + core::fmt::Debug + 'static {
    /// Spatial dimension, 2 or 3.
    const D: u32;
    /// Children per cell, `2^D`.
    const CHILDREN: usize;
    /// Faces per cell, `2*D`.
    const FACES: usize;
    /// Corners per cell, equal to [`Self::CHILDREN`].
    const CORNERS: usize;
}

/// Marker for the 2D (quadtree) instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dim2;

impl Dimension for Dim2 {
    const D: u32 = 2;
    const CHILDREN: usize = 4;
    const FACES: usize = 4;
    const CORNERS: usize = 4;
}

/// Marker for the 3D (octree) instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dim3;

impl Dimension for Dim3 {
    const D: u32 = 3;
    const CHILDREN: usize = 8;
    const FACES: usize = 6;
    const CORNERS: usize = 8;
}
