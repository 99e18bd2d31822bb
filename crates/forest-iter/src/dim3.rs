//! The edge incidence only exists in three dimensions, so its constant
//! lives on its own trait rather than widening [`morton::Dimension`]
//! with a field `Dim2` can't give a meaningful value to.

use morton::{Dim3, Dimension};

/// Extends [`Dimension`] with the edge count, implemented only for
/// [`Dim3`]. Generic code that needs an edge iterator (the edge pass of
/// the driver, `EdgeInfo`) is bounded by this trait instead of
/// `Dimension`, so it simply does not compile for `Dim2`.
pub trait Dimension3: Dimension {
    /// Edges per cell. Always 12 for a cube.
    const EDGES: usize;
}

impl Dimension3 for Dim3 {
    const EDGES: usize = 12;
}
