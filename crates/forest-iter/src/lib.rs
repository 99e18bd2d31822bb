//! Parallel adaptive-mesh traversal over a distributed forest of
//! quadtrees/octrees: given a forest, a ghost layer, and inter-tree
//! connectivity, visits every topological incidence (volume, face, and
//! — in three dimensions — edge and corner) exactly once, including the
//! hanging configurations 2:1 adaptive refinement produces.
//!
//! See [`driver::iterate_2d`] / [`driver::iterate_3d`] for the entry
//! points.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod callback;
pub mod corner;
pub mod dim3;
pub mod driver;
pub mod edge;
pub mod face;
pub mod model;
pub mod topology;

#[cfg(feature = "std")]
pub mod diagnostics;

pub use callback::{CornerInfo, CornerSide, EdgeInfo, EdgeSide, FaceInfo, FaceSide, IncidenceFlags, VolumeInfo};
pub use dim3::Dimension3;
pub use driver::{iterate_2d, iterate_3d};
pub use model::{Connectivity, FaceNeighbor, Forest, GhostLayer, Origin, TreeFeature};

pub use morton::{Dim2, Dim3, Dimension, Quadrant};
