//! Integer Morton (z-order) arithmetic over quadtree/octree cells.
//!
//! This crate is the leaf layer of a forest-traversal iterator: it knows
//! nothing about trees, ghosts, or callbacks, only how to compare, split,
//! and binary-search sorted sequences of integer-coordinate cells by
//! z-order. See `forest-iter` for the traversal built on top of it.

#![no_std]

extern crate alloc;

pub mod dim;
pub mod ghost;
pub mod quadrant;
pub mod split;

pub use dim::{Dim2, Dim3, Dimension};
pub use ghost::build_ghost_first;
pub use quadrant::{len_at, Quadrant, MAXLEVEL, ROOT_LEN};
pub use split::{find_higher_bound, split_at_level, split_quadrants_at_level};
