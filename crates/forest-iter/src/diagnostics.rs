//! `std`-only diagnostics for conditions that are not programming errors
//! (so not worth a `debug_assert!`) but are still worth a developer's
//! attention: a corner or edge synthetic key finding no candidate in a
//! side's slot. Absent sides are valid in a forest with real boundaries,
//! so this never panics and is compiled out entirely in `no_std` builds.

/// Prints a one-line diagnostic when a corner/edge lookup comes up empty,
/// only in debug builds with the `std` feature enabled. A no-op
/// otherwise.
pub fn report_missing_candidate(context: &str, tree_id: usize, feature: u8) {
    if cfg!(debug_assertions) {
        std::eprintln!("forest_iter: no candidate for {context} on tree {tree_id}, feature {feature}");
    }
}
