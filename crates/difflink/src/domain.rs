//! Domain types shared by the converter and the pull request adapters.

/// Pull request file inventory entries and lookup.
pub mod file;
/// Line and line-range references with diff anchor rendering.
pub mod line_ref;
