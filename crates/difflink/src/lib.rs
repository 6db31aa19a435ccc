pub mod app;
pub mod converter;
pub mod domain;
pub mod infra;

pub use converter::{Rewrite, rewrite};
pub use domain::file::{FileEntry, FileSet};
pub use domain::line_ref::LineRef;
