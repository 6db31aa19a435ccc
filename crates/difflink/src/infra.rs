//! Infrastructure adapters for the pull request file inventory.

pub mod pr_files;
