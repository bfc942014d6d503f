//! Core building blocks shared by every command
//!
//! - **config**: package layout configuration (JSON with comments)
//! - **context**: project root plus loaded config, built once in main.rs
//! - **diff**: changed-file sources (file, stdin, git)
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: changed-file listing through system git

pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod vcs;
