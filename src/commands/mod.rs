//! CLI commands for affected-ci
//!
//! - **affected**: packages affected by a diff, as a JSON array for CI matrices
//! - **packages**: every package in the project
//! - **run**: run a command once per selected package, in parallel
//! - **init**: write a starter configuration file
//!
//! Commands other than `init` take `&ProjectContext` so the config is loaded once.

pub mod affected;
pub mod init;
pub mod packages;
pub mod run;

pub use affected::run_affected;
pub use init::run_init;
pub use packages::run_packages;
pub use run::{Selection, run_run};
