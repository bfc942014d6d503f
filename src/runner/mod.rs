//! Per-package command execution
//!
//! - **template**: command line with a `{package}` placeholder
//! - **pool**: bounded-concurrency runner and result aggregation

pub mod pool;
pub mod template;

pub use pool::{DEFAULT_CONCURRENCY, ParallelRunner, RunSummary};
pub use template::CommandTemplate;
