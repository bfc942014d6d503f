//! Package layout analysis
//!
//! - **classifier**: which paths matter and which package owns them
//! - **discovery**: exhaustive walk for every package root
//! - **affected**: turn a diff into the set of packages to retest

pub mod affected;
pub mod classifier;
pub mod discovery;

pub use affected::{AffectedAnalysis, ChangeResolver};
pub use classifier::PathClassifier;
